// crates/observability/src/lib.rs
//! Logging setup and HTTP tracing layers shared by the gainz binaries.

mod logging;
mod request_id;

pub use logging::{init_tracing, LogConfig, LogFormat, DEFAULT_FILTER, LOG_FILE_PREFIX};
pub use request_id::{
    propagate_request_id_layer, set_request_id_layer, trace_layer, RequestSpan, UlidRequestId,
    REQUEST_ID_HEADER,
};
