// crates/core/src/lib.rs
pub mod error;
pub mod stats;
pub mod streaks;
pub mod types;

pub use error::*;
pub use stats::*;
pub use streaks::*;
pub use types::*;
