// crates/db/src/queries/mod.rs
// Read and write operations for the habit-tracking database.

pub(crate) mod row_types;
mod habits;
mod progress;
mod snapshot;
