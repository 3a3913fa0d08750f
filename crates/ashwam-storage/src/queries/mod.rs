//! SQL for the run history tables.

pub mod runs;
