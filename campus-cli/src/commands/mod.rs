//! Command implementations for the campus CLI

pub mod db;
pub mod serve;

pub use db::{run_init_db, run_seed};
pub use serve::run_serve;
