//! QuinielaDB - storage for 1-X-2 football pool results
//!
//! Persists match results in a single SQLite table. The connection is
//! described by a TOML configuration file which is generated automatically
//! on first run.

pub mod config;
pub mod model;
pub mod seed;
pub mod storage;

pub use config::{ConfigError, DbConfig};
pub use model::{MatchResult, Outcome, ValidationError};
pub use storage::{DataAccessError, Database, ErrorKind};
