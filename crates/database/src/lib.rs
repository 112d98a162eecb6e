//! # Statushub Database Crate
//!
//! The storage lifecycle manager for the monitoring service. It owns the one
//! live database session and everything around it: resolving a backend DSN,
//! connecting with bounded or indefinite retry, creating and additively
//! evolving the multi-entity schema, pruning time-series tables on a
//! recurring schedule, and normalizing stored UTC timestamps to the display
//! timezone on every read.
//!
//! ## Architectural Principles
//!
//! - **One owning session:** `Database` is the single owner of the live
//!   `AnyPool`; there are no process-wide globals. Components borrow or
//!   clone the pool through it.
//! - **Backend-agnostic core:** one code path serves the embedded file
//!   database and the networked SQL servers via the `sqlx` `Any` driver;
//!   dialect differences live in `Backend` and the model registry.
//! - **All reads localized, all writes UTC:** the timezone normalizer is a
//!   read-path transformation only.
//!
//! ## Public API
//!
//! - `Database`: connect, close, and the schema lifecycle entry points.
//! - `Repository`: data access for the singleton settings row and the
//!   time-series records.
//! - `run_retention`: the recurring maintenance task.
//! - `Localize` / `timezoner`: the post-fetch timezone hook.
//! - `DbError`: the specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod maintenance;
pub mod migrate;
pub mod normalize;
pub mod registry;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{DB_FILE, Database, resolve_dsn};
pub use error::DbError;
pub use maintenance::{retention_cutoff, run_retention, sweep_table};
pub use migrate::{create_schema, drop_schema, migrate_schema};
pub use normalize::{Localize, timezoner};
pub use registry::{CORE_TABLE, MODEL_REGISTRY};
pub use repository::Repository;
