//! Data layer: PostgreSQL service, schema, and repositories

pub mod postgres;
pub mod types;

pub use postgres::{PgPool, PostgresError, PostgresService};
