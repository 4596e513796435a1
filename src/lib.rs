//! Marketplace backend library: entrepreneurs resource over PostgreSQL.

pub mod context;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use context::RequestContext;
pub use error::AppError;
pub use models::{Entrepreneur, EntrepreneurFilter, EntrepreneurUpdate, EntrepreneursModel};
pub use response::{success_many, success_one_ok};
pub use routes::{common_routes, common_routes_with_ready, entrepreneurs_routes};
pub use sql::{PgExecutor, QueryExecutor, SqlError, SqlRow, SqlValue};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
