//! Route registration.

mod common;
mod entrepreneurs;

pub use common::{common_routes, common_routes_with_ready};
pub use entrepreneurs::entrepreneurs_routes;
