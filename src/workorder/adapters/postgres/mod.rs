//! `PostgreSQL` adapters for work-order persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresWorkOrderRepository, WorkOrderPgPool};
