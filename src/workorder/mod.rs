//! Work-order lifecycle tracking for Shopfloor.
//!
//! This module implements the operator work-order state machine: taking,
//! completing, scrapping, and blocking orders under per-operator assignment
//! limits, with mandatory reason capture for negative outcomes and a
//! per-operator performance counter view. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
