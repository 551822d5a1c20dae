//! Shopfloor: operator work-order tracking core.
//!
//! This crate provides the business core of an operator workstation: a
//! work-order record moves through a fixed lifecycle (ready → in progress →
//! done/scrap/blocked) under guard conditions, with per-operator assignment
//! limits, mandatory reason capture for negative outcomes, and cumulative
//! per-operator performance counters.
//!
//! # Architecture
//!
//! Shopfloor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure state-machine and counter logic with no
//!   infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the store, authorization, and
//!   audit collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory,
//!   `PostgreSQL`)
//!
//! # Modules
//!
//! - [`workorder`]: Work-order lifecycle, reason capture, and statistics

pub mod workorder;
