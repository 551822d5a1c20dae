//! Unit tests for the work-order module.

mod domain_tests;
mod state_transition_tests;
mod stats_tests;
