//! In-memory adapters for tests and standalone wiring.

mod event_log;
mod operator;
mod work_order;

pub use event_log::InMemoryTransitionLog;
pub use operator::InMemoryOperatorDirectory;
pub use work_order::InMemoryWorkOrderRepository;
