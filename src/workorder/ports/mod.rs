//! Port contracts for the work-order tracker.
//!
//! Ports define the infrastructure-agnostic interfaces — store,
//! authorization, and audit collaborators — used by the services.

pub mod authorization;
pub mod directory;
pub mod event_log;
pub mod repository;

pub use authorization::{Authorizer, AuthorizerError, AuthorizerResult};
pub use directory::{OperatorDirectory, OperatorDirectoryError, OperatorDirectoryResult};
pub use event_log::{TransitionLog, TransitionLogError, TransitionLogResult};
pub use repository::{WorkOrderRepository, WorkOrderRepositoryError, WorkOrderRepositoryResult};
