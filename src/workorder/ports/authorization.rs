//! Authorization port consulted before capability-gated transitions.

use crate::workorder::domain::{Capability, OperatorId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for authorization queries.
pub type AuthorizerResult<T> = Result<T, AuthorizerError>;

/// Synchronous-in-spirit capability check against the host permission model.
///
/// The state machine only ever asks yes/no questions; group and permission
/// resolution stays on the host side of this seam.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns `true` when `actor` holds `capability`.
    async fn has_capability(
        &self,
        actor: OperatorId,
        capability: Capability,
    ) -> AuthorizerResult<bool>;
}

/// Errors returned by authorizer implementations.
#[derive(Debug, Clone, Error)]
pub enum AuthorizerError {
    /// The host permission model could not be consulted.
    #[error("authorization lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthorizerError {
    /// Wraps a lookup error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
