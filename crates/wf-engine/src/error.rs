//! Engine error types

use thiserror::Error;

use crate::runtime::RuntimeError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Teardown was invoked while the firewall was not initialized.
    #[error("the firewall is not initialized")]
    NotInitialized,

    /// A host collaborator call failed during initialization.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
