use storefront_cart::MutationError;
use storefront_catalog::ProductId;

/// Failure talking to a backend collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    /// Token missing, expired or rejected by the backend.
    #[error("unauthorized")]
    Unauthorized,
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

impl From<RemoteError> for MutationError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unauthorized => MutationError::Unauthenticated,
            RemoteError::UnknownProduct(id) => MutationError::UnknownProduct(id),
            other => MutationError::remote(other.to_string()),
        }
    }
}
