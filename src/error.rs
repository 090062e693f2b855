use thiserror::Error;

/// Top-level error type for the shapebake kernel.
#[derive(Debug, Error)]
pub enum ShapeBakeError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to scene-store lookups and entity lifetime.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors related to baking operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("modifier \"{name}\" not found on object")]
    ModifierNotFound { name: String },

    #[error("shape key \"{name}\" has no snapshot entry matching the original order")]
    SnapshotMismatch { name: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`ShapeBakeError`].
pub type Result<T> = std::result::Result<T, ShapeBakeError>;
