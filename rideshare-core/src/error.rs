//! Failure taxonomy shared by every backend and service.
//!
//! Backends raise [`StoreError`]; services translate it into
//! [`ServiceError`] so callers see the same vocabulary whichever medium is
//! active. Both expose [`ErrorKind`] for branching on semantics rather than
//! on variant shapes.

use std::{error::Error as StdError, fmt};

use thiserror::Error;

use crate::record::Entity;

/// Boxed cause attached to data access failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias for contract operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Semantic kind of a failure, independent of where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The targeted identifier does not exist.
    NotFound,
    /// The identifier cannot be parsed into the medium's key type.
    InvalidIdentifier,
    /// I/O, decoding, constraint or driver failure.
    DataAccess,
    /// The backend does not implement the requested capability.
    NotSupported,
    /// The second half of a two-step operation failed.
    Composite,
}

/// Errors raised by backend adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation targeted an absent identifier.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Collection that was searched.
        entity: Entity,
        /// Identifier that was not found.
        id: String,
    },
    /// The identifier could not be parsed into the native key type.
    #[error("invalid {entity} identifier {id:?}: {reason}")]
    InvalidIdentifier {
        /// Collection the identifier was meant for.
        entity: Entity,
        /// Identifier as supplied.
        id: String,
        /// Why the identifier was rejected.
        reason: String,
    },
    /// The medium failed while performing an operation.
    #[error("failed to {operation} {entity}: {source}")]
    DataAccess {
        /// Collection being accessed.
        entity: Entity,
        /// Description of the failed step.
        operation: &'static str,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },
    /// The backend does not implement this operation.
    #[error("{operation} is not supported for {entity} by this backend")]
    NotSupported {
        /// Collection the operation was requested on.
        entity: Entity,
        /// Name of the unsupported operation.
        operation: &'static str,
    },
}

impl StoreError {
    /// Build a [`StoreError::NotFound`].
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Build a [`StoreError::InvalidIdentifier`].
    pub fn invalid_identifier(
        entity: Entity,
        id: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::InvalidIdentifier {
            entity,
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`StoreError::DataAccess`] wrapping `source`.
    pub fn data_access(entity: Entity, operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::DataAccess {
            entity,
            operation,
            source: source.into(),
        }
    }

    /// Build a [`StoreError::NotSupported`].
    #[must_use]
    pub const fn not_supported(entity: Entity, operation: &'static str) -> Self {
        Self::NotSupported { entity, operation }
    }

    /// Semantic kind of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::DataAccess { .. } => ErrorKind::DataAccess,
            Self::NotSupported { .. } => ErrorKind::NotSupported,
        }
    }
}

/// Two-step service operations whose halves are not atomic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOperation {
    /// Route creation followed by trip creation.
    CreateTrip,
    /// Route update followed by trip update.
    UpdateTrip,
}

impl fmt::Display for CompositeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTrip => f.write_str("create trip"),
            Self::UpdateTrip => f.write_str("update trip"),
        }
    }
}

/// Errors raised by entity services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation targeted an absent identifier.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Collection that was searched.
        entity: Entity,
        /// Identifier that was not found.
        id: String,
    },
    /// The identifier was missing or could not be parsed.
    #[error("invalid {entity} identifier {id:?}: {reason}")]
    InvalidIdentifier {
        /// Collection the identifier was meant for.
        entity: Entity,
        /// Identifier as supplied.
        id: String,
        /// Why the identifier was rejected.
        reason: String,
    },
    /// The storage layer failed.
    #[error("data access failed for {entity}: {source}")]
    DataAccess {
        /// Collection being accessed.
        entity: Entity,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },
    /// The active backend does not offer this operation.
    #[error("{operation} is not supported for {entity} by the active backend")]
    NotSupported {
        /// Collection the operation was requested on.
        entity: Entity,
        /// Name of the unsupported operation.
        operation: &'static str,
    },
    /// The first step of a composite operation failed, so the trip was never
    /// written. Reports the kind of the underlying failure.
    #[error("{operation} aborted before the trip was written: {source}")]
    Aborted {
        /// Which composite operation failed.
        operation: CompositeOperation,
        /// Failure of the route step.
        #[source]
        source: Box<ServiceError>,
    },
    /// The second step of a composite operation failed after the first step
    /// had already been persisted.
    #[error("{operation} failed after route {route_id} was written: {source}")]
    Composite {
        /// Which composite operation failed.
        operation: CompositeOperation,
        /// Route written by the first step and left in place.
        route_id: String,
        /// Failure of the second step.
        #[source]
        source: Box<ServiceError>,
    },
}

impl ServiceError {
    /// Semantic kind of this failure.
    ///
    /// An aborted composite reports the kind of the step that stopped it.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::DataAccess { .. } => ErrorKind::DataAccess,
            Self::NotSupported { .. } => ErrorKind::NotSupported,
            Self::Aborted { source, .. } => source.kind(),
            Self::Composite { .. } => ErrorKind::Composite,
        }
    }

    /// Composite operation this failure belongs to, if any.
    #[must_use]
    pub const fn composite_operation(&self) -> Option<CompositeOperation> {
        match self {
            Self::Aborted { operation, .. } | Self::Composite { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// Identifier that is missing from storage, if this is a not-found
    /// failure or a composite failure caused by one.
    #[must_use]
    pub fn missing_id(&self) -> Option<&str> {
        match self {
            Self::NotFound { id, .. } => Some(id),
            Self::Aborted { source, .. } | Self::Composite { source, .. } => source.missing_id(),
            _ => None,
        }
    }

    pub(crate) fn missing_identifier(entity: Entity) -> Self {
        Self::InvalidIdentifier {
            entity,
            id: String::new(),
            reason: "the record has not been assigned an identifier".to_owned(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::InvalidIdentifier { entity, id, reason } => {
                Self::InvalidIdentifier { entity, id, reason }
            }
            StoreError::DataAccess {
                entity,
                operation,
                source,
            } => Self::DataAccess {
                entity,
                source: Box::new(StoreError::DataAccess {
                    entity,
                    operation,
                    source,
                }),
            },
            StoreError::NotSupported { entity, operation } => {
                Self::NotSupported { entity, operation }
            }
        }
    }
}
