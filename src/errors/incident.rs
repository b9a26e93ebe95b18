use thiserror::Error;

use crate::errors::{AuthError, InternalError};
use crate::errors::internal::ValidationError;

/// Errors returned by the role-gated incident operations
#[derive(Error, Debug)]
pub enum IncidentError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl IncidentError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        IncidentError::NotFound { entity, id }
    }
}

impl From<ValidationError> for IncidentError {
    fn from(err: ValidationError) -> Self {
        IncidentError::Internal(InternalError::Validation(err))
    }
}
