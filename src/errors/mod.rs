// Errors layer - Error type definitions
pub mod auth;
pub mod incident;
pub mod internal;

// Re-exports for convenience
pub use auth::AuthError;
pub use incident::IncidentError;
pub use internal::InternalError;
