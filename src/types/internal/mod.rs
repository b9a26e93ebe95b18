pub mod auth;
pub mod context;

pub use auth::{AccessToken, Claims, Principal};
pub use context::SessionContext;
