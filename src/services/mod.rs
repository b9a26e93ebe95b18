// Services layer - Session lifecycle and access control
pub mod access_gate;
pub mod session_manager;

pub use access_gate::{RoleGate, require_role};
pub use session_manager::{SessionEvent, SessionManager};
