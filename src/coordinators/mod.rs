// Coordinators layer - Workflow orchestration
//
// Coordinators compose stores and services into the role-gated operations
// exposed to the host application.
pub mod incident_coordinator;

pub use incident_coordinator::IncidentCoordinator;
