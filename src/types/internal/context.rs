use std::net::IpAddr;

use crate::types::internal::Principal;

/// Caller context passed explicitly into protected operations
///
/// Carries the authenticated principal (if any) and the client address
/// recorded on audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub principal: Option<Principal>,
    pub ip_address: Option<IpAddr>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_principal(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            ip_address: None,
        }
    }

    pub fn with_ip(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}
