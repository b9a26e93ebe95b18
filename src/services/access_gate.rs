use std::future::Future;

use crate::errors::AuthError;
use crate::types::db::UserRole;
use crate::types::internal::{Principal, SessionContext};

/// Build a gate admitting only the listed roles
pub fn require_role(allowed: &[UserRole]) -> RoleGate<'_> {
    RoleGate { allowed }
}

/// Role allow-list checked before a protected operation runs
#[derive(Debug, Clone, Copy)]
pub struct RoleGate<'r> {
    allowed: &'r [UserRole],
}

impl<'r> RoleGate<'r> {
    pub fn allowed(&self) -> &'r [UserRole] {
        self.allowed
    }

    /// The caller's principal, if it may pass
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a principal, `InsufficientPrivileges`
    /// when its role is not listed.
    pub fn authorize<'c>(&self, ctx: &'c SessionContext) -> Result<&'c Principal, AuthError> {
        let Some(principal) = ctx.principal() else {
            tracing::debug!("Access denied: no authenticated principal");
            return Err(AuthError::NotAuthenticated);
        };

        if !self.allowed.contains(&principal.role) {
            tracing::warn!(
                user_id = principal.user_id,
                role = %principal.role,
                "Access denied: insufficient privileges"
            );
            return Err(AuthError::InsufficientPrivileges { role: principal.role });
        }

        Ok(principal)
    }

    /// Authorize, then run `op` with the admitted principal
    pub fn guard<'c, T, E, F>(&self, ctx: &'c SessionContext, op: F) -> Result<T, E>
    where
        F: FnOnce(&'c Principal) -> Result<T, E>,
        E: From<AuthError>,
    {
        let principal = self.authorize(ctx)?;
        op(principal)
    }

    /// Async form of [`RoleGate::guard`]; `op` is not polled when access is denied
    pub async fn guard_async<'c, T, E, F, Fut>(&self, ctx: &'c SessionContext, op: F) -> Result<T, E>
    where
        F: FnOnce(&'c Principal) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AuthError>,
    {
        let principal = self.authorize(ctx)?;
        op(principal).await
    }
}
