use tracing::error;

use crate::api::rest::context::AppContext;
use crate::domain::error::DomainError;
use crate::domain::session::{RoleType, Session};

/// What a handler requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Office user signed into the office application.
    OfficeUser,
    /// Office user who has been granted the role.
    Role(RoleType),
    /// Office user granted at least one of the roles.
    AnyRole(&'static [RoleType]),
}

impl Capability {
    pub fn allows(&self, session: &Session) -> bool {
        if !session.is_office_user() {
            return false;
        }
        match self {
            Capability::OfficeUser => true,
            Capability::Role(role) => session.has_role(*role),
            Capability::AnyRole(roles) => roles.iter().any(|r| session.has_role(*r)),
        }
    }
}

/// Reject the request with `Forbidden` unless the session satisfies `cap`.
/// Runs before any identifier parsing or service call.
pub fn authorize(ctx: &AppContext, cap: Capability) -> Result<(), DomainError> {
    if cap.allows(&ctx.session) {
        return Ok(());
    }
    error!(
        capability = ?cap,
        user_id = %ctx.session.user_id,
        path = %ctx.path,
        "caller lacks required capability"
    );
    Err(DomainError::forbidden("caller is not authorized for this operation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::Application;
    use uuid::Uuid;

    #[test]
    fn role_requires_granted_role() {
        let s = Session::office(Uuid::new_v4(), [RoleType::Tio]);
        assert!(Capability::OfficeUser.allows(&s));
        assert!(!Capability::Role(RoleType::Too).allows(&s));
        assert!(Capability::AnyRole(&[RoleType::Too, RoleType::Tio]).allows(&s));
    }

    #[test]
    fn non_office_sessions_are_rejected_for_every_capability() {
        let mut s = Session::office(Uuid::new_v4(), [RoleType::Too]);
        s.application = Application::Mil;
        assert!(!Capability::OfficeUser.allows(&s));
        assert!(!Capability::Role(RoleType::Too).allows(&s));
    }

    #[test]
    fn authorize_returns_forbidden() {
        let ctx = AppContext::new(
            Session::office(Uuid::new_v4(), [RoleType::Qae]),
            axum::http::Method::POST,
            "/x",
        );
        let err = authorize(&ctx, Capability::Role(RoleType::Too)).unwrap_err();
        assert_eq!(err.kind(), crate::domain::error::ErrorKind::Forbidden);
    }
}
