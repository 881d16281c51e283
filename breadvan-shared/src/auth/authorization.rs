//! Role checks
//!
//! Every protected route belongs to exactly one role. Resource ownership
//! (a driver's own drive, a resident's own stop) is checked by the services.

use super::middleware::AuthContext;
use crate::models::user::UserRole;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Caller's role does not match the route's role
    #[error("This action requires the {required} role")]
    WrongRole { required: UserRole, actual: UserRole },
}

/// Requires the caller to hold exactly `required`
pub fn require_role(auth: &AuthContext, required: UserRole) -> Result<(), AuthzError> {
    if auth.role == required {
        Ok(())
    } else {
        Err(AuthzError::WrongRole {
            required,
            actual: auth.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let driver = AuthContext::new(1, UserRole::Driver);

        assert!(require_role(&driver, UserRole::Driver).is_ok());
        assert_eq!(
            require_role(&driver, UserRole::Admin),
            Err(AuthzError::WrongRole {
                required: UserRole::Admin,
                actual: UserRole::Driver
            })
        );
    }

    #[test]
    fn test_error_message() {
        let err = require_role(&AuthContext::new(1, UserRole::Resident), UserRole::Admin)
            .unwrap_err();
        assert_eq!(err.to_string(), "This action requires the Admin role");
    }
}
