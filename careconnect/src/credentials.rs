//! Fixed demo logins, one per role.
//!
//! Passwords are compared in plain text. This gates which screen is shown and
//! nothing more; it must not be mistaken for authentication.

use crate::{error::CareError, user_role::UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub username: &'static str,
    pub password: &'static str,
}

pub fn credentials_for(role: UserRole) -> Credentials {
    match role {
        UserRole::Admin => Credentials { username: "admin", password: "123" },
        UserRole::Doctor => Credentials { username: "doctor", password: "123" },
        UserRole::Coordinator => Credentials { username: "coordinator", password: "123" },
    }
}

pub fn authenticate(role: UserRole, username: &str, password: &str) -> Result<UserRole, CareError> {
    let expected = credentials_for(role);
    if expected.username == username && expected.password == password {
        Ok(role)
    } else {
        Err(CareError::InvalidCredentials)
    }
}
