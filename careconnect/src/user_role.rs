use std::{fmt, str::FromStr};

use crate::error::CareError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum UserRole {
    Admin,
    Doctor,
    #[serde(rename = "Emergency Coordinator")]
    Coordinator,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Doctor, UserRole::Coordinator];

    /// The name stored in the session and shown in the header.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Doctor => "Doctor",
            UserRole::Coordinator => "Emergency Coordinator",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the stored role names as well as the short console spellings
/// (`admin`, `doctor`, `coordinator`), case-insensitively.
impl FromStr for UserRole {
    type Err = CareError;

    fn from_str(s: &str) -> Result<UserRole, CareError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "doctor" => Ok(UserRole::Doctor),
            "coordinator" | "emergency coordinator" => Ok(UserRole::Coordinator),
            _ => Err(CareError::UnknownRole(s.to_string())),
        }
    }
}
