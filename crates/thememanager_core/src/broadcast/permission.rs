//! Sender permissions checked at dispatch time.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Permission a sender may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    ChangeConfiguration,
}

impl Permission {
    /// Stable permission string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChangeConfiguration => PERMISSION_CHANGE_CONFIGURATION,
        }
    }
}

/// Permission required to send theme change requests.
pub const PERMISSION_CHANGE_CONFIGURATION: &str = "android.permission.CHANGE_CONFIGURATION";

/// Parses one permission from its stable string.
pub fn parse_permission(value: &str) -> Result<Permission, PermissionParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(PermissionParseError::EmptyPermission);
    }

    match normalized {
        PERMISSION_CHANGE_CONFIGURATION => Ok(Permission::ChangeConfiguration),
        other => Err(PermissionParseError::UnsupportedPermission(
            other.to_string(),
        )),
    }
}

/// Permission parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionParseError {
    EmptyPermission,
    UnsupportedPermission(String),
}

impl Display for PermissionParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPermission => write!(f, "permission value must not be empty"),
            Self::UnsupportedPermission(value) => {
                write!(f, "permission is unsupported: {value}")
            }
        }
    }
}

impl Error for PermissionParseError {}

#[cfg(test)]
mod tests {
    use super::{parse_permission, Permission, PermissionParseError};

    #[test]
    fn parses_change_configuration() {
        assert_eq!(
            parse_permission(" android.permission.CHANGE_CONFIGURATION ")
                .expect("change configuration parse"),
            Permission::ChangeConfiguration
        );
    }

    #[test]
    fn rejects_empty_permission() {
        let err = parse_permission("   ").expect_err("empty permission must fail");
        assert_eq!(err, PermissionParseError::EmptyPermission);
    }

    #[test]
    fn rejects_case_variants_and_unknown_permissions() {
        for value in [
            "android.permission.change_configuration",
            "android.permission.WRITE_SETTINGS",
        ] {
            let err = parse_permission(value).expect_err("unsupported permission must fail");
            assert_eq!(
                err,
                PermissionParseError::UnsupportedPermission(value.to_string())
            );
        }
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        let permission = Permission::ChangeConfiguration;
        assert_eq!(parse_permission(permission.as_str()).unwrap(), permission);
    }
}
