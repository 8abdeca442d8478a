//! Permission tag type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Permission`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The input string is empty.
    #[error("permission cannot be empty")]
    Empty,
    /// The input has no `.` between resource and action.
    #[error("permission must look like resource.action")]
    MissingSeparator,
    /// Nothing before the `.`.
    #[error("permission resource cannot be empty")]
    EmptyResource,
    /// Nothing after the `.`.
    #[error("permission action cannot be empty")]
    EmptyAction,
    /// A character outside `a-z` and `_`.
    #[error("permission contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A `resource.action` capability tag.
///
/// ## Constraints
///
/// - Exactly one `.` separating a non-empty resource and action
/// - Only lowercase ASCII letters and `_` on either side
///
/// ## Examples
///
/// ```
/// use venuedesk_core::Permission;
///
/// let permission = Permission::parse("bookings.edit").unwrap();
/// assert_eq!(permission.resource(), "bookings");
/// assert_eq!(permission.action(), "edit");
///
/// assert!(Permission::parse("bookings").is_err());
/// assert!(Permission::parse("Bookings.Edit").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Permission(String);

impl Permission {
    /// Parse a `Permission` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, lacks a separator, has an
    /// empty side, or contains characters other than `a-z` and `_`.
    pub fn parse(s: &str) -> Result<Self, PermissionError> {
        if s.is_empty() {
            return Err(PermissionError::Empty);
        }

        let (resource, action) = s
            .split_once('.')
            .ok_or(PermissionError::MissingSeparator)?;

        if resource.is_empty() {
            return Err(PermissionError::EmptyResource);
        }
        if action.is_empty() {
            return Err(PermissionError::EmptyAction);
        }

        if let Some(c) = s
            .chars()
            .filter(|c| *c != '.')
            .find(|c| !(c.is_ascii_lowercase() || *c == '_'))
        {
            return Err(PermissionError::InvalidCharacter(c));
        }

        // A second dot ends up in `action` and is caught here.
        if action.contains('.') {
            return Err(PermissionError::InvalidCharacter('.'));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the `.` (e.g. `bookings`).
    #[must_use]
    pub fn resource(&self) -> &str {
        self.0.split_once('.').map_or("", |(r, _)| r)
    }

    /// The part after the `.` (e.g. `edit`).
    #[must_use]
    pub fn action(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, a)| a)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.0
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
