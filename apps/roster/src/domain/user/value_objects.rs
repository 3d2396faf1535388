use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::RosterError;

/// UserId value object identifying the acting user
///
/// User identities are issued by the authentication service and are opaque
/// to this crate.
///
/// # Invariants
/// - Must not be blank
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId value object
    ///
    /// # Returns
    /// * `Ok(UserId)` - If the id is not blank
    /// * `Err(RosterError::Validation)` - Otherwise
    ///
    /// # Example
    /// ```
    /// use fantazy_roster::domain::user::value_objects::UserId;
    ///
    /// let user = UserId::new("42").expect("valid user id");
    /// assert_eq!(user.as_str(), "42");
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, RosterError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RosterError::Validation(
                "User id cannot be empty".to_string(),
            ));
        }
        Ok(UserId(id))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_user_id() {
        assert!(UserId::new("user-1").is_ok());
    }

    #[test]
    fn numeric_user_id() {
        assert_eq!(UserId::new("17").unwrap().as_str(), "17");
    }

    #[test]
    fn empty_user_id_fails() {
        assert!(matches!(
            UserId::new(""),
            Err(RosterError::Validation(_))
        ));
    }

    #[test]
    fn blank_user_id_fails() {
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn user_id_display() {
        let user = UserId::new("abc").unwrap();
        assert_eq!(format!("{}", user), "abc");
    }

    #[test]
    fn user_id_serializes_as_plain_string() {
        let user = UserId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&user).unwrap(), "\"abc\"");
    }
}
