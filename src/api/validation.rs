//! Input validation for API requests.
//!
//! Plain functions returning the failing constraint as a message. For
//! collecting several field errors into one response, use the
//! `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating usernames (alphanumeric with _.-, starting
    /// alphanumeric)
    static ref USERNAME_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9][A-Za-z0-9_.-]*$"
    ).unwrap();
}

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 64;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < USERNAME_MIN_LEN {
        return Err(format!(
            "Username is too short (min {} characters)",
            USERNAME_MIN_LEN
        ));
    }

    if username.len() > USERNAME_MAX_LEN {
        return Err(format!(
            "Username is too long (max {} characters)",
            USERNAME_MAX_LEN
        ));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(
            "Username must be alphanumeric (dots, dashes and underscores allowed), starting with a letter or digit".to_string()
        );
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password is too short (min {} characters)",
            PASSWORD_MIN_LEN
        ));
    }

    if password.len() > PASSWORD_MAX_LEN {
        return Err(format!(
            "Password is too long (max {} characters)",
            PASSWORD_MAX_LEN
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob-42").is_ok());
        assert!(validate_username("j.doe_99").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err()); // too short
        assert!(validate_username(&"a".repeat(65)).is_err());
        assert!(validate_username("-leading").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter22hunter").is_ok());
        assert!(validate_password("12345678").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}
