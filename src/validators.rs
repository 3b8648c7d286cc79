/// Input validators
///
/// Each validator trims where trimming is meaningful and returns the cleaned
/// value, so handlers store exactly what was checked.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_USERNAME_LENGTH: usize = 64;
const MAX_NAME_LENGTH: usize = 256;
const MAX_ROLE_LENGTH: usize = 32;
const MAX_PASSWORD_BYTES: usize = 72; // bcrypt ignores anything past this
const MAX_TITLE_LENGTH: usize = 256;
const MAX_DESCRIPTION_LENGTH: usize = 100;
const MIN_PRIORITY: i32 = 1;
const MAX_PRIORITY: i32 = 5;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();

    // Optional leading '+', digits with single spaces or dashes between groups
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]+(?:[ -][0-9]+)*$").unwrap();
}

pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".into()));
    }
    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".into(), MIN_EMAIL_LENGTH));
    }
    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".into(), MAX_EMAIL_LENGTH));
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".into()));
    }

    Ok(trimmed.to_string())
}

/// Login key: letters, digits, `_`, `.` and `-`
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username".into()));
    }
    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong("username".into(), MAX_USERNAME_LENGTH));
    }
    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("username".into()));
    }

    Ok(trimmed.to_string())
}

/// Roles are open strings; only their shape is checked here.
pub fn is_valid_role(role: &str) -> Result<String, ValidationError> {
    let trimmed = role.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("role".into()));
    }
    if trimmed.len() > MAX_ROLE_LENGTH {
        return Err(ValidationError::TooLong("role".into(), MAX_ROLE_LENGTH));
    }
    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("role".into()));
    }

    Ok(trimmed.to_string())
}

/// First or last name
pub fn is_valid_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field.into(), MAX_NAME_LENGTH));
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::SuspiciousContent(field.into()));
    }

    Ok(trimmed.to_string())
}

/// Passwords are not trimmed; whitespace is significant.
pub fn is_valid_password(field: &str, password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField(field.into()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong(field.into(), MAX_PASSWORD_BYTES));
    }
    if password.contains('\0') {
        return Err(ValidationError::SuspiciousContent(field.into()));
    }
    Ok(())
}

/// 7 to 15 digits, optionally prefixed with `+`
pub fn is_valid_phone_number(phone: &str) -> Result<String, ValidationError> {
    let trimmed = phone.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("phone_number".into()));
    }
    if !PHONE_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("phone_number".into()));
    }

    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 7 {
        return Err(ValidationError::TooShort("phone_number".into(), 7));
    }
    if digits > 15 {
        return Err(ValidationError::TooLong("phone_number".into(), 15));
    }

    Ok(trimmed.to_string())
}

pub fn is_valid_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("title".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong("title".into(), MAX_TITLE_LENGTH));
    }

    Ok(trimmed.to_string())
}

pub fn is_valid_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("description".into()));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong(
            "description".into(),
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    Ok(trimmed.to_string())
}

pub fn is_valid_priority(priority: i32) -> Result<i32, ValidationError> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(priority)
    } else {
        Err(ValidationError::OutOfRange(
            "priority".into(),
            MIN_PRIORITY as i64,
            MAX_PRIORITY as i64,
        ))
    }
}

/// Path ids are positive
pub fn is_valid_id(id: i64) -> Result<i64, ValidationError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ValidationError::OutOfRange("id".into(), 1, i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
        assert_eq!(is_valid_email("  user@example.com ").unwrap(), "user@example.com");
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());
        assert!(is_valid_email("a@b").is_err());
    }

    #[test]
    fn test_usernames() {
        assert_eq!(is_valid_username("alice").unwrap(), "alice");
        assert!(is_valid_username("test_user.01-x").is_ok());
        assert!(is_valid_username("").is_err());
        assert!(is_valid_username("has space").is_err());
        assert!(is_valid_username("semi;colon").is_err());
        assert!(is_valid_username(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_roles() {
        assert_eq!(is_valid_role("admin").unwrap(), "admin");
        assert_eq!(is_valid_role(" user ").unwrap(), "user");
        assert!(is_valid_role("").is_err());
        assert!(is_valid_role("super user").is_err());
        assert!(is_valid_role(&"r".repeat(33)).is_err());
    }

    #[test]
    fn test_names() {
        assert!(is_valid_name("first_name", "Jean-Pierre").is_ok());
        assert!(is_valid_name("last_name", "O'Brien").is_ok());
        assert_eq!(
            is_valid_name("first_name", ""),
            Err(ValidationError::EmptyField("first_name".into()))
        );
        assert!(is_valid_name("first_name", "Name\0with\0null").is_err());
        assert!(is_valid_name("first_name", &"a".repeat(257)).is_err());
    }

    #[test]
    fn test_passwords() {
        assert!(is_valid_password("password", "pw123").is_ok());
        assert!(is_valid_password("password", " spaced ").is_ok());
        assert!(is_valid_password("password", "").is_err());
        assert!(is_valid_password("password", &"a".repeat(72)).is_ok());
        assert!(is_valid_password("password", &"a".repeat(73)).is_err());
    }

    #[test]
    fn test_phone_numbers() {
        assert!(is_valid_phone_number("1234567890").is_ok());
        assert!(is_valid_phone_number("+20 100 123 4567").is_ok());
        assert!(is_valid_phone_number("555-555-5555").is_ok());
        assert!(is_valid_phone_number("12345").is_err());
        assert!(is_valid_phone_number("call me").is_err());
        assert!(is_valid_phone_number("1234567890123456").is_err());
        assert!(is_valid_phone_number("++1234567").is_err());
    }

    #[test]
    fn test_todo_fields() {
        assert!(is_valid_title("Buy milk").is_ok());
        assert!(is_valid_title("   ").is_err());
        assert!(is_valid_description(&"d".repeat(100)).is_ok());
        assert!(is_valid_description(&"d".repeat(101)).is_err());
        assert!(is_valid_description("").is_err());
    }

    #[test]
    fn test_priority_bounds() {
        for priority in 1..=5 {
            assert_eq!(is_valid_priority(priority), Ok(priority));
        }
        assert!(is_valid_priority(0).is_err());
        assert!(is_valid_priority(6).is_err());
        assert!(is_valid_priority(-1).is_err());
    }

    #[test]
    fn test_ids() {
        assert_eq!(is_valid_id(7), Ok(7));
        assert!(is_valid_id(0).is_err());
        assert!(is_valid_id(-3).is_err());
    }
}
