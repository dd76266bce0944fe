//! Input validation primitives.
//!
//! - Package name grammar checks
//! - Unwrapping Option values with descriptive errors

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Lowercase letter first, then lowercase letters, digits, or underscores.
static PACKAGE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("package name pattern is valid"));

/// Whether `name` is a valid package name.
///
/// No length limit is enforced. A leading underscore is rejected.
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME_PATTERN.is_match(name)
}

/// Require `name` to be a valid package name.
pub fn require_valid_package_name<'a>(name: &'a str, field: &str) -> Result<&'a str> {
    if is_valid_package_name(name) {
        Ok(name)
    } else {
        Err(Error::validation_invalid_argument(
            field,
            format!(
                "'{}' is not a valid package name (must start with a lowercase letter and contain only lowercase letters, digits, and underscores)",
                name
            ),
            Some(name.to_string()),
        ))
    }
}

/// Require an Option to contain a value.
///
/// Replaces the common pattern:
/// ```ignore
/// value.ok_or_else(|| Error::validation_missing_argument(vec!["field".into()]))?
/// ```
///
/// With:
/// ```ignore
/// validation::require(value, "field")?
/// ```
pub fn require<T>(opt: Option<T>, field: &str) -> Result<T> {
    opt.ok_or_else(|| Error::validation_missing_argument(vec![field.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_names() {
        for name in ["a", "app", "my_app", "app2", "a_b_c_1", "x_"] {
            assert!(is_valid_package_name(name), "expected '{}' to be valid", name);
        }
    }

    #[test]
    fn accepts_long_names() {
        let name = format!("a{}", "b".repeat(500));
        assert!(is_valid_package_name(&name));
    }

    #[test]
    fn rejects_uppercase_hyphen_and_bad_leading_chars() {
        for name in [
            "", "App", "myApp", "my-app", "1app", "_app", "_", "my app", "app.", "caf\u{e9}",
        ] {
            assert!(!is_valid_package_name(name), "expected '{}' to be invalid", name);
        }
    }

    #[test]
    fn rejects_trailing_newline() {
        assert!(!is_valid_package_name("app\n"));
    }

    #[test]
    fn require_valid_package_name_reports_value() {
        let err = require_valid_package_name("My-App", "name").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["field"], "name");
        assert_eq!(err.details["value"], "My-App");
        assert!(err.message.contains("My-App"));
    }

    #[test]
    fn require_valid_package_name_passes_through() {
        assert_eq!(require_valid_package_name("new_app", "name").unwrap(), "new_app");
    }

    #[test]
    fn require_returns_value_when_some() {
        let result = require(Some("value"), "field");
        assert_eq!(result.unwrap(), "value");
    }

    #[test]
    fn require_returns_error_when_none() {
        let err = require::<&str>(None, "name").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.missing_argument");
        assert_eq!(err.details["args"][0], "name");
    }
}
