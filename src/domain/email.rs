//! 邮箱值对象

use crate::core::error::AppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// 是否符合 `local@domain.tld` 的形状
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// 规范化后的邮箱地址（去除首尾空白并转为小写）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Email is required".to_string()));
        }
        if !is_valid_email(trimmed) {
            return Err(AppError::InvalidInput("Invalid email format".to_string()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_addresses() {
        for ok in ["john@example.com", "a.b+c@sub.domain.org", "x@y.z"] {
            assert!(is_valid_email(ok), "{ok} 应该合法");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for bad in [
            "",
            "john",
            "john@",
            "@example.com",
            "john@example",
            "jo hn@example.com",
            "john@@example.com",
        ] {
            assert!(!is_valid_email(bad), "{bad:?} 应该非法");
        }
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  John.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "john.doe@example.com");
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(
            Email::parse("   ").unwrap_err(),
            AppError::InvalidInput("Email is required".into())
        );
        assert_eq!(
            Email::parse("nope").unwrap_err(),
            AppError::InvalidInput("Invalid email format".into())
        );
    }

    #[test]
    fn test_serde_is_plain_string() {
        let email = Email::parse("a@b.io").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@b.io\"");
        let back: Email = serde_json::from_str("\"A@B.IO\"").unwrap();
        assert_eq!(back, email);
        assert!(serde_json::from_str::<Email>("\"bad\"").is_err());
    }
}
