//! 用户实体与校验

use super::email::Email;
use crate::core::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户记录
///
/// 不变式：`name` 非空白、`email` 已规范化且格式合法、`updated_at >= created_at`。
/// 字段只能通过 [`User::new`] 与 [`User::apply`] 写入。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 校验必填字段和邮箱形状，没有副作用
///
/// 新建和更新都经过这里，返回去掉首尾空白的名字和规范化后的邮箱。
pub fn validate(name: &str, email: &str) -> AppResult<(String, Email)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }
    let email = Email::parse(email)?;
    Ok((name.to_string(), email))
}

impl User {
    pub fn new(id: Uuid, name: &str, email: &str, at: DateTime<Utc>) -> AppResult<Self> {
        let (name, email) = validate(name, email)?;
        Ok(Self {
            id,
            name,
            email,
            created_at: at,
            updated_at: at,
        })
    }

    /// 应用已校验的变更并刷新 `updated_at`
    pub fn apply(&mut self, changes: &UserChanges, at: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        self.touch(at);
    }

    // updated_at 必须严格递增，时钟回拨或同一纳秒内的两次更新也一样
    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = if at > self.updated_at {
            at
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }
}

/// 更新请求中的字段，缺省或空字符串表示保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// 校验通过、可以直接写入的变更
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

impl UserPatch {
    pub fn new(name: Option<&str>, email: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    /// 把补丁合并到 `current` 上整体校验，只保留真正给出的字段
    pub fn normalize(&self, current: &User) -> AppResult<UserChanges> {
        let name = present(&self.name);
        let email = present(&self.email);
        let (valid_name, valid_email) = validate(
            name.unwrap_or(&current.name),
            email.unwrap_or(current.email.as_str()),
        )?;

        Ok(UserChanges {
            name: name.map(|_| valid_name),
            email: email.map(|_| valid_email),
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> User {
        User::new(Uuid::new_v4(), "John Doe", "john@example.com", Utc::now()).unwrap()
    }

    #[test]
    fn test_validate() {
        let (name, email) = validate(" John ", "John@Example.com").unwrap();
        assert_eq!(name, "John");
        assert_eq!(email.as_str(), "john@example.com");
        assert_eq!(
            validate("   ", "john@example.com"),
            Err(AppError::InvalidInput("Name is required".into()))
        );
        assert_eq!(
            validate("John", ""),
            Err(AppError::InvalidInput("Email is required".into()))
        );
        assert_eq!(
            validate("John", "john.example.com"),
            Err(AppError::InvalidInput("Invalid email format".into()))
        );
    }

    #[test]
    fn test_new_user_normalizes_fields() {
        let user = User::new(Uuid::nil(), "  Jane ", "JANE@Example.com", Utc::now()).unwrap();
        assert_eq!(user.name, "Jane");
        assert_eq!(user.email.as_str(), "jane@example.com");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let user = john();
        let value = serde_json::to_value(&user).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["createdAt", "email", "id", "name", "updatedAt"]);
        assert_eq!(obj["email"], "john@example.com");
    }

    #[test]
    fn test_patch_skips_empty_fields() {
        let current = john();
        let changes = UserPatch::new(Some(""), Some("")).normalize(&current).unwrap();
        assert_eq!(changes, UserChanges::default());

        let changes = UserPatch::new(Some("John Updated"), None)
            .normalize(&current)
            .unwrap();
        assert_eq!(changes.name.as_deref(), Some("John Updated"));
        assert!(changes.email.is_none());
    }

    #[test]
    fn test_patch_rejects_whitespace_name_and_bad_email() {
        let current = john();
        assert!(UserPatch::new(Some("   "), None).normalize(&current).is_err());
        assert!(UserPatch::new(None, Some("bad")).normalize(&current).is_err());
    }

    #[test]
    fn test_new_and_patch_share_validation_rules() {
        let current = john();
        let cases = [
            ("   ", "john@example.com"),
            ("John", "   "),
            ("John", "john.example.com"),
            ("John", "john@example"),
            ("  Jane  ", "JANE@Example.com"),
        ];

        for (name, email) in cases {
            let expected = validate(name, email);
            let created = User::new(Uuid::new_v4(), name, email, Utc::now())
                .map(|user| (user.name, user.email));
            assert_eq!(created, expected, "new({name:?}, {email:?})");

            // 补丁同时给出两个字段时，结果必须与 validate 完全一致
            let patched = UserPatch::new(Some(name), Some(email))
                .normalize(&current)
                .map(|changes| (changes.name.unwrap_or_default(), changes.email));
            let expected = expected.map(|(name, email)| (name, Some(email)));
            assert_eq!(patched, expected, "patch({name:?}, {email:?})");
        }
    }

    #[test]
    fn test_apply_bumps_updated_at_strictly() {
        let mut user = john();
        let before = user.updated_at;

        // 时钟没有前进也必须严格递增
        user.apply(&UserChanges::default(), before);
        assert!(user.updated_at > before);

        let changes = UserPatch::new(Some("John Updated"), None)
            .normalize(&user)
            .unwrap();
        user.apply(&changes, Utc::now());
        assert_eq!(user.name, "John Updated");
        assert_eq!(user.email.as_str(), "john@example.com");
        assert!(user.updated_at >= user.created_at);
    }
}
