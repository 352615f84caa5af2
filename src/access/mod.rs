//! Per-record access flags.
//!
//! A row may carry a reserved `_permissions` object with `read` and `write`
//! entries, each `"public"`, `"role:<name>"`, or `"user:<id>"`. Absent
//! entries default to public; a malformed flag denies rather than exposing
//! the record.

use serde_json::Value;

use crate::core::Row;

pub const PERMISSIONS_FIELD: &str = "_permissions";

/// Who is asking.
#[derive(Debug, Clone, Default)]
pub struct Requester {
    pub user_id: Option<String>,
    pub roles: Vec<String>,
}

impl Requester {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user_id: Some(id.into()),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AccessFlag {
    Public,
    Role(String),
    User(String),
    /// Unparseable flag text; satisfied by nobody.
    Invalid,
}

impl AccessFlag {
    fn parse(text: &str) -> Self {
        if text == "public" {
            return Self::Public;
        }
        match text.split_once(':') {
            Some(("role", name)) if !name.is_empty() => Self::Role(name.to_string()),
            Some(("user", id)) if !id.is_empty() => Self::User(id.to_string()),
            _ => Self::Invalid,
        }
    }

    fn permits(&self, requester: &Requester) -> bool {
        match self {
            Self::Public => true,
            Self::Role(name) => requester.roles.iter().any(|r| r == name),
            Self::User(id) => requester.user_id.as_deref() == Some(id.as_str()),
            Self::Invalid => false,
        }
    }
}

fn flag_of(row: &Row, entry: &str) -> AccessFlag {
    match row.get(PERMISSIONS_FIELD) {
        Some(Value::Object(permissions)) => match permissions.get(entry) {
            Some(Value::String(flag)) => AccessFlag::parse(flag),
            Some(_) => AccessFlag::Invalid,
            None => AccessFlag::Public,
        },
        Some(_) => AccessFlag::Invalid,
        None => AccessFlag::Public,
    }
}

pub fn can_read(row: &Row, requester: &Requester) -> bool {
    flag_of(row, "read").permits(requester)
}

pub fn can_write(row: &Row, requester: &Requester) -> bool {
    flag_of(row, "write").permits(requester)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("row fixtures must be objects"),
        }
    }

    #[test]
    fn test_default_is_public() {
        let record = row(json!({"id": 1}));
        assert!(can_read(&record, &Requester::anonymous()));
        assert!(can_write(&record, &Requester::anonymous()));
    }

    #[test]
    fn test_role_flag() {
        let record = row(json!({"_permissions": {"read": "role:editor"}}));
        assert!(!can_read(&record, &Requester::anonymous()));
        assert!(!can_read(&record, &Requester::user("u1")));
        assert!(can_read(&record, &Requester::user("u1").with_role("editor")));
        // Write entry was absent, so writing stays public.
        assert!(can_write(&record, &Requester::anonymous()));
    }

    #[test]
    fn test_user_flag() {
        let record = row(json!({"_permissions": {"read": "public", "write": "user:u1"}}));
        assert!(can_read(&record, &Requester::anonymous()));
        assert!(can_write(&record, &Requester::user("u1")));
        assert!(!can_write(&record, &Requester::user("u2")));
        assert!(!can_write(&record, &Requester::anonymous()));
    }

    #[test]
    fn test_malformed_flags_deny() {
        for bad in [
            json!({"_permissions": {"read": "owner"}}),
            json!({"_permissions": {"read": "role:"}}),
            json!({"_permissions": {"read": 42}}),
            json!({"_permissions": "public"}),
        ] {
            let record = row(bad);
            assert!(!can_read(&record, &Requester::user("u1").with_role("admin")));
        }
    }
}
