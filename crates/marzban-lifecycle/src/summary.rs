//! Compact projection of the panel's user list.

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

/// One user in the summary view of `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub status: String,
    /// `YYYY-MM-DD HH:MM:SS UTC`, or `unlimited`.
    pub expire: String,
}

/// Project a panel user-list body into [`UserSummary`] rows.
///
/// Accepts both `{"users": [...]}` and a bare array. Entries without a
/// username are skipped.
pub fn summarize(body: &Value) -> Vec<UserSummary> {
    let users: &[Value] = match body {
        Value::Array(users) => users.as_slice(),
        Value::Object(map) => map
            .get("users")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    users
        .iter()
        .filter_map(|user| {
            let username = user.get("username")?.as_str()?.to_string();
            let status = user
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            let expire = format_expire(user.get("expire").and_then(Value::as_i64));
            Some(UserSummary {
                username,
                status,
                expire,
            })
        })
        .collect()
}

/// Render an expiry timestamp for humans; absent or zero is `unlimited`.
pub fn format_expire(expire: Option<i64>) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    match expire {
        None | Some(0) => "unlimited".to_string(),
        Some(ts) => OffsetDateTime::from_unix_timestamp(ts)
            .ok()
            .and_then(|at| at.format(&format).ok())
            .unwrap_or_else(|| ts.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn format_expire_values() {
        assert_eq!(format_expire(None), "unlimited");
        assert_eq!(format_expire(Some(0)), "unlimited");
        assert_eq!(format_expire(Some(1_700_000_000)), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_expire(Some(i64::MAX)), i64::MAX.to_string());
    }

    #[test]
    fn summarize_panel_envelope() {
        let body = json!({
            "users": [
                {"username": "alice", "status": "active", "expire": 1_700_000_000},
                {"username": "bob", "status": "expired", "expire": null},
                {"status": "active"},
                {"username": "carol"}
            ],
            "total": 4
        });
        assert_eq!(
            summarize(&body),
            vec![
                UserSummary {
                    username: "alice".into(),
                    status: "active".into(),
                    expire: "2023-11-14 22:13:20 UTC".into(),
                },
                UserSummary {
                    username: "bob".into(),
                    status: "expired".into(),
                    expire: "unlimited".into(),
                },
                UserSummary {
                    username: "carol".into(),
                    status: "unknown".into(),
                    expire: "unlimited".into(),
                },
            ]
        );
    }

    #[test]
    fn summarize_bare_array_and_garbage() {
        let body = json!([{"username": "dave", "status": "active", "expire": 0}]);
        assert_eq!(summarize(&body).len(), 1);
        assert!(summarize(&json!("nope")).is_empty());
        assert!(summarize(&json!({"total": 0})).is_empty());
    }
}
