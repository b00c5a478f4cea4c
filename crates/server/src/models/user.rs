//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trikart_core::{City, Email, Role, UserId};

/// A registered user.
///
/// The password hash is deliberately not part of this type; repositories
/// return it separately on the login path only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    pub email: Email,
    pub city: City,
    pub role: Role,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_camel_case_without_hash() {
        let user = User {
            id: UserId::new(7),
            name: "Asha Verma".to_owned(),
            phone: "9800000001".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
            city: City::Chandigarh,
            role: Role::User,
            is_blocked: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["isBlocked"], false);
        assert_eq!(json["city"], "Chandigarh");
        assert_eq!(json["role"], "user");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
