/// Row models and the domain records decoded from them
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Apartment type shown when the column is NULL
pub const DEFAULT_APARTMENT_TYPE: &str = "Апартамент";

/// User record in the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// User as exposed to clients (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            phone: row.phone,
            role: row.role,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Account profile record (one per user at most)
#[derive(Debug, Clone, FromRow)]
pub struct AccountProfileRow {
    pub user_id: i64,
    pub account_manager: Option<String>,
    pub balance: f64,
    pub client_number: Option<String>,
    pub contract_end_date: Option<NaiveDate>,
}

/// Building record
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Building {
    pub id: i64,
    pub address: String,
    pub entrance: Option<String>,
    pub total_apartments: i64,
    pub total_residents: i64,
}

/// Apartment record as stored
#[derive(Debug, Clone, FromRow)]
pub struct ApartmentRow {
    pub id: i64,
    pub building_id: i64,
    pub number: i64,
    pub floor: Option<i64>,
    #[sqlx(rename = "type")]
    pub apartment_type: Option<String>,
    pub residents: i64,
    pub user_id: Option<i64>,
}

/// Apartment with its type resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: i64,
    pub building_id: i64,
    pub number: i64,
    pub floor: Option<i64>,
    #[serde(rename = "type")]
    pub apartment_type: String,
    pub residents: i64,
    pub user_id: Option<i64>,
}

impl From<ApartmentRow> for Apartment {
    fn from(row: ApartmentRow) -> Self {
        Self {
            id: row.id,
            building_id: row.building_id,
            number: row.number,
            floor: row.floor,
            apartment_type: apartment_type_or_default(row.apartment_type),
            residents: row.residents,
            user_id: row.user_id,
        }
    }
}

/// Resolve a nullable apartment type to its display value
pub fn apartment_type_or_default(value: Option<String>) -> String {
    value
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_APARTMENT_TYPE.to_string())
}

/// Kind of inbound contact submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Contact,
    Offer,
    Presentation,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Contact => "contact",
            ContactKind::Offer => "offer",
            ContactKind::Presentation => "presentation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apartment_type_default() {
        assert_eq!(apartment_type_or_default(None), DEFAULT_APARTMENT_TYPE);
        assert_eq!(
            apartment_type_or_default(Some("  ".to_string())),
            DEFAULT_APARTMENT_TYPE
        );
        assert_eq!(apartment_type_or_default(Some("Студио".to_string())), "Студио");
    }

    #[test]
    fn test_public_user_drops_password_hash() {
        let row = UserRow {
            id: 7,
            email: "ivan@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            full_name: Some("Иван Иванов".to_string()),
            phone: None,
            role: "user".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(PublicUser::from(row)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "ivan@example.com");
    }
}
