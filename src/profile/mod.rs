/// Profile aggregation
///
/// Joins a user with the apartment they own, its building and their account
/// profile. Only the user itself is required; every other relation is
/// optional and its absence just leaves that part of the view empty.
use crate::{
    account::UserStore,
    db::models::{apartment_type_or_default, AccountProfileRow, Apartment, Building, PublicUser},
    error::{ApiError, ApiResult},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Composite profile returned to an authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub user: PublicUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<Building>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<Apartment>,
    pub account_manager: String,
    pub balance: f64,
    pub client_number: String,
    pub contract_end_date: Option<NaiveDate>,
}

/// Profile update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Profile update response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: String,
}

/// Apartment joined with its building
#[derive(Debug, FromRow)]
struct HomeRow {
    building_id: i64,
    address: String,
    entrance: Option<String>,
    total_apartments: i64,
    total_residents: i64,
    apartment_id: i64,
    number: i64,
    floor: Option<i64>,
    apartment_type: Option<String>,
    residents: i64,
    user_id: Option<i64>,
}

impl HomeRow {
    fn split(self) -> (Building, Apartment) {
        let building = Building {
            id: self.building_id,
            address: self.address,
            entrance: self.entrance,
            total_apartments: self.total_apartments,
            total_residents: self.total_residents,
        };
        let apartment = Apartment {
            id: self.apartment_id,
            building_id: self.building_id,
            number: self.number,
            floor: self.floor,
            apartment_type: apartment_type_or_default(self.apartment_type),
            residents: self.residents,
            user_id: self.user_id,
        };
        (building, apartment)
    }
}

/// Assembles and updates user profiles
#[derive(Debug, Clone)]
pub struct ProfileAggregator {
    users: UserStore,
    db: SqlitePool,
}

impl ProfileAggregator {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            db,
        }
    }

    /// Build the composite profile for a user.
    ///
    /// Fails with `NotFound` only when the user itself is missing.
    pub async fn get_profile(&self, user_id: i64) -> ApiResult<ProfileView> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let home = self.find_home(user_id).await?;
        let account = self.find_account_profile(user_id).await?;

        tracing::debug!(
            user_id,
            has_apartment = home.is_some(),
            has_account_profile = account.is_some(),
            "Profile assembled"
        );

        let (building, apartment) = match home {
            Some(row) => {
                let (building, apartment) = row.split();
                (Some(building), Some(apartment))
            }
            None => (None, None),
        };

        let view = match account {
            Some(account) => ProfileView {
                user: user.into(),
                building,
                apartment,
                account_manager: account.account_manager.unwrap_or_default(),
                balance: account.balance,
                client_number: account.client_number.unwrap_or_default(),
                contract_end_date: account.contract_end_date,
            },
            None => ProfileView {
                user: user.into(),
                building,
                apartment,
                account_manager: String::new(),
                balance: 0.0,
                client_number: String::new(),
                contract_end_date: None,
            },
        };

        Ok(view)
    }

    /// Overwrite full name and phone of a user
    pub async fn update_profile(
        &self,
        user_id: i64,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> ApiResult<()> {
        if !self
            .users
            .update_contact_details(user_id, full_name, phone)
            .await?
        {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id, "Profile updated");
        Ok(())
    }

    async fn find_home(&self, user_id: i64) -> ApiResult<Option<HomeRow>> {
        let row = sqlx::query_as::<_, HomeRow>(
            "SELECT b.id AS building_id, b.address, b.entrance, b.total_apartments, b.total_residents,
                    a.id AS apartment_id, a.number, a.floor, a.type AS apartment_type, a.residents, a.user_id
             FROM apartments a
             JOIN buildings b ON a.building_id = b.id
             WHERE a.user_id = ?1
             ORDER BY a.id
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_account_profile(&self, user_id: i64) -> ApiResult<Option<AccountProfileRow>> {
        let row = sqlx::query_as::<_, AccountProfileRow>(
            "SELECT user_id, account_manager, balance, client_number, contract_end_date
             FROM user_profiles WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}
