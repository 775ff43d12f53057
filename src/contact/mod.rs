/// Contact intake: contact form, offer and presentation requests
///
/// Every submission becomes one row in `contact_requests`. Offers and
/// presentations fold their structured fields into the message text.
use crate::{db::models::ContactKind, error::ApiResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

pub const CONTACT_SENT_MESSAGE: &str = "Your message has been sent successfully";
pub const OFFER_RECEIVED_MESSAGE: &str = "Your offer request has been received";
pub const PRESENTATION_RECEIVED_MESSAGE: &str = "Your presentation request has been received";

/// Contact form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactFormRequest {
    #[validate(length(max = 255))]
    pub name: String,
    #[validate(length(max = 50))]
    pub phone: String,
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(max = 5000))]
    pub message: String,
}

/// Offer request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OfferRequest {
    #[validate(length(max = 50))]
    pub phone: String,
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(max = 255))]
    pub city: String,
    pub num_properties: i64,
    #[validate(length(max = 500))]
    pub address: String,
    #[validate(length(max = 5000))]
    pub additional_info: String,
}

/// Presentation request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PresentationRequest {
    #[validate(length(max = 50))]
    pub phone: String,
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(max = 64))]
    pub date: String,
    #[validate(length(max = 255))]
    pub building_type: String,
    #[validate(length(max = 500))]
    pub address: String,
    #[validate(length(max = 5000))]
    pub additional_info: String,
}

/// Acknowledgement for any contact submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

impl OfferRequest {
    fn summary(&self) -> String {
        format!(
            "City: {}, Properties: {}, Address: {}, Additional Info: {}",
            self.city, self.num_properties, self.address, self.additional_info
        )
    }
}

impl PresentationRequest {
    fn summary(&self) -> String {
        format!(
            "Date: {}, Type: {}, Address: {}, Additional Info: {}",
            self.date, self.building_type, self.address, self.additional_info
        )
    }
}

/// Records inbound contact submissions
#[derive(Debug, Clone)]
pub struct ContactIntake {
    db: SqlitePool,
}

impl ContactIntake {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Store a contact form submission
    pub async fn send_contact_form(&self, req: &ContactFormRequest) -> ApiResult<i64> {
        req.validate()?;
        self.record(&req.name, &req.phone, &req.email, &req.message, ContactKind::Contact)
            .await
    }

    /// Store an offer request
    pub async fn request_offer(&self, req: &OfferRequest) -> ApiResult<i64> {
        req.validate()?;
        self.record("", &req.phone, &req.email, &req.summary(), ContactKind::Offer)
            .await
    }

    /// Store a presentation request
    pub async fn request_presentation(&self, req: &PresentationRequest) -> ApiResult<i64> {
        req.validate()?;
        self.record(
            "",
            &req.phone,
            &req.email,
            &req.summary(),
            ContactKind::Presentation,
        )
        .await
    }

    async fn record(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        message: &str,
        kind: ContactKind,
    ) -> ApiResult<i64> {
        let result = sqlx::query(
            "INSERT INTO contact_requests (name, phone, email, message, type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(message)
        .bind(kind.as_str())
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(id, kind = kind.as_str(), "Contact request recorded");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, error::ApiError};
    use chrono::{DateTime, Utc};

    #[derive(Debug, sqlx::FromRow)]
    struct ContactRequestRow {
        name: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        message: Option<String>,
        #[sqlx(rename = "type")]
        kind: String,
        created_at: DateTime<Utc>,
    }

    async fn intake() -> (ContactIntake, SqlitePool) {
        let pool = db::connect_in_memory().await.unwrap();
        (ContactIntake::new(pool.clone()), pool)
    }

    async fn fetch(pool: &SqlitePool, id: i64) -> ContactRequestRow {
        sqlx::query_as::<_, ContactRequestRow>(
            "SELECT name, phone, email, message, type, created_at
             FROM contact_requests WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_contact_form_is_stored_verbatim() {
        let (intake, pool) = intake().await;
        let id = intake
            .send_contact_form(&ContactFormRequest {
                name: "Елена".to_string(),
                phone: "+359 887 000 111".to_string(),
                email: "elena@example.com".to_string(),
                message: "Интересувам се от управление на входа.".to_string(),
            })
            .await
            .unwrap();

        let row = fetch(&pool, id).await;
        assert_eq!(row.kind, "contact");
        assert_eq!(row.name.as_deref(), Some("Елена"));
        assert_eq!(row.phone.as_deref(), Some("+359 887 000 111"));
        assert_eq!(row.email.as_deref(), Some("elena@example.com"));
        assert!(row.created_at <= Utc::now());
        assert_eq!(
            row.message.as_deref(),
            Some("Интересувам се от управление на входа.")
        );
    }

    #[tokio::test]
    async fn test_offer_message_format() {
        let (intake, pool) = intake().await;
        let id = intake
            .request_offer(&OfferRequest {
                phone: "0888".to_string(),
                email: "offer@example.com".to_string(),
                city: "Пловдив".to_string(),
                num_properties: 3,
                address: "ул. Главна 1".to_string(),
                additional_info: "".to_string(),
            })
            .await
            .unwrap();

        let row = fetch(&pool, id).await;
        assert_eq!(row.kind, "offer");
        assert_eq!(row.name.as_deref(), Some(""));
        assert_eq!(
            row.message.as_deref(),
            Some("City: Пловдив, Properties: 3, Address: ул. Главна 1, Additional Info: ")
        );
    }

    #[tokio::test]
    async fn test_presentation_message_format() {
        let (intake, pool) = intake().await;
        let id = intake
            .request_presentation(&PresentationRequest {
                phone: "0888".to_string(),
                email: "p@example.com".to_string(),
                date: "2025-03-14".to_string(),
                building_type: "Жилищна".to_string(),
                address: "бул. Витоша 5".to_string(),
                additional_info: "след 18:00".to_string(),
            })
            .await
            .unwrap();

        let row = fetch(&pool, id).await;
        assert_eq!(row.kind, "presentation");
        assert_eq!(
            row.message.as_deref(),
            Some("Date: 2025-03-14, Type: Жилищна, Address: бул. Витоша 5, Additional Info: след 18:00")
        );
    }

    #[tokio::test]
    async fn test_oversized_fields_are_rejected() {
        let (intake, _pool) = intake().await;
        let err = intake
            .send_contact_form(&ContactFormRequest {
                phone: "9".repeat(51),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("phone")));
    }
}
