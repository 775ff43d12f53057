/// Building directory: buildings, apartments and the financial report
use crate::{
    db::models::{apartment_type_or_default, Apartment, ApartmentRow, Building},
    error::{ApiError, ApiResult},
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Client name shown for apartments nobody owns
pub const UNASSIGNED_CLIENT: &str = "N/A";

/// One line of a building's financial report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReportEntry {
    pub apartment_number: i64,
    #[serde(rename = "type")]
    pub apartment_type: String,
    pub floor: Option<i64>,
    pub client_name: String,
    pub residents: i64,
    pub elevator_gtp: f64,
    pub elevator_electricity: f64,
    pub common_area_electricity: f64,
    pub elevator_maintenance: f64,
    pub management_fee: f64,
    pub repair_fund: f64,
    pub total_due: f64,
}

/// Financial report for a whole building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub entries: Vec<FinancialReportEntry>,
    pub total_balance: f64,
}

/// Apartment list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApartmentList {
    pub apartments: Vec<Apartment>,
}

// Financial columns are NULL for apartments without a record
#[derive(Debug, FromRow)]
struct ReportRow {
    number: i64,
    apartment_type: Option<String>,
    floor: Option<i64>,
    full_name: Option<String>,
    residents: i64,
    elevator_gtp: Option<f64>,
    elevator_electricity: Option<f64>,
    common_area_electricity: Option<f64>,
    elevator_maintenance: Option<f64>,
    management_fee: Option<f64>,
    repair_fund: Option<f64>,
    total_due: Option<f64>,
}

impl From<ReportRow> for FinancialReportEntry {
    fn from(row: ReportRow) -> Self {
        Self {
            apartment_number: row.number,
            apartment_type: apartment_type_or_default(row.apartment_type),
            floor: row.floor,
            client_name: row
                .full_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNASSIGNED_CLIENT.to_string()),
            residents: row.residents,
            elevator_gtp: row.elevator_gtp.unwrap_or_default(),
            elevator_electricity: row.elevator_electricity.unwrap_or_default(),
            common_area_electricity: row.common_area_electricity.unwrap_or_default(),
            elevator_maintenance: row.elevator_maintenance.unwrap_or_default(),
            management_fee: row.management_fee.unwrap_or_default(),
            repair_fund: row.repair_fund.unwrap_or_default(),
            total_due: row.total_due.unwrap_or_default(),
        }
    }
}

/// Read-only access to buildings and their apartments
#[derive(Debug, Clone)]
pub struct BuildingDirectory {
    db: SqlitePool,
}

impl BuildingDirectory {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Fetch a building by id
    pub async fn get_building(&self, building_id: i64) -> ApiResult<Building> {
        sqlx::query_as::<_, Building>(
            "SELECT id, address, entrance, total_apartments, total_residents
             FROM buildings WHERE id = ?1",
        )
        .bind(building_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Building not found".to_string()))
    }

    /// List the apartments of a building ordered by number
    pub async fn list_apartments(&self, building_id: i64) -> ApiResult<Vec<Apartment>> {
        let rows = sqlx::query_as::<_, ApartmentRow>(
            "SELECT id, building_id, number, floor, type, residents, user_id
             FROM apartments WHERE building_id = ?1
             ORDER BY number",
        )
        .bind(building_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Apartment::from).collect())
    }

    /// One entry per apartment and financial record, with the sum of amounts due
    pub async fn get_financial_report(&self, building_id: i64) -> ApiResult<FinancialReport> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT a.number, a.type AS apartment_type, a.floor, u.full_name, a.residents,
                    f.elevator_gtp, f.elevator_electricity, f.common_area_electricity,
                    f.elevator_maintenance, f.management_fee, f.repair_fund, f.total_due
             FROM apartments a
             LEFT JOIN users u ON a.user_id = u.id
             LEFT JOIN financial_records f ON a.id = f.apartment_id
             WHERE a.building_id = ?1
             ORDER BY a.number, f.id",
        )
        .bind(building_id)
        .fetch_all(&self.db)
        .await?;

        let entries: Vec<FinancialReportEntry> =
            rows.into_iter().map(FinancialReportEntry::from).collect();
        let total_balance: f64 = entries.iter().map(|entry| entry.total_due).sum();

        tracing::debug!(building_id, entries = entries.len(), "Financial report built");

        Ok(FinancialReport {
            entries,
            total_balance,
        })
    }
}
