/// /api/buildings/* endpoints
use crate::{
    api::parse_id,
    building::{ApartmentList, FinancialReport},
    context::AppContext,
    db::models::Building,
    error::ApiResult,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// Build building routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/buildings/:id", get(get_building))
        .route("/api/buildings/:id/apartments", get(list_apartments))
        .route("/api/buildings/:id/financial-report", get(get_financial_report))
}

async fn get_building(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Building>> {
    let building_id = parse_id(&id, "building")?;
    Ok(Json(ctx.buildings.get_building(building_id).await?))
}

async fn list_apartments(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApartmentList>> {
    let building_id = parse_id(&id, "building")?;
    let apartments = ctx.buildings.list_apartments(building_id).await?;
    Ok(Json(ApartmentList { apartments }))
}

async fn get_financial_report(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<FinancialReport>> {
    let building_id = parse_id(&id, "building")?;
    Ok(Json(ctx.buildings.get_financial_report(building_id).await?))
}
