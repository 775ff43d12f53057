/// /api/contact/* endpoints
use crate::{
    api::extract::ApiJson,
    contact::{
        ContactFormRequest, ContactResponse, OfferRequest, PresentationRequest,
        CONTACT_SENT_MESSAGE, OFFER_RECEIVED_MESSAGE, PRESENTATION_RECEIVED_MESSAGE,
    },
    context::AppContext,
    error::ApiResult,
};
use axum::{extract::State, routing::post, Json, Router};

/// Build contact routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/contact/form", post(send_contact_form))
        .route("/api/contact/offer", post(request_offer))
        .route("/api/contact/presentation", post(request_presentation))
}

pub(crate) async fn send_contact_form(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<ContactFormRequest>,
) -> ApiResult<Json<ContactResponse>> {
    ctx.contacts.send_contact_form(&req).await?;
    Ok(Json(ContactResponse::ok(CONTACT_SENT_MESSAGE)))
}

pub(crate) async fn request_offer(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<OfferRequest>,
) -> ApiResult<Json<ContactResponse>> {
    ctx.contacts.request_offer(&req).await?;
    Ok(Json(ContactResponse::ok(OFFER_RECEIVED_MESSAGE)))
}

pub(crate) async fn request_presentation(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<PresentationRequest>,
) -> ApiResult<Json<ContactResponse>> {
    ctx.contacts.request_presentation(&req).await?;
    Ok(Json(ContactResponse::ok(PRESENTATION_RECEIVED_MESSAGE)))
}
