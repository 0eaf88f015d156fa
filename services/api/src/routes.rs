use crate::infra::AppState;
use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use lead_scoring::domain::{Offer, OfferError, ScoredLead, StoredOffer};
use lead_scoring::error::AppError;
use lead_scoring::ingest::{self, LeadImportError};
use lead_scoring::scoring::formatter::{self, ExportError};
use lead_scoring::scoring::{ScoringError, ScoringPipeline};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub(crate) struct OfferResponse {
    pub(crate) ok: bool,
    pub(crate) offer: StoredOffer,
}

#[derive(Debug, Serialize)]
pub(crate) struct CountResponse {
    pub(crate) ok: bool,
    pub(crate) count: usize,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/offer", post(create_offer).get(get_offer))
        .route("/leads/upload", post(upload_leads))
        .route("/score", post(run_scoring))
        .route("/results", get(get_results))
        .route("/export", get(export_results))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn create_offer(
    Extension(state): Extension<AppState>,
    payload: Option<Json<Value>>,
) -> Result<(StatusCode, Json<OfferResponse>), AppError> {
    let Json(payload) = payload.ok_or(OfferError::PayloadRequired)?;
    let offer = Offer::from_payload(&payload)?;

    let stored = StoredOffer::new(offer);
    state.store.put_offer(&stored)?;

    Ok((
        StatusCode::CREATED,
        Json(OfferResponse {
            ok: true,
            offer: stored,
        }),
    ))
}

pub(crate) async fn get_offer(
    Extension(state): Extension<AppState>,
) -> Result<Json<OfferResponse>, AppError> {
    let offer = state.store.get_offer()?.ok_or(OfferError::NotFound)?;
    Ok(Json(OfferResponse { ok: true, offer }))
}

pub(crate) async fn upload_leads(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CountResponse>), AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| LeadImportError::Upload(err.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| LeadImportError::Upload(err.to_string()))?;
            file = Some(bytes);
        }
    }

    let bytes = file.ok_or(LeadImportError::MissingFile)?;
    if !ingest::looks_like_csv(&bytes) {
        return Err(LeadImportError::NotCsv.into());
    }

    let leads = ingest::parse_leads(bytes.as_ref())?;
    state.store.put_leads(&leads)?;

    Ok((
        StatusCode::CREATED,
        Json(CountResponse {
            ok: true,
            count: leads.len(),
        }),
    ))
}

pub(crate) async fn run_scoring(
    Extension(state): Extension<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let offer = state.store.get_offer()?.ok_or(ScoringError::MissingOffer)?;
    let leads = state.store.get_leads()?.ok_or(ScoringError::MissingLeads)?;

    let pipeline = ScoringPipeline::new(state.classifier.clone());
    let results = pipeline.run(&offer.offer, &leads).await?;

    // The batch is persisted once, whole, after every lead is scored.
    state.store.put_results(&results)?;

    Ok(Json(CountResponse {
        ok: true,
        count: results.len(),
    }))
}

pub(crate) async fn get_results(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<ScoredLead>>, AppError> {
    let results = state.store.get_results()?.unwrap_or_default();
    Ok(Json(results))
}

pub(crate) async fn export_results(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.store.get_results()?.ok_or(ExportError::NoResults)?;
    let csv = formatter::to_csv(&results)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=results.csv",
            ),
        ],
        csv,
    ))
}
