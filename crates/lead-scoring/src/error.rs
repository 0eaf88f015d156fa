use crate::config::ConfigError;
use crate::domain::OfferError;
use crate::ingest::LeadImportError;
use crate::scoring::classifier::ClassifierError;
use crate::scoring::formatter::ExportError;
use crate::scoring::ScoringError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Offer(OfferError),
    Leads(LeadImportError),
    Scoring(ScoringError),
    Export(ExportError),
    Store(StoreError),
    Classifier(ClassifierError),
    Serialize(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            // Domain errors carry their caller-facing message verbatim.
            AppError::Offer(err) => write!(f, "{}", err),
            AppError::Leads(err) => write!(f, "{}", err),
            AppError::Scoring(err) => write!(f, "{}", err),
            AppError::Export(err) => write!(f, "{}", err),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::Classifier(err) => write!(f, "{}", err),
            AppError::Serialize(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Offer(err) => Some(err),
            AppError::Leads(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Classifier(err) => Some(err),
            AppError::Serialize(err) => Some(err),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Offer(OfferError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Offer(_)
            | AppError::Leads(_)
            | AppError::Scoring(_)
            | AppError::Export(ExportError::NoResults) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_)
            | AppError::Store(_)
            | AppError::Classifier(_)
            | AppError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "ok": false,
            "status": status.as_u16(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<OfferError> for AppError {
    fn from(value: OfferError) -> Self {
        Self::Offer(value)
    }
}

impl From<LeadImportError> for AppError {
    fn from(value: LeadImportError) -> Self {
        Self::Leads(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ClassifierError> for AppError {
    fn from(value: ClassifierError) -> Self {
        Self::Classifier(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_map_to_bad_request() {
        assert_eq!(
            AppError::from(ScoringError::MissingOffer).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ScoringError::EmptyLeads).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(OfferError::InvalidShape).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ExportError::NoResults).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_offer_lookup_maps_to_not_found() {
        assert_eq!(
            AppError::from(OfferError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn domain_messages_surface_verbatim() {
        assert_eq!(
            AppError::from(ScoringError::MissingLeads).to_string(),
            "No leads found. POST /leads/upload first."
        );
        assert_eq!(
            AppError::from(ExportError::NoResults).to_string(),
            "No results to export. Run POST /score first."
        );
    }
}
