use actix_web::http::{Method, StatusCode};
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use log::{error, info, warn};
use std::sync::Arc;

use crate::error::PredictError;
use crate::inference::{parse_prediction, PredictionClient};
use crate::models::{PredictionInput, PredictionOutput};

/// Sent on every response, whatever the status.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
];

pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared by every request and never mutated after startup.
pub struct AppState {
    pub endpoint_name: Option<String>,
    /// `None` when the client could not be built at startup.
    pub client: Option<Arc<dyn PredictionClient>>,
}

impl AppState {
    pub fn new(endpoint_name: Option<String>, client: Option<Arc<dyn PredictionClient>>) -> Self {
        AppState {
            endpoint_name,
            client,
        }
    }
}

pub fn cors_response(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    for header in CORS_HEADERS {
        builder.insert_header(header);
    }
    builder
}

/// Safety net for responses the framework builds on its own.
pub fn cors_defaults() -> DefaultHeaders {
    CORS_HEADERS
        .into_iter()
        .fold(DefaultHeaders::new(), |headers, header| headers.add(header))
}

/// Every path and method lands on `handle`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .default_service(web::to(handle));
}

pub async fn handle(
    req: HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, PredictError> {
    if req.method() == Method::OPTIONS {
        return Ok(cors_response(StatusCode::OK).finish());
    }

    let endpoint = state.endpoint_name.as_deref().ok_or_else(|| {
        error!("SAGEMAKER_ENDPOINT_NAME is not set, refusing {} {}", req.method(), req.path());
        PredictError::MissingEndpoint
    })?;

    let client = state.client.as_ref().ok_or_else(|| {
        error!("SageMaker client unavailable, refusing {} {}", req.method(), req.path());
        PredictError::ClientUnavailable
    })?;

    let body = body.map_err(|e| {
        warn!("Error reading request body: {}", e);
        PredictError::UnreadableBody(e)
    })?;

    let input = PredictionInput::from_json(&body).map_err(|e| {
        warn!("Error unmarshalling request body: {}", e);
        PredictError::InvalidInput(e)
    })?;

    let payload = input.to_csv_row();
    info!("Payload sent to SageMaker: {}", payload);

    let raw = client.invoke(endpoint, payload).await.map_err(|e| {
        error!("SageMaker InvokeEndpoint error: {}", e);
        PredictError::Upstream(e)
    })?;

    let prediction = parse_prediction(&raw).ok_or_else(|| {
        error!("Error parsing prediction result {:?}", raw.trim());
        PredictError::UnparseableResult
    })?;

    info!("Prediction from {}: {} t/h", endpoint, prediction);
    Ok(cors_response(StatusCode::OK).json(PredictionOutput::new(prediction, endpoint)))
}
