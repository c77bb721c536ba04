use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sagemakerruntime::error::DisplayErrorContext;
use aws_sdk_sagemakerruntime::primitives::Blob;
use aws_sdk_sagemakerruntime::Client;
use log::info;
use thiserror::Error;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("no AWS region configured for the SageMaker runtime client")]
    MissingRegion,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvokeError(pub String);

/// A hosted model that scores one CSV row and answers with CSV.
///
/// Implementations are shared read-only by every request.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn invoke(&self, endpoint: &str, payload: String) -> Result<String, InvokeError>;
}

pub struct SageMakerRuntime {
    client: Client,
}

impl SageMakerRuntime {
    /// Builds the client from the default AWS credential and region chain.
    pub async fn from_env() -> Result<Self, ClientInitError> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let region = config.region().ok_or(ClientInitError::MissingRegion)?;
        info!("SageMaker runtime client ready (region {})", region);

        Ok(Self {
            client: Client::new(&config),
        })
    }
}

#[async_trait]
impl PredictionClient for SageMakerRuntime {
    async fn invoke(&self, endpoint: &str, payload: String) -> Result<String, InvokeError> {
        let output = self
            .client
            .invoke_endpoint()
            .endpoint_name(endpoint)
            .content_type(CSV_CONTENT_TYPE)
            .accept(CSV_CONTENT_TYPE)
            .body(Blob::new(payload.into_bytes()))
            .send()
            .await
            .map_err(|e| InvokeError(DisplayErrorContext(&e).to_string()))?;

        let body = output.body().map(|b| b.as_ref()).unwrap_or_default();
        Ok(String::from_utf8_lossy(body).into_owned())
    }
}

/// The endpoint answers with a single scalar, possibly padded by a newline.
/// Non-finite values cannot be carried back as JSON and count as unparseable.
pub fn parse_prediction(body: &str) -> Option<f64> {
    body.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_scalar() {
        assert_eq!(parse_prediction("1221.59"), Some(1221.59));
        assert_eq!(parse_prediction("  1221.59\n"), Some(1221.59));
        assert_eq!(parse_prediction("1.5e3"), Some(1500.0));
    }

    #[test]
    fn rejects_anything_but_one_number() {
        assert_eq!(parse_prediction("error"), None);
        assert_eq!(parse_prediction(""), None);
        assert_eq!(parse_prediction("1.0\n2.0"), None);
        assert_eq!(parse_prediction("1.0,2.0"), None);
        assert_eq!(parse_prediction("NaN"), None);
        assert_eq!(parse_prediction("inf"), None);
    }
}
