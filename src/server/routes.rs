use crate::ConvertError;
use crate::server::AppState;
use crate::server::response::ApiError;
use crate::server::upload::{convert_upload, read_upload};
use crate::utils::{OutputFormat, SuiteFormatter};
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    #[serde(default)]
    pub format: OutputFormat,
}

/// `POST /convert`：以 multipart 上传 `.jmx` 文件
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConvertQuery>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("convert", request_id = %request_id);

    let result = handle_convert(state, query.format, multipart)
        .instrument(span.clone())
        .await;

    if let Err(err) = &result {
        span.in_scope(|| {
            if err.status.is_client_error() {
                tracing::warn!(status = %err.status, error = %err.message, "Rejected upload");
            } else {
                tracing::error!(status = %err.status, error = %err.message, "Conversion failed");
            }
        });
    }
    result
}

async fn handle_convert(
    state: Arc<AppState>,
    format: OutputFormat,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    tracing::info!(file = %upload.file_name, bytes = upload.bytes.len(), "Upload received");

    let extractor = state.extractor.clone();
    let suite = tokio::task::spawn_blocking(move || convert_upload(&upload.bytes, &extractor))
        .await
        .map_err(|e| ConvertError::Other(format!("Conversion task failed: {}", e)))??;

    let body = SuiteFormatter::new(format).render(&suite)?;
    tracing::info!(api_tests = suite.len(), format = ?format, "Conversion finished");

    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// `GET /health` 健康检查
pub async fn health() -> &'static str {
    "ok"
}
