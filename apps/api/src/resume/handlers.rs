use axum::extract::Multipart;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::resume::extract::{extract_text, DocumentKind};
use crate::resume::fields::{match_fields, CandidateInfo};

// Deserialize is for the terminal client, which reuses this wire type.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub extracted_text: String,
    pub candidate_info: CandidateInfo,
}

/// POST /api/resume/extract
///
/// Multipart upload with a single `file` field. Extraction is CPU-bound and
/// runs on the blocking pool.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let mut upload: Option<(DocumentKind, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let kind = DocumentKind::from_content_type(field.content_type());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((kind, data));
        }
    }

    let (kind, data) = upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    info!("Extracting resume text ({} bytes, {kind:?})", data.len());

    let text = tokio::task::spawn_blocking(move || extract_text(&data, kind))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    let candidate_info = match_fields(&text);

    Ok(Json(ExtractResponse {
        extracted_text: text,
        candidate_info,
    }))
}
