use crate::errors::GatewayError;
use crate::services::uploads::{file_type_allowed, sanitize_file_name, stored_file_name};
use crate::startup::AppState;
use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use metrics::counter;
use serde::Serialize;

/// Multipart field that carries the uploaded image.
pub const UPLOAD_FIELD: &str = "file";
pub const FILE_UPLOADED: &str = "File uploaded successfully";

/// Metadata of a stored upload, named after the fields clients already consume.
#[derive(Debug, Serialize)]
pub struct StoredFile {
    pub fieldname: String,
    pub originalname: String,
    pub encoding: String,
    pub mimetype: String,
    pub destination: String,
    pub filename: String,
    pub path: String,
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub file: StoredFile,
}

/// `POST /files`: store a single jpeg/png sent in the `file` multipart field.
///
/// Text fields are ignored. A file sent under any other field name, or a second
/// file part, rejects the whole request and leaves nothing on disk.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, GatewayError> {
    let result = receive_upload(&state, &mut multipart).await;

    let outcome = if result.is_ok() { "success" } else { "rejected" };
    counter!("uploads_total", "outcome" => outcome).increment(1);

    result.map(Json)
}

async fn receive_upload(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<UploadResponse, GatewayError> {
    let mut stored: Option<UploadResponse> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard(state, stored.as_ref()).await;
                return Err(GatewayError::MalformedUpload(e.body_text()));
            }
        };

        if field.file_name().is_none() {
            continue;
        }

        // Only one file part, named `file`, is accepted per request.
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != UPLOAD_FIELD || stored.is_some() {
            discard(state, stored.as_ref()).await;
            return Err(GatewayError::UnexpectedField(field_name));
        }

        stored = Some(store_field(state, field_name, field).await?);
    }

    stored.ok_or(GatewayError::MissingUploadField)
}

/// Removes an already stored file when the rest of the request is rejected.
async fn discard(state: &AppState, stored: Option<&UploadResponse>) {
    let Some(upload) = stored else {
        return;
    };

    if let Err(e) = state.storage.delete(&upload.file.filename).await {
        tracing::warn!(
            filename = %upload.file.filename,
            error = %e,
            "Failed to remove rejected upload"
        );
    }
}

async fn store_field(
    state: &AppState,
    field_name: String,
    field: Field<'_>,
) -> Result<UploadResponse, GatewayError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let encoding = field
        .headers()
        .get("content-transfer-encoding")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("7bit")
        .to_string();

    if !file_type_allowed(&original_name, &mime_type) {
        return Err(GatewayError::UploadRejected);
    }

    let safe_name = sanitize_file_name(&original_name)
        .ok_or_else(|| GatewayError::InvalidFileName(original_name.clone()))?;
    let filename = stored_file_name(chrono::Utc::now().timestamp_millis(), safe_name);

    let data = field
        .bytes()
        .await
        .map_err(|e| GatewayError::MalformedUpload(e.body_text()))?;

    let path = state
        .storage
        .upload(&filename, &data)
        .await
        .map_err(GatewayError::UploadWrite)?;

    tracing::info!(
        filename = %filename,
        original_name = %original_name,
        mime_type = %mime_type,
        size = data.len(),
        "File uploaded"
    );

    Ok(UploadResponse {
        message: FILE_UPLOADED,
        file: StoredFile {
            fieldname: field_name,
            originalname: original_name,
            encoding,
            mimetype: mime_type,
            destination: state.storage.destination().display().to_string(),
            filename,
            path: path.display().to_string(),
            size: data.len(),
        },
    })
}
