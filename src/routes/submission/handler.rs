use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, OriginalUri, State},
    http::Method,
};

use crate::{AppState, error::AppError, middleware::ClientIp};

use super::model::{IMAGE_FIELD, MAX_IMAGE_BYTES, SubmissionResponse, build_row, upload_name};

struct UploadedImage {
    file_name: Option<String>,
    data: Bytes,
}

#[axum::debug_handler]
pub async fn append_to_sheet(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    method: Method,
    OriginalUri(uri): OriginalUri,
    mut multipart: Multipart,
) -> Result<Json<SubmissionResponse>, AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_owned);
            let data = field.bytes().await?;
            image = Some(UploadedImage { file_name, data });
        } else {
            let value = field.text().await?;
            fields.insert(name, value);
        }
    }

    let mut field_names: Vec<&str> = fields.keys().map(String::as_str).collect();
    field_names.sort_unstable();
    tracing::info!(
        %method,
        path = %uri.path(),
        %client_ip,
        fields = ?field_names,
        file_name = ?image.as_ref().and_then(|i| i.file_name.as_deref()),
        file_size = image.as_ref().map(|i| i.data.len()),
        "submission received"
    );

    // 浏览器未选文件时也会发送一个文件名为空的字段
    let image = image
        .filter(|i| i.file_name.as_deref().is_some_and(|n| !n.is_empty()))
        .ok_or_else(|| AppError::Validation("image required".to_string()))?;
    if image.data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::PayloadTooLarge);
    }

    state.sink.authenticate().await?;
    let link = state
        .sink
        .upload_file(image.data, &upload_name(&fields))
        .await?;
    fields.insert(IMAGE_FIELD.to_string(), link);

    let row = build_row(&fields);
    let outcome = state.sink.append_row(row.clone()).await?;
    tracing::info!(success = outcome.success, result = %outcome.result, "row appended");

    Ok(Json(SubmissionResponse {
        row,
        status: outcome.success,
    }))
}

/// `/api` 下未匹配的路径
pub async fn api_not_found() -> AppError {
    AppError::NotFound
}
