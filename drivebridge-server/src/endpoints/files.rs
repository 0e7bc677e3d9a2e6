//! The folder listing and file upload endpoints.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::{Json, Router, routing};
use bytes::Bytes;
use drivebridge_provider::FileEntry;
use serde::{Deserialize, Serialize};

use crate::endpoints::common::{ApiError, ApiResult, method_not_allowed};
use crate::multipart::{self, Form};
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    let routes = routing::get(list_files)
        .post(upload_file)
        .fallback(method_not_allowed);

    Router::new().route("/files", routes)
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "folderId", default)]
    folder_id: Option<String>,
}

/// Response returned for a successful folder listing.
#[derive(Debug, Serialize)]
struct ListResponse {
    message: &'static str,
    files: Vec<FileEntry>,
}

#[tracing::instrument(skip_all)]
async fn list_files(
    State(state): State<ServiceState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let folder_id = query
        .folder_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::BadRequest {
            message: "Missing folder ID query parameter.",
        })?;

    let files = state
        .drive
        .list_children(&folder_id)
        .await
        .map_err(|source| ApiError::Provider {
            message: "Failed to retrieve file list from Google Drive.",
            source,
        })?;

    Ok(Json(ListResponse {
        message: "File list retrieved successfully",
        files,
    }))
}

/// Response returned for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    message: &'static str,
    file_name: String,
    file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_view_link: Option<String>,
}

#[tracing::instrument(skip_all)]
async fn upload_file(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<UploadResponse>> {
    let malformed = || ApiError::BadRequest {
        message: "Failed to process form data.",
    };

    let boundary = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(multipart::boundary)
        .ok_or_else(malformed)?;

    let form = Form::parse(&body, boundary).map_err(|err| {
        tracing::debug!(
            error = &err as &dyn std::error::Error,
            "failed to decode form body"
        );
        malformed()
    })?;

    let folder_id = form
        .fields
        .get("folderId")
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::BadRequest {
            message: "Missing folder ID.",
        })?;

    let file = &form.file;
    let created = state
        .drive
        .create_file(&file.file_name, &file.mime_type, folder_id, &file.bytes)
        .await
        .map_err(|source| ApiError::Provider {
            message: "Failed to upload file to Google Drive.",
            source,
        })?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully",
        file_name: created.name,
        file_id: created.id,
        web_view_link: created.web_view_link,
    }))
}
