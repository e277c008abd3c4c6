use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::file::{FileListFilter, FileUploadResponse, StoredFileResponse},
};
use utoipa::ToSchema;

use crate::error::WebError;
use crate::features::upload::UploadForm;

use super::services;

/// Multipart body of a file hub upload
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct FileUploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// One of text, audio, image, video, pdf, docx
    file_type: String,
}

#[utoipa::path(
    post,
    path = "/api/files/upload",
    request_body(content = FileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded successfully", body = FileUploadResponse),
        (status = 400, description = "Missing file or extension not allowed for the type"),
        (status = 413, description = "File too large")
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(db): State<Database>,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let form = UploadForm::read(multipart).await?;
    let file_type = form
        .field("fileType")
        .map(str::to_string)
        .ok_or_else(|| WebError::BadRequest("fileType is required".to_string()))?;
    let upload = form.into_file()?;

    let new_file = services::prepare_file(&upload, &file_type).map_err(WebError::BadRequest)?;
    let file = services::store_file(db.pool(), &new_file, &upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(FileUploadResponse {
            message: "File uploaded successfully".to_string(),
            file: StoredFileResponse::from(file),
        }),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/files",
    params(FileListFilter),
    responses(
        (status = 200, description = "Files, most recent first", body = Vec<StoredFileResponse>),
        (status = 400, description = "Invalid file type filter")
    ),
    tag = "files"
)]
pub async fn list_files(
    State(db): State<Database>,
    Query(filter): Query<FileListFilter>,
) -> Result<Json<Vec<StoredFileResponse>>, WebError> {
    let files = services::list_files(db.pool(), &filter).await?;

    Ok(Json(files.into_iter().map(StoredFileResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/files/{id}",
    params(
        ("id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = StoredFileResponse),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn get_file(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let file = services::get_file(db.pool(), id).await?;

    Ok(Json(StoredFileResponse::from(file)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/files/{id}/content",
    params(
        ("id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File bytes for inline display"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn get_file_content(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    serve_file(&db, id, "inline").await
}

#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    params(
        ("id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File bytes as an attachment"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn download_file(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    serve_file(&db, id, "attachment").await
}

#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(
        ("id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted successfully"),
        (status = 404, description = "File not found")
    ),
    tag = "files"
)]
pub async fn delete_file(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::delete_file(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn serve_file(db: &Database, id: i32, disposition: &str) -> Result<Response, WebError> {
    let (file, object) = services::get_file_object(db.pool(), id).await?;

    let content_type = HeaderValue::from_str(&file.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let content_disposition =
        HeaderValue::from_str(&services::content_disposition(disposition, &file.original_name))
            .map_err(|e| WebError::InternalServerError(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        object.data,
    )
        .into_response())
}
