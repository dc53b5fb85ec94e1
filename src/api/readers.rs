//! Reader (patron) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::reader::{Reader, ReaderInput},
};

/// List all readers
#[utoipa::path(
    get,
    path = "/readers",
    tag = "readers",
    responses(
        (status = 200, description = "All readers ordered by name", body = Vec<Reader>)
    )
)]
pub async fn list_readers(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Reader>>> {
    let readers = state.services.readers.list_readers().await?;
    Ok(Json(readers))
}

/// Get reader details by ID
#[utoipa::path(
    get,
    path = "/readers/{id}",
    tag = "readers",
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader details", body = Reader),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn get_reader(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reader>> {
    let reader = state.services.readers.get_reader(id).await?;
    Ok(Json(reader))
}

/// Register a new reader
#[utoipa::path(
    post,
    path = "/readers/new",
    tag = "readers",
    request_body = ReaderInput,
    responses(
        (status = 201, description = "Reader created", body = Reader),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Reader number already taken")
    )
)]
pub async fn create_reader(
    State(state): State<crate::AppState>,
    Json(reader): Json<ReaderInput>,
) -> AppResult<(StatusCode, Json<Reader>)> {
    let created = state.services.readers.create_reader(reader).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a reader for editing
#[utoipa::path(
    get,
    path = "/readers/edit/{id}",
    tag = "readers",
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader to edit", body = Reader),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn get_reader_for_edit(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Reader>> {
    let reader = state.services.readers.get_reader(id).await?;
    Ok(Json(reader))
}

/// Update an existing reader
#[utoipa::path(
    post,
    path = "/readers/edit/{id}",
    tag = "readers",
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    request_body = ReaderInput,
    responses(
        (status = 200, description = "Reader updated", body = Reader),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Reader not found"),
        (status = 409, description = "Reader number already used by another reader")
    )
)]
pub async fn update_reader(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(reader): Json<ReaderInput>,
) -> AppResult<Json<Reader>> {
    let updated = state.services.readers.update_reader(id, reader).await?;
    Ok(Json(updated))
}

/// Delete a reader
#[utoipa::path(
    post,
    path = "/readers/delete/{id}",
    tag = "readers",
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 204, description = "Reader deleted"),
        (status = 404, description = "Reader not found"),
        (status = 422, description = "Reader still has books out")
    )
)]
pub async fn delete_reader(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.readers.delete_reader(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
