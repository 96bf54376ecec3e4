//! Movie CRUD handlers.
//!
//! Thin translation between JSON bodies and `MovieRepository` calls. Error
//! bodies are plain text; the status code comes from the repository error.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use moviestore_core::movie::{Movie, MovieKeyRequest, UpdateMovieRequest};
use moviestore_core::storage::RepositoryError;

use crate::{handlers::AppError, state::AppState};

/// Response header carrying the number of malformed items a scan skipped.
pub const SKIPPED_ITEMS_HEADER: &str = "x-skipped-items";

/// Turn a body rejection into a 400.
fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError(
        anyhow::Error::new(RepositoryError::BadRequest(rejection.body_text()))
            .context("Invalid request body"),
    )
}

// ============================================================================
// Save Movie
// ============================================================================

/// Save a movie (POST /save-movie).
pub async fn save_movie(
    State(state): State<AppState>,
    body: Result<Json<Movie>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(movie) = body.map_err(invalid_body)?;
    tracing::debug!(title = %movie.title, year = movie.year, "Received save movie request");

    state
        .movie_repo
        .save(&movie)
        .await
        .context("Failed to save movie item")?;

    tracing::info!(title = %movie.title, year = movie.year, "Saved movie");

    Ok((StatusCode::CREATED, "Movie item saved successfully"))
}

// ============================================================================
// Get Movie
// ============================================================================

/// Get a single movie by key (POST /get-movie).
pub async fn get_movie(
    State(state): State<AppState>,
    body: Result<Json<MovieKeyRequest>, JsonRejection>,
) -> Result<Json<Movie>, AppError> {
    let Json(request) = body.map_err(invalid_body)?;
    request.validate().context("Failed to get movie item")?;

    let movie = state
        .movie_repo
        .get_one(&request.title, request.year)
        .await
        .context("Failed to get movie item")?;

    Ok(Json(movie))
}

// ============================================================================
// Scan Movies
// ============================================================================

/// List every movie in the table (GET /scan-movies).
pub async fn scan_movies(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .movie_repo
        .scan_all()
        .await
        .context("Failed to scan movies")?;

    tracing::debug!(
        count = outcome.movies.len(),
        skipped = outcome.skipped,
        "Scanned movies"
    );

    Ok((
        [(SKIPPED_ITEMS_HEADER, outcome.skipped.to_string())],
        Json(outcome.movies),
    ))
}

// ============================================================================
// Delete Movie
// ============================================================================

/// Delete a movie by key (POST /delete-movie).
///
/// Deleting a movie that does not exist succeeds.
pub async fn delete_movie(
    State(state): State<AppState>,
    body: Result<Json<MovieKeyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = body.map_err(invalid_body)?;
    request.validate().context("Failed to delete movie item")?;

    state
        .movie_repo
        .delete_one(&request.title, request.year)
        .await
        .context("Failed to delete movie item")?;

    tracing::info!(title = %request.title, year = request.year, "Deleted movie");

    Ok("Movie item deleted successfully")
}

// ============================================================================
// Update Movie
// ============================================================================

/// Apply an update expression to a movie (POST /update-movie).
pub async fn update_movie(
    State(state): State<AppState>,
    body: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = body.map_err(invalid_body)?;
    tracing::debug!(
        title = %request.title,
        year = request.year,
        expression = %request.update_expression,
        "Received update movie request"
    );

    let spec = request
        .to_update_spec()
        .context("Failed to update movie item")?;

    state
        .movie_repo
        .update_one(&request.title, request.year, &spec)
        .await
        .context("Failed to update movie item")?;

    tracing::info!(title = %request.title, year = request.year, "Updated movie");

    Ok("Movie item updated successfully")
}
