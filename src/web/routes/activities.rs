use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::services::activities_service::{self, ActivitiesListing};

/// Pulls `email` out of a raw query string. A repeated key resolves to its
/// last value.
fn email_from_query(query: Option<&str>) -> Result<String, AppError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.unwrap_or(""))
        .map_err(|e| AppError::Unprocessable(format!("Invalid query string: {e}")))?;

    pairs
        .into_iter()
        .filter(|(key, _)| key == "email")
        .map(|(_, value)| value)
        .last()
        .ok_or_else(|| AppError::Unprocessable("Missing query parameter: email".to_string()))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_activities_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<ActivitiesListing>, AppError> {
    activities_service::list_activities(&pool).await.map(Json)
}

pub async fn signup_handler(
    Path(activity_name): Path<String>,
    RawQuery(query): RawQuery,
    State(pool): State<SqlitePool>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = email_from_query(query.as_deref())?;
    let message = activities_service::signup(&pool, &activity_name, &email).await?;
    Ok(Json(MessageResponse { message }))
}

pub async fn unregister_handler(
    Path(activity_name): Path<String>,
    RawQuery(query): RawQuery,
    State(pool): State<SqlitePool>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = email_from_query(query.as_deref())?;
    let message = activities_service::unregister(&pool, &activity_name, &email).await?;
    Ok(Json(MessageResponse { message }))
}
