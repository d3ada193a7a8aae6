use axum::extract::rejection::JsonRejection;
use axum::{Json, Extension, extract::Path};
use axum::http::StatusCode;
use crate::plugins::users::models::{UserDto, CreateUser};
use crate::plugins::users::repo::DynUserRepo;
use crate::http_error::AppError;

pub async fn get_user(Extension(repo): Extension<DynUserRepo>, Path(user_id): Path<String>) -> Result<Json<UserDto>, AppError> {
    let user = repo.get_user(&user_id).await.map_err(AppError::from)?;
    Ok(Json(user))
}

/// No presence checks here, unlike blog creation; the store decides.
pub async fn create_user(
    Extension(repo): Extension<DynUserRepo>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    let Json(payload) = payload?;
    let user = repo.insert_user(payload).await.map_err(AppError::from)?;
    tracing::info!(user_id = %user.user_id, "user created");

    Ok((StatusCode::CREATED, Json(user)))
}
