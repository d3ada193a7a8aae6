use axum::extract::rejection::JsonRejection;
use axum::{extract::Path, Json, Extension};
use axum::http::StatusCode;
use crate::http_error::AppError;
use crate::plugins::blogs::models::{BlogCreate, BlogPatch, BlogDto, BlogMessage};
use crate::plugins::blogs::repo::DynBlogRepo;

pub async fn list_blogs(Extension(repo): Extension<DynBlogRepo>) -> Result<Json<Vec<BlogDto>>, AppError> {
    let blogs = repo.list_blogs().await.map_err(AppError::from)?;
    tracing::debug!("returned {} blogs", blogs.len());
    Ok(Json(blogs))
}

pub async fn get_blog(Extension(repo): Extension<DynBlogRepo>, Path(id): Path<String>) -> Result<Json<BlogDto>, AppError> {
    let blog = repo.get_blog(&id).await.map_err(AppError::from)?;
    Ok(Json(blog))
}

pub async fn create_blog(
    Extension(repo): Extension<DynBlogRepo>,
    payload: Result<Json<BlogCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<BlogMessage>), AppError> {
    let Json(payload) = payload?;
    // validated before the store is touched
    let new_blog = payload.validate().map_err(AppError::validation)?;

    let blog = repo.insert_blog(new_blog).await.map_err(AppError::from)?;
    tracing::info!(blog_id = %blog.id, "blog created");

    Ok((StatusCode::CREATED, Json(BlogMessage { message: "Blog created successfully".to_string(), blog: Some(blog) })))
}

pub async fn update_blog(
    Extension(repo): Extension<DynBlogRepo>,
    Path(id): Path<String>,
    payload: Result<Json<BlogPatch>, JsonRejection>,
) -> Result<Json<BlogMessage>, AppError> {
    let Json(patch) = payload?;
    let blog = repo.update_blog(&id, patch).await.map_err(AppError::from)?;

    Ok(Json(BlogMessage { message: "Blog updated successfully".to_string(), blog: Some(blog) }))
}

pub async fn delete_blog(Extension(repo): Extension<DynBlogRepo>, Path(id): Path<String>) -> Result<Json<BlogMessage>, AppError> {
    repo.delete_blog(&id).await.map_err(AppError::from)?;
    tracing::info!(blog_id = %id, "blog deleted");

    Ok(Json(BlogMessage { message: "Blog deleted successfully".to_string(), blog: None }))
}
