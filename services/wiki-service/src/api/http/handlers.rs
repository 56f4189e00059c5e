//! HTTP 处理器
//!
//! 请求体与路径参数的解析失败在进入领域操作之前转换为 422

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use wiki_common::{PostId, UserId};
use wiki_errors::AppResult;

use super::AppState;
use super::dto::{CreatePostRequest, CreateUserRequest, PostResponse, UserResponse};

pub async fn create_user(
    State(service): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Json(req) = payload?;
    let user = service.create_user(&req.name).await?;
    Ok(Json(user.into()))
}

pub async fn create_post(
    State(service): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> AppResult<Json<PostResponse>> {
    let Json(req) = payload?;
    let post = service
        .create_post(&req.content, UserId(req.user_id))
        .await?;
    Ok(Json(post.into()))
}

pub async fn get_user(
    State(service): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(id) = id?;
    let user = service.get_user(UserId(id)).await?;
    Ok(Json(user.into()))
}

pub async fn get_post(
    State(service): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<PostResponse>> {
    let Path(id) = id?;
    let post = service.get_post(PostId(id)).await?;
    Ok(Json(post.into()))
}
