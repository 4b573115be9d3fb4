//! User query and command endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::UserId;
use domain::{
    AddUserCommand, DeleteUserCommand, Filter, ModifyUserCommand, PaginationConfig, Password, User,
};
use serde::{Deserialize, Serialize};
use service::{CommandService, QueryService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub commands: Arc<dyn CommandService>,
    pub queries: Arc<dyn QueryService>,
    pub pagination: PaginationConfig,
}

// -- Request types --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListUsersParams {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Deserialize)]
pub struct AddUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Deserialize)]
pub struct ModifyUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            email: user.email,
            country: user.country,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

// -- Handlers --

/// GET /users: lists users matching the query parameters.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<UsersResponse>, ApiError> {
    let filter = Filter::new(
        &params.first_name,
        &params.last_name,
        &params.nickname,
        &params.email,
        &params.country,
    );
    let pagination = state.pagination.paginate(params.limit, params.offset)?;

    let users = state.queries.users(filter, pagination).await?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /users: registers a new user.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let command = AddUserCommand {
        first_name: req.first_name,
        last_name: req.last_name,
        nickname: req.nickname,
        password: Password::new(req.password),
        email: req.email,
        country: req.country,
    };

    let user = state.commands.add_user(command).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PATCH /users/{id}: changes the attributes present in the body.
#[tracing::instrument(skip(state, req))]
pub async fn modify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ModifyUserRequest>,
) -> Result<StatusCode, ApiError> {
    let command = ModifyUserCommand {
        id: parse_user_id(&id)?,
        first_name: req.first_name,
        last_name: req.last_name,
        nickname: req.nickname,
        email: req.email,
        country: req.country,
    };

    state.commands.modify_user(command).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id)?;

    state.commands.delete_user(DeleteUserCommand::new(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_user_id(id: &str) -> Result<UserId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid user ID format: {e}")))
}
