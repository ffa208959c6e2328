// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the user profile and social-graph operations.

use crate::error::{AppError, Result};
use crate::models::{Reply, User, UserPosts};
use crate::services::users::DEFAULT_PAGE_SIZE;
use crate::services::{SortOrder, UpdateUserParams, UserSearchParams};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_PER_PAGE: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(search_users))
        .route("/api/users/{id}", get(get_user).put(update_user))
        .route("/api/users/{id}/posts", get(get_user_posts))
        .route("/api/users/{id}/activity", get(get_activity))
}

// ─── Profile Upsert ──────────────────────────────────────────

/// Profile upsert request body.
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    pub image: Option<String>,
    /// UI route whose cached rendering should be revalidated, if eligible.
    pub path: Option<String>,
}

/// Profile upsert response.
#[derive(Serialize)]
pub struct UpdateUserResponse {
    pub created: bool,
    pub revalidated: bool,
}

/// Create or update a user profile.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>> {
    if body.username.trim().is_empty() {
        return Err(AppError::BadRequest("username must not be empty".to_string()));
    }

    let outcome = state
        .users
        .update_user(UpdateUserParams {
            user_id,
            username: body.username,
            name: body.name,
            bio: body.bio,
            image: body.image,
            path: body.path,
        })
        .await?;

    Ok(Json(UpdateUserResponse {
        created: outcome.created,
        revalidated: outcome.revalidated,
    }))
}

// ─── Profile Fetch ───────────────────────────────────────────

/// Get a user profile by external id.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<User>> {
    let user = state
        .users
        .fetch_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(user))
}

/// Get a user with their threads and replies expanded.
async fn get_user_posts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserPosts>> {
    let posts = state
        .users
        .fetch_user_posts(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(posts))
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct UsersQuery {
    /// Requesting user, excluded from the results
    user_id: String,
    /// Substring to match against username or name
    #[serde(default)]
    q: String,
    /// Pagination: page number (1-indexed; lower values are treated as 1)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
    /// Sort by creation time: "asc" or "desc"
    sort: Option<String>,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Search response: one page of users plus the has-more flag.
#[derive(Serialize)]
pub struct SearchUsersResponse {
    pub users: Vec<User>,
    pub is_next: bool,
}

/// Paginated user search.
async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<SearchUsersResponse>> {
    if query.per_page == 0 || query.per_page > MAX_PER_PAGE {
        return Err(AppError::BadRequest(format!(
            "per_page must be between 1 and {}",
            MAX_PER_PAGE
        )));
    }

    let sort = query
        .sort
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()?
        .unwrap_or_default();

    let page = state
        .users
        .fetch_users(&UserSearchParams {
            user_id: query.user_id,
            search_string: query.q,
            page_number: query.page,
            page_size: query.per_page,
            sort,
        })
        .await?;

    Ok(Json(SearchUsersResponse {
        users: page.users,
        is_next: page.is_next,
    }))
}

// ─── Activity ────────────────────────────────────────────────

/// Replies other users left on this user's threads, newest first.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Reply>>> {
    let replies = state.users.get_activity(&user_id).await?;
    Ok(Json(replies))
}
