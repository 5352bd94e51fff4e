use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use parley_types::api::{CreateUserRequest, UpdateUserRequest};
use parley_types::links::{self, ActionLink};
use parley_types::models::User;

use crate::{SharedState, blocking};

/// Next-allowable-action affordances for one user.
fn with_actions(mut user: User) -> User {
    let href = links::user(&user.user_id);
    user.next_action_links = vec![
        ActionLink::self_link(href.clone()),
        ActionLink::new(href, "update-nickname", "PUT"),
    ];
    user
}

pub async fn list_users(State(state): State<SharedState>) -> Result<impl IntoResponse, StatusCode> {
    let users = state.users.clone();
    let all = blocking(move || users.list_all()).await?;
    Ok(Json(all))
}

pub async fn create_user(
    State(state): State<SharedState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let users = state.users.clone();
    let user = blocking(move || users.create(&req)).await?;
    Ok((StatusCode::CREATED, Json(with_actions(user))))
}

pub async fn retrieve_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let users = state.users.clone();
    let user = blocking(move || users.retrieve(&id)).await?;
    Ok(Json(with_actions(user)))
}

pub async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let users = state.users.clone();
    let user = blocking(move || users.update(&id, &req)).await?;
    Ok(Json(with_actions(user)))
}
