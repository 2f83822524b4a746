//! User management API handlers
//!
//! Listing and detail endpoints for the operator dashboards. Routed
//! behind both the authentication gate and the privileged-role guard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::api::dto::{ApiResponse, ListUsersParams, PaginatedResponse, UserDto};
use crate::infrastructure::database::entities::user::{self, UserRole};

/// State for the user management handlers
#[derive(Clone)]
pub struct UserHandlerState {
    pub db: DatabaseConnection,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "Account list", body = PaginatedResponse<UserDto>),
        (status = 400, description = "Unknown role filter"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a privileged role")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PaginatedResponse<UserDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let page = params.page.max(1);
    let page_size = params.page_size.clamp(1, 100);

    let role_filter = match params.role.as_deref() {
        Some(raw) => match UserRole::parse(raw) {
            Some(role) => Some(role),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("Unknown role '{}'", raw))),
                ));
            }
        },
        None => None,
    };

    let mut query = user::Entity::find();

    if let Some(ref search) = params.search {
        query = query.filter(
            user::Column::FirstName
                .contains(search)
                .or(user::Column::LastName.contains(search))
                .or(user::Column::Email.contains(search)),
        );
    }
    if let Some(role) = role_filter {
        query = query.filter(user::Column::Role.eq(role));
    }

    query = query.order_by_desc(user::Column::CreatedAt);

    let total = query.clone().count(&state.db).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let offset = ((page - 1) * page_size) as u64;
    let models = query
        .offset(offset)
        .limit(page_size as u64)
        .all(&state.db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        })?;

    let items: Vec<UserDto> = models.into_iter().map(UserDto::from).collect();

    Ok(Json(PaginatedResponse::new(items, total, page, page_size)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let model = user::Entity::find_by_id(&id)
        .one(&state.db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        })?;

    match model {
        Some(model) => Ok(Json(ApiResponse::success(UserDto::from(model)))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("User '{}' not found", id))),
        )),
    }
}
