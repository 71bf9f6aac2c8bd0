//! HTTP handlers for the user resource

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};

use crate::{
    error::Result,
    responses::{PageEnvelope, StatusMessage},
    state::AppState,
};

use super::{model, query::UserQueryParams};

/// `?id=` parameter shared by the single-user endpoints
#[derive(Debug, Default, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

/// Raw `key=value` pairs in query-string order
pub type QueryPairs = std::result::Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Project query pairs onto `T`
///
/// A repeated key keeps its first value. A query string that cannot be
/// decoded is treated like an empty one.
pub fn first_values<T: DeserializeOwned + Default>(query: QueryPairs) -> T {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Query string rejected, using defaults");
            return T::default();
        }
    };

    let mut fields = Map::new();
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }

    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Query parameters rejected, using defaults");
        T::default()
    })
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    let users = state.users().list_all().await?;
    Ok(Json(users.iter().map(model::encode).collect()))
}

/// POST /users/create
pub async fn create_user(State(state): State<AppState>, body: Bytes) -> Result<StatusMessage> {
    let id = state.users().create(&body).await?;
    Ok(StatusMessage::success("User created successfully").with_id(id))
}

/// GET /users/get and GET /users/find
pub async fn get_user(State(state): State<AppState>, query: QueryPairs) -> Result<Json<Value>> {
    let params: IdParams = first_values(query);
    let user = state.users().get(params.id.as_deref()).await?;
    Ok(Json(model::encode(&user)))
}

/// PUT /users/update
pub async fn update_user(
    State(state): State<AppState>,
    query: QueryPairs,
    body: Bytes,
) -> Result<StatusMessage> {
    let params: IdParams = first_values(query);
    state.users().update(params.id.as_deref(), &body).await?;
    Ok(StatusMessage::success("User updated successfully"))
}

/// DELETE /users/delete
pub async fn delete_user(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Result<StatusMessage> {
    let params: IdParams = first_values(query);
    state.users().delete(params.id.as_deref()).await?;
    Ok(StatusMessage::success("User deleted successfully"))
}

/// GET /users/filter
pub async fn filter_users(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Result<PageEnvelope<Value>> {
    let params: UserQueryParams = first_values(query);
    let page = state.users().filtered_list(&params).await?;
    Ok(page.map(|user| model::encode(&user)))
}
