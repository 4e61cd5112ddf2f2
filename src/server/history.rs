//! Read-only REST surface for message history.
//!
//! Independent of live connection state and unauthenticated: the chat path
//! works with client-asserted nicknames, not session identities.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::store::PersistedMessageRecord;

use super::state::AppState;

const DEFAULT_PUBLIC_LIMIT: i64 = 50;
const DEFAULT_PRIVATE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct PublicHistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PrivateHistoryQuery {
    pub me: Option<String>,
    #[serde(rename = "with")]
    pub with_nickname: Option<String>,
    pub limit: Option<i64>,
}

/// `GET /public-history?limit=` — the last N public messages, chronological
/// ascending.
pub async fn public_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PublicHistoryQuery>,
) -> Result<Json<Vec<PersistedMessageRecord>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_PUBLIC_LIMIT);
    match state.store.public_history(limit).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!("public history query failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// `GET /private-history?me=&with=&limit=` — the conversation between two
/// nicknames in either direction, chronological ascending.
///
/// A missing identity parameter yields an empty array rather than an error:
/// the UI calls this defensively before a conversation partner is picked.
pub async fn private_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PrivateHistoryQuery>,
) -> Result<Json<Vec<PersistedMessageRecord>>, StatusCode> {
    let (Some(me), Some(other)) = (query.me, query.with_nickname) else {
        return Ok(Json(Vec::new()));
    };

    let limit = query.limit.unwrap_or(DEFAULT_PRIVATE_LIMIT);
    match state.store.private_history(&me, &other, limit).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!("private history query failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
