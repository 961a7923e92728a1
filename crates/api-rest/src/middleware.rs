//! Client access control.
//!
//! Compares the peer address with the optional allow-listed IP before any triage handler runs,
//! so a rejected client never triggers an upstream call.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use api_shared::validate_client_ip;

use crate::error::ApiError;
use crate::AppState;

/// Reject requests from any client other than the configured one.
///
/// The peer address comes from `ConnectInfo`, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`. Without it the client is unknown and
/// is rejected whenever an allow-list is configured.
pub async fn require_allowed_ip(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Response {
    let client = connect_info.map(|ConnectInfo(addr)| addr.ip());

    match validate_client_ip(state.allowed_ip, client) {
        Ok(()) => next.run(req).await,
        Err(denied) => ApiError::from(denied).into_response(),
    }
}
