use super::{page, referer, AdminState};
use crate::{purge::PurgeClient, store::OptionStore};
use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

pub const PURGE_ACTION: &str = "cloudabove_scout_purge_cache";

#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
    #[serde(rename = "_wp_http_referer", alias = "_wp_http_referrer")]
    pub referer: Option<String>,
}

pub async fn action_handler<C: PurgeClient, S: OptionStore>(
    Extension(state): Extension<Arc<AdminState<C, S>>>,
    Query(query): Query<ActionQuery>,
    headers: HeaderMap,
) -> Response {
    if query.action.as_deref() != Some(PURGE_ACTION) {
        warn!("Unknown admin action {:?}", query.action);
        return (StatusCode::NOT_FOUND, "Unknown action").into_response();
    }

    let referer = referer::resolve_referer(query.referer.as_deref(), &headers);

    let roles = state.roles(&headers);
    state
        .trigger()
        .purge(&roles, &referer)
        .await
        .into_response()
}

pub async fn index_handler<C: PurgeClient, S: OptionStore>(
    Extension(state): Extension<Arc<AdminState<C, S>>>,
    headers: HeaderMap,
) -> Html<String> {
    // Neither the toolbar nor the notices are shown to non administrators.
    if !state.roles(&headers).can_purge() {
        return Html(page::render_page(None, &[]));
    }

    let notices = match state.queue().drain_and_render().await {
        Ok(notices) => notices,
        Err(e) => {
            error!("Failed to drain notices: {e}");
            Vec::new()
        }
    };
    let toolbar = page::render_toolbar(&referer::resolve_referer(None, &headers));
    Html(page::render_page(Some(&toolbar), &notices))
}

pub async fn notices_handler<C: PurgeClient, S: OptionStore>(
    Extension(state): Extension<Arc<AdminState<C, S>>>,
    headers: HeaderMap,
) -> Response {
    if !state.roles(&headers).can_purge() {
        return StatusCode::FORBIDDEN.into_response();
    }
    match state.queue().drain().await {
        Ok(notices) => Json(notices).into_response(),
        Err(e) => {
            error!("Failed to drain notices: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
