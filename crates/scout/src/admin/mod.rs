//! The admin surface: toolbar page, purge action and notice endpoints.

mod handler;
mod page;
mod referer;

pub use handler::{ActionQuery, PURGE_ACTION};
pub use page::{purge_action_href, render_page, render_toolbar};
pub use referer::{is_safe_referer, resolve_referer};

use crate::{
    config::ServerConfig,
    purge::{PurgeClient, PurgeTrigger},
    queue::NoticeQueue,
    roles::Roles,
    shutdown::ShutdownController,
    store::OptionStore,
};
use anyhow::{Context, Result};
use axum::{
    http::{HeaderMap, HeaderName},
    routing::get,
    Extension, Router,
};
use axum_server::Handle;
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct AdminState<C, S> {
    trigger: PurgeTrigger<C, S>,
    roles_header: HeaderName,
}

impl<C: PurgeClient, S: OptionStore> AdminState<C, S> {
    pub fn new(client: C, queue: Arc<NoticeQueue<S>>, roles_header: &str) -> Result<Self> {
        let roles_header = HeaderName::from_bytes(roles_header.as_bytes())
            .with_context(|| format!("Invalid roles header name: {roles_header}"))?;
        Ok(Self {
            trigger: PurgeTrigger::new(client, queue),
            roles_header,
        })
    }

    pub fn trigger(&self) -> &PurgeTrigger<C, S> {
        &self.trigger
    }

    pub fn queue(&self) -> &Arc<NoticeQueue<S>> {
        self.trigger.queue()
    }

    /// Roles the host platform attached to the request. Missing means none.
    pub fn roles(&self, headers: &HeaderMap) -> Roles {
        headers
            .get_all(&self.roles_header)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Roles::parse_list)
            .collect()
    }
}

pub fn router<C: PurgeClient, S: OptionStore>(state: Arc<AdminState<C, S>>) -> Router {
    Router::new()
        .route("/", get(handler::index_handler::<C, S>))
        .route(
            "/admin-post.php",
            get(handler::action_handler::<C, S>).post(handler::action_handler::<C, S>),
        )
        .route(
            "/admin.php",
            get(handler::action_handler::<C, S>).post(handler::action_handler::<C, S>),
        )
        .route("/notices", get(handler::notices_handler::<C, S>))
        .route("/ping", get(|| async { "pong" }))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server<C: PurgeClient, S: OptionStore>(
    config: &ServerConfig,
    state: Arc<AdminState<C, S>>,
    shutdown: ShutdownController,
) -> Result<()> {
    let addr = SocketAddr::from((
        config
            .addr
            .parse::<IpAddr>()
            .with_context(|| format!("Invalid binding address: {}", config.addr))?,
        config.port,
    ));

    let handle = Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown.wait_for_shutdown().await;
        info!("Shutting down admin server");
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(30)));
    });

    info!("admin server listening on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router(state).into_make_service())
        .await
        .context("admin server stopped")?;
    Ok(())
}
