use super::{outcome_notice, PurgeClient};
use crate::{queue::NoticeQueue, roles::Roles, store::OptionStore};
use axum::{
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const UNAUTHENTICATED: &str = "unauthenticated";

/// Where the browser goes once the action is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        let location = HeaderValue::from_str(&self.location).unwrap_or_else(|_| {
            warn!("Redirect target {:?} is not a valid header, using /", self.location);
            HeaderValue::from_static("/")
        });
        (StatusCode::FOUND, [(LOCATION, location)]).into_response()
    }
}

pub struct PurgeTrigger<C, S> {
    client: C,
    queue: Arc<NoticeQueue<S>>,
}

impl<C: PurgeClient, S: OptionStore> PurgeTrigger<C, S> {
    pub fn new(client: C, queue: Arc<NoticeQueue<S>>) -> Self {
        Self { client, queue }
    }

    pub fn queue(&self) -> &Arc<NoticeQueue<S>> {
        &self.queue
    }

    /// Purges the remote cache on behalf of `roles` and sends them back to
    /// `referer`. Every outcome, including a refused role check, ends in a
    /// redirect; failures surface as queued notices.
    pub async fn purge(&self, roles: &Roles, referer: &str) -> Redirect {
        if !roles.can_purge() {
            warn!("Refusing purge for roles [{roles}]");
            return Redirect::to(append_query(referer, "error", UNAUTHENTICATED));
        }

        let outcome = self.client.purge().await;
        match &outcome {
            Ok(message) => info!("Scout cache purged: {message}"),
            Err(e) => warn!("Scout cache purge failed: {e:?}"),
        }

        if let Err(e) = self.queue.enqueue(outcome_notice(outcome)).await {
            error!("Failed to queue purge notice: {e}");
        }
        Redirect::to(referer)
    }
}

/// Appends `key=value` to the query of `url`, keeping any fragment last.
pub fn append_query(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let separator = match base.find('?') {
        None => "?",
        Some(_) if base.ends_with('?') || base.ends_with('&') => "",
        Some(_) => "&",
    };
    let mut out = format!("{base}{separator}{key}={value}");
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
