mod admin_tests;

use crate::{
    purge::{PurgeClient, PurgeError},
    queue::NoticeQueue,
    store::MemoryOptionStore,
};
use async_trait::async_trait;
use axum::{
    http::{header::ACCEPT, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

pub fn setup_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub fn memory_queue() -> Arc<NoticeQueue<MemoryOptionStore>> {
    Arc::new(NoticeQueue::new(MemoryOptionStore::new()))
}

/// A stand-in for the Scout API listening on a random local port.
pub struct MockScout {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    accept: Arc<Mutex<Option<String>>>,
}

impl MockScout {
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    pub async fn start_with_delay(status: StatusCode, body: &'static str, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let accept = Arc::new(Mutex::new(None));
        let (counter, seen_accept) = (hits.clone(), accept.clone());
        let app = Router::new().route(
            "/api/cache/purge",
            get(move |headers: HeaderMap| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                *seen_accept.lock().unwrap() = headers
                    .get(ACCEPT)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                tokio::time::sleep(delay).await;
                (status, body)
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
        });

        Self {
            base_url: format!("http://{addr}/api/"),
            hits,
            accept,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_accept(&self) -> Option<String> {
        self.accept.lock().unwrap().clone()
    }
}

/// A base url nothing listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/")
}

/// Replays a fixed outcome and counts calls.
#[derive(Default)]
pub struct StubClient {
    outcome: Option<Result<String, PurgeError>>,
    calls: AtomicUsize,
}

impl StubClient {
    pub fn answering(outcome: Result<String, PurgeError>) -> Self {
        Self {
            outcome: Some(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PurgeClient for StubClient {
    async fn purge(&self) -> Result<String, PurgeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.outcome {
            Some(outcome) => outcome.clone(),
            None => Ok(format!("purge #{call}")),
        }
    }
}
