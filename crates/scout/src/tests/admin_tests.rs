#[cfg(test)]
mod tests {
    use crate::{
        admin::{router, AdminState},
        config::DEFAULT_ROLES_HEADER,
        notice::Notice,
        purge::PurgeError,
        store::MemoryOptionStore,
        tests::{memory_queue, setup_logger, StubClient},
    };
    use anyhow::Result;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(client: Arc<StubClient>) -> (Router, Arc<AdminState<Arc<StubClient>, MemoryOptionStore>>) {
        let state = Arc::new(AdminState::new(client, memory_queue(), DEFAULT_ROLES_HEADER).unwrap());
        (router(state.clone()), state)
    }

    fn request(uri: &str, roles: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(DEFAULT_ROLES_HEADER, roles)
            .header(header::HOST, "example.com")
            .header(header::REFERER, "https://example.com/wp-admin/index.php")
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_ping() -> Result<()> {
        let (app, _) = app(Arc::new(StubClient::default()));
        let response = app.oneshot(request("/ping", "")).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "pong");
        Ok(())
    }

    #[tokio::test]
    async fn test_unauthenticated_purge_redirects() -> Result<()> {
        setup_logger();
        let client = Arc::new(StubClient::default());
        let (app, state) = app(client.clone());

        let response = app
            .oneshot(request("/admin-post.php?action=cloudabove_scout_purge_cache", "editor"))
            .await?;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            "https://example.com/wp-admin/index.php?error=unauthenticated"
        );
        assert_eq!(client.calls(), 0);
        assert!(state.queue().pending().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_both_action_routes_purge() -> Result<()> {
        let client = Arc::new(StubClient::default());
        let (app, state) = app(client.clone());

        let post = Request::builder()
            .method(Method::POST)
            .uri("/admin-post.php?action=cloudabove_scout_purge_cache&_wp_http_referer=%2Fwp-admin%2Fedit.php")
            .header(DEFAULT_ROLES_HEADER, "administrator")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(post).await?;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/wp-admin/edit.php");

        let response = app
            .oneshot(request("/admin.php?action=cloudabove_scout_purge_cache", "administrator"))
            .await?;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://example.com/wp-admin/index.php");

        assert_eq!(client.calls(), 2);
        assert_eq!(state.queue().pending().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_action_is_not_found() -> Result<()> {
        let client = Arc::new(StubClient::default());
        let (app, _) = app(client.clone());

        for uri in ["/admin-post.php?action=something_else", "/admin-post.php"] {
            let response = app.clone().oneshot(request(uri, "administrator")).await?;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        assert_eq!(client.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_notice_shown_once_after_redirect() -> Result<()> {
        let client = Arc::new(StubClient::answering(Err(PurgeError::Rejected {
            status: 503,
            message: "service unavailable".to_string(),
        })));
        let (app, _) = app(client);

        app.clone()
            .oneshot(request("/admin-post.php?action=cloudabove_scout_purge_cache", "administrator"))
            .await?;

        let page = body_string(app.clone().oneshot(request("/", "administrator")).await?).await;
        assert!(page.contains("Refresh Scout cache"));
        assert!(page.contains(
            r#"<div class="notice notice-error is-dismissible"><p>Error: service unavailable</p></div>"#
        ));

        let page = body_string(app.oneshot(request("/", "administrator")).await?).await;
        assert!(!page.contains("notice-error"));
        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_page_keeps_notices() -> Result<()> {
        let (app, state) = app(Arc::new(StubClient::default()));
        state.queue().enqueue(Notice::success("purged")).await?;

        let page = body_string(app.oneshot(request("/", "editor")).await?).await;
        assert!(!page.contains("Refresh Scout cache"));
        assert!(!page.contains("purged"));
        assert_eq!(state.queue().pending().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_notices_endpoint_drains() -> Result<()> {
        let (app, state) = app(Arc::new(StubClient::default()));
        state.queue().enqueue(Notice::success("purged 3 pages")).await?;

        let response = app.clone().oneshot(request("/notices", "subscriber")).await?;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.clone().oneshot(request("/notices", "administrator")).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = serde_json::from_str(&body_string(response).await)?;
        assert_eq!(value[0]["message"], "purged 3 pages");
        assert_eq!(value[0]["severity"], "success");

        let response = app.oneshot(request("/notices", "administrator")).await?;
        assert_eq!(body_string(response).await, "[]");
        Ok(())
    }

    async fn purge_redirect(app: Router, referer_query: &str, referer_header: Option<&str>) -> String {
        let mut builder = Request::builder()
            .uri(format!(
                "/admin-post.php?action=cloudabove_scout_purge_cache&_wp_http_referer={referer_query}"
            ))
            .header(DEFAULT_ROLES_HEADER, "administrator")
            .header(header::HOST, "example.com");
        if let Some(referer) = referer_header {
            builder = builder.header(header::REFERER, referer);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        location(&response).to_string()
    }

    #[tokio::test]
    async fn test_off_site_referer_is_not_followed() -> Result<()> {
        let client = Arc::new(StubClient::default());
        let (app, state) = app(client.clone());

        for hostile in [
            "https%3A%2F%2Fevil.example%2Fphish",
            "%2F%2Fevil.example%2Fphish",
            "%2F%5Cevil.example",
            "javascript%3Aalert(1)",
        ] {
            assert_eq!(purge_redirect(app.clone(), hostile, None).await, "/");
            assert_eq!(
                purge_redirect(
                    app.clone(),
                    hostile,
                    Some("https://example.com/wp-admin/index.php")
                )
                .await,
                "https://example.com/wp-admin/index.php"
            );
        }

        // A hostile Referer header is not followed either.
        assert_eq!(
            purge_redirect(app.clone(), "", Some("https://evil.example/phish")).await,
            "/"
        );

        // Same host, absolute url.
        assert_eq!(
            purge_redirect(app, "https%3A%2F%2Fexample.com%2Fwp-admin%2Fedit.php", None).await,
            "https://example.com/wp-admin/edit.php"
        );

        assert_eq!(client.calls(), 10);
        assert_eq!(state.queue().pending().await?.len(), 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_control_characters_in_referer_still_redirect() -> Result<()> {
        let client = Arc::new(StubClient::default());
        let (app, state) = app(client.clone());

        let target = purge_redirect(app.clone(), "%2Fwp-admin%2F%0D%0AX-Injected%3A1", None).await;
        assert_eq!(target, "/");

        let target = purge_redirect(app, "%2Fwp-admin%2F%0D%0AX-Injected%3A1", Some("/wp-admin/")).await;
        assert_eq!(target, "/wp-admin/");

        assert_eq!(state.queue().pending().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_referer_falls_back() -> Result<()> {
        let (app, _) = app(Arc::new(StubClient::default()));
        assert_eq!(purge_redirect(app.clone(), "", None).await, "/");
        assert_eq!(
            purge_redirect(app, "", Some("/wp-admin/plugins.php")).await,
            "/wp-admin/plugins.php"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unauthenticated_redirect_stays_on_site() -> Result<()> {
        let client = Arc::new(StubClient::default());
        let (app, _) = app(client.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin-post.php?action=cloudabove_scout_purge_cache&_wp_http_referer=https%3A%2F%2Fevil.example%2F")
                    .header(DEFAULT_ROLES_HEADER, "editor")
                    .header(header::HOST, "example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await?;
        assert_eq!(location(&response), "/?error=unauthenticated");
        assert_eq!(client.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_toolbar_returns_to_current_referer() -> Result<()> {
        let (app, _) = app(Arc::new(StubClient::default()));
        let page = body_string(app.oneshot(request("/", "administrator")).await?).await;
        assert!(page.contains(
            "_wp_http_referer=https%3A%2F%2Fexample.com%2Fwp-admin%2Findex.php"
        ));
        Ok(())
    }
}
