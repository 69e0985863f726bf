// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for driving the poast board router.
//!
//! Provides request helpers and payload generators shared by the
//! integration and security suites.

#![allow(dead_code)]

pub mod generators;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use poast_board::{router, AppState, Config, Poast};
use std::sync::Arc;
use tower::ServiceExt;

/// Router plus the state behind it.
pub struct TestApp {
    pub app: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let state = Arc::new(AppState::new(config).expect("metrics registry"));
        Self {
            app: router(state.clone()),
            state,
        }
    }

    /// Send a request through a clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.expect("router is infallible")
    }

    pub async fn get_poasts(&self, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri("/poast");
        if let Some(token) = token {
            builder = builder.header(header::IF_NONE_MATCH, token);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_raw(&self, body: impl Into<Body>) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/poast")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_poast(&self, username: &str, poast: &str) -> Response<Body> {
        let payload = serde_json::json!({ "Username": username, "Poast": poast });
        self.post_raw(payload.to_string()).await
    }

    /// Post and decode the returned board, asserting success.
    pub async fn post_ok(&self, username: &str, poast: &str) -> Vec<Poast> {
        let response = self.post_poast(username, poast).await;
        assert_eq!(response.status(), StatusCode::OK);
        poasts_of(response).await
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

pub async fn poasts_of(response: Response<Body>) -> Vec<Poast> {
    serde_json::from_slice(&body_bytes(response).await).expect("board is a JSON array of poasts")
}

pub fn etag_of(response: &Response<Body>) -> String {
    response.headers()[header::ETAG]
        .to_str()
        .expect("ascii etag")
        .to_string()
}
