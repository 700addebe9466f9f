// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server for the todo application.
//!
//! This is a thin adapter that converts HTTP requests to `FormRequest`,
//! calls `Dispatcher::dispatch()`, and converts the result back to HTTP.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use formwire::adapter::{is_enhanced, SubmissionMode};
use formwire::{Dispatch, Dispatcher, FormRequest, FormwireError, FormwireResponse, SessionKey};
use serde_json::json;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::body_parser::to_form_request;
use crate::app::pages::{self, PendingStates};
use crate::app::{TodoActions, TodoApp};

/// Path for structured JSON calls.
pub const CALL_PATH: &str = "/_formwire/call";

/// Shared state for the HTTP handlers.
pub struct AppState {
    /// Action dispatcher; owns the todo store through its application state.
    pub dispatcher: Dispatcher<TodoApp>,
    /// References for embedding actions in pages.
    pub actions: TodoActions,
    /// Shown as the page title.
    pub project_name: String,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

/// Builds the axum router.
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route(CALL_PATH, post(submit_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn run(addr: &str, state: Arc<AppState>, static_dir: &Path) -> anyhow::Result<()> {
    let app = build_router(state, static_dir);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn index_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let form = match to_form_request(request, state.max_body_bytes).await {
        Ok(form) => form,
        Err(e) => return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response(),
    };
    let (session, issued) = session_for(&form);
    let response = render_page(&state, session.clone(), StatusCode::OK).await;
    with_session_cookie(response, &session, issued)
}

async fn submit_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let form = match to_form_request(request, state.max_body_bytes).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "rejected oversized submission");
            return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response();
        }
    };
    let (session, issued) = session_for(&form);
    let wants_json = form.is_json() || is_enhanced(&form);

    let response = match state.dispatcher.dispatch(&form, &session).await {
        Ok(Dispatch::Navigate(directive)) => into_axum(directive.into_response()),
        Ok(Dispatch::Rerender {
            action_id,
            mode: SubmissionMode::Enhanced,
            status,
        }) => {
            let body = state
                .dispatcher
                .take_state(&action_id, &session)
                .map(|action_state| serde_json::to_value(&action_state));
            match body {
                Some(Ok(body)) => into_axum(FormwireResponse::json(status, body)),
                Some(Err(e)) => {
                    error!(error = %e, "failed to serialize action state");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                None => into_axum(FormwireResponse::json(status, serde_json::Value::Null)),
            }
        }
        Ok(Dispatch::Rerender {
            mode: SubmissionMode::Native,
            status,
            ..
        }) => render_page(&state, session.clone(), status_code(status)).await,
        Err(err) => error_response(&err, wants_json),
    };

    with_session_cookie(response, &session, issued)
}

/// Reads the session key, or issues a new one.
fn session_for(request: &FormRequest) -> (SessionKey, bool) {
    match SessionKey::from_request(request) {
        Some(session) => (session, false),
        None => (SessionKey::generate(), true),
    }
}

fn with_session_cookie(mut response: Response, session: &SessionKey, issued: bool) -> Response {
    if issued {
        if let Ok(value) = HeaderValue::from_str(&session.set_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

async fn render_page(state: &AppState, session: SessionKey, status: StatusCode) -> Response {
    // Consumed up front so a failed load does not leave state behind.
    let ctx = state.dispatcher.render_context(session);
    let pending = PendingStates::take(&ctx, &state.actions);

    let response = match state.dispatcher.state().store.list().await {
        Ok(todos) => {
            let html = pages::render_index(&state.project_name, &todos, &state.actions, &pending);
            FormwireResponse::html(status.as_u16(), html)
        }
        Err(e) => {
            error!(error = %e, "failed to load todos");
            FormwireResponse::error(500, "Could not load todos.")
        }
    };
    into_axum(response)
}

fn error_response(err: &FormwireError, wants_json: bool) -> Response {
    let status = err.status();
    let response = if wants_json {
        FormwireResponse::json(status, json!({ "type": "error", "status": status, "message": err.to_string() }))
    } else {
        FormwireResponse::error(status, err.to_string())
    };
    into_axum(response)
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Convert FormwireResponse to axum Response
fn into_axum(response: FormwireResponse) -> Response {
    let (status, headers, content_type, body) = match response {
        FormwireResponse::Html { status, headers, body } => {
            (status, headers, Some("text/html; charset=utf-8"), Body::from(body))
        }
        FormwireResponse::Json { status, headers, body } => (
            status,
            headers,
            Some("application/json"),
            Body::from(serde_json::to_string(&body).unwrap_or_default()),
        ),
        FormwireResponse::Redirect {
            status,
            location,
            mut headers,
        } => {
            headers.insert("location".to_string(), location);
            (status, headers, None, Body::empty())
        }
        FormwireResponse::Error { status, message } => return error_page(status_code(status), &message),
    };

    let mut builder = Response::builder().status(status_code(status));
    for (key, value) in headers {
        builder = builder.header(key, value);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder.body(body).unwrap_or_else(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response()
    })
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {code}</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <h1>Error {code}</h1>
    <p class="error">{message}</p>
    <p><a href="/">Back to the list</a></p>
</body>
</html>"#,
        code = status.as_u16(),
        message = formwire::escape_html(message)
    );
    (status, Html(html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app;
    use crate::config::ActionsConfig;
    use crate::store::TodoStore;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_failed_list_still_consumes_pending_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = TodoStore::open(dir.path()).unwrap();
        let (dispatcher, actions) = app::build(store, &ActionsConfig::default()).unwrap();
        let state = Arc::new(AppState {
            dispatcher,
            actions,
            project_name: "todos".to_string(),
            max_body_bytes: 1024,
        });

        // Break the store behind its back so listing fails.
        let conn = rusqlite::Connection::open(dir.path().join("todos.db")).unwrap();
        conn.execute("DROP TABLE todos", []).unwrap();

        let body = format!("{}=&title=ab", state.actions.add.hidden_field_name().replace('$', "%24"));
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::COOKIE, "formwire_session=s1")
            .body(Body::from(body))
            .unwrap();
        let response = build_router(Arc::clone(&state), dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.dispatcher.channel().is_empty());
    }

    #[tokio::test]
    async fn test_html_errors_use_error_page() {
        let response = error_response(&FormwireError::MalformedRequest("missing action identifier".into()), false);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/html; charset=utf-8")
        );
    }
}
