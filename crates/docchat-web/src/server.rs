//! HTTP routes and handlers

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use docchat_core::{ChatMessage, Result};
use docchat_rag::{AskOutcome, NOT_INITIALIZED_WARNING};

use crate::context::AppContext;
use crate::error::WebError;
use crate::page::{PageView, render_page};

pub const SESSION_COOKIE: &str = "docchat_session";

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub generated_question: String,
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub ready: bool,
    pub chat_history: Vec<ChatMessage>,
}

pub fn create_app(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ask", post(ask_form_handler))
        .route("/reset", post(reset_handler))
        .route("/api/ask", post(api_ask_handler))
        .route("/api/history", get(api_history_handler))
        .route("/health", get(health_handler))
        .with_state(ctx)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(ctx: Arc<AppContext>, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("docchat listening on http://{}", addr);
    }

    axum::serve(listener, create_app(ctx))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// The session id from the cookie, issuing a new one when absent
fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = cookie.value().to_string();
        return (jar, id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

fn page(ctx: &AppContext, history: &[ChatMessage], warning: Option<&str>) -> Html<String> {
    Html(render_page(&PageView {
        text: &ctx.config().page,
        logo: ctx.logo(),
        history,
        warning,
    }))
}

async fn index_handler(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
) -> std::result::Result<(CookieJar, Html<String>), WebError> {
    let (jar, id) = session_id(jar);
    let session = ctx.open_session(&id).await?;
    let session = session.lock().await;

    Ok((jar, page(&ctx, session.history(), None)))
}

async fn ask_form_handler(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
    Form(request): Form<AskRequest>,
) -> std::result::Result<(CookieJar, Html<String>), WebError> {
    let (jar, id) = session_id(jar);
    let session = ctx.open_session(&id).await?;
    let mut session = session.lock().await;

    let question = request.question.trim();
    let warning = if question.is_empty() {
        None
    } else {
        session.ask(question).await?.warning()
    };

    Ok((jar, page(&ctx, session.history(), warning)))
}

async fn reset_handler(State(ctx): State<Arc<AppContext>>, jar: CookieJar) -> Redirect {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        ctx.reset(cookie.value()).await;
    }
    Redirect::to("/")
}

async fn api_ask_handler(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
    Json(request): Json<AskRequest>,
) -> std::result::Result<Response, WebError> {
    let (jar, id) = session_id(jar);

    let outcome = match ctx.existing(&id).await {
        Some(session) => {
            let mut session = session.lock().await;
            let outcome = session.ask(request.question.trim()).await?;
            outcome
        }
        None => {
            tracing::warn!("question submitted without an open session");
            AskOutcome::NotInitialized
        }
    };

    let response = match outcome {
        AskOutcome::Answered(output) => Json(AskResponse {
            answer: output.answer,
            generated_question: output.generated_question,
            chat_history: output.chat_history,
        })
        .into_response(),
        AskOutcome::NotInitialized => (
            StatusCode::CONFLICT,
            Json(json!({ "warning": NOT_INITIALIZED_WARNING })),
        )
            .into_response(),
    };

    Ok((jar, response).into_response())
}

async fn api_history_handler(
    State(ctx): State<Arc<AppContext>>,
    jar: CookieJar,
) -> (CookieJar, Json<HistoryResponse>) {
    let (jar, id) = session_id(jar);

    let response = match ctx.existing(&id).await {
        Some(session) => {
            let session = session.lock().await;
            HistoryResponse {
                ready: session.is_ready(),
                chat_history: session.history().to_vec(),
            }
        }
        None => HistoryResponse {
            ready: false,
            chat_history: Vec::new(),
        },
    };
    (jar, Json(response))
}

async fn health_handler(State(ctx): State<Arc<AppContext>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "sessions": ctx.session_count().await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_cookie_is_reused() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "abc"));
        let (_, id) = session_id(jar);
        assert_eq!(id, "abc");
    }

    #[test]
    fn test_new_cookie_is_issued() {
        let (jar, id) = session_id(CookieJar::new());
        let cookie = jar.get(SESSION_COOKIE).unwrap();

        assert_eq!(cookie.value(), id);
        assert_eq!(cookie.http_only(), Some(true));
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}
