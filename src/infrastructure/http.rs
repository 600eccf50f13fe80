//! # HTTP Surface
//!
//! `GET /` serves the input form; `POST /` runs the submitted `command` field
//! and answers with the transcript as plain text.

use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::application::session::Session;
use crate::strings::templates;

#[derive(Debug, Deserialize)]
pub struct CommandForm {
    #[serde(default)]
    pub command: String,
}

pub fn router(session: Arc<Session>) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(session)
}

async fn index() -> Html<&'static str> {
    Html(templates::INDEX_PAGE)
}

async fn submit(
    State(session): State<Arc<Session>>,
    form: Result<Form<CommandForm>, FormRejection>,
) -> impl IntoResponse {
    // An unreadable form is the same as an empty `command` field
    let command = match form {
        Ok(Form(form)) => form.command,
        Err(rejection) => {
            debug!("form rejected, treating as empty input: {rejection}");
            String::new()
        }
    };
    let output = session.handle(&command).await;
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], output)
}
