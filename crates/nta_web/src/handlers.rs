use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use nta_core::storage::{RECIPIENT_COMMENT, RECIPIENT_KEY};
use nta_core::{PhoneNumber, Registration};
use nta_pipeline::{CancelResult, RunId};

use crate::pages::{render_form, render_success, INVALID_PHONE_MESSAGE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> nta_core::Result<Registration> {
        Ok(Registration {
            name: self.name.trim().to_string(),
            phone: PhoneNumber::parse(&self.phone)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SuccessParams {
    pub run_id: Option<String>,
}

pub async fn index() -> Html<String> {
    Html(render_form(None, "", ""))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let Registration { name, phone } = match form.validate() {
        Ok(registration) => registration,
        Err(_) => {
            warn!("📵 Rejected registration with phone {:?}", form.phone);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_form(Some(INVALID_PHONE_MESSAGE), form.name.trim(), &form.phone)),
            )
                .into_response();
        }
    };

    if let Err(e) = state
        .store
        .upsert(RECIPIENT_KEY, phone.as_str(), Some(RECIPIENT_COMMENT))
        .await
    {
        error!("❌ Failed to store recipient: {}", e);
        let message = format!("Error: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_form(Some(&message), &name, phone.as_str())),
        )
            .into_response();
    }

    let run_id = state.registry.start(&name, phone, state.query.clone());
    info!("📝 Registered {} as run {}", name, run_id);
    Redirect::to(&format!("/success?run_id={}", run_id)).into_response()
}

pub async fn success(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuccessParams>,
) -> Response {
    let snapshot = params
        .run_id
        .as_deref()
        .and_then(|raw| raw.parse::<RunId>().ok())
        .and_then(|id| state.registry.snapshot(&id));

    match snapshot {
        Some(snapshot) => {
            let run_id = snapshot.run_id.map(|id| id.to_string()).unwrap_or_default();
            Html(render_success(
                snapshot.name.as_deref().unwrap_or_default(),
                snapshot.phone.as_deref().unwrap_or_default(),
                &run_id,
            ))
            .into_response()
        }
        None => Redirect::to("/").into_response(),
    }
}

pub async fn check_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.latest())
}

fn unknown_run(raw: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Unknown run: {}", raw) })),
    )
        .into_response()
}

pub async fn run_status(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Response {
    let Ok(id) = raw.parse::<RunId>() else {
        return unknown_run(&raw);
    };
    match state.registry.snapshot(&id) {
        Some(snapshot) => Json(snapshot).into_response(),
        None => unknown_run(&raw),
    }
}

pub async fn cancel_run(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Response {
    let Ok(id) = raw.parse::<RunId>() else {
        return unknown_run(&raw);
    };
    match state.registry.cancel(&id) {
        CancelResult::Signalled => {
            (StatusCode::ACCEPTED, Json(json!({ "run_id": id, "cancelled": true }))).into_response()
        }
        CancelResult::AlreadyFinished => (
            StatusCode::CONFLICT,
            Json(json!({ "error": format!("Run {} already finished", id) })),
        )
            .into_response(),
        CancelResult::Unknown => unknown_run(&raw),
    }
}
