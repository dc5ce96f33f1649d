use crate::config::Config;
use crate::forms::{
    ApplicationRequest, QuoteRequest, APPLICATION_REQUIRED_MSG, QUOTE_REQUIRED_MSG,
};
use crate::mailer::{Attachment, Mailer, MailerError, OutboundEmail};
use crate::spam::SpamGuard;
use crate::template;
use crate::validate;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    guard: Arc<SpamGuard>,
    mailer: Option<Arc<Mailer>>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let guard = SpamGuard::new(&config.rules).context("failed to build spam guard")?;
        let mailer = match &config.api_key {
            Some(key) => Some(Arc::new(
                Mailer::new(&config.mail_api_url, key).context("failed to build mail client")?,
            )),
            None => {
                log::warn!("No mail API key configured; every submission will fail with 500");
                None
            }
        };
        Ok(AppState {
            config: Arc::new(config),
            guard: Arc::new(guard),
            mailer,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    // Handlers own the method check so non-POST gets the documented JSON
    // body instead of axum's bare 405.
    Router::new()
        .route("/api/quote", any(quote_handler))
        .route("/api/contact", any(quote_handler))
        .route("/api/apply", any(apply_handler))
        .with_state(state)
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    log::info!("leadgate listening on {listen_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutdown signal received");
        })
        .await
        .context("server error")?;
    Ok(())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn success() -> Response {
    (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}

/// Shared entry gates: method, mail configuration, body parse. Returns the
/// parsed body or the early response.
fn entry_gates<T: serde::de::DeserializeOwned>(
    state: &AppState,
    method: &Method,
    body: &Bytes,
) -> Result<(T, Arc<Mailer>), Response> {
    if *method != Method::POST {
        return Err(json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"));
    }

    let mailer = match &state.mailer {
        Some(mailer) => Arc::clone(mailer),
        None => {
            log::error!("Rejecting submission: mail API key is not configured");
            return Err(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error.",
            ));
        }
    };

    let parsed = serde_json::from_slice::<T>(body)
        .map_err(|e| {
            log::debug!("Unparseable request body: {e}");
            json_error(StatusCode::BAD_REQUEST, "Invalid JSON body")
        })?;

    Ok((parsed, mailer))
}

/// Maps a mail-provider outcome to the caller-facing response. Upstream
/// details go to the log, never to the caller.
fn send_outcome(result: Result<(), MailerError>, form: &str) -> Response {
    match result {
        Ok(()) => {
            log::info!("Forwarded {form} submission to inbox");
            success()
        }
        Err(MailerError::Upstream { status, body }) => {
            log::warn!("Mail API rejected {form} submission: status={status} body={body}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message.")
        }
        Err(MailerError::Transport(e)) => {
            log::warn!("Mail API unreachable for {form} submission: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message.")
        }
    }
}

async fn quote_handler(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let (request, mailer) = match entry_gates::<QuoteRequest>(&state, &method, &body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    if !request.has_required_fields() {
        return json_error(StatusCode::BAD_REQUEST, QUOTE_REQUIRED_MSG);
    }

    let verdict = state.guard.evaluate(&request.to_submission(), now_epoch_ms());
    if verdict.blocked {
        // Deliberate: the caller sees success so automated senders get no
        // feedback to tune against. Operators audit block rates here.
        log::info!(
            "Silently dropped quote submission: reason={}",
            verdict.reason.map(|r| r.to_string()).unwrap_or_default()
        );
        return success();
    }

    let reply_to = request
        .email
        .as_deref()
        .map(validate::normalize_email)
        .filter(|e| validate::is_valid_email(e));

    let email = OutboundEmail {
        from: state.config.from_address.clone(),
        to: vec![state.config.quote_email.clone()],
        reply_to,
        subject: template::quote_subject(&request),
        html: template::render_quote_email(&request),
        attachments: Vec::new(),
    };

    send_outcome(mailer.send(&email).await, "quote")
}

async fn apply_handler(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let (mut request, mailer) = match entry_gates::<ApplicationRequest>(&state, &method, &body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    if !request.has_required_fields() {
        return json_error(StatusCode::BAD_REQUEST, APPLICATION_REQUIRED_MSG);
    }

    // The application form reuses the client-side validators server-side;
    // shape failures here are caller errors, not spam signals.
    let name = validate::normalize_name(request.name.as_deref().unwrap_or(""));
    let email = validate::normalize_email(request.email.as_deref().unwrap_or(""));
    if !validate::is_valid_name(&name)
        || !validate::is_valid_phone(request.phone.as_deref().unwrap_or(""))
        || !validate::is_valid_email(&email)
    {
        return json_error(
            StatusCode::BAD_REQUEST,
            "A valid name, phone, and email are required.",
        );
    }
    request.name = Some(name);
    request.email = Some(email.clone());

    let verdict = state.guard.evaluate(&request.to_submission(), now_epoch_ms());
    if verdict.blocked {
        log::info!(
            "Silently dropped application submission: reason={}",
            verdict.reason.map(|r| r.to_string()).unwrap_or_default()
        );
        return success();
    }

    let attachments = resume_attachment(&request);
    let email_body = template::render_application_email(&request, !attachments.is_empty());
    let outbound = OutboundEmail {
        from: state.config.from_address.clone(),
        to: vec![state.config.application_email.clone()],
        reply_to: Some(email),
        subject: template::application_subject(&request),
        html: email_body,
        attachments,
    };

    send_outcome(mailer.send(&outbound).await, "application")
}

/// Forwards the resume only if the payload is actually base64; a corrupt
/// attachment should not sink an otherwise valid application.
fn resume_attachment(request: &ApplicationRequest) -> Vec<Attachment> {
    let Some(content) = request.resume_base64.as_deref().filter(|c| !c.is_empty()) else {
        return Vec::new();
    };
    if general_purpose::STANDARD.decode(content).is_err() {
        log::warn!("Dropping resume attachment: payload is not valid base64");
        return Vec::new();
    }
    vec![Attachment {
        filename: request
            .resume_filename
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| "resume".to_string()),
        content: content.to_string(),
    }]
}
