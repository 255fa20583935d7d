//! Webhook routes
//!
//! Telephony transports post form-encoded webhooks; every field is
//! optional in practice, so the form struct never rejects a request.
//! A webhook with no usable call id still gets a coherent reply under
//! a synthetic id rather than a 4xx the transport would read back to
//! the caller as an error tone.

use axum::extract::{Form, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use frontdesk_agent::{Directive, TurnRequest};

use crate::state::AppState;
use crate::twiml;

const GATHER_PATH: &str = "/voice/gather";

/// Inbound webhook form; field names follow the transport's convention
#[derive(Debug, Default, Deserialize)]
pub struct VoiceWebhook {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/voice", post(voice))
        .route(GATHER_PATH, post(gather))
        .route("/health", get(health))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Initial contact. Always handled as a silent turn: the greeting is
/// the agent's silence response for a brand-new call.
async fn voice(State(state): State<AppState>, Form(webhook): Form<VoiceWebhook>) -> Response {
    run_turn(&state, webhook, None).await
}

/// Speech result callback (also re-entered on Gather timeout, with no
/// speech)
async fn gather(State(state): State<AppState>, Form(webhook): Form<VoiceWebhook>) -> Response {
    let utterance = webhook.speech_result.clone();
    run_turn(&state, webhook, utterance).await
}

async fn health(State(state): State<AppState>) -> Response {
    let body = format!(
        "ok\ncomposer: {:?}\nactive_sessions: {}",
        state.orchestrator.composer_strategy(),
        state.orchestrator.sessions().len()
    );
    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

async fn run_turn(state: &AppState, webhook: VoiceWebhook, utterance: Option<String>) -> Response {
    let call_id = webhook.call_sid.filter(|sid| !sid.is_empty()).unwrap_or_else(|| {
        let synthetic = format!("anon-{}", Uuid::new_v4());
        tracing::warn!(call_id = %synthetic, "webhook without call id");
        synthetic
    });

    tracing::info!(
        %call_id,
        has_speech = utterance.as_deref().map(|u| !u.trim().is_empty()).unwrap_or(false),
        "turn received"
    );

    let turn = state
        .orchestrator
        .handle_turn(TurnRequest {
            call_id,
            caller_number: webhook.from,
            utterance,
        })
        .await;

    let voice = &state.settings.server.voice;
    let xml = match turn.directive {
        Directive::Continue => twiml::gather(&turn.say, voice, GATHER_PATH),
        Directive::End => twiml::hangup(&turn.say, voice),
    };

    ([(header::CONTENT_TYPE, "text/xml")], xml).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use frontdesk_agent::{CallOrchestrator, ReplyComposer, SessionStore};
    use frontdesk_config::Settings;
    use frontdesk_notify::LogNotifier;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let settings = Arc::new(Settings::default());
        let sessions = Arc::new(SessionStore::new());
        let orchestrator = Arc::new(CallOrchestrator::new(
            ReplyComposer::scripted(settings.prompts.clone()),
            sessions,
            Arc::new(LogNotifier::new(&settings.prompts.business_name)),
            Duration::from_secs(1),
        ));
        router(AppState::new(settings, orchestrator))
    }

    async fn post_form(router: Router, uri: &str, body: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_voice_greets_and_gathers() {
        let (status, body) =
            post_form(test_router(), "/voice", "CallSid=CA1&From=%2B15551234567").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<Gather"));
        assert!(body.contains("how can I help you today?"));
        assert!(body.contains("your name"));
    }

    #[tokio::test]
    async fn test_gather_advances_the_dialogue() {
        let router = test_router();
        let (_, _) = post_form(router.clone(), "/voice", "CallSid=CA2").await;
        let (status, body) = post_form(
            router,
            "/voice/gather",
            "CallSid=CA2&SpeechResult=this+is+Dana",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<Gather"));
        assert!(body.contains("number you&apos;re calling from"));
    }

    #[tokio::test]
    async fn test_empty_webhook_is_not_rejected() {
        let (status, body) = post_form(test_router(), "/voice", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<Gather"));
    }

    #[tokio::test]
    async fn test_completed_call_hangs_up() {
        let router = test_router();
        let (_, body) = post_form(
            router,
            "/voice/gather",
            "CallSid=CA3&From=%2B15550001111&SpeechResult=My+name+is+Dana%2C+use+this+number%2C+44+Cedar+Ave%2C+pipe+burst%2C+today+works",
        )
        .await;
        assert!(body.contains("<Hangup/>"));
        assert!(body.contains("text confirmation"));
        assert!(!body.contains("<Gather"));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = {
            let response = test_router()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/health")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, String::from_utf8(bytes.to_vec()).unwrap())
        };
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("ok"));
    }
}
