//! Front-desk call agent binary
//!
//! Wires configuration, the dialogue orchestrator, and collaborators
//! together, then serves the telephony webhooks. Missing collaborator
//! credentials degrade the relevant feature with a warning; they never
//! stop the server from answering calls.

use std::sync::Arc;
use std::time::Duration;

use frontdesk_agent::{CallOrchestrator, ReplyComposer, SessionStore};
use frontdesk_config::{load_settings, ComposerStrategy, Settings};
use frontdesk_llm::backend::{LlmConfig, OpenAiBackend};
use frontdesk_notify::{LogNotifier, Notifier, TwilioConfig, TwilioSmsNotifier};
use frontdesk_server::state::AppState;
use frontdesk_server::{http, ServerError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let env_name = std::env::var("FRONTDESK_ENV").ok();
    let (settings, load_error) = match load_settings(env_name.as_deref()) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    init_tracing(&settings);

    if let Some(e) = load_error {
        tracing::warn!(error = %e, "failed to load configuration, running on defaults");
    }
    tracing::info!(
        environment = ?settings.environment,
        composer = ?settings.composer,
        "starting front-desk agent"
    );

    let composer = build_composer(&settings);
    let notifier = build_notifier(&settings);
    let sessions = Arc::new(SessionStore::new());

    let orchestrator = Arc::new(CallOrchestrator::new(
        composer,
        sessions.clone(),
        notifier,
        Duration::from_secs(settings.notify.timeout_seconds),
    ));

    spawn_idle_sweeper(sessions, &settings);

    let settings = Arc::new(settings);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = http::router(AppState::new(settings, orchestrator));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening for voice webhooks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down cleanly");
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.observability.log_level));

    if settings.observability.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Assisted composition needs an API key; without one the agent runs
/// fully scripted rather than refusing to start.
fn build_composer(settings: &Settings) -> ReplyComposer {
    let prompts = settings.prompts.clone();

    if settings.composer == ComposerStrategy::Scripted {
        return ReplyComposer::scripted(prompts);
    }

    let Some(api_key) = settings.llm.api_key.clone() else {
        tracing::warn!("no collaborator API key, falling back to scripted prompts");
        return ReplyComposer::scripted(prompts);
    };

    let timeout = Duration::from_secs(settings.llm.timeout_seconds);
    match OpenAiBackend::new(LlmConfig {
        endpoint: settings.llm.endpoint.clone(),
        api_key,
        model: settings.llm.model.clone(),
        max_tokens: settings.llm.max_tokens,
        temperature: settings.llm.temperature,
        timeout,
    }) {
        Ok(backend) => ReplyComposer::assisted(prompts, Arc::new(backend), timeout),
        Err(e) => {
            tracing::warn!(error = %e, "collaborator unavailable, falling back to scripted prompts");
            ReplyComposer::scripted(prompts)
        }
    }
}

fn build_notifier(settings: &Settings) -> Arc<dyn Notifier> {
    let business_name = settings.prompts.business_name.clone();

    if !settings.notify.enabled {
        tracing::info!("SMS dispatch disabled, leads will be logged only");
        return Arc::new(LogNotifier::new(business_name));
    }
    if !settings.notify.has_credentials() {
        tracing::warn!("SMS enabled but credentials incomplete, leads will be logged only");
        return Arc::new(LogNotifier::new(business_name));
    }

    let mut config = TwilioConfig::new(
        settings.notify.account_sid.clone().unwrap_or_default(),
        settings.notify.auth_token.clone().unwrap_or_default(),
        settings.notify.sms_from.clone().unwrap_or_default(),
        settings.notify.owner_mobile.clone().unwrap_or_default(),
        business_name.clone(),
    );
    config.timeout = Duration::from_secs(settings.notify.timeout_seconds);

    match TwilioSmsNotifier::new(config) {
        Ok(notifier) => {
            tracing::info!("SMS dispatch enabled");
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::warn!(error = %e, "SMS notifier unavailable, leads will be logged only");
            Arc::new(LogNotifier::new(business_name))
        }
    }
}

/// Abandoned calls (hang-ups mid-dialogue) leave sessions behind; the
/// sweeper reclaims them on a fixed cadence.
fn spawn_idle_sweeper(sessions: Arc<SessionStore>, settings: &Settings) {
    let idle = Duration::from_secs(settings.session.idle_timeout_seconds);
    let interval = Duration::from_secs(settings.session.sweep_interval_seconds);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            sessions.sweep_idle(idle);
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("ctrl-c received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
