//! blogcms process entry point.
//!
//! Loads configuration, installs tracing, and runs the first-run bootstrap
//! against the in-process stores. Published events appear in the log.

use std::process::ExitCode;

use blogcms_app::config::AppConfig;
use blogcms_app::error::AppError;
use blogcms_app::state::AppState;
use blogcms_app::telemetry;
use blogcms_app::welcome::{WelcomeRequest, publish_welcome_post};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The subscriber may not be installed when configuration fails.
            eprintln!("blogcms: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    telemetry::init_tracing(&config)?;

    tracing::info!(
        event_source = %config.event_source,
        threshold_secs = config.recently_updated_threshold.num_seconds(),
        "starting blogcms"
    );

    let state = AppState::new(config);
    let summary = publish_welcome_post(
        &state,
        &WelcomeRequest {
            username: "owner".to_owned(),
            email: "owner@blogcms.local".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$placeholder".to_owned(),
            nickname: "Site Owner".to_owned(),
            title: "Hello from blogcms".to_owned(),
            content: "This site is up and running.".to_owned(),
            banner: None,
        },
    )
    .await?;

    tracing::info!(
        post_id = %summary.post.post_id,
        slug = %summary.post.slug,
        published_events = summary.published_events,
        "bootstrap complete"
    );
    Ok(())
}
