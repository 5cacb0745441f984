//! Shared helpers for blogcms-app integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use blogcms_app::config::AppConfig;
use blogcms_app::state::AppState;
use blogcms_app::welcome::WelcomeRequest;
use blogcms_test_support::{FixedClock, RecordingEventPublisher};

/// App state on a fixed clock, plus the publisher it records into.
pub fn recording_state() -> (AppState, Arc<RecordingEventPublisher>) {
    let publisher = Arc::new(RecordingEventPublisher::new());
    let state = AppState::with_parts(
        AppConfig::default(),
        Arc::new(FixedClock::default()),
        publisher.clone(),
    );
    (state, publisher)
}

/// A valid bootstrap request without a banner.
pub fn welcome_request() -> WelcomeRequest {
    WelcomeRequest {
        username: "editor".to_owned(),
        email: "editor@example.org".to_owned(),
        password_hash: "hashed".to_owned(),
        nickname: "Editor".to_owned(),
        title: "Release notes".to_owned(),
        content: "What changed this week.".to_owned(),
        banner: None,
    }
}
