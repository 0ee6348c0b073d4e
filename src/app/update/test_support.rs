use super::super::state::App;
use super::Effect;
use crate::cancellation::CancellationToken;
use crate::capture::AudioClip;
use crate::config::AppConfig;
use crate::error::PrompterError;
use crate::mirror::{MirrorBus, MirrorEvent};
use crate::resolver::{Resolution, ResolveRequest, SpeechResolver};
use std::sync::Arc;

/// Resolver that is never actually called; reducer tests feed results back
/// by hand through `Message::ResolutionReady`.
pub(in crate::app) struct FakeResolver;

impl SpeechResolver for FakeResolver {
    fn resolve(
        &self,
        _request: &ResolveRequest,
        _cancel: &CancellationToken,
    ) -> Result<Resolution, PrompterError> {
        Ok(Resolution::Track {
            last_spoken_word: None,
            speed: 0.0,
        })
    }
}

pub(in crate::app) fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.gemini_api_key = None;
    config.start_delay_secs = 0;
    config.voice_control = false;
    config
}

pub(in crate::app) fn build_test_app(text: &str) -> App {
    build_test_app_with(text, test_config())
}

pub(in crate::app) fn build_test_app_with(text: &str, config: AppConfig) -> App {
    let (mut app, _task) = App::bootstrap(text.to_string(), config, None, MirrorBus::new());
    app.voice.resolver = Some(Arc::new(FakeResolver));
    app.playback.geometry.viewport_height = 400.0;
    app.playback.geometry.content_height = 2000.0;
    app
}

pub(in crate::app) fn clip() -> AudioClip {
    AudioClip {
        data_uri: "data:audio/wav;base64,AAAA".to_string(),
        duration_secs: 2.0,
    }
}

pub(in crate::app) fn published(effects: &[Effect]) -> Vec<&MirrorEvent> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Publish(event) => Some(event),
            _ => None,
        })
        .collect()
}

pub(in crate::app) fn resolve_requests(effects: &[Effect]) -> Vec<&ResolveRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Resolve { request, .. } => Some(request),
            _ => None,
        })
        .collect()
}
