use crate::cancellation::Generations;
use crate::capture::{AudioClip, SpeechCapture};
use crate::resolver::SpeechResolver;
use std::sync::Arc;

pub(in crate::app) struct InFlight {
    pub(in crate::app) request_id: u64,
}

/// Voice control: microphone, resolver and the request bookkeeping that keeps
/// late answers from overriding newer manual actions.
pub struct VoiceState {
    pub(in crate::app) enabled: bool,
    pub(in crate::app) capture: Option<SpeechCapture>,
    /// Capture is open or has been asked to open.
    pub(in crate::app) capture_requested: bool,
    pub(in crate::app) resolver: Option<Arc<dyn SpeechResolver>>,
    /// Advanced by every manual action; results tagged with an older value are dropped.
    pub(in crate::app) generations: Generations,
    pub(in crate::app) next_request_id: u64,
    pub(in crate::app) last_applied_request: u64,
    pub(in crate::app) in_flight: Option<InFlight>,
    pub(in crate::app) pending_clip: Option<AudioClip>,
}

impl VoiceState {
    pub(in crate::app) fn new(resolver: Option<Arc<dyn SpeechResolver>>) -> Self {
        Self {
            enabled: false,
            capture: None,
            capture_requested: false,
            resolver,
            generations: Generations::new(),
            next_request_id: 0,
            last_applied_request: 0,
            in_flight: None,
            pending_clip: None,
        }
    }

    pub(in crate::app) fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }
}
