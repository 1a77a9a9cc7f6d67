// The media element seam. The DOM binding wraps `HtmlVideoElement`;
// `SimulatedMedia` follows the same native rules headlessly.

use std::collections::VecDeque;

use crate::error::PlayerError;
use crate::types::PlayerEvent;

/// Playback surface the controller drives. Mirrors the subset of
/// `HTMLMediaElement` the player uses; all times are in seconds.
pub trait MediaElement {
    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
    fn current_time(&self) -> f64;
    /// Out-of-range values are clamped by the element, not by callers.
    fn set_current_time(&mut self, seconds: f64);
    /// NaN until metadata is loaded.
    fn duration(&self) -> f64;
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;
}

/// In-memory media element that queues the native events a browser would
/// dispatch. Drain them with [`SimulatedMedia::take_events`] and feed them
/// back into the controller.
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    paused: bool,
    ended: bool,
    current_time: f64,
    duration: f64,
    muted: bool,
    pending: VecDeque<PlayerEvent>,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        SimulatedMedia {
            paused: true,
            ended: false,
            current_time: 0.0,
            duration: f64::NAN,
            muted: false,
            pending: VecDeque::new(),
        }
    }

    /// Element whose metadata is already loaded.
    pub fn with_duration(duration: f64) -> Self {
        let mut media = SimulatedMedia::new();
        media.duration = duration;
        media
    }

    pub fn load_metadata(&mut self, duration: f64) {
        self.duration = duration;
        self.pending.push_back(PlayerEvent::MetadataLoaded);
    }

    /// Advances playback time as the decoder would while playing.
    pub fn advance(&mut self, seconds: f64) {
        if self.paused {
            return;
        }
        self.current_time += seconds;
        if self.duration.is_finite() && self.current_time >= self.duration {
            self.current_time = self.duration;
            self.ended = true;
            self.paused = true;
            self.pending.push_back(PlayerEvent::TimeUpdated);
            self.pending.push_back(PlayerEvent::MediaPaused);
            return;
        }
        self.pending.push_back(PlayerEvent::TimeUpdated);
    }

    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        self.pending.drain(..).collect()
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for SimulatedMedia {
    fn paused(&self) -> bool {
        self.paused
    }

    fn ended(&self) -> bool {
        self.ended
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let upper = if self.duration.is_finite() {
            self.duration
        } else {
            f64::MAX
        };
        self.current_time = seconds.clamp(0.0, upper);
        self.ended = false;
        self.pending.push_back(PlayerEvent::TimeUpdated);
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        if self.ended {
            self.current_time = 0.0;
            self.ended = false;
        }
        if self.paused {
            self.paused = false;
            self.pending.push_back(PlayerEvent::MediaPlayed);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        if !self.paused {
            self.paused = true;
            self.pending.push_back(PlayerEvent::MediaPaused);
        }
        Ok(())
    }
}
