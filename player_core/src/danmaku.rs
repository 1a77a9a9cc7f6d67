// Floating comment overlay: timed preset spawns, user submissions, and
// retirement when a comment's animation ends.
// Vertical offsets stay within [0, MAX_TOP_PERCENT] so comments never cover the controls.

use std::collections::BTreeSet;

use crate::types::{CommentId, DanmakuSettings, MAX_TOP_PERCENT};

/// Uniform random draws in `[0, 1)`. Injected so spawns are reproducible.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for fastrand::Rng {
    fn next_unit(&mut self) -> f64 {
        self.f64()
    }
}

/// A floating comment to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    /// Offset from the top of the layer, in percent.
    pub top_percent: f64,
    /// CSS animation duration, in seconds.
    pub duration_secs: f64,
}

/// Owns the comment policy and the set of comments currently on screen.
pub struct CommentOverlay {
    settings: DanmakuSettings,
    rng: Box<dyn RandomSource>,
    next_id: CommentId,
    live: BTreeSet<CommentId>,
}

impl CommentOverlay {
    pub fn new(settings: DanmakuSettings, rng: Box<dyn RandomSource>) -> Self {
        CommentOverlay {
            settings,
            rng,
            next_id: CommentId::new(1),
            live: BTreeSet::new(),
        }
    }

    /// Overlay seeded from the settings, or from `fallback_seed` when unset.
    pub fn seeded(settings: DanmakuSettings, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        CommentOverlay::new(settings, Box::new(fastrand::Rng::with_seed(seed)))
    }

    /// Timer tick. While playing, spawns a uniformly chosen preset with
    /// probability `spawn_probability`.
    pub fn tick(&mut self, playing: bool) -> Option<Comment> {
        if !playing || self.rng.next_unit() >= self.settings.spawn_probability {
            return None;
        }
        let presets = &self.settings.presets;
        if presets.is_empty() {
            return None;
        }
        let index = ((self.rng.next_unit() * presets.len() as f64) as usize).min(presets.len() - 1);
        let text = presets[index].clone();
        self.spawn(text)
    }

    /// User submission. Whitespace-only input is ignored; otherwise the text
    /// is spawned as typed.
    pub fn submit(&mut self, raw: &str) -> Option<Comment> {
        if raw.trim().is_empty() {
            return None;
        }
        self.spawn(raw)
    }

    /// Creates a comment with a random offset and speed.
    /// Returns `None` only when `max_live_comments` is set and reached.
    pub fn spawn(&mut self, text: impl Into<String>) -> Option<Comment> {
        if let Some(cap) = self.settings.max_live_comments {
            if self.live.len() >= cap {
                log::debug!("Comment dropped: {} live comments at cap", self.live.len());
                return None;
            }
        }

        let max_top = self.settings.max_top_percent.clamp(0.0, MAX_TOP_PERCENT);
        let top_percent = self.rng.next_unit() * max_top;
        let span = self.settings.max_duration_secs - self.settings.min_duration_secs;
        let duration_secs = self.settings.min_duration_secs + self.rng.next_unit() * span;

        let id = self.next_id;
        self.next_id = id.next();
        self.live.insert(id);

        let comment = Comment {
            id,
            text: text.into(),
            top_percent,
            duration_secs,
        };
        log::debug!(
            "Spawned comment {} at {:.1}% for {:.2}s",
            id.as_u64(),
            comment.top_percent,
            comment.duration_secs
        );
        Some(comment)
    }

    /// Animation finished. Returns whether the comment was live.
    pub fn retire(&mut self, id: CommentId) -> bool {
        self.live.remove(&id)
    }

    /// Drops every live comment, returning their ids.
    pub fn clear(&mut self) -> Vec<CommentId> {
        std::mem::take(&mut self.live).into_iter().collect()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: CommentId) -> bool {
        self.live.contains(&id)
    }
}
