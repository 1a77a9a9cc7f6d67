// Play/pause toggling and the visual state derived from native events.
// The indicator is only ever recomputed from the element's `paused` flag.

use crate::error::PlayerError;
use crate::media::MediaElement;

/// Command issued to the media element by a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
}

/// Visual play/pause state of the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIndicator {
    /// Play icon shown, pause icon hidden, container marked `paused`.
    Paused,
    /// Pause icon shown, play icon hidden, `paused` marker removed.
    Playing,
}

impl PlayIndicator {
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            PlayIndicator::Paused
        } else {
            PlayIndicator::Playing
        }
    }

    pub fn play_icon_visible(&self) -> bool {
        matches!(self, PlayIndicator::Paused)
    }

    pub fn pause_icon_visible(&self) -> bool {
        matches!(self, PlayIndicator::Playing)
    }

    pub fn marks_paused(&self) -> bool {
        matches!(self, PlayIndicator::Paused)
    }
}

/// Starts playback if paused or ended, otherwise pauses.
pub fn toggle_play<M: MediaElement>(media: &mut M) -> Result<PlaybackCommand, PlayerError> {
    if media.paused() || media.ended() {
        media.play()?;
        Ok(PlaybackCommand::Play)
    } else {
        media.pause()?;
        Ok(PlaybackCommand::Pause)
    }
}
