// Fullscreen toggling on the player container.
// State is read from the host on every click; there is no local copy.

use crate::error::PlayerError;

/// Access to the document's fullscreen state for the player container.
pub trait FullscreenHost {
    /// Whether any element currently occupies fullscreen.
    fn fullscreen_active(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), PlayerError>;
    fn exit_fullscreen(&mut self) -> Result<(), PlayerError>;
}

/// Result of a fullscreen click.
#[derive(Debug, Clone, PartialEq)]
pub enum FullscreenTransition {
    Requested,
    Exited,
    /// The request was refused. Logged only.
    RequestFailed(PlayerError),
}

pub fn toggle_fullscreen<H: FullscreenHost>(host: &mut H) -> FullscreenTransition {
    if host.fullscreen_active() {
        if let Err(err) = host.exit_fullscreen() {
            log::warn!("Error attempting to exit full-screen mode: {}", err);
        }
        return FullscreenTransition::Exited;
    }

    match host.request_fullscreen() {
        Ok(()) => FullscreenTransition::Requested,
        Err(err) => {
            log::error!("Error attempting to enable full-screen mode: {}", err);
            FullscreenTransition::RequestFailed(err)
        }
    }
}
