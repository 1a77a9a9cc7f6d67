// Mute toggle. Button opacity is the only mute indicator.

use crate::media::MediaElement;

/// Flips `muted` and returns the volume button opacity to show.
pub fn toggle_mute<M: MediaElement>(media: &mut M, muted_opacity: f64) -> f64 {
    let muted = !media.muted();
    media.set_muted(muted);
    volume_opacity(muted, muted_opacity)
}

pub fn volume_opacity(muted: bool, muted_opacity: f64) -> f64 {
    if muted {
        muted_opacity
    } else {
        1.0
    }
}
