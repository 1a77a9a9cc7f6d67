// player_core: Rust/WASM control layer for the danmaku video player.
// All behavior lives here; the page only provides markup, CSS keyframes and a bootstrap.

mod controller;
mod danmaku;
mod error;
mod fullscreen;
mod media;
mod playback;
mod progress;
mod shortcuts;
mod time_format;
mod types;
mod volume;

#[cfg(target_arch = "wasm32")]
mod web;

use wasm_bindgen::prelude::*;

pub use controller::{PlayerController, PlayerView};
pub use danmaku::{Comment, CommentOverlay, RandomSource};
pub use error::PlayerError;
pub use fullscreen::{toggle_fullscreen, FullscreenHost, FullscreenTransition};
pub use media::{MediaElement, SimulatedMedia};
pub use playback::{toggle_play, PlayIndicator, PlaybackCommand};
pub use progress::{fill_percent, seek_target, ProgressTracker};
pub use shortcuts::{ShortcutAction, ShortcutKey, ShortcutMap};
pub use time_format::format_time;
pub use types::*;
pub use volume::{toggle_mute, volume_opacity};

#[cfg(target_arch = "wasm32")]
pub use web::{DomMedia, DomView, PlayerElements, WebPlayer};

/// Initialize panic hook and console logging for the browser.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    web::console::init(log::LevelFilter::Info);
}

/// `MM:SS` label for a time in seconds, for page scripts.
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_label(seconds: f64) -> String {
    format_time(seconds)
}
