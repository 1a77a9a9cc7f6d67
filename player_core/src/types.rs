// Strong typing over strings. Newtypes for comment ids and bar fractions,
// the event vocabulary the DOM layer feeds in, and the config passed from JS.

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Identity of a live comment element. Increases in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct CommentId(u64);

impl CommentId {
    pub fn new(id: u64) -> Self {
        CommentId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        CommentId(self.0 + 1)
    }
}

/// Position along the progress bar (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
pub struct Fraction(f64);

impl Fraction {
    /// Clamps into `[0, 1]`. NaN becomes 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Fraction(0.0);
        }
        Fraction(value.clamp(0.0, 1.0))
    }

    /// Horizontal fraction of `pointer_x` across `bar`.
    /// Returns `None` when the bar has no usable width.
    pub fn along(pointer_x: f64, bar: BarBounds) -> Option<Self> {
        if !(bar.width > 0.0) || !bar.width.is_finite() || !pointer_x.is_finite() {
            return None;
        }
        Some(Fraction::new((pointer_x - bar.left) / bar.width))
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// Horizontal extent of the progress bar, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BarBounds {
    pub left: f64,
    pub width: f64,
}

impl BarBounds {
    pub fn new(left: f64, width: f64) -> Self {
        BarBounds { left, width }
    }
}

/// Everything the DOM layer can report to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Click on the play/pause button.
    PlayButtonClicked,
    /// Click on the video surface.
    VideoClicked,
    /// Native `play` event.
    MediaPlayed,
    /// Native `pause` event.
    MediaPaused,
    /// Native `loadedmetadata` event.
    MetadataLoaded,
    /// Native `timeupdate` event.
    TimeUpdated,
    /// Click on the progress bar.
    ProgressClicked { pointer_x: f64, bar: BarBounds },
    /// Pointer pressed on the progress bar (drag start).
    ProgressPressed,
    /// Pointer released anywhere on the document (drag end).
    PointerReleased,
    /// Pointer moved anywhere on the document.
    PointerMoved { pointer_x: f64, bar: BarBounds },
    /// Click on the fullscreen button.
    FullscreenClicked,
    /// Comment timer fired.
    CommentTick,
    /// Key pressed inside the comment input.
    CommentKeyPressed { key: String, value: String },
    /// Key pressed anywhere on the document.
    KeyDown { code: String, input_focused: bool },
    /// Click on the volume button.
    VolumeClicked,
    /// A comment element finished its animation.
    CommentAnimationEnded { id: CommentId },
}

/// What the DOM layer must do with the originating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub prevent_default: bool,
}

impl EventOutcome {
    pub fn handled() -> Self {
        EventOutcome::default()
    }

    pub fn prevent_default() -> Self {
        EventOutcome {
            prevent_default: true,
        }
    }
}

/// Player configuration passed from JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub elements: ElementIds,
    #[serde(default)]
    pub danmaku: DanmakuSettings,
    /// Arrow-key seek step (seconds).
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,
    /// Volume button opacity while muted.
    #[serde(default = "default_muted_opacity")]
    pub muted_opacity: f64,
    #[serde(default = "default_log_level")]
    pub log_level: LevelFilter,
}

impl PlayerConfig {
    pub fn from_json(json: &str) -> Result<Self, PlayerError> {
        let config: PlayerConfig = serde_json::from_str(json)
            .map_err(|e| PlayerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlayerError> {
        if !(self.seek_step_secs > 0.0) || !self.seek_step_secs.is_finite() {
            return Err(PlayerError::InvalidConfig(format!(
                "seek_step_secs must be positive, got {}",
                self.seek_step_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.muted_opacity) {
            return Err(PlayerError::InvalidConfig(format!(
                "muted_opacity must be within [0, 1], got {}",
                self.muted_opacity
            )));
        }
        self.danmaku.validate()
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            elements: ElementIds::default(),
            danmaku: DanmakuSettings::default(),
            seek_step_secs: default_seek_step(),
            muted_opacity: default_muted_opacity(),
            log_level: default_log_level(),
        }
    }
}

fn default_seek_step() -> f64 {
    5.0
}

fn default_muted_opacity() -> f64 {
    0.5
}

fn default_log_level() -> LevelFilter {
    LevelFilter::Info
}

/// Ids of the elements the page markup must provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub player: String,
    pub video: String,
    pub play_pause_button: String,
    pub play_icon: String,
    pub pause_icon: String,
    pub progress_container: String,
    pub progress_filled: String,
    pub current_time: String,
    pub duration: String,
    pub fullscreen_button: String,
    pub comment_input: String,
    pub comment_layer: String,
    pub volume_button: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            player: "biliPlayer".into(),
            video: "mainVideo".into(),
            play_pause_button: "playPauseBtn".into(),
            play_icon: "playIcon".into(),
            pause_icon: "pauseIcon".into(),
            progress_container: "progressContainer".into(),
            progress_filled: "progressFilled".into(),
            current_time: "currentTime".into(),
            duration: "duration".into(),
            fullscreen_button: "fullscreenBtn".into(),
            comment_input: "danmakuInput".into(),
            comment_layer: "danmakuLayer".into(),
            volume_button: "volumeBtn".into(),
        }
    }
}

/// Lowest a comment may start, in percent of the layer height. Keeps the
/// bottom band clear for the controls.
pub const MAX_TOP_PERCENT: f64 = 70.0;

/// Comment overlay policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DanmakuSettings {
    /// Timer period for automatic comments (milliseconds).
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u32,
    /// Chance that a tick spawns a preset while playing.
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,
    /// Upper bound of the vertical offset, in percent of the layer height.
    #[serde(default = "default_max_top")]
    pub max_top_percent: f64,
    #[serde(default = "default_min_duration")]
    pub min_duration_secs: f64,
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f64,
    #[serde(default = "default_presets")]
    pub presets: Vec<String>,
    /// Unbounded when absent.
    #[serde(default)]
    pub max_live_comments: Option<usize>,
    /// Seed for the comment random source. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DanmakuSettings {
    pub fn validate(&self) -> Result<(), PlayerError> {
        if self.tick_interval_ms == 0 {
            return Err(PlayerError::InvalidConfig(
                "tick_interval_ms must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(PlayerError::InvalidConfig(format!(
                "spawn_probability must be within [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if !(0.0..=MAX_TOP_PERCENT).contains(&self.max_top_percent) {
            return Err(PlayerError::InvalidConfig(format!(
                "max_top_percent must be within [0, {}], got {}",
                MAX_TOP_PERCENT,
                self.max_top_percent
            )));
        }
        if !(self.min_duration_secs >= 0.0)
            || !self.max_duration_secs.is_finite()
            || self.min_duration_secs > self.max_duration_secs
        {
            return Err(PlayerError::InvalidConfig(format!(
                "comment duration range {}..{} is invalid",
                self.min_duration_secs, self.max_duration_secs
            )));
        }
        Ok(())
    }
}

impl Default for DanmakuSettings {
    fn default() -> Self {
        DanmakuSettings {
            tick_interval_ms: default_tick_interval(),
            spawn_probability: default_spawn_probability(),
            max_top_percent: default_max_top(),
            min_duration_secs: default_min_duration(),
            max_duration_secs: default_max_duration(),
            presets: default_presets(),
            max_live_comments: None,
            seed: None,
        }
    }
}

fn default_tick_interval() -> u32 {
    800
}

fn default_spawn_probability() -> f64 {
    0.4
}

fn default_max_top() -> f64 {
    MAX_TOP_PERCENT
}

fn default_min_duration() -> f64 {
    5.0
}

fn default_max_duration() -> f64 {
    10.0
}

fn default_presets() -> Vec<String> {
    [
        "2333333",
        "前方高能预警",
        "好活当赏",
        "火钳刘明",
        "点赞投币收藏",
        "CSS太强了",
        "学到了！",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_clamps() {
        assert_eq!(Fraction::new(1.5).as_f64(), 1.0);
        assert_eq!(Fraction::new(-0.5).as_f64(), 0.0);
        assert_eq!(Fraction::new(f64::NAN).as_f64(), 0.0);
    }

    #[test]
    fn fraction_along_bar() {
        let bar = BarBounds::new(100.0, 200.0);
        assert_eq!(Fraction::along(150.0, bar), Some(Fraction::new(0.25)));
        assert_eq!(Fraction::along(50.0, bar), Some(Fraction::new(0.0)));
        assert_eq!(Fraction::along(400.0, bar), Some(Fraction::new(1.0)));
        assert_eq!(Fraction::along(150.0, BarBounds::new(100.0, 0.0)), None);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = PlayerConfig::from_json("{}").expect("Should parse empty config");
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.danmaku.tick_interval_ms, 800);
        assert_eq!(config.danmaku.presets.len(), 7);
        assert_eq!(config.elements.video, "mainVideo");
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn partial_config_overrides() {
        let json = r#"{
            "elements": { "video": "clip" },
            "danmaku": { "spawn_probability": 1.0, "seed": 7 },
            "seek_step_secs": 10,
            "log_level": "debug"
        }"#;
        let config = PlayerConfig::from_json(json).expect("Should parse config");
        assert_eq!(config.elements.video, "clip");
        assert_eq!(config.elements.player, "biliPlayer");
        assert_eq!(config.danmaku.spawn_probability, 1.0);
        assert_eq!(config.danmaku.seed, Some(7));
        assert_eq!(config.danmaku.max_top_percent, 70.0);
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn invalid_config_rejected() {
        for json in [
            r#"{"danmaku":{"spawn_probability":1.5}}"#,
            r#"{"danmaku":{"max_top_percent":120}}"#,
            r#"{"danmaku":{"max_top_percent":100}}"#,
            r#"{"danmaku":{"max_top_percent":70.5}}"#,
            r#"{"danmaku":{"min_duration_secs":10,"max_duration_secs":5}}"#,
            r#"{"danmaku":{"tick_interval_ms":0}}"#,
            r#"{"seek_step_secs":0}"#,
            r#"{"muted_opacity":2}"#,
            r#"{"seek_step_secs":"five"}"#,
        ] {
            let result = PlayerConfig::from_json(json);
            assert!(
                matches!(result, Err(PlayerError::InvalidConfig(_))),
                "expected rejection for {}",
                json
            );
        }
    }
}
