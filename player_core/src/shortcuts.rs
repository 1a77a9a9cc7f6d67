// Global keyboard shortcuts. Typing in the comment input always wins.

/// Keys the player reacts to, by `KeyboardEvent.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Space,
    ArrowRight,
    ArrowLeft,
}

impl ShortcutKey {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(ShortcutKey::Space),
            "ArrowRight" => Some(ShortcutKey::ArrowRight),
            "ArrowLeft" => Some(ShortcutKey::ArrowLeft),
            _ => None,
        }
    }
}

/// What a shortcut asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    /// Toggle playback and suppress the page scroll.
    TogglePlay,
    /// Relative seek in seconds; the media element clamps the result.
    SeekBy(f64),
}

impl ShortcutAction {
    pub fn prevents_default(&self) -> bool {
        matches!(self, ShortcutAction::TogglePlay)
    }
}

/// Maps key codes to actions with a fixed seek step.
#[derive(Debug, Clone)]
pub struct ShortcutMap {
    seek_step_secs: f64,
}

impl ShortcutMap {
    pub fn new(seek_step_secs: f64) -> Self {
        ShortcutMap { seek_step_secs }
    }

    pub fn resolve(&self, code: &str, input_focused: bool) -> Option<ShortcutAction> {
        if input_focused {
            return None;
        }
        let action = match ShortcutKey::from_code(code)? {
            ShortcutKey::Space => ShortcutAction::TogglePlay,
            ShortcutKey::ArrowRight => ShortcutAction::SeekBy(self.seek_step_secs),
            ShortcutKey::ArrowLeft => ShortcutAction::SeekBy(-self.seek_step_secs),
        };
        Some(action)
    }
}
