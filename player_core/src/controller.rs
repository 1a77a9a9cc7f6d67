// Player controller: the one place where events meet state.
// The DOM layer translates browser events into `PlayerEvent`s and applies
// the resulting view updates; everything in between lives here.

use crate::danmaku::{Comment, CommentOverlay};
use crate::error::PlayerError;
use crate::fullscreen::{toggle_fullscreen, FullscreenHost};
use crate::media::MediaElement;
use crate::playback::{toggle_play, PlayIndicator};
use crate::progress::{fill_percent, seek_target, ProgressTracker};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::time_format::format_time;
use crate::types::*;
use crate::volume::{toggle_mute, volume_opacity};

/// Visual surface of the player. Implemented over the DOM in the browser.
pub trait PlayerView {
    fn show_play_indicator(&mut self, indicator: PlayIndicator);
    /// Width of the progress fill, in percent.
    fn set_progress_percent(&mut self, percent: f64);
    fn set_current_time_label(&mut self, label: &str);
    fn set_duration_label(&mut self, label: &str);
    fn set_volume_opacity(&mut self, opacity: f64);
    /// Appends a comment element to the overlay layer.
    fn spawn_comment(&mut self, comment: &Comment) -> Result<(), PlayerError>;
    /// Removes a comment element. Unknown ids are ignored.
    fn remove_comment(&mut self, id: CommentId);
    /// Clears the comment input and releases its focus.
    fn reset_comment_input(&mut self);
}

/// Typed controller over a media element and a view.
pub struct PlayerController<M, V> {
    media: M,
    view: V,
    config: PlayerConfig,
    progress: ProgressTracker,
    overlay: CommentOverlay,
    shortcuts: ShortcutMap,
}

impl<M, V> PlayerController<M, V>
where
    M: MediaElement,
    V: PlayerView + FullscreenHost,
{
    pub fn new(media: M, view: V, config: PlayerConfig, overlay: CommentOverlay) -> Self {
        let shortcuts = ShortcutMap::new(config.seek_step_secs);
        PlayerController {
            media,
            view,
            config,
            progress: ProgressTracker::new(),
            overlay,
            shortcuts,
        }
    }

    /// Controller whose comment randomness comes from `config.danmaku.seed`,
    /// or `fallback_seed` when the config leaves it unset.
    pub fn seeded(media: M, view: V, config: PlayerConfig, fallback_seed: u64) -> Self {
        let overlay = CommentOverlay::seeded(config.danmaku.clone(), fallback_seed);
        PlayerController::new(media, view, config, overlay)
    }

    /// Applies the initial visual state.
    pub fn mount(&mut self) {
        self.view
            .show_play_indicator(PlayIndicator::from_paused(self.media.paused()));
        let duration = self.media.duration();
        if duration.is_finite() {
            self.view.set_duration_label(&format_time(duration));
        }
        if self.media.muted() {
            self.view
                .set_volume_opacity(volume_opacity(true, self.config.muted_opacity));
        }
    }

    pub fn handle(&mut self, event: PlayerEvent) -> Result<EventOutcome, PlayerError> {
        match event {
            PlayerEvent::PlayButtonClicked | PlayerEvent::VideoClicked => {
                toggle_play(&mut self.media)?;
            }
            PlayerEvent::MediaPlayed | PlayerEvent::MediaPaused => self.sync_play_state(),
            PlayerEvent::MetadataLoaded => {
                self.view
                    .set_duration_label(&format_time(self.media.duration()));
            }
            PlayerEvent::TimeUpdated => self.sync_progress(),
            PlayerEvent::ProgressClicked { pointer_x, bar } => {
                if let Some(target) = seek_target(pointer_x, bar, self.media.duration()) {
                    self.seek_to(target);
                }
            }
            PlayerEvent::ProgressPressed => self.progress.press(),
            PlayerEvent::PointerReleased => self.progress.release(),
            PlayerEvent::PointerMoved { pointer_x, bar } => {
                if let Some(target) =
                    self.progress
                        .drag_target(pointer_x, bar, self.media.duration())
                {
                    self.seek_to(target);
                }
            }
            PlayerEvent::FullscreenClicked => {
                toggle_fullscreen(&mut self.view);
            }
            PlayerEvent::CommentTick => {
                if let Some(comment) = self.overlay.tick(!self.media.paused()) {
                    self.show_comment(comment)?;
                }
            }
            PlayerEvent::CommentKeyPressed { key, value } => {
                if key == "Enter" && !value.trim().is_empty() {
                    self.send_comment(&value)?;
                    self.view.reset_comment_input();
                }
            }
            PlayerEvent::KeyDown {
                code,
                input_focused,
            } => {
                if let Some(action) = self.shortcuts.resolve(&code, input_focused) {
                    return self.apply_shortcut(action);
                }
            }
            PlayerEvent::VolumeClicked => {
                let opacity = toggle_mute(&mut self.media, self.config.muted_opacity);
                self.view.set_volume_opacity(opacity);
            }
            PlayerEvent::CommentAnimationEnded { id } => {
                self.overlay.retire(id);
                self.view.remove_comment(id);
            }
        }
        Ok(EventOutcome::handled())
    }

    /// Spawns a comment immediately. Returns its id, or `None` when the text
    /// is blank or the live-comment cap is reached.
    pub fn send_comment(&mut self, text: &str) -> Result<Option<CommentId>, PlayerError> {
        match self.overlay.submit(text) {
            Some(comment) => {
                let id = comment.id;
                self.show_comment(comment)?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Removes every live comment from the view.
    pub fn clear_comments(&mut self) {
        for id in self.overlay.clear() {
            self.view.remove_comment(id);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.progress.is_dragging()
    }

    pub fn live_comments(&self) -> usize {
        self.overlay.live_count()
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) -> Result<EventOutcome, PlayerError> {
        match action {
            ShortcutAction::TogglePlay => {
                toggle_play(&mut self.media)?;
            }
            ShortcutAction::SeekBy(delta) => {
                let target = self.media.current_time() + delta;
                self.seek_to(target);
            }
        }
        if action.prevents_default() {
            Ok(EventOutcome::prevent_default())
        } else {
            Ok(EventOutcome::handled())
        }
    }

    fn sync_play_state(&mut self) {
        self.view
            .show_play_indicator(PlayIndicator::from_paused(self.media.paused()));
    }

    fn sync_progress(&mut self) {
        let current = self.media.current_time();
        if let Some(percent) = fill_percent(current, self.media.duration()) {
            self.view.set_progress_percent(percent);
        }
        self.view.set_current_time_label(&format_time(current));
    }

    fn seek_to(&mut self, seconds: f64) {
        log::debug!("Seeking to {:.2}s", seconds);
        self.media.set_current_time(seconds);
    }

    fn show_comment(&mut self, comment: Comment) -> Result<(), PlayerError> {
        if let Err(err) = self.view.spawn_comment(&comment) {
            self.overlay.retire(comment.id);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::danmaku::tests::Scripted;
    use crate::media::SimulatedMedia;

    #[derive(Default)]
    struct RecordingView {
        indicator: Option<PlayIndicator>,
        progress: Option<f64>,
        time_label: String,
        duration_label: String,
        opacity: Option<f64>,
        comments: Vec<Comment>,
        input_resets: usize,
        fullscreen: bool,
        deny_fullscreen: bool,
    }

    impl PlayerView for RecordingView {
        fn show_play_indicator(&mut self, indicator: PlayIndicator) {
            self.indicator = Some(indicator);
        }

        fn set_progress_percent(&mut self, percent: f64) {
            self.progress = Some(percent);
        }

        fn set_current_time_label(&mut self, label: &str) {
            self.time_label = label.to_string();
        }

        fn set_duration_label(&mut self, label: &str) {
            self.duration_label = label.to_string();
        }

        fn set_volume_opacity(&mut self, opacity: f64) {
            self.opacity = Some(opacity);
        }

        fn spawn_comment(&mut self, comment: &Comment) -> Result<(), PlayerError> {
            self.comments.push(comment.clone());
            Ok(())
        }

        fn remove_comment(&mut self, id: CommentId) {
            self.comments.retain(|c| c.id != id);
        }

        fn reset_comment_input(&mut self) {
            self.input_resets += 1;
        }
    }

    impl FullscreenHost for RecordingView {
        fn fullscreen_active(&self) -> bool {
            self.fullscreen
        }

        fn request_fullscreen(&mut self) -> Result<(), PlayerError> {
            if self.deny_fullscreen {
                return Err(PlayerError::Fullscreen("denied".into()));
            }
            self.fullscreen = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) -> Result<(), PlayerError> {
            self.fullscreen = false;
            Ok(())
        }
    }

    type TestController = PlayerController<SimulatedMedia, RecordingView>;

    fn controller_with(media: SimulatedMedia, draws: &[f64]) -> TestController {
        let config = PlayerConfig::default();
        let overlay = CommentOverlay::new(config.danmaku.clone(), Box::new(Scripted::new(draws)));
        let mut controller = PlayerController::new(media, RecordingView::default(), config, overlay);
        controller.mount();
        controller
    }

    /// Delivers the native events the simulated element queued.
    fn pump(controller: &mut TestController) {
        for event in controller.media_mut().take_events() {
            controller.handle(event).expect("native event handled");
        }
    }

    fn key(code: &str, input_focused: bool) -> PlayerEvent {
        PlayerEvent::KeyDown {
            code: code.to_string(),
            input_focused,
        }
    }

    fn enter(value: &str) -> PlayerEvent {
        PlayerEvent::CommentKeyPressed {
            key: "Enter".to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn mount_shows_paused_state() {
        let controller = controller_with(SimulatedMedia::with_duration(125.0), &[0.5]);
        assert_eq!(controller.view().indicator, Some(PlayIndicator::Paused));
        assert_eq!(controller.view().duration_label, "02:05");
    }

    #[test]
    fn indicator_follows_native_events_only() {
        let mut controller = controller_with(SimulatedMedia::with_duration(60.0), &[0.5]);

        controller.handle(PlayerEvent::PlayButtonClicked).unwrap();
        assert!(!controller.media().paused());
        assert_eq!(controller.view().indicator, Some(PlayIndicator::Paused));

        pump(&mut controller);
        assert_eq!(controller.view().indicator, Some(PlayIndicator::Playing));

        controller.handle(PlayerEvent::VideoClicked).unwrap();
        assert_eq!(controller.view().indicator, Some(PlayIndicator::Playing));
        pump(&mut controller);
        assert_eq!(controller.view().indicator, Some(PlayIndicator::Paused));
    }

    #[test]
    fn metadata_and_time_updates_refresh_labels() {
        let mut controller = controller_with(SimulatedMedia::new(), &[0.5]);
        assert_eq!(controller.view().duration_label, "");

        controller.handle(PlayerEvent::TimeUpdated).unwrap();
        assert_eq!(controller.view().progress, None);

        controller.media_mut().load_metadata(200.0);
        pump(&mut controller);
        assert_eq!(controller.view().duration_label, "03:20");

        controller.handle(PlayerEvent::PlayButtonClicked).unwrap();
        controller.media_mut().advance(50.0);
        pump(&mut controller);
        assert_eq!(controller.view().progress, Some(25.0));
        assert_eq!(controller.view().time_label, "00:50");
    }

    #[test]
    fn missing_metadata_renders_nan() {
        let mut controller = controller_with(SimulatedMedia::new(), &[0.5]);
        controller.handle(PlayerEvent::MetadataLoaded).unwrap();
        assert_eq!(controller.view().duration_label, "NaN:NaN");
    }

    #[test]
    fn click_seek_clamps_to_bar() {
        let mut controller = controller_with(SimulatedMedia::with_duration(100.0), &[0.5]);
        let bar = BarBounds::new(0.0, 200.0);

        controller
            .handle(PlayerEvent::ProgressClicked { pointer_x: 50.0, bar })
            .unwrap();
        assert_eq!(controller.media().current_time(), 25.0);

        controller
            .handle(PlayerEvent::ProgressClicked { pointer_x: 500.0, bar })
            .unwrap();
        assert_eq!(controller.media().current_time(), 100.0);

        controller
            .handle(PlayerEvent::ProgressClicked { pointer_x: -20.0, bar })
            .unwrap();
        assert_eq!(controller.media().current_time(), 0.0);
    }

    #[test]
    fn drag_seeks_until_release() {
        let mut controller = controller_with(SimulatedMedia::with_duration(100.0), &[0.5]);
        let bar = BarBounds::new(100.0, 100.0);

        controller
            .handle(PlayerEvent::PointerMoved { pointer_x: 150.0, bar })
            .unwrap();
        assert_eq!(controller.media().current_time(), 0.0);

        controller.handle(PlayerEvent::ProgressPressed).unwrap();
        assert!(controller.is_dragging());
        controller
            .handle(PlayerEvent::PointerMoved { pointer_x: 175.0, bar })
            .unwrap();
        assert_eq!(controller.media().current_time(), 75.0);
        controller
            .handle(PlayerEvent::PointerMoved { pointer_x: 900.0, bar })
            .unwrap();
        assert_eq!(controller.media().current_time(), 100.0);

        controller.handle(PlayerEvent::PointerReleased).unwrap();
        controller
            .handle(PlayerEvent::PointerMoved { pointer_x: 110.0, bar })
            .unwrap();
        assert_eq!(controller.media().current_time(), 100.0);
    }

    #[test]
    fn sent_comment_lives_until_animation_ends() {
        let mut controller = controller_with(SimulatedMedia::with_duration(60.0), &[0.5]);

        controller.handle(enter("GG")).unwrap();
        let comments = &controller.view().comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "GG");
        assert!((0.0..=70.0).contains(&comments[0].top_percent));
        assert_eq!(controller.view().input_resets, 1);
        assert_eq!(controller.live_comments(), 1);

        let id = comments[0].id;
        controller
            .handle(PlayerEvent::CommentAnimationEnded { id })
            .unwrap();
        assert!(controller.view().comments.is_empty());
        assert_eq!(controller.live_comments(), 0);
    }

    #[test]
    fn blank_or_non_enter_input_is_ignored() {
        let mut controller = controller_with(SimulatedMedia::with_duration(60.0), &[0.5]);

        controller.handle(enter("   ")).unwrap();
        controller
            .handle(PlayerEvent::CommentKeyPressed {
                key: "a".to_string(),
                value: "GG".to_string(),
            })
            .unwrap();
        assert!(controller.view().comments.is_empty());
        assert_eq!(controller.view().input_resets, 0);
    }

    #[test]
    fn ticks_spawn_only_while_playing() {
        let mut controller = controller_with(SimulatedMedia::with_duration(60.0), &[0.0]);
        controller.handle(PlayerEvent::CommentTick).unwrap();
        assert!(controller.view().comments.is_empty());

        controller.handle(PlayerEvent::PlayButtonClicked).unwrap();
        controller.handle(PlayerEvent::CommentTick).unwrap();
        assert_eq!(controller.view().comments.len(), 1);
        assert_eq!(controller.view().comments[0].text, "2333333");
    }

    #[test]
    fn arrow_keys_seek_by_five() {
        let mut controller = controller_with(SimulatedMedia::with_duration(12.0), &[0.5]);

        let outcome = controller.handle(key("ArrowRight", false)).unwrap();
        assert!(!outcome.prevent_default);
        assert_eq!(controller.media().current_time(), 5.0);

        controller.handle(key("ArrowRight", true)).unwrap();
        assert_eq!(controller.media().current_time(), 5.0);

        controller.handle(key("ArrowRight", false)).unwrap();
        controller.handle(key("ArrowRight", false)).unwrap();
        assert_eq!(controller.media().current_time(), 12.0);

        controller.handle(key("ArrowLeft", false)).unwrap();
        assert_eq!(controller.media().current_time(), 7.0);
    }

    #[test]
    fn space_toggles_and_prevents_scroll() {
        let mut controller = controller_with(SimulatedMedia::with_duration(12.0), &[0.5]);

        let outcome = controller.handle(key("Space", false)).unwrap();
        assert!(outcome.prevent_default);
        assert!(!controller.media().paused());

        let outcome = controller.handle(key("Space", true)).unwrap();
        assert!(!outcome.prevent_default);
        assert!(!controller.media().paused());
    }

    #[test]
    fn volume_click_dims_button() {
        let mut controller = controller_with(SimulatedMedia::with_duration(12.0), &[0.5]);
        controller.handle(PlayerEvent::VolumeClicked).unwrap();
        assert!(controller.media().muted());
        assert_eq!(controller.view().opacity, Some(0.5));
        controller.handle(PlayerEvent::VolumeClicked).unwrap();
        assert_eq!(controller.view().opacity, Some(1.0));
    }

    #[test]
    fn fullscreen_toggles_and_swallows_denial() {
        let mut controller = controller_with(SimulatedMedia::with_duration(12.0), &[0.5]);
        controller.handle(PlayerEvent::FullscreenClicked).unwrap();
        assert!(controller.view().fullscreen);
        controller.handle(PlayerEvent::FullscreenClicked).unwrap();
        assert!(!controller.view().fullscreen);

        controller.view_mut().deny_fullscreen = true;
        assert!(controller.handle(PlayerEvent::FullscreenClicked).is_ok());
        assert!(!controller.view().fullscreen);
    }

    #[test]
    fn clear_comments_empties_view() {
        let mut controller = controller_with(SimulatedMedia::with_duration(12.0), &[0.5]);
        controller.send_comment("a").unwrap();
        controller.send_comment("b").unwrap();
        assert_eq!(controller.view().comments.len(), 2);
        controller.clear_comments();
        assert!(controller.view().comments.is_empty());
        assert_eq!(controller.live_comments(), 0);
    }
}
