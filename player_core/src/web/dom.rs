// DOM adapters: the page's elements behind the MediaElement, PlayerView and
// FullscreenHost seams.

use std::collections::HashMap;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlVideoElement};

use crate::controller::PlayerView;
use crate::danmaku::Comment;
use crate::error::PlayerError;
use crate::fullscreen::FullscreenHost;
use crate::media::MediaElement;
use crate::playback::PlayIndicator;
use crate::types::{BarBounds, CommentId, ElementIds};

pub(crate) const PAUSED_CLASS: &str = "paused";
pub(crate) const COMMENT_CLASS: &str = "danmaku-item";
pub(crate) const COMMENT_ID_ATTR: &str = "data-comment-id";

/// Best-effort message for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

fn dom_error(err: JsValue) -> PlayerError {
    PlayerError::Dom(describe(&err))
}

fn element_by_id<T: JsCast>(
    document: &Document,
    id: &str,
    expected: &'static str,
) -> Result<T, PlayerError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| PlayerError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| PlayerError::ElementType {
            id: id.to_string(),
            expected,
        })
}

/// Every element the player needs, resolved once at mount.
#[derive(Clone)]
pub struct PlayerElements {
    pub player: HtmlElement,
    pub video: HtmlVideoElement,
    pub play_pause_button: HtmlElement,
    pub play_icon: HtmlElement,
    pub pause_icon: HtmlElement,
    pub progress_container: Element,
    pub progress_filled: HtmlElement,
    pub current_time: Element,
    pub duration: Element,
    pub fullscreen_button: HtmlElement,
    pub comment_input: HtmlInputElement,
    pub comment_layer: Element,
    pub volume_button: HtmlElement,
}

impl PlayerElements {
    pub fn resolve(document: &Document, ids: &ElementIds) -> Result<Self, PlayerError> {
        Ok(PlayerElements {
            player: element_by_id(document, &ids.player, "HTML element")?,
            video: element_by_id(document, &ids.video, "video element")?,
            play_pause_button: element_by_id(document, &ids.play_pause_button, "HTML element")?,
            play_icon: element_by_id(document, &ids.play_icon, "HTML element")?,
            pause_icon: element_by_id(document, &ids.pause_icon, "HTML element")?,
            progress_container: element_by_id(document, &ids.progress_container, "element")?,
            progress_filled: element_by_id(document, &ids.progress_filled, "HTML element")?,
            current_time: element_by_id(document, &ids.current_time, "element")?,
            duration: element_by_id(document, &ids.duration, "element")?,
            fullscreen_button: element_by_id(document, &ids.fullscreen_button, "HTML element")?,
            comment_input: element_by_id(document, &ids.comment_input, "input element")?,
            comment_layer: element_by_id(document, &ids.comment_layer, "element")?,
            volume_button: element_by_id(document, &ids.volume_button, "HTML element")?,
        })
    }

    /// Current client-space extent of the progress bar.
    pub fn progress_bounds(&self) -> BarBounds {
        let rect = self.progress_container.get_bounding_client_rect();
        BarBounds::new(rect.left(), rect.width())
    }
}

/// `<video>` element as a [`MediaElement`].
pub struct DomMedia {
    video: HtmlVideoElement,
}

impl DomMedia {
    pub fn new(video: HtmlVideoElement) -> Self {
        DomMedia { video }
    }
}

impl MediaElement for DomMedia {
    fn paused(&self) -> bool {
        self.video.paused()
    }

    fn ended(&self) -> bool {
        self.video.ended()
    }

    fn current_time(&self) -> f64 {
        self.video.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.video.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.video.duration()
    }

    fn muted(&self) -> bool {
        self.video.muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        let promise = self
            .video
            .play()
            .map_err(|e| PlayerError::Playback(describe(&e)))?;
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                log::warn!("Playback request rejected: {}", describe(&err));
            }
        });
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.video
            .pause()
            .map_err(|e| PlayerError::Playback(describe(&e)))
    }
}

/// Player controls and comment layer as a [`PlayerView`].
pub struct DomView {
    document: Document,
    elements: PlayerElements,
    comments: HashMap<CommentId, Element>,
}

impl DomView {
    pub fn new(document: Document, elements: PlayerElements) -> Self {
        DomView {
            document,
            elements,
            comments: HashMap::new(),
        }
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) {
        if let Err(err) = element.style().set_property(property, value) {
            log::warn!("Failed to set {} to {}: {}", property, value, describe(&err));
        }
    }

    fn create_comment(&self, comment: &Comment) -> Result<HtmlElement, PlayerError> {
        let item: HtmlElement = self
            .document
            .create_element("div")
            .map_err(dom_error)?
            .dyn_into()
            .map_err(|_| PlayerError::Dom("created element is not an HTML element".into()))?;
        item.set_class_name(COMMENT_CLASS);
        item.set_text_content(Some(comment.text.as_str()));
        item.set_attribute(COMMENT_ID_ATTR, &comment.id.as_u64().to_string())
            .map_err(dom_error)?;

        let style = item.style();
        style
            .set_property("top", &format!("{}%", comment.top_percent))
            .map_err(dom_error)?;
        style
            .set_property("animation-duration", &format!("{}s", comment.duration_secs))
            .map_err(dom_error)?;
        Ok(item)
    }
}

impl PlayerView for DomView {
    fn show_play_indicator(&mut self, indicator: PlayIndicator) {
        let display = |visible: bool| if visible { "block" } else { "none" };
        Self::set_style(
            &self.elements.play_icon,
            "display",
            display(indicator.play_icon_visible()),
        );
        Self::set_style(
            &self.elements.pause_icon,
            "display",
            display(indicator.pause_icon_visible()),
        );

        let classes = self.elements.player.class_list();
        let result = if indicator.marks_paused() {
            classes.add_1(PAUSED_CLASS)
        } else {
            classes.remove_1(PAUSED_CLASS)
        };
        if let Err(err) = result {
            log::warn!("Failed to update paused marker: {}", describe(&err));
        }
    }

    fn set_progress_percent(&mut self, percent: f64) {
        Self::set_style(
            &self.elements.progress_filled,
            "width",
            &format!("{}%", percent),
        );
    }

    fn set_current_time_label(&mut self, label: &str) {
        self.elements.current_time.set_text_content(Some(label));
    }

    fn set_duration_label(&mut self, label: &str) {
        self.elements.duration.set_text_content(Some(label));
    }

    fn set_volume_opacity(&mut self, opacity: f64) {
        Self::set_style(
            &self.elements.volume_button,
            "opacity",
            &opacity.to_string(),
        );
    }

    fn spawn_comment(&mut self, comment: &Comment) -> Result<(), PlayerError> {
        let item = self.create_comment(comment)?;
        self.elements
            .comment_layer
            .append_child(&item)
            .map_err(dom_error)?;
        self.comments.insert(comment.id, item.into());
        Ok(())
    }

    fn remove_comment(&mut self, id: CommentId) {
        if let Some(item) = self.comments.remove(&id) {
            item.remove();
        }
    }

    fn reset_comment_input(&mut self) {
        let input = &self.elements.comment_input;
        input.set_value("");
        if let Err(err) = input.blur() {
            log::warn!("Failed to release comment input focus: {}", describe(&err));
        }
    }
}

impl FullscreenHost for DomView {
    fn fullscreen_active(&self) -> bool {
        self.document.fullscreen_element().is_some()
    }

    /// Calls `requestFullscreen()` on the container and logs a rejected promise.
    fn request_fullscreen(&mut self) -> Result<(), PlayerError> {
        let player: &JsValue = self.elements.player.as_ref();
        let request = Reflect::get(player, &JsValue::from_str("requestFullscreen"))
            .map_err(|e| PlayerError::Fullscreen(describe(&e)))?
            .dyn_into::<Function>()
            .map_err(|_| PlayerError::Fullscreen("requestFullscreen is not supported".into()))?;
        let result = request
            .call0(player)
            .map_err(|e| PlayerError::Fullscreen(describe(&e)))?;

        if let Ok(promise) = result.dyn_into::<Promise>() {
            spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    log::error!(
                        "Error attempting to enable full-screen mode: {}",
                        describe(&err)
                    );
                }
            });
        }
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), PlayerError> {
        self.document.exit_fullscreen();
        Ok(())
    }
}
