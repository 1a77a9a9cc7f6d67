// Browser binding. Subscribes to the page's DOM events, translates them into
// `PlayerEvent`s and hands them to the controller. Every subscription is an
// owned handle; dropping the player unsubscribes everything.

pub mod console;
mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, KeyboardEvent, MouseEvent, Node};

use crate::controller::PlayerController;
use crate::types::{CommentId, EventOutcome, PlayerConfig, PlayerEvent};

pub use dom::{DomMedia, DomView, PlayerElements};

type DomController = PlayerController<DomMedia, DomView>;
type SharedController = Rc<RefCell<DomController>>;

fn to_js(err: crate::error::PlayerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Runs one event through the controller. Errors are logged, never thrown.
fn dispatch(controller: &SharedController, event: PlayerEvent) -> EventOutcome {
    let Ok(mut controller) = controller.try_borrow_mut() else {
        log::warn!("Dropped re-entrant event {:?}", event);
        return EventOutcome::handled();
    };
    match controller.handle(event) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("{}", err);
            EventOutcome::handled()
        }
    }
}

/// Player mounted on the page markup, exposed to JavaScript.
///
/// # Example
/// ```js
/// const player = new WebPlayer(JSON.stringify({ danmaku: { spawn_probability: 0.5 } }));
/// player.send_comment("GG");
/// player.dispose();
/// ```
#[wasm_bindgen]
pub struct WebPlayer {
    controller: SharedController,
    listeners: Vec<EventListener>,
    ticker: Option<Interval>,
}

#[wasm_bindgen]
impl WebPlayer {
    /// Mounts the player on the elements named in the JSON config.
    /// Missing or mistyped elements and invalid config are reported as errors.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebPlayer, JsValue> {
        let config = PlayerConfig::from_json(config_json).map_err(to_js)?;
        console::init(config.log_level);

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let elements = PlayerElements::resolve(&document, &config.elements).map_err(to_js)?;

        let fallback_seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let tick_ms = config.danmaku.tick_interval_ms;
        let mut controller = PlayerController::seeded(
            DomMedia::new(elements.video.clone()),
            DomView::new(document.clone(), elements.clone()),
            config,
            fallback_seed,
        );
        controller.mount();

        let mut player = WebPlayer {
            controller: Rc::new(RefCell::new(controller)),
            listeners: Vec::new(),
            ticker: None,
        };
        player.subscribe(&document, &elements);
        player.start_ticker(tick_ms);
        log::info!("Player mounted on #{}", elements.player.id());
        Ok(player)
    }

    /// Spawns a comment right away. Returns false for blank text.
    pub fn send_comment(&self, text: &str) -> Result<bool, JsValue> {
        let mut controller = self
            .controller
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Player is busy"))?;
        let sent = controller.send_comment(text).map_err(to_js)?;
        Ok(sent.is_some())
    }

    /// Number of comments currently on screen.
    pub fn live_comments(&self) -> Result<usize, JsValue> {
        let controller = self
            .controller
            .try_borrow()
            .map_err(|_| JsValue::from_str("Player is busy"))?;
        Ok(controller.live_comments())
    }

    /// Unsubscribes every listener, stops the comment timer and removes live
    /// comments. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.ticker = None;
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.clear_comments();
        }
    }
}

impl WebPlayer {
    fn listen<F>(&mut self, target: &EventTarget, event_type: &'static str, translate: F)
    where
        F: Fn(&Event) -> Option<PlayerEvent> + 'static,
    {
        self.listen_with(target, event_type, EventListenerOptions::default(), translate);
    }

    fn listen_with<F>(
        &mut self,
        target: &EventTarget,
        event_type: &'static str,
        options: EventListenerOptions,
        translate: F,
    ) where
        F: Fn(&Event) -> Option<PlayerEvent> + 'static,
    {
        let controller = Rc::clone(&self.controller);
        let listener = EventListener::new_with_options(target, event_type, options, move |event| {
            if let Some(player_event) = translate(event) {
                if dispatch(&controller, player_event).prevent_default {
                    event.prevent_default();
                }
            }
        });
        self.listeners.push(listener);
    }

    fn subscribe(&mut self, document: &Document, elements: &PlayerElements) {
        // Playback
        self.listen(&elements.play_pause_button, "click", |_| {
            Some(PlayerEvent::PlayButtonClicked)
        });
        self.listen(&elements.video, "click", |_| Some(PlayerEvent::VideoClicked));
        self.listen(&elements.video, "play", |_| Some(PlayerEvent::MediaPlayed));
        self.listen(&elements.video, "pause", |_| Some(PlayerEvent::MediaPaused));

        // Progress
        self.listen(&elements.video, "loadedmetadata", |_| {
            Some(PlayerEvent::MetadataLoaded)
        });
        self.listen(&elements.video, "timeupdate", |_| Some(PlayerEvent::TimeUpdated));

        let bar = elements.clone();
        self.listen(&elements.progress_container, "click", move |event| {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(PlayerEvent::ProgressClicked {
                pointer_x: f64::from(mouse.client_x()),
                bar: bar.progress_bounds(),
            })
        });
        self.listen(&elements.progress_container, "mousedown", |_| {
            Some(PlayerEvent::ProgressPressed)
        });
        self.listen(document, "mouseup", |_| Some(PlayerEvent::PointerReleased));

        let bar = elements.clone();
        let drag_state = Rc::clone(&self.controller);
        self.listen(document, "mousemove", move |event| {
            let dragging = drag_state.try_borrow().map(|c| c.is_dragging()).ok()?;
            if !dragging {
                return None;
            }
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(PlayerEvent::PointerMoved {
                pointer_x: f64::from(mouse.client_x()),
                bar: bar.progress_bounds(),
            })
        });

        // Fullscreen
        self.listen(&elements.fullscreen_button, "click", |_| {
            Some(PlayerEvent::FullscreenClicked)
        });

        // Comments
        let input = elements.comment_input.clone();
        self.listen(&elements.comment_input, "keypress", move |event| {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            Some(PlayerEvent::CommentKeyPressed {
                key: key.key(),
                value: input.value(),
            })
        });
        self.listen(&elements.comment_layer, "animationend", |event| {
            let item = event.target()?.dyn_into::<Element>().ok()?;
            let id = item.get_attribute(dom::COMMENT_ID_ATTR)?.parse::<u64>().ok()?;
            Some(PlayerEvent::CommentAnimationEnded {
                id: CommentId::new(id),
            })
        });

        // Shortcuts
        let doc = document.clone();
        let input = elements.comment_input.clone();
        self.listen_with(
            document,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let key = event.dyn_ref::<KeyboardEvent>()?;
                let input_focused = doc
                    .active_element()
                    .map(|active| active.is_same_node(Some(input.unchecked_ref::<Node>())))
                    .unwrap_or(false);
                Some(PlayerEvent::KeyDown {
                    code: key.code(),
                    input_focused,
                })
            },
        );

        // Volume
        self.listen(&elements.volume_button, "click", |_| {
            Some(PlayerEvent::VolumeClicked)
        });
    }

    fn start_ticker(&mut self, tick_ms: u32) {
        let controller = Rc::clone(&self.controller);
        self.ticker = Some(Interval::new(tick_ms, move || {
            dispatch(&controller, PlayerEvent::CommentTick);
        }));
    }
}

impl Drop for WebPlayer {
    fn drop(&mut self) {
        self.dispose();
    }
}
