//! DOM glue: one `App` per page held in a thread-local, driven by
//! `hashchange`, delegated `click` and `input` listeners on the root element.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlTextAreaElement, window};

use super::view::{self, Action, DRAFT_ID, FEEDBACK_ID, SPEAK_ID};
use crate::card::{CardIntent, CardState};
use crate::catalog::Catalog;
use crate::config::PracticeConfig;
use crate::route::Route;
use crate::session::{Advance, Retreat, SessionController};
use crate::speech::{BrowserSpeech, SpeechEngine};
use crate::storage::{LocalStorage, MemoryStore, ProgressStore};

const ROOT_ID: &str = "serifu-app";

struct App {
    root: Element,
    catalog: &'static Catalog,
    controller: SessionController<Box<dyn ProgressStore>>,
    card: CardState,
    speech: BrowserSpeech,
    // bumped whenever the displayed line changes; stale speech completions are dropped
    line_epoch: u64,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

pub fn start_app(config_json: Option<&str>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(doc) => PracticeConfig::from_json(doc).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid config: {e}");
            PracticeConfig::default()
        }),
        None => PracticeConfig::default(),
    };

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let root = match doc.get_element_by_id(ROOT_ID) {
        Some(el) => el,
        None => {
            let el = doc.create_element("div")?;
            el.set_id(ROOT_ID);
            let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
            body.append_child(&el)?;
            el
        }
    };

    let store: Box<dyn ProgressStore> = match LocalStorage::open() {
        Ok(s) => Box::new(s),
        Err(e) => {
            log::warn!("{e}; progress will not survive a reload");
            Box::new(MemoryStore::new())
        }
    };

    let app = App {
        root: root.clone(),
        catalog: Catalog::builtin(),
        controller: SessionController::new(store, config),
        card: CardState::new(),
        speech: BrowserSpeech::new(),
        line_epoch: 0,
    };
    APP.with(|a| a.replace(Some(app)));

    // Route changes
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            show_current_route();
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Buttons
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let action = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
                .and_then(|el| el.get_attribute("data-action"))
                .and_then(|name| Action::parse(&name));
            if let Some(action) = action {
                with_app(|app| app.on_action(action));
            }
        }) as Box<dyn FnMut(_)>);
        root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Draft typing. Only the feedback box is refreshed so the textarea keeps focus.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(area) = evt
                .target()
                .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
            else {
                return;
            };
            if area.id() != DRAFT_ID {
                return;
            }
            with_app(|app| {
                app.card.set_draft(area.value());
                app.refresh_feedback();
            });
        }) as Box<dyn FnMut(_)>);
        root.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    show_current_route();
    Ok(())
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

fn show_current_route() {
    let hash = window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    let route = Route::parse(&hash);
    with_app(|app| app.show(route));
}

fn navigate(route: &Route) {
    if let Some(win) = window() {
        if let Err(e) = win.location().set_hash(&route.to_hash()) {
            log::error!("Navigation to {route:?} failed: {e:?}");
        }
    }
}

impl App {
    fn show(&mut self, route: Route) {
        log::debug!("Showing {route:?}");
        match route {
            Route::Home => {
                self.controller.reset();
                self.root.set_inner_html(&view::home_html(self.catalog));
            }
            Route::Episodes { show } => {
                self.controller.reset();
                if self.catalog.show_by_id(&show).is_none() {
                    log::info!("Unknown show {show}; listing no episodes");
                }
                self.root
                    .set_inner_html(&view::episodes_html(self.catalog, &show));
            }
            Route::Practice { show, episode } => {
                let opened = self
                    .controller
                    .initialize(self.catalog, &show, episode)
                    .map(|_| ());
                match opened {
                    Ok(()) => {
                        self.new_line();
                        self.render_practice();
                    }
                    Err(e) => {
                        log::info!("{e}; redirecting");
                        navigate(&e.fallback());
                    }
                }
            }
        }
    }

    fn new_line(&mut self) {
        self.card.reset();
        self.line_epoch += 1;
    }

    fn render_practice(&self) {
        if let Some(state) = self.controller.state() {
            self.root.set_inner_html(&view::practice_html(
                state,
                &self.card,
                self.controller.config(),
                self.speech.is_available(),
            ));
        }
    }

    fn refresh_feedback(&self) {
        let Some(state) = self.controller.state() else {
            return;
        };
        let feedback = self
            .card
            .visible_feedback(state.current_line(), self.controller.config());
        if let Some(el) = element_by_id(FEEDBACK_ID) {
            el.set_inner_html(&view::feedback_html(feedback));
        }
    }

    fn on_action(&mut self, action: Action) {
        if let Some(intent) = action.intent() {
            self.on_intent(intent);
            return;
        }
        match action {
            Action::ToggleAnswer => self.card.toggle_answer(),
            Action::ToggleDirection => self.card.toggle_direction(),
            Action::Speak => {
                self.speak();
                return;
            }
            Action::Next | Action::Previous => return,
        }
        self.render_practice();
    }

    fn on_intent(&mut self, intent: CardIntent) {
        match intent {
            CardIntent::Next => match self.controller.advance() {
                Ok(Advance::Moved(_)) => {
                    self.new_line();
                    self.render_practice();
                }
                Ok(Advance::Complete) => {
                    if let (Some(state), Some(win)) = (self.controller.state(), window()) {
                        if let Err(e) = win.alert_with_message(&state.completion_message()) {
                            log::warn!("Completion notice failed: {e:?}");
                        }
                    }
                }
                Err(e) => log::warn!("next: {e}"),
            },
            CardIntent::Previous => match self.controller.retreat() {
                Ok(Retreat::Moved(_)) => {
                    self.new_line();
                    self.render_practice();
                }
                Ok(Retreat::ExitToEpisodeList(route)) => navigate(&route),
                Err(e) => log::warn!("previous: {e}"),
            },
        }
    }

    fn speak(&mut self) {
        let Some(state) = self.controller.state() else {
            return;
        };
        let Some(handle) =
            self.card
                .request_speech(state.current_line(), self.controller.config(), &mut self.speech)
        else {
            return;
        };
        set_speak_enabled(false);

        let epoch = self.line_epoch;
        wasm_bindgen_futures::spawn_local(async move {
            handle.await;
            with_app(|app| {
                if app.line_epoch == epoch {
                    app.card.finish_speech();
                    set_speak_enabled(true);
                }
            });
        });
    }
}

fn element_by_id(id: &str) -> Option<Element> {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
}

fn set_speak_enabled(enabled: bool) {
    if let Some(el) = element_by_id(SPEAK_ID) {
        let res = if enabled {
            el.remove_attribute("disabled")
        } else {
            el.set_attribute("disabled", "")
        };
        res.ok();
    }
}
