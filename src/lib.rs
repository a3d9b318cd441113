//! Serifu Practice core crate.
//!
//! Flashcard practice for translating Japanese TV drama lines into Chinese
//! (and back). The state logic (catalog lookups, the per-episode session with
//! saved progress, the per-line card) is plain Rust and runs natively; the
//! browser front end in [`ui`] is compiled for `wasm32` only and exposed through
//! `start_app()`.

use wasm_bindgen::prelude::*;

pub mod card;
pub mod catalog;
pub mod config;
pub mod route;
pub mod session;
pub mod speech;
pub mod storage;
pub mod ui;
mod utils;

pub use card::{CardIntent, CardState, Direction, Feedback, compute_feedback};
pub use catalog::{Catalog, CatalogError, Difficulty, EpisodeSummary, PracticeLine, Show};
pub use config::PracticeConfig;
pub use route::Route;
pub use session::{Advance, Retreat, Session, SessionController, SessionError, SessionState};
pub use speech::{NullSpeech, SpeechEngine, SpeechError, SpeechHandle};
pub use storage::{MemoryStore, ProgressStore, StorageError, progress_key};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Mounts the app into `#serifu-app` (created if missing). `config_json` may
/// override any field of [`PracticeConfig`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_app(config_json: Option<String>) -> Result<(), JsValue> {
    ui::start_app(config_json.as_deref())
}

/// Number of practice lines in the bundled catalog for one episode; lets the
/// host page hide episodes without content.
#[wasm_bindgen]
pub fn bundled_line_count(show_id: &str, episode: u32) -> usize {
    Catalog::builtin()
        .lines_by_show_and_episode(show_id, episode)
        .len()
}
