//! Practice session controller: resolves a (show, episode) pair into its
//! ordered lines, restores the saved position and moves through the lines,
//! writing the position back on every change.
//!
//! The controller owns exactly one session at a time. `initialize` always
//! discards whatever session was active before; nothing is carried over.

use crate::catalog::{Catalog, PracticeLine};
use crate::config::PracticeConfig;
use crate::route::Route;
use crate::storage::{ProgressStore, progress_key};
use crate::utils::parse_int_prefix;

/// Position within one episode's lines. `current_index < lines.len()` and
/// `lines` is never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    show_id: String,
    episode: u32,
    lines: Vec<PracticeLine>,
    current_index: usize,
    pub show_title: String,
    pub episode_title: String,
}

impl SessionState {
    pub fn show_id(&self) -> &str {
        &self.show_id
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn lines(&self) -> &[PracticeLine] {
        &self.lines
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_line(&self) -> &PracticeLine {
        &self.lines[self.current_index]
    }

    /// One-based position and total, as shown to the learner.
    pub fn position(&self) -> (usize, usize) {
        (self.current_index + 1, self.lines.len())
    }

    pub fn progress_percent(&self) -> f64 {
        (self.current_index + 1) as f64 / self.lines.len() as f64 * 100.0
    }

    pub fn completion_message(&self) -> String {
        format!(
            "恭喜您完成了《{} - {}》的所有翻译练习！",
            self.show_title, self.episode_title
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Session {
    Loading,
    Active(SessionState),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown show '{0}'")]
    UnknownShow(String),
    #[error("no lines for show '{show}' episode {episode}")]
    NoLines { show: String, episode: u32 },
    #[error("no active session")]
    NotActive,
}

impl SessionError {
    /// Screen to fall back to when a session cannot be opened.
    pub fn fallback(&self) -> Route {
        match self {
            SessionError::NoLines { show, .. } => Route::Episodes { show: show.clone() },
            SessionError::UnknownShow(_) | SessionError::NotActive => Route::Home,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Retreat {
    Moved(usize),
    ExitToEpisodeList(Route),
}

pub struct SessionController<S: ProgressStore> {
    store: S,
    config: PracticeConfig,
    session: Session,
}

impl<S: ProgressStore> SessionController<S> {
    pub fn new(store: S, config: PracticeConfig) -> Self {
        Self {
            store,
            config,
            session: Session::Loading,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> Option<&SessionState> {
        match &self.session {
            Session::Active(state) => Some(state),
            Session::Loading => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    /// Leaves the practice screen.
    pub fn reset(&mut self) {
        self.session = Session::Loading;
    }

    /// Opens the session for `(show_id, episode)`, replacing any active one.
    /// The saved position is read by its leading integer (`"1.5"` is 1) and
    /// used only if it falls inside the line range; anything else starts at
    /// the first line.
    pub fn initialize(
        &mut self,
        catalog: &Catalog,
        show_id: &str,
        episode: u32,
    ) -> Result<&SessionState, SessionError> {
        self.session = Session::Loading;

        let show = catalog
            .show_by_id(show_id)
            .ok_or_else(|| SessionError::UnknownShow(show_id.to_string()))?;
        let lines = catalog.lines_by_show_and_episode(show_id, episode);
        if lines.is_empty() {
            return Err(SessionError::NoLines {
                show: show_id.to_string(),
                episode,
            });
        }

        let current_index = self.saved_index(show_id, episode, lines.len()).unwrap_or(0);
        log::debug!(
            "Session {show_id} ep{episode}: {} lines, starting at {current_index}",
            lines.len()
        );

        self.session = Session::Active(SessionState {
            show_id: show_id.to_string(),
            episode,
            lines,
            current_index,
            show_title: show.title.clone(),
            episode_title: catalog.episode_title(show_id, episode),
        });
        match &self.session {
            Session::Active(state) => Ok(state),
            Session::Loading => Err(SessionError::NotActive),
        }
    }

    fn saved_index(&self, show_id: &str, episode: u32, len: usize) -> Option<usize> {
        let key = progress_key(&self.config.storage_namespace, show_id, episode);
        let raw = match self.store.read(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Could not read saved progress {key}: {e}");
                return None;
            }
        };
        match parse_int_prefix(&raw).and_then(|v| usize::try_from(v).ok()) {
            Some(idx) if idx < len => Some(idx),
            _ => {
                log::info!("Ignoring saved progress {key}={raw:?}");
                None
            }
        }
    }

    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let Session::Active(state) = &mut self.session else {
            return Err(SessionError::NotActive);
        };
        if state.current_index + 1 < state.lines.len() {
            state.current_index += 1;
            let idx = state.current_index;
            self.persist();
            Ok(Advance::Moved(idx))
        } else {
            Ok(Advance::Complete)
        }
    }

    pub fn retreat(&mut self) -> Result<Retreat, SessionError> {
        let Session::Active(state) = &mut self.session else {
            return Err(SessionError::NotActive);
        };
        if state.current_index > 0 {
            state.current_index -= 1;
            let idx = state.current_index;
            self.persist();
            Ok(Retreat::Moved(idx))
        } else {
            Ok(Retreat::ExitToEpisodeList(Route::episodes_or_home(Some(
                &state.show_id,
            ))))
        }
    }

    /// Best effort: a failing store leaves the in-memory session untouched.
    fn persist(&mut self) {
        let Session::Active(state) = &self.session else {
            return;
        };
        let key = progress_key(&self.config.storage_namespace, &state.show_id, state.episode);
        if let Err(e) = self.store.write(&key, &state.current_index.to_string()) {
            log::warn!("Could not save progress {key}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::fixture;
    use crate::storage::MemoryStore;

    const KEY: &str = "translationProgress_show-1_ep2";

    fn controller(store: MemoryStore) -> SessionController<MemoryStore> {
        SessionController::new(store, PracticeConfig::default())
    }

    #[test]
    fn starts_at_zero_without_saved_progress() {
        let mut c = controller(MemoryStore::new());
        let state = c.initialize(&fixture(), "show-1", 2).unwrap();
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.position(), (1, 3));
        assert_eq!(state.show_title, "Show One");
        assert_eq!(state.episode_title, "Second");
        assert_eq!(c.store().get(KEY), None, "initialize must not write");
    }

    #[test]
    fn restores_valid_saved_progress() {
        let mut c = controller(MemoryStore::new().with_entry(KEY, "2"));
        let state = c.initialize(&fixture(), "show-1", 2).unwrap();
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.current_line().source_text, "さようなら");
    }

    #[test]
    fn ignores_invalid_saved_progress() {
        for bad in ["3", "99", "-1", "abc", "", ".5"] {
            let mut c = controller(MemoryStore::new().with_entry(KEY, bad));
            let state = c.initialize(&fixture(), "show-1", 2).unwrap();
            assert_eq!(state.current_index(), 0, "saved value {bad:?}");
        }
    }

    #[test]
    fn saved_progress_reads_leading_integer() {
        for (saved, expected) in [("1.5", 1), ("2abc", 2), (" 1", 1), ("+2", 2)] {
            let mut c = controller(MemoryStore::new().with_entry(KEY, saved));
            let state = c.initialize(&fixture(), "show-1", 2).unwrap();
            assert_eq!(state.current_index(), expected, "saved value {saved:?}");
        }
    }

    #[test]
    fn unreadable_store_starts_at_zero() {
        let mut c = controller(MemoryStore::failing());
        let state = c.initialize(&fixture(), "show-1", 2).unwrap();
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn not_found_conditions() {
        let mut c = controller(MemoryStore::new());
        let err = c.initialize(&fixture(), "missing", 1).unwrap_err();
        assert_eq!(err.fallback(), Route::Home);
        assert_eq!(c.session(), &Session::Loading);

        let err = c.initialize(&fixture(), "show-1", 5).unwrap_err();
        assert_eq!(
            err.fallback(),
            Route::Episodes { show: "show-1".into() }
        );
    }

    #[test]
    fn advance_moves_and_persists_until_last_line() {
        let mut c = controller(MemoryStore::new());
        c.initialize(&fixture(), "show-1", 2).unwrap();
        assert_eq!(c.advance().unwrap(), Advance::Moved(1));
        assert_eq!(c.store().get(KEY), Some("1"));
        assert_eq!(c.advance().unwrap(), Advance::Moved(2));
        assert_eq!(c.store().get(KEY), Some("2"));
        assert_eq!(c.advance().unwrap(), Advance::Complete);
        assert_eq!(c.state().unwrap().current_index(), 2);
        assert_eq!(c.store().get(KEY), Some("2"));
    }

    #[test]
    fn retreat_at_first_line_exits_to_episode_list() {
        let mut c = controller(MemoryStore::new());
        c.initialize(&fixture(), "show-1", 2).unwrap();
        assert_eq!(
            c.retreat().unwrap(),
            Retreat::ExitToEpisodeList(Route::Episodes { show: "show-1".into() })
        );
        assert_eq!(c.state().unwrap().current_index(), 0);
        assert_eq!(c.store().get(KEY), None);
    }

    #[test]
    fn next_next_previous_lands_on_second_line() {
        let mut c = controller(MemoryStore::new());
        c.initialize(&fixture(), "show-1", 2).unwrap();
        c.advance().unwrap();
        c.advance().unwrap();
        assert_eq!(c.retreat().unwrap(), Retreat::Moved(1));
        assert_eq!(c.state().unwrap().position(), (2, 3));
        assert_eq!(c.store().get(KEY), Some("1"));
    }

    #[test]
    fn persisted_index_round_trips_through_initialize() {
        let mut c = controller(MemoryStore::new());
        let catalog = fixture();
        c.initialize(&catalog, "show-1", 2).unwrap();
        c.advance().unwrap();
        c.reset();
        assert!(c.state().is_none());
        let state = c.initialize(&catalog, "show-1", 2).unwrap();
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn write_failures_do_not_stop_the_session() {
        let mut c = controller(MemoryStore::failing());
        c.initialize(&fixture(), "show-1", 2).unwrap();
        assert_eq!(c.advance().unwrap(), Advance::Moved(1));
        assert_eq!(c.retreat().unwrap(), Retreat::Moved(0));
    }

    #[test]
    fn reinitialize_replaces_session() {
        let mut c = controller(MemoryStore::new());
        let catalog = fixture();
        c.initialize(&catalog, "show-1", 2).unwrap();
        c.advance().unwrap();
        let state = c.initialize(&catalog, "show-1", 1).unwrap();
        assert_eq!(state.episode(), 1);
        assert_eq!(state.lines().len(), 1);
        assert_eq!(state.current_index(), 0);
        assert_eq!(c.advance().unwrap(), Advance::Complete);
    }

    #[test]
    fn navigation_without_session_is_rejected() {
        let mut c = controller(MemoryStore::new());
        assert_eq!(c.advance(), Err(SessionError::NotActive));
        assert_eq!(c.retreat(), Err(SessionError::NotActive));
    }

    #[test]
    fn progress_and_completion_text() {
        let mut c = controller(MemoryStore::new());
        let state = c.initialize(&fixture(), "show-1", 2).unwrap();
        assert!((state.progress_percent() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            state.completion_message(),
            "恭喜您完成了《Show One - Second》的所有翻译练习！"
        );
    }
}
