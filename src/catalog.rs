//! Static content catalog: shows, their episodes and the practice lines drawn
//! from each episode's script.
//!
//! The bundled catalog lives in `data/catalog.json` and is parsed once on first
//! access. Everything handed out from here is read-only; sessions clone the
//! lines they need for one episode.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Difficulty tag attached to every practice line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// One bilingual line pair. `source_text` is Japanese, `target_text` Chinese.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeLine {
    pub show_id: String,
    pub episode: u32,
    #[serde(rename = "japanese")]
    pub source_text: String,
    #[serde(rename = "chinese")]
    pub target_text: String,
    #[serde(rename = "romaji", default)]
    pub transliteration: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub episode_count: u32,
    #[serde(default)]
    episodes: Vec<EpisodeDesc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct EpisodeDesc {
    number: u32,
    #[serde(default)]
    title: Option<String>,
}

/// Entry of a show's episode list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub number: u32,
    pub title: String,
    pub line_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid catalog entry: {0}")]
    Invalid(String),
}

#[derive(Deserialize)]
struct CatalogDoc {
    shows: Vec<Show>,
    lines: Vec<PracticeLine>,
}

/// Read-only lookup over shows and lines.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    shows: Vec<Show>,
    lines: Vec<PracticeLine>,
}

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Title used when the catalog has none for an episode.
pub fn fallback_episode_title(episode: u32) -> String {
    format!("第{episode}集")
}

impl Catalog {
    pub fn new(shows: Vec<Show>, lines: Vec<PracticeLine>) -> Result<Self, CatalogError> {
        for line in &lines {
            if line.episode < 1 {
                return Err(CatalogError::Invalid(format!(
                    "line in show '{}' has episode number 0",
                    line.show_id
                )));
            }
            if line.source_text.trim().is_empty() || line.target_text.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "line in show '{}' episode {} has empty text",
                    line.show_id, line.episode
                )));
            }
        }
        Ok(Self { shows, lines })
    }

    pub fn from_json(doc: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDoc = serde_json::from_str(doc)?;
        Self::new(doc.shows, doc.lines)
    }

    /// Catalog bundled into the binary. Parsed on first use; a broken document
    /// is logged and leaves the catalog empty.
    pub fn builtin() -> &'static Catalog {
        use std::sync::OnceLock;
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::from_json(BUILTIN_CATALOG).unwrap_or_else(|e| {
                log::error!("Error loading bundled catalog: {e}");
                Catalog::default()
            })
        })
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn show_by_id(&self, id: &str) -> Option<&Show> {
        self.shows.iter().find(|s| s.id == id)
    }

    /// Episodes of a show ordered by number. Episodes that only exist through
    /// their lines are listed too.
    pub fn episodes_by_show(&self, show_id: &str) -> Vec<EpisodeSummary> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        if let Some(show) = self.show_by_id(show_id) {
            for ep in &show.episodes {
                counts.entry(ep.number).or_insert(0);
            }
        }
        for line in self.lines.iter().filter(|l| l.show_id == show_id) {
            *counts.entry(line.episode).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(number, line_count)| EpisodeSummary {
                number,
                title: self.episode_title(show_id, number),
                line_count,
            })
            .collect()
    }

    pub fn lines_by_show_and_episode(&self, show_id: &str, episode: u32) -> Vec<PracticeLine> {
        self.lines
            .iter()
            .filter(|l| l.show_id == show_id && l.episode == episode)
            .cloned()
            .collect()
    }

    pub fn episode_title(&self, show_id: &str, episode: u32) -> String {
        self.show_by_id(show_id)
            .and_then(|s| s.episodes.iter().find(|e| e.number == episode))
            .and_then(|e| e.title.clone())
            .unwrap_or_else(|| fallback_episode_title(episode))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn line(show: &str, episode: u32, ja: &str, zh: &str) -> PracticeLine {
        PracticeLine {
            show_id: show.to_string(),
            episode,
            source_text: ja.to_string(),
            target_text: zh.to_string(),
            transliteration: None,
            difficulty: Difficulty::Easy,
            context: None,
        }
    }

    pub(crate) fn show(id: &str, title: &str) -> Show {
        Show {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            cover_image: String::new(),
            episode_count: 2,
            episodes: vec![EpisodeDesc {
                number: 2,
                title: Some("Second".to_string()),
            }],
        }
    }

    /// Two-episode fixture: show-1 ep 1 has one line, ep 2 has three.
    pub(crate) fn fixture() -> Catalog {
        Catalog::new(
            vec![show("show-1", "Show One")],
            vec![
                line("show-1", 1, "はい", "是"),
                line("show-1", 2, "おはようございます", "早上好"),
                line("show-1", 2, "ありがとう", "谢谢"),
                line("show-1", 2, "さようなら", "再见"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn builtin_catalog_parses() {
        let cat = Catalog::builtin();
        assert!(!cat.shows().is_empty());
        for show in cat.shows() {
            let eps = cat.episodes_by_show(&show.id);
            assert!(!eps.is_empty(), "show {} has no episodes", show.id);
            for ep in eps {
                assert_eq!(
                    ep.line_count,
                    cat.lines_by_show_and_episode(&show.id, ep.number).len()
                );
            }
        }
    }

    #[test]
    fn lookups_filter_by_show_and_episode() {
        let cat = fixture();
        assert!(cat.show_by_id("show-1").is_some());
        assert!(cat.show_by_id("nope").is_none());
        let lines = cat.lines_by_show_and_episode("show-1", 2);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].source_text, "ありがとう");
        assert!(cat.lines_by_show_and_episode("show-1", 9).is_empty());
    }

    #[test]
    fn episode_titles_fall_back_to_number() {
        let cat = fixture();
        assert_eq!(cat.episode_title("show-1", 2), "Second");
        assert_eq!(cat.episode_title("show-1", 1), "第1集");
        let eps = cat.episodes_by_show("show-1");
        assert_eq!(
            eps,
            vec![
                EpisodeSummary { number: 1, title: "第1集".into(), line_count: 1 },
                EpisodeSummary { number: 2, title: "Second".into(), line_count: 3 },
            ]
        );
    }

    #[test]
    fn rejects_empty_text() {
        let err = Catalog::new(vec![], vec![line("s", 1, " ", "x")]).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let doc = r#"{"shows":[],"lines":[{"showId":"a","episode":1,"japanese":"はい","chinese":"是","difficulty":"hard"}]}"#;
        let cat = Catalog::from_json(doc).unwrap();
        let l = &cat.lines_by_show_and_episode("a", 1)[0];
        assert_eq!(l.transliteration, None);
        assert_eq!(l.context, None);
        assert_eq!(l.difficulty, Difficulty::Hard);
    }
}
