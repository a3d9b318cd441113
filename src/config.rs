//! Runtime settings for a practice session. The host page may pass a JSON
//! override to `start_app`; anything omitted keeps its default.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PracticeConfig {
    /// Prefix of the local-storage progress keys.
    pub storage_namespace: String,
    /// Draft must be longer than this fraction of the reference answer to
    /// count as a good attempt.
    pub similarity_ratio: f64,
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            storage_namespace: "translationProgress".to_string(),
            similarity_ratio: 0.7,
            source_lang: "ja-JP".to_string(),
            target_lang: "zh-CN".to_string(),
        }
    }
}

impl PracticeConfig {
    pub fn from_json(doc: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(doc)
    }
}
