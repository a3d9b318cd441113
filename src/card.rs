//! Per-line card state: the learner's draft, answer visibility, translation
//! direction and whether speech is playing. A fresh `CardState` is used for
//! every displayed line.

use crate::catalog::PracticeLine;
use crate::config::PracticeConfig;
use crate::speech::{SpeechEngine, SpeechHandle};

/// Which side of the line pair is shown as the prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Japanese prompt, Chinese answer.
    #[default]
    SourceToTarget,
    /// Chinese prompt, Japanese answer.
    TargetToSource,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::SourceToTarget => Direction::TargetToSource,
            Direction::TargetToSource => Direction::SourceToTarget,
        }
    }

    pub fn prompt_text(self, line: &PracticeLine) -> &str {
        match self {
            Direction::SourceToTarget => &line.source_text,
            Direction::TargetToSource => &line.target_text,
        }
    }

    pub fn answer_text(self, line: &PracticeLine) -> &str {
        match self {
            Direction::SourceToTarget => &line.target_text,
            Direction::TargetToSource => &line.source_text,
        }
    }

    /// Language tag of the prompt text.
    pub fn language_tag(self, config: &PracticeConfig) -> &str {
        match self {
            Direction::SourceToTarget => &config.source_lang,
            Direction::TargetToSource => &config.target_lang,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    NoFeedback,
    Positive,
    NeedsWork,
}

impl Feedback {
    pub fn message(self) -> Option<&'static str> {
        match self {
            Feedback::NoFeedback => None,
            Feedback::Positive => Some("翻译得不错！意思基本准确。"),
            Feedback::NeedsWork => Some("可以再尝试改进一下，注意语句的自然流畅度。"),
        }
    }
}

/// Length heuristic only: a non-blank draft longer than `ratio` times the
/// reference answer (in chars) is `Positive`. The draft is measured untrimmed.
pub fn compute_feedback(draft: &str, target: &str, ratio: f64) -> Feedback {
    if draft.trim().is_empty() {
        return Feedback::NoFeedback;
    }
    let draft_len = draft.chars().count() as f64;
    let target_len = target.chars().count() as f64;
    if draft_len > target_len * ratio {
        Feedback::Positive
    } else {
        Feedback::NeedsWork
    }
}

/// User intents the card forwards to its session owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardIntent {
    Next,
    Previous,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardState {
    draft: String,
    answer_revealed: bool,
    direction: Direction,
    speaking: bool,
}

impl CardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speaking(&self) -> bool {
        self.speaking
    }

    /// Called when the displayed line changes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A draft written for one direction is meaningless in the other, so the
    /// draft and the revealed answer are cleared.
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
        self.draft.clear();
        self.answer_revealed = false;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn toggle_answer(&mut self) {
        self.answer_revealed = !self.answer_revealed;
    }

    /// Speaks the prompt text in its language. Ignored while a previous
    /// utterance is still playing or when the engine has no speech support.
    /// The caller passes the returned handle's completion to
    /// [`finish_speech`](Self::finish_speech).
    pub fn request_speech(
        &mut self,
        line: &PracticeLine,
        config: &PracticeConfig,
        engine: &mut dyn SpeechEngine,
    ) -> Option<SpeechHandle> {
        if self.speaking || !engine.is_available() {
            return None;
        }
        let text = self.direction.prompt_text(line);
        let lang = self.direction.language_tag(config);
        match engine.speak(text, lang) {
            Ok(handle) => {
                self.speaking = true;
                Some(handle)
            }
            Err(e) => {
                log::warn!("Speech request failed: {e}");
                None
            }
        }
    }

    pub fn finish_speech(&mut self) {
        self.speaking = false;
    }

    /// Feedback against the line's Chinese text whichever way the card faces;
    /// only surfaced once the answer is revealed.
    pub fn visible_feedback(&self, line: &PracticeLine, config: &PracticeConfig) -> Feedback {
        if !self.answer_revealed {
            return Feedback::NoFeedback;
        }
        compute_feedback(&self.draft, &line.target_text, config.similarity_ratio)
    }
}
