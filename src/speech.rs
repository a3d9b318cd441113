//! Text-to-speech behind a small trait so card logic can run without a
//! browser. A successful `speak` hands back a [`SpeechHandle`], a future that
//! resolves once playback ends.

use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech synthesis unavailable")]
    Unavailable,
    #[error("speech request failed: {0}")]
    Failed(String),
}

pub trait SpeechEngine {
    fn is_available(&self) -> bool;
    fn speak(&mut self, text: &str, lang: &str) -> Result<SpeechHandle, SpeechError>;
}

/// Completion of one utterance. Resolves when the engine signals the end of
/// playback or drops its side of the channel.
#[derive(Debug)]
pub struct SpeechHandle {
    done: oneshot::Receiver<()>,
}

/// Engine side of a [`SpeechHandle`].
#[derive(Debug)]
pub struct SpeechCompleter {
    done: oneshot::Sender<()>,
}

impl SpeechHandle {
    pub fn pair() -> (SpeechCompleter, SpeechHandle) {
        let (tx, rx) = oneshot::channel();
        (SpeechCompleter { done: tx }, SpeechHandle { done: rx })
    }

    /// Non-blocking check.
    pub fn try_finished(&mut self) -> bool {
        !matches!(self.done.try_recv(), Ok(None))
    }
}

impl SpeechCompleter {
    pub fn complete(self) {
        // receiver may already be gone if the card was discarded
        let _ = self.done.send(());
    }
}

impl Future for SpeechHandle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Pin::new(&mut self.done).poll(cx).map(|_| ())
    }
}

/// Engine for hosts without speech synthesis.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeech;

impl SpeechEngine for NullSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str, _lang: &str) -> Result<SpeechHandle, SpeechError> {
        Err(SpeechError::Unavailable)
    }
}

/// `window.speechSynthesis`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserSpeech {
    synth: Option<web_sys::SpeechSynthesis>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserSpeech {
    pub fn new() -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            log::warn!("speechSynthesis not available; speak button disabled");
        }
        Self { synth }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for BrowserSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl SpeechEngine for BrowserSpeech {
    fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    fn speak(&mut self, text: &str, lang: &str) -> Result<SpeechHandle, SpeechError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::prelude::*;

        let synth = self.synth.as_ref().ok_or(SpeechError::Unavailable)?;
        let utterance = web_sys::SpeechSynthesisUtterance::new_with_text(text)
            .map_err(|e| SpeechError::Failed(format!("{e:?}")))?;
        utterance.set_lang(lang);

        let (completer, handle) = SpeechHandle::pair();
        let mut completer = Some(completer);
        let on_end = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Some(c) = completer.take() {
                c.complete();
            }
        }) as Box<dyn FnMut(_)>);
        utterance.set_onend(Some(on_end.as_ref().unchecked_ref()));
        // utterance holds the only JS reference; leak the Rust side with it
        on_end.forget();

        synth.speak(&utterance);
        Ok(handle)
    }
}
