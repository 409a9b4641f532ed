//! Single-shot speech-to-text through the browser's SpeechRecognition API

use crate::error::{ClientError, Result};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// How long "Recorded!" / "Recording failed" stays visible
pub const VOICE_STATUS_MILLIS: u32 = 1500;

const RECOGNITION_LANG: &str = "en-US";
const CONSTRUCTOR_NAMES: [&str; 2] = ["SpeechRecognition", "webkitSpeechRecognition"];

/// Progress of a capture as shown in the status popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceStatus {
    #[default]
    Idle,
    Recording,
    Recorded,
    Failed,
}

impl VoiceStatus {
    pub fn label(self) -> Option<&'static str> {
        match self {
            VoiceStatus::Idle => None,
            VoiceStatus::Recording => Some("Recording started..."),
            VoiceStatus::Recorded => Some("Recorded!"),
            VoiceStatus::Failed => Some("Recording failed"),
        }
    }

    /// Apply a recognition event.
    pub fn next(self, event: &VoiceEvent) -> Self {
        match (self, event) {
            (_, VoiceEvent::Transcript(_)) => VoiceStatus::Recorded,
            (_, VoiceEvent::Failed) => VoiceStatus::Failed,
            // Ended without a result or an error
            (VoiceStatus::Recording, VoiceEvent::Ended) => VoiceStatus::Recorded,
            (status, VoiceEvent::Ended) => status,
        }
    }

    /// Whether the popup should be cleared after [`VOICE_STATUS_MILLIS`]
    pub fn is_settled(self) -> bool {
        matches!(self, VoiceStatus::Recorded | VoiceStatus::Failed)
    }
}

/// Callback payloads from the recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Transcript(String),
    Failed,
    Ended,
}

/// A running recognition session. Dropping it aborts recognition and
/// detaches the callbacks.
pub struct VoiceCapture {
    recognition: JsValue,
    _on_result: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
    _on_end: Closure<dyn FnMut(JsValue)>,
}

impl VoiceCapture {
    /// Start listening; `on_event` receives the transcript, failure, and end.
    pub fn start(on_event: impl Fn(VoiceEvent) + Clone + 'static) -> Result<Self> {
        let ctor = recognition_constructor().ok_or(ClientError::Unsupported("Voice recognition"))?;
        let recognition = Reflect::construct(&ctor, &Array::new()).map_err(js_error)?;

        set(&recognition, "lang", &JsValue::from_str(RECOGNITION_LANG))?;
        set(&recognition, "interimResults", &JsValue::FALSE)?;
        set(&recognition, "maxAlternatives", &JsValue::from(1))?;

        let emit = on_event.clone();
        let on_result = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            match first_transcript(&event) {
                Some(text) => emit(VoiceEvent::Transcript(text)),
                None => emit(VoiceEvent::Failed),
            }
        });
        let emit = on_event.clone();
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let reason = Reflect::get(&event, &JsValue::from_str("error"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            tracing::warn!("Voice recognition failed: {}", reason);
            emit(VoiceEvent::Failed);
        });
        let emit = on_event;
        let on_end = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
            emit(VoiceEvent::Ended);
        });

        set(&recognition, "onresult", on_result.as_ref())?;
        set(&recognition, "onerror", on_error.as_ref())?;
        set(&recognition, "onend", on_end.as_ref())?;

        call_method(&recognition, "start")?;
        tracing::debug!("Voice recognition started");

        Ok(Self {
            recognition,
            _on_result: on_result,
            _on_error: on_error,
            _on_end: on_end,
        })
    }
}

impl Drop for VoiceCapture {
    fn drop(&mut self) {
        for handler in ["onresult", "onerror", "onend"] {
            let _ = Reflect::set(&self.recognition, &JsValue::from_str(handler), &JsValue::NULL);
        }
        let _ = call_method(&self.recognition, "abort");
    }
}

fn recognition_constructor() -> Option<Function> {
    let window = web_sys::window()?;
    CONSTRUCTOR_NAMES.iter().find_map(|name| {
        Reflect::get(&window, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok())
    })
}

/// `event.results[0][0].transcript`
fn first_transcript(event: &JsValue) -> Option<String> {
    let results = Reflect::get(event, &JsValue::from_str("results")).ok()?;
    let first = Reflect::get_u32(&results, 0).ok()?;
    let alternative = Reflect::get_u32(&first, 0).ok()?;
    Reflect::get(&alternative, &JsValue::from_str("transcript"))
        .ok()?
        .as_string()
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_error)
}

fn call_method(target: &JsValue, name: &str) -> Result<()> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    method.call0(target).map(|_| ()).map_err(js_error)
}

/// The recognizer exists but refused to start (e.g. already listening,
/// microphone blocked).
fn js_error(e: JsValue) -> ClientError {
    tracing::error!("Voice recognition error: {:?}", e);
    let detail = e.as_string().or_else(|| {
        Reflect::get(&e, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
    });
    start_failure(detail)
}

fn start_failure(detail: Option<String>) -> ClientError {
    match detail.filter(|d| !d.trim().is_empty()) {
        Some(detail) => ClientError::Rejected(format!("Could not start voice recognition: {}", detail)),
        None => ClientError::Rejected("Could not start voice recognition".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_failure_is_not_reported_as_unsupported() {
        let err = start_failure(Some("recognition has already started".into()));
        assert!(matches!(err, ClientError::Rejected(_)));
        assert_eq!(
            err.to_string(),
            "Could not start voice recognition: recognition has already started"
        );
        assert_ne!(
            start_failure(None).to_string(),
            ClientError::Unsupported("Voice recognition").to_string()
        );
    }

    #[test]
    fn transcript_settles_as_recorded() {
        let status = VoiceStatus::Recording.next(&VoiceEvent::Transcript("hello".into()));
        assert_eq!(status, VoiceStatus::Recorded);
        assert_eq!(status.label(), Some("Recorded!"));
        assert!(status.is_settled());
    }

    #[test]
    fn error_then_end_stays_failed() {
        let status = VoiceStatus::Recording
            .next(&VoiceEvent::Failed)
            .next(&VoiceEvent::Ended);
        assert_eq!(status, VoiceStatus::Failed);
        assert_eq!(status.label(), Some("Recording failed"));
    }

    #[test]
    fn silent_end_counts_as_recorded() {
        assert_eq!(
            VoiceStatus::Recording.next(&VoiceEvent::Ended),
            VoiceStatus::Recorded
        );
        assert_eq!(VoiceStatus::Idle.next(&VoiceEvent::Ended), VoiceStatus::Idle);
        assert!(!VoiceStatus::Recording.is_settled());
        assert_eq!(VoiceStatus::Idle.label(), None);
    }
}
