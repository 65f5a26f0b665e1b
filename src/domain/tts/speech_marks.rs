use crate::error::{TtsError, TtsResult};
use serde::{Deserialize, Serialize};

/// One Polly speech mark, e.g. `{"time":6,"type":"word","start":0,"end":5,"value":"Hello"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechMark {
    pub time: u64,
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub end: Option<u64>,
    pub value: serde_json::Value,
}

/// Parse a newline-delimited JSON speech mark payload.
///
/// Blank lines are skipped. Offsets (`time`, `start`, `end`) are relative to the start of
/// one synthesis call; converters only request marks for text that fits in one chunk.
pub fn parse_speech_marks(payload: &[u8]) -> TtsResult<Vec<SpeechMark>> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| TtsError::Provider(format!("Speech marks are not UTF-8: {}", e)))?;

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<SpeechMark>(line)
                .map_err(|e| TtsError::Provider(format!("Malformed speech mark {:?}: {}", line, e)))
        })
        .collect()
}
