use crate::error::{TtsError, TtsResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Content kind submitted to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    /// Plain text
    #[default]
    Text,
    /// Speech Synthesis Markup Language, passed through as opaque content
    Ssml,
}

impl TextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextType::Text => "text",
            TextType::Ssml => "ssml",
        }
    }
}

impl FromStr for TextType {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(TextType::Text),
            "ssml" | "markup" => Ok(TextType::Ssml),
            other => Err(TtsError::InvalidArgument(format!(
                "unsupported text type: {}",
                other
            ))),
        }
    }
}

/// Audio container/encoding requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    #[default]
    Mp3,
    OggVorbis,
    OggOpus,
    /// Raw 16-bit signed little-endian samples
    Pcm,
    /// LINEAR16 with a WAV header
    Wav,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::OggVorbis => "ogg_vorbis",
            AudioFormat::OggOpus => "ogg_opus",
            AudioFormat::Pcm => "pcm",
            AudioFormat::Wav => "wav",
        }
    }

    /// File extension used when the payload is persisted
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::OggVorbis | AudioFormat::OggOpus => "ogg",
            AudioFormat::Pcm => "pcm",
            AudioFormat::Wav => "wav",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp3" | "mpeg" => Ok(AudioFormat::Mp3),
            "ogg_vorbis" | "ogg" | "vorbis" => Ok(AudioFormat::OggVorbis),
            "ogg_opus" | "opus" => Ok(AudioFormat::OggOpus),
            "pcm" | "raw" => Ok(AudioFormat::Pcm),
            "wav" | "linear16" => Ok(AudioFormat::Wav),
            other => Err(TtsError::InvalidArgument(format!(
                "unsupported audio format: {}",
                other
            ))),
        }
    }
}

/// Content of a persisted conversion result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredFormat {
    Audio(AudioFormat),
    /// Newline-delimited JSON speech marks
    SpeechMarks,
}

impl StoredFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StoredFormat::Audio(format) => format.extension(),
            StoredFormat::SpeechMarks => "json",
        }
    }
}

impl std::fmt::Display for StoredFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoredFormat::Audio(format) => write!(f, "{}", format),
            StoredFormat::SpeechMarks => write!(f, "speech_marks"),
        }
    }
}

/// Synthesis engine (only honored by Polly)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    #[default]
    Standard,
    Neural,
    LongForm,
    Generative,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Standard => "standard",
            Engine::Neural => "neural",
            Engine::LongForm => "long-form",
            Engine::Generative => "generative",
        }
    }
}

impl FromStr for Engine {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Engine::Standard),
            "neural" => Ok(Engine::Neural),
            "long-form" | "longform" | "long_form" => Ok(Engine::LongForm),
            "generative" => Ok(Engine::Generative),
            other => Err(TtsError::InvalidArgument(format!(
                "unsupported engine: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
}

impl FromStr for VoiceGender {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(VoiceGender::Male),
            "female" => Ok(VoiceGender::Female),
            "neutral" => Ok(VoiceGender::Neutral),
            other => Err(TtsError::InvalidArgument(format!(
                "unsupported voice gender: {}",
                other
            ))),
        }
    }
}

/// Polly speech mark kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechMarkType {
    Sentence,
    Ssml,
    Viseme,
    Word,
}

impl SpeechMarkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechMarkType::Sentence => "sentence",
            SpeechMarkType::Ssml => "ssml",
            SpeechMarkType::Viseme => "viseme",
            SpeechMarkType::Word => "word",
        }
    }
}

impl FromStr for SpeechMarkType {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sentence" => Ok(SpeechMarkType::Sentence),
            "ssml" => Ok(SpeechMarkType::Ssml),
            "viseme" => Ok(SpeechMarkType::Viseme),
            "word" => Ok(SpeechMarkType::Word),
            other => Err(TtsError::InvalidArgument(format!(
                "unsupported speech mark type: {}",
                other
            ))),
        }
    }
}

/// How a source identifier is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The identifier is the text itself
    #[default]
    Text,
    /// The identifier is a path to a UTF-8 file
    Path,
    /// The identifier is a URL whose HTML is converted to text
    Website,
}

impl FromStr for SourceKind {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(SourceKind::Text),
            "path" | "file" => Ok(SourceKind::Path),
            "website" | "url" => Ok(SourceKind::Website),
            other => Err(TtsError::InvalidArgument(format!(
                "unsupported source kind: {}",
                other
            ))),
        }
    }
}

/// Per-call options. Every field falls back to the driver configuration when unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisOptions {
    pub voice: Option<String>,
    pub format: Option<AudioFormat>,
    pub engine: Option<Engine>,
    pub language: Option<String>,
    pub text_type: Option<TextType>,
    pub gender: Option<VoiceGender>,
    pub speech_marks: Vec<SpeechMarkType>,
    pub source: Option<SourceKind>,
    pub filename: Option<String>,
}

impl SynthesisOptions {
    /// Build options from loosely typed key/value pairs.
    ///
    /// Recognized keys: `voice`, `format`, `engine`, `language`, `text_type`,
    /// `gender`, `speech_marks` (comma separated), `source`, `filename`.
    /// Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when a recognized key carries a malformed value.
    pub fn from_map(map: &HashMap<String, String>) -> TtsResult<Self> {
        let mut options = SynthesisOptions::default();

        for (key, value) in map {
            match key.as_str() {
                "voice" => options.voice = Some(value.clone()),
                "format" => options.format = Some(value.parse()?),
                "engine" => options.engine = Some(value.parse()?),
                "language" => options.language = Some(value.clone()),
                "text_type" => options.text_type = Some(value.parse()?),
                "gender" => options.gender = Some(value.parse()?),
                "speech_marks" => {
                    options.speech_marks = value
                        .split(',')
                        .filter(|mark| !mark.trim().is_empty())
                        .map(str::parse::<SpeechMarkType>)
                        .collect::<TtsResult<Vec<_>>>()?;
                }
                "source" => options.source = Some(value.parse()?),
                "filename" => options.filename = Some(value.clone()),
                other => tracing::debug!(key = other, "Ignoring unrecognized option"),
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Reject values no provider could accept
    pub fn validate(&self) -> TtsResult<()> {
        if matches!(&self.voice, Some(v) if v.trim().is_empty()) {
            return Err(TtsError::InvalidArgument("voice must not be empty".to_string()));
        }
        if matches!(&self.language, Some(l) if l.trim().is_empty()) {
            return Err(TtsError::InvalidArgument(
                "language must not be empty".to_string(),
            ));
        }
        if let Some(filename) = &self.filename {
            if filename.trim().is_empty()
                || filename.contains('/')
                || filename.contains('\\')
                || filename.contains("..")
            {
                return Err(TtsError::InvalidArgument(format!(
                    "invalid filename: {:?}",
                    filename
                )));
            }
        }
        Ok(())
    }

    pub fn has_speech_marks(&self) -> bool {
        !self.speech_marks.is_empty()
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_text_type(mut self, text_type: TextType) -> Self {
        self.text_type = Some(text_type);
        self
    }

    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_speech_marks(mut self, marks: Vec<SpeechMarkType>) -> Self {
        self.speech_marks = marks;
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// A single conversion: resolved text plus the options it was requested with
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    text: String,
    options: SynthesisOptions,
    text_type: TextType,
}

impl SynthesisRequest {
    pub fn new(text: String, options: SynthesisOptions, default_text_type: TextType) -> Self {
        let text_type = options.text_type.unwrap_or(default_text_type);
        Self {
            text,
            options,
            text_type,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    pub fn text_type(&self) -> TextType {
        self.text_type
    }

    /// Length in characters, the unit providers limit on
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
