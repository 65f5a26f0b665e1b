use crate::domain::tts::language::{DEFAULT_LANGUAGE, DEFAULT_POLLY_VOICE};
use crate::domain::tts::{AudioFormat, Engine, SourceKind, TextType, VoiceGender};
use crate::error::{TtsError, TtsResult};
use crate::infrastructure::repositories::google_tts_repository::{
    GOOGLE_CHUNK_LIMIT, GOOGLE_TTS_ENDPOINT,
};
use crate::infrastructure::repositories::polly_tts_repository::POLLY_CHUNK_LIMIT;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub tts: TtsConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TtsConfig {
    /// Driver used when none is named explicitly; `None` means `null`
    pub driver: Option<String>,
    pub language: String,
    pub output_format: AudioFormat,
    pub text_type: TextType,
    pub source: SourceKind,
    pub storage: StorageConfig,
    pub polly: PollyConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollyConfig {
    pub region: String,
    pub access_key_id: Option<Secret>,
    pub secret_access_key: Option<Secret>,
    pub session_token: Option<Secret>,
    pub voice: String,
    pub engine: Engine,
    pub chunk_limit: usize,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoogleConfig {
    pub api_key: Option<Secret>,
    pub access_token: Option<Secret>,
    pub voice: Option<String>,
    pub gender: VoiceGender,
    pub chunk_limit: usize,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Credential value that never shows up in logs
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(****)")
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            driver: None,
            language: DEFAULT_LANGUAGE.to_string(),
            output_format: AudioFormat::Mp3,
            text_type: TextType::Text,
            source: SourceKind::Text,
            storage: StorageConfig::default(),
            polly: PollyConfig::default(),
            google: GoogleConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage"),
            directory: "TTS".to_string(),
        }
    }
}

impl Default for PollyConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            voice: DEFAULT_POLLY_VOICE.to_string(),
            engine: Engine::Standard,
            chunk_limit: POLLY_CHUNK_LIMIT,
            endpoint_url: None,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            voice: None,
            gender: VoiceGender::Male,
            chunk_limit: GOOGLE_CHUNK_LIMIT,
            endpoint: GOOGLE_TTS_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> TtsResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset. Malformed values fail with `Configuration`.
    pub fn from_lookup<F>(lookup: F) -> TtsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = TtsConfig::default();

        let tts = TtsConfig {
            driver: get("TTS_DRIVER").map(|driver| driver.to_lowercase()),
            language: get("TTS_LANGUAGE").unwrap_or(defaults.language),
            output_format: parse_or(&get, "TTS_OUTPUT_FORMAT", defaults.output_format)?,
            text_type: parse_or(&get, "TTS_TEXT_TYPE", defaults.text_type)?,
            source: parse_or(&get, "TTS_SOURCE", defaults.source)?,
            storage: StorageConfig {
                root: get("TTS_STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.root),
                directory: get("TTS_STORAGE_DIR").unwrap_or(defaults.storage.directory),
            },
            polly: PollyConfig {
                region: get("TTS_POLLY_REGION")
                    .or_else(|| get("AWS_REGION"))
                    .unwrap_or(defaults.polly.region),
                access_key_id: get("AWS_ACCESS_KEY_ID").map(Secret::new),
                secret_access_key: get("AWS_SECRET_ACCESS_KEY").map(Secret::new),
                session_token: get("AWS_SESSION_TOKEN").map(Secret::new),
                voice: get("TTS_POLLY_VOICE").unwrap_or(defaults.polly.voice),
                engine: parse_or(&get, "TTS_POLLY_ENGINE", defaults.polly.engine)?,
                chunk_limit: chunk_limit(&get, "TTS_POLLY_CHUNK_LIMIT", defaults.polly.chunk_limit)?,
                endpoint_url: get("TTS_POLLY_ENDPOINT"),
            },
            google: GoogleConfig {
                api_key: get("GOOGLE_TTS_API_KEY").map(Secret::new),
                access_token: get("GOOGLE_TTS_ACCESS_TOKEN").map(Secret::new),
                voice: get("TTS_GOOGLE_VOICE"),
                gender: parse_or(&get, "TTS_GOOGLE_GENDER", defaults.google.gender)?,
                chunk_limit: chunk_limit(
                    &get,
                    "TTS_GOOGLE_CHUNK_LIMIT",
                    defaults.google.chunk_limit,
                )?,
                endpoint: get("TTS_GOOGLE_ENDPOINT").unwrap_or(defaults.google.endpoint),
            },
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Config { tts, log_format })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> TtsResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .parse()
            .map_err(|e| TtsError::Configuration(format!("{}: {}", key, e))),
        None => Ok(default),
    }
}

fn chunk_limit<G>(get: &G, key: &str, default: usize) -> TtsResult<usize>
where
    G: Fn(&str) -> Option<String>,
{
    let limit: usize = parse_or(get, key, default)?;
    if limit == 0 {
        return Err(TtsError::Configuration(format!(
            "{}: chunk limit must be a positive integer",
            key
        )));
    }
    Ok(limit)
}
