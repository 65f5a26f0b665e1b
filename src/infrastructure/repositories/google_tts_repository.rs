use super::tts_repository::{SynthesisInput, TtsRepository};
use crate::domain::tts::language::{
    google_voice_for_language, is_bare_language, language_of_google_voice,
};
use crate::domain::tts::{AudioFormat, TextType, VoiceGender};
use crate::error::{TtsError, TtsResult};
use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Google Cloud TTS rejects input above 5000 bytes, so Google chunks are measured in bytes
pub const GOOGLE_CHUNK_LIMIT: usize = 2000;

pub const GOOGLE_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Static credentials for the REST API
#[derive(Clone)]
pub enum GoogleAuth {
    /// Sent as `X-Goog-Api-Key`
    ApiKey(String),
    /// Sent as a bearer token
    AccessToken(String),
}

impl std::fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoogleAuth::ApiKey(_) => write!(f, "ApiKey(****)"),
            GoogleAuth::AccessToken(_) => write!(f, "AccessToken(****)"),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeBody {
    input: SynthesisInputBody,
    voice: VoiceSelectionParams,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SynthesisInputBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams {
    language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml_gender: Option<&'static str>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech implementation of TTS repository
pub struct GoogleTtsRepository {
    http_client: reqwest::Client,
    endpoint: String,
    auth: GoogleAuth,
}

impl GoogleTtsRepository {
    pub fn new(http_client: reqwest::Client, endpoint: String, auth: GoogleAuth) -> Self {
        Self {
            http_client,
            endpoint,
            auth,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Google `audioEncoding` for a format
pub fn google_audio_encoding(format: AudioFormat) -> TtsResult<&'static str> {
    match format {
        AudioFormat::Mp3 => Ok("MP3"),
        AudioFormat::OggOpus => Ok("OGG_OPUS"),
        AudioFormat::Wav => Ok("LINEAR16"),
        other => Err(TtsError::InvalidArgument(format!(
            "Google Cloud TTS does not support the {} output format",
            other
        ))),
    }
}

fn google_gender(gender: VoiceGender) -> &'static str {
    match gender {
        VoiceGender::Male => "MALE",
        VoiceGender::Female => "FEMALE",
        VoiceGender::Neutral => "NEUTRAL",
    }
}

/// Map a synthesis input onto the REST request body
pub fn build_request_body(input: &SynthesisInput<'_>) -> TtsResult<SynthesizeBody> {
    if !input.speech_marks.is_empty() {
        return Err(TtsError::InvalidArgument(
            "Google Cloud TTS does not support speech marks".to_string(),
        ));
    }

    let audio_encoding = google_audio_encoding(input.format)?;

    let synthesis_input = match input.text_type {
        TextType::Text => SynthesisInputBody {
            text: Some(input.text.to_string()),
            ssml: None,
        },
        TextType::Ssml => SynthesisInputBody {
            text: None,
            ssml: Some(input.text.to_string()),
        },
    };

    let language = &input.voice.language;
    let voice = match &input.voice.voice_id {
        Some(name) => VoiceSelectionParams {
            language_code: language.clone(),
            name: Some(name.clone()),
            ssml_gender: input.voice.gender.map(google_gender),
        },
        None => match google_voice_for_language(language).filter(|_| is_bare_language(language))
        {
            // Table voices pin the region, so the language code follows the voice
            Some(name) => VoiceSelectionParams {
                language_code: language_of_google_voice(name)
                    .unwrap_or_else(|| language.clone()),
                name: Some(name.to_string()),
                ssml_gender: None,
            },
            None => VoiceSelectionParams {
                language_code: language.clone(),
                name: None,
                ssml_gender: input.voice.gender.map(google_gender),
            },
        },
    };

    Ok(SynthesizeBody {
        input: synthesis_input,
        voice,
        audio_config: AudioConfig { audio_encoding },
    })
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    fn provider(&self) -> &'static str {
        "google"
    }

    async fn synthesize(&self, input: &SynthesisInput<'_>) -> TtsResult<Vec<u8>> {
        let body = build_request_body(input)?;

        tracing::debug!(
            language = %body.voice.language_code,
            voice = ?body.voice.name,
            gender = ?body.voice.ssml_gender,
            audio_encoding = body.audio_config.audio_encoding,
            text_type = input.text_type.as_str(),
            text_length = input.text.len(),
            text_preview = %input.text.chars().take(200).collect::<String>(),
            "Calling Google Cloud TTS text:synthesize"
        );

        let request = self.http_client.post(&self.endpoint).json(&body);
        let request = match &self.auth {
            GoogleAuth::ApiKey(key) => request.header("X-Goog-Api-Key", key),
            GoogleAuth::AccessToken(token) => request.bearer_auth(token),
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, endpoint = %self.endpoint, "Google Cloud TTS request failed");
            TtsError::Provider(format!("Google Cloud TTS request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                body = %error_text,
                "Google Cloud TTS returned an error"
            );
            return Err(TtsError::Provider(format!(
                "Google Cloud TTS error ({}): {}",
                status, error_text
            )));
        }

        let synthesis: SynthesizeResponse = response.json().await.map_err(|e| {
            TtsError::Provider(format!("Failed to parse Google Cloud TTS response: {}", e))
        })?;

        let audio_bytes = base64::engine::general_purpose::STANDARD
            .decode(synthesis.audio_content.as_bytes())
            .map_err(|e| {
                TtsError::Provider(format!("Failed to decode Google audio content: {}", e))
            })?;

        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Google Cloud TTS audio received successfully"
        );

        Ok(audio_bytes)
    }
}
