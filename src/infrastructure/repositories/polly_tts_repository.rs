use super::tts_repository::{SynthesisInput, TtsRepository};
use crate::domain::tts::language::DEFAULT_POLLY_VOICE;
use crate::domain::tts::AudioFormat;
use crate::error::{TtsError, TtsResult};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, LanguageCode, OutputFormat, SpeechMarkType, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly accepts up to 3000 billed characters per request
pub const POLLY_CHUNK_LIMIT: usize = 3000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    pub fn client(&self) -> &PollyClient {
        &self.polly_client
    }
}

/// Polly output format for the input; speech marks always come back as JSON lines
pub fn polly_output_format(input: &SynthesisInput<'_>) -> TtsResult<OutputFormat> {
    if !input.speech_marks.is_empty() {
        return Ok(OutputFormat::Json);
    }

    match input.format {
        AudioFormat::Mp3 => Ok(OutputFormat::Mp3),
        AudioFormat::OggVorbis => Ok(OutputFormat::OggVorbis),
        AudioFormat::Pcm => Ok(OutputFormat::Pcm),
        other => Err(TtsError::InvalidArgument(format!(
            "AWS Polly does not support the {} output format",
            other
        ))),
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn provider(&self) -> &'static str {
        "polly"
    }

    async fn synthesize(&self, input: &SynthesisInput<'_>) -> TtsResult<Vec<u8>> {
        let output_format = polly_output_format(input)?;
        let voice_name = input
            .voice
            .voice_id
            .as_deref()
            .unwrap_or(DEFAULT_POLLY_VOICE);
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::from(input.engine.as_str());
        let text_type = TextType::from(input.text_type.as_str());

        tracing::debug!(
            voice = voice_name,
            engine = ?engine,
            output_format = ?output_format,
            text_type = input.text_type.as_str(),
            language = ?input.voice.requested_language,
            speech_marks = input.speech_marks.len(),
            text_length = input.text.len(),
            text_preview = %input.text.chars().take(200).collect::<String>(),
            "Calling AWS Polly synthesize_speech"
        );

        let mut request = self
            .polly_client
            .synthesize_speech()
            .text(input.text)
            .text_type(text_type)
            .voice_id(voice_id.clone())
            .output_format(output_format)
            .engine(engine.clone());

        // Only needed for bilingual voices; a mismatched default would be rejected
        if let Some(language) = &input.voice.requested_language {
            request = request.language_code(LanguageCode::from(language.as_str()));
        }

        for mark in input.speech_marks {
            request = request.speech_mark_types(SpeechMarkType::from(mark.as_str()));
        }

        let result = request.send().await.map_err(|e| {
            tracing::error!(
                error = ?e,
                error_display = %e,
                voice_id = ?voice_id,
                engine = ?engine,
                text_length = input.text.len(),
                "AWS Polly synthesize_speech failed"
            );
            TtsError::Provider(format!("AWS Polly error: {:?}", e))
        })?;

        tracing::debug!("AWS Polly synthesize_speech successful, reading audio stream");

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            TtsError::Provider(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }
}
