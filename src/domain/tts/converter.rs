use super::chunker::{chunk_text_in, merge_outputs, LengthUnit};
use super::options::{
    AudioFormat, Engine, SourceKind, StoredFormat, SynthesisOptions, SynthesisRequest, TextType,
    VoiceGender,
};
use crate::error::{TtsError, TtsResult};
use crate::infrastructure::repositories::{
    AudioStorage, StoredAudio, SynthesisInput, TextSourceRepository, TtsRepository, VoiceParams,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Converts a text source into a stored audio file
#[async_trait]
pub trait Converter: Send + Sync {
    /// Name of the driver this converter was built for
    fn driver_name(&self) -> &str;

    /// Convert `source` to speech and persist the result
    ///
    /// This operation:
    /// - Resolves the source into text
    /// - Splits text above the provider limit into chunks
    /// - Synthesizes every chunk in order and merges the payloads
    /// - Stores the merged payload
    ///
    /// Returns `None` when the driver performs no conversion (null driver)
    ///
    /// # Errors
    /// Any failure aborts the whole conversion; nothing is stored
    async fn convert(
        &self,
        source: &str,
        options: &SynthesisOptions,
    ) -> TtsResult<Option<StoredAudio>>;
}

/// Provider defaults applied when options leave a field unset
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub driver: String,
    pub chunk_limit: usize,
    pub length_unit: LengthUnit,
    pub voice: Option<String>,
    pub engine: Engine,
    pub format: AudioFormat,
    pub language: String,
    pub text_type: TextType,
    pub gender: Option<VoiceGender>,
    pub source: SourceKind,
}

/// Chunking converter shared by every real provider
pub struct SpeechConverter {
    settings: ProviderSettings,
    tts_repo: Arc<dyn TtsRepository>,
    storage: Arc<dyn AudioStorage>,
    text_source: Arc<dyn TextSourceRepository>,
}

impl SpeechConverter {
    pub fn new(
        settings: ProviderSettings,
        tts_repo: Arc<dyn TtsRepository>,
        storage: Arc<dyn AudioStorage>,
        text_source: Arc<dyn TextSourceRepository>,
    ) -> Self {
        Self {
            settings,
            tts_repo,
            storage,
            text_source,
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Single chunk when the text fits, word-wrapped chunks otherwise
    fn chunks_for(&self, request: &SynthesisRequest) -> TtsResult<Vec<String>> {
        let unit = self.settings.length_unit;
        if unit.measure(request.text()) > self.settings.chunk_limit {
            chunk_text_in(request.text(), self.settings.chunk_limit, unit)
        } else {
            Ok(vec![request.text().to_string()])
        }
    }

    fn voice_params(&self, options: &SynthesisOptions) -> VoiceParams {
        VoiceParams {
            language: options
                .language
                .clone()
                .unwrap_or_else(|| self.settings.language.clone()),
            requested_language: options.language.clone(),
            gender: options.gender.or(self.settings.gender),
            voice_id: options.voice.clone().or_else(|| self.settings.voice.clone()),
        }
    }

    /// Synthesize chunks one after another, stopping at the first failure
    async fn synthesize_chunks(
        &self,
        chunks: &[String],
        request: &SynthesisRequest,
    ) -> TtsResult<Vec<Vec<u8>>> {
        let options = request.options();
        let voice = self.voice_params(options);
        let format = options.format.unwrap_or(self.settings.format);
        let engine = options.engine.unwrap_or(self.settings.engine);

        let mut outputs = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            tracing::info!(
                driver = %self.settings.driver,
                chunk_index = index,
                chunk_count = chunks.len(),
                chunk_size = chunk.chars().count(),
                "Synthesizing chunk"
            );

            let input = SynthesisInput {
                text: chunk,
                text_type: request.text_type(),
                voice: voice.clone(),
                format,
                engine,
                speech_marks: &options.speech_marks,
            };

            let audio_data = self.tts_repo.synthesize(&input).await.map_err(|e| {
                tracing::error!(
                    driver = %self.settings.driver,
                    provider = self.tts_repo.provider(),
                    chunk_index = index,
                    chunk_count = chunks.len(),
                    error = %e,
                    "Chunk synthesis failed, abandoning conversion"
                );
                e
            })?;

            tracing::debug!(
                chunk_index = index,
                audio_size = audio_data.len(),
                "Chunk synthesized"
            );
            outputs.push(audio_data);
        }

        Ok(outputs)
    }
}

/// Storage name for a conversion: the requested filename, or a stable UUID of the source
pub fn storage_name(source: &str, options: &SynthesisOptions) -> String {
    options
        .filename
        .clone()
        .unwrap_or_else(|| Uuid::new_v5(&Uuid::NAMESPACE_OID, source.as_bytes()).to_string())
}

/// What the stored payload contains: speech marks when requested, audio otherwise
pub fn stored_format(format: AudioFormat, options: &SynthesisOptions) -> StoredFormat {
    if options.has_speech_marks() {
        StoredFormat::SpeechMarks
    } else {
        StoredFormat::Audio(format)
    }
}

#[async_trait]
impl Converter for SpeechConverter {
    fn driver_name(&self) -> &str {
        &self.settings.driver
    }

    async fn convert(
        &self,
        source: &str,
        options: &SynthesisOptions,
    ) -> TtsResult<Option<StoredAudio>> {
        let start_time = std::time::Instant::now();
        options.validate()?;

        let source_kind = options.source.unwrap_or(self.settings.source);
        let text = self.text_source.resolve(source, source_kind).await?;
        let request = SynthesisRequest::new(text, options.clone(), self.settings.text_type);

        let chunks = self.chunks_for(&request)?;

        // Mark offsets restart at zero in every chunk response
        if options.has_speech_marks() && chunks.len() > 1 {
            tracing::error!(
                driver = %self.settings.driver,
                chunk_count = chunks.len(),
                "Speech marks requested for text that needs several chunks"
            );
            return Err(TtsError::InvalidArgument(format!(
                "speech marks require text within a single chunk of {} {}",
                self.settings.chunk_limit,
                self.settings.length_unit.as_str()
            )));
        }

        tracing::info!(
            driver = %self.settings.driver,
            chunk_count = chunks.len(),
            chunk_limit = self.settings.chunk_limit,
            text_length = request.char_count(),
            text_type = request.text_type().as_str(),
            "Text split into chunks"
        );

        let mut outputs = self.synthesize_chunks(&chunks, &request).await?;
        let audio_data = if outputs.len() == 1 {
            outputs.remove(0)
        } else {
            merge_outputs(outputs)
        };

        let format = options.format.unwrap_or(self.settings.format);
        let stored = self
            .storage
            .store(
                &storage_name(source, options),
                stored_format(format, options),
                &audio_data,
            )
            .await?;

        let duration = start_time.elapsed();
        let characters_count = request.char_count();
        let throughput_chars_per_sec = if duration.as_secs_f64() > 0.0 {
            characters_count as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            driver = %self.settings.driver,
            provider = self.tts_repo.provider(),
            latency_ms = duration.as_millis(),
            characters_count = characters_count,
            chunk_count = chunks.len(),
            audio_size_bytes = audio_data.len(),
            path = %stored.path.display(),
            format = %stored.format,
            throughput_chars_per_sec = format!("{:.2}", throughput_chars_per_sec),
            "TTS conversion completed"
        );

        Ok(Some(stored))
    }
}

/// Converter used when no provider is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConverter;

#[async_trait]
impl Converter for NullConverter {
    fn driver_name(&self) -> &str {
        "null"
    }

    async fn convert(
        &self,
        source: &str,
        _options: &SynthesisOptions,
    ) -> TtsResult<Option<StoredAudio>> {
        tracing::debug!(
            source_length = source.len(),
            "Null driver selected, skipping conversion"
        );
        Ok(None)
    }
}
