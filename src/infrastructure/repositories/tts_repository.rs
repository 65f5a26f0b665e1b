use crate::domain::tts::{AudioFormat, Engine, SpeechMarkType, TextType, VoiceGender};
use crate::error::TtsResult;
use async_trait::async_trait;

/// Voice selection for a single synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceParams {
    /// Effective language (options, then configuration, then `en-US`)
    pub language: String,
    /// Language explicitly requested by the caller, if any
    pub requested_language: Option<String>,
    pub gender: Option<VoiceGender>,
    /// Provider-specific voice id or name
    pub voice_id: Option<String>,
}

/// Everything a provider needs to synthesize one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisInput<'a> {
    pub text: &'a str,
    pub text_type: TextType,
    pub voice: VoiceParams,
    pub format: AudioFormat,
    pub engine: Engine,
    pub speech_marks: &'a [SpeechMarkType],
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly, Google Cloud, test doubles)
///
/// Implementations perform exactly one provider call per invocation. Chunking and
/// merging are done by the converter.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Provider name used in logs
    fn provider(&self) -> &'static str;

    /// Synthesize one chunk of text
    ///
    /// Returns the raw payload as delivered by the provider (audio, or JSON lines
    /// for speech marks)
    ///
    /// # Errors
    /// Returns `Provider` if the call fails, `InvalidArgument` if the input cannot be
    /// expressed for this provider
    async fn synthesize(&self, input: &SynthesisInput<'_>) -> TtsResult<Vec<u8>>;
}
