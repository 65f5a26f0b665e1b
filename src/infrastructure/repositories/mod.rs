pub mod google_tts_repository;
pub mod polly_tts_repository;
pub mod storage_repository;
pub mod text_source_repository;
pub mod tts_repository;

pub use google_tts_repository::{GoogleAuth, GoogleTtsRepository};
pub use polly_tts_repository::PollyTtsRepository;
pub use storage_repository::{AudioStorage, DiskAudioStorage, StoredAudio};
pub use text_source_repository::{DefaultTextSource, TextSourceRepository};
pub use tts_repository::{SynthesisInput, TtsRepository, VoiceParams};
