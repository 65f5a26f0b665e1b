pub mod chunker;
pub mod converter;
pub mod language;
pub mod options;
pub mod speech_marks;

pub use chunker::{chunk_text, chunk_text_in, merge_outputs, LengthUnit};
pub use converter::{Converter, NullConverter, ProviderSettings, SpeechConverter};
pub use options::{
    AudioFormat, Engine, SourceKind, SpeechMarkType, StoredFormat, SynthesisOptions,
    SynthesisRequest, TextType, VoiceGender,
};
pub use speech_marks::{parse_speech_marks, SpeechMark};
