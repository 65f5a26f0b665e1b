use crate::helpers::{
    converter, converter_with, settings, text_of_length, MemoryStorage, MockTtsRepository,
};

use pretty_assertions::assert_eq;
use std::io::Write;
use tts_drivers::domain::tts::{
    AudioFormat, Converter, Engine, LengthUnit, ProviderSettings, SourceKind, SpeechMarkType,
    StoredFormat, SynthesisOptions, TextType, VoiceGender,
};
use tts_drivers::TtsError;

#[tokio::test]
async fn it_should_chunk_long_text_and_merge_payloads_in_order() {
    let repo = MockTtsRepository::new(vec![Ok(b"A".to_vec()), Ok(b"B".to_vec())]);
    let storage = MemoryStorage::new();
    let converter = converter(2000, repo.clone(), storage.clone());

    let text = text_of_length(2500);
    let stored = converter
        .convert(&text, &SynthesisOptions::default())
        .await
        .unwrap()
        .expect("real drivers always store a file");

    let calls = repo.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.text.chars().count() <= 2000));
    assert_eq!(
        format!("{} {}", calls[0].text, calls[1].text),
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    );

    let writes = storage.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].2, b"AB".to_vec());
    assert_eq!(writes[0].1, StoredFormat::Audio(AudioFormat::Mp3));
    assert_eq!(stored.bytes_written, 2);
    assert_eq!(stored.format, StoredFormat::Audio(AudioFormat::Mp3));
}

#[tokio::test]
async fn it_should_send_short_text_in_a_single_call() {
    let payload = vec![0xFF, 0xFB, 0x90, 0x00, 0x01];
    let repo = MockTtsRepository::new(vec![Ok(payload.clone())]);
    let storage = MemoryStorage::new();
    let converter = converter(2000, repo.clone(), storage.clone());

    let text = text_of_length(500);
    converter
        .convert(&text, &SynthesisOptions::default())
        .await
        .unwrap();

    let calls = repo.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, text);
    assert_eq!(storage.writes()[0].2, payload);
}

#[tokio::test]
async fn it_should_abandon_conversion_when_a_chunk_fails() {
    let repo = MockTtsRepository::new(vec![
        Ok(b"A".to_vec()),
        Err(TtsError::Provider("throttled".to_string())),
        Ok(b"C".to_vec()),
    ]);
    let storage = MemoryStorage::new();
    let converter = converter(100, repo.clone(), storage.clone());

    let err = converter
        .convert(&text_of_length(250), &SynthesisOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err, TtsError::Provider("throttled".to_string()));
    assert_eq!(repo.calls().len(), 2, "chunk 3 must never be sent");
    assert!(storage.writes().is_empty(), "nothing may be stored");
}

#[tokio::test]
async fn it_should_apply_provider_defaults() {
    let repo = MockTtsRepository::new(vec![Ok(b"x".to_vec())]);
    let converter = converter(2000, repo.clone(), MemoryStorage::new());

    converter
        .convert("Hello", &SynthesisOptions::default())
        .await
        .unwrap();

    let call = &repo.calls()[0];
    assert_eq!(call.voice.voice_id.as_deref(), Some("Amy"));
    assert_eq!(call.voice.language, "en-US");
    assert_eq!(call.voice.requested_language, None);
    assert_eq!(call.format, AudioFormat::Mp3);
    assert_eq!(call.engine, Engine::Standard);
    assert_eq!(call.text_type, TextType::Text);
}

#[tokio::test]
async fn it_should_let_options_override_defaults() {
    let repo = MockTtsRepository::new(vec![Ok(b"x".to_vec())]);
    let storage = MemoryStorage::new();
    let converter = converter(2000, repo.clone(), storage.clone());

    let options = SynthesisOptions::default()
        .with_voice("Brian")
        .with_language("en-GB")
        .with_format(AudioFormat::OggVorbis)
        .with_engine(Engine::Neural)
        .with_text_type(TextType::Ssml)
        .with_gender(VoiceGender::Female)
        .with_filename("briefing");

    let stored = converter
        .convert("<speak>Hello</speak>", &options)
        .await
        .unwrap()
        .unwrap();

    let call = &repo.calls()[0];
    assert_eq!(call.voice.voice_id.as_deref(), Some("Brian"));
    assert_eq!(call.voice.requested_language.as_deref(), Some("en-GB"));
    assert_eq!(call.voice.gender, Some(VoiceGender::Female));
    assert_eq!(call.format, AudioFormat::OggVorbis);
    assert_eq!(call.engine, Engine::Neural);
    assert_eq!(call.text_type, TextType::Ssml);

    let writes = storage.writes();
    assert_eq!(writes[0].0, "briefing");
    assert_eq!(writes[0].1, StoredFormat::Audio(AudioFormat::OggVorbis));
    assert_eq!(stored.format, StoredFormat::Audio(AudioFormat::OggVorbis));
    assert_eq!(stored.path.to_str(), Some("memory/briefing.ogg"));
}

#[tokio::test]
async fn it_should_reject_invalid_options_before_calling_the_provider() {
    let repo = MockTtsRepository::new(vec![Ok(b"x".to_vec())]);
    let storage = MemoryStorage::new();
    let converter = converter(2000, repo.clone(), storage.clone());

    let err = converter
        .convert("Hello", &SynthesisOptions::default().with_filename("../escape"))
        .await
        .unwrap_err();

    assert!(matches!(err, TtsError::InvalidArgument(_)));
    assert!(repo.calls().is_empty());
    assert!(storage.writes().is_empty());
}

#[tokio::test]
async fn it_should_derive_the_same_name_for_the_same_source() {
    let repo = MockTtsRepository::new(vec![Ok(b"1".to_vec()), Ok(b"2".to_vec())]);
    let storage = MemoryStorage::new();
    let converter = converter(2000, repo, storage.clone());

    let first = converter
        .convert("Same text", &SynthesisOptions::default())
        .await
        .unwrap()
        .unwrap();
    let second = converter
        .convert("Same text", &SynthesisOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.path, second.path);
}

#[tokio::test]
async fn it_should_read_text_from_a_file_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Text stored on disk.").unwrap();

    let repo = MockTtsRepository::new(vec![Ok(b"x".to_vec())]);
    let converter = converter(2000, repo.clone(), MemoryStorage::new());

    converter
        .convert(
            file.path().to_str().unwrap(),
            &SynthesisOptions::default().with_source(SourceKind::Path),
        )
        .await
        .unwrap();

    assert_eq!(repo.calls()[0].text, "Text stored on disk.");
}

#[tokio::test]
async fn it_should_store_speech_marks_as_json() {
    let marks = b"{\"time\":6,\"type\":\"word\",\"start\":0,\"end\":5,\"value\":\"Hello\"}\n".to_vec();
    let repo = MockTtsRepository::new(vec![Ok(marks.clone())]);
    let storage = MemoryStorage::new();
    let converter = converter(2000, repo, storage.clone());

    let options = SynthesisOptions::default().with_speech_marks(vec![SpeechMarkType::Word]);
    let stored = converter.convert("Hello", &options).await.unwrap().unwrap();

    assert_eq!(stored.format, StoredFormat::SpeechMarks);
    assert_eq!(
        stored.path.extension().and_then(|ext| ext.to_str()),
        Some("json")
    );

    let writes = storage.writes();
    assert_eq!(writes[0].1, StoredFormat::SpeechMarks);

    let parsed = tts_drivers::domain::tts::parse_speech_marks(&writes[0].2).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].value, serde_json::json!("Hello"));
}

#[tokio::test]
async fn it_should_reject_speech_marks_for_text_spanning_several_chunks() {
    let repo = MockTtsRepository::new(vec![Ok(b"{}".to_vec()), Ok(b"{}".to_vec())]);
    let storage = MemoryStorage::new();
    let converter = converter(100, repo.clone(), storage.clone());

    let options = SynthesisOptions::default().with_speech_marks(vec![SpeechMarkType::Word]);
    let err = converter
        .convert(&text_of_length(250), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, TtsError::InvalidArgument(_)));
    assert!(repo.calls().is_empty());
    assert!(storage.writes().is_empty());
}

#[tokio::test]
async fn it_should_measure_byte_limited_chunks_in_bytes() {
    let responses = (0..5).map(|_| Ok(b"x".to_vec())).collect();
    let repo = MockTtsRepository::new(responses);
    let storage = MemoryStorage::new();
    let converter = converter_with(
        ProviderSettings {
            length_unit: LengthUnit::Bytes,
            ..settings(2000)
        },
        repo.clone(),
        storage.clone(),
    );

    // 3599 characters, 9999 bytes: two chunks when counted in characters
    let text = vec!["日本語のテキスト"; 400].join(" ");
    converter
        .convert(&text, &SynthesisOptions::default())
        .await
        .unwrap();

    let calls = repo.calls();
    assert_eq!(calls.len(), 5);
    for call in &calls {
        assert!(call.text.len() <= 2000, "chunk is {} bytes", call.text.len());
    }
    assert_eq!(storage.writes()[0].2, b"xxxxx".to_vec());
}
