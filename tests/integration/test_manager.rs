use crate::helpers::{settings, MemoryStorage, MockTtsRepository};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tts_drivers::domain::tts::{Converter, SpeechConverter, SynthesisOptions};
use tts_drivers::infrastructure::config::{PollyConfig, Secret};
use tts_drivers::infrastructure::repositories::DefaultTextSource;
use tts_drivers::{DriverManager, TtsConfig, TtsError};

fn manager_with_storage(config: TtsConfig, storage: Arc<MemoryStorage>) -> DriverManager {
    DriverManager::with_collaborators(config, storage, Arc::new(DefaultTextSource::new()))
}

#[tokio::test]
async fn it_should_fail_for_an_unconfigured_driver() {
    let manager = manager_with_storage(TtsConfig::default(), MemoryStorage::new());

    let err = manager.driver(Some("azure")).await.err().unwrap();
    assert!(matches!(err, TtsError::Configuration(_)));
}

#[tokio::test]
async fn it_should_fail_when_the_default_driver_is_unknown() {
    let config = TtsConfig {
        driver: Some("watson".to_string()),
        ..TtsConfig::default()
    };
    let manager = manager_with_storage(config, MemoryStorage::new());

    let err = manager.driver(None).await.err().unwrap();
    assert_eq!(
        err,
        TtsError::Configuration("Driver [watson] not supported.".to_string())
    );
}

#[tokio::test]
async fn it_should_fall_back_to_the_null_driver() {
    let storage = MemoryStorage::new();
    let manager = manager_with_storage(TtsConfig::default(), storage.clone());

    let converter = manager.driver(None).await.unwrap();
    let result = converter
        .convert("Nothing happens", &SynthesisOptions::default())
        .await
        .unwrap();

    assert_eq!(converter.driver_name(), "null");
    assert!(result.is_none());
    assert!(storage.writes().is_empty());
}

#[tokio::test]
async fn it_should_build_each_driver_once() {
    let storage = MemoryStorage::new();
    let mut manager = manager_with_storage(TtsConfig::default(), storage.clone());
    let builds = Arc::new(AtomicUsize::new(0));

    let counter = builds.clone();
    manager.extend("mock", move |context| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let repo = MockTtsRepository::new(vec![Ok(b"A".to_vec()), Ok(b"B".to_vec())]);
            Ok::<_, TtsError>(Arc::new(SpeechConverter::new(
                settings(2000),
                repo,
                context.storage,
                context.text_source,
            )) as Arc<dyn Converter>)
        }
    });

    let first = manager.driver(Some("mock")).await.unwrap();
    let second = manager.driver(Some("mock")).await.unwrap();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));

    first
        .convert("Hello", &SynthesisOptions::default())
        .await
        .unwrap();
    second
        .convert("World", &SynthesisOptions::default())
        .await
        .unwrap();

    let payloads: Vec<Vec<u8>> = storage.writes().into_iter().map(|w| w.2).collect();
    assert_eq!(payloads, vec![b"A".to_vec(), b"B".to_vec()]);
}

#[tokio::test]
async fn it_should_not_cache_failed_builds() {
    let mut manager = manager_with_storage(TtsConfig::default(), MemoryStorage::new());
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    manager.extend("flaky", move |_| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<Arc<dyn Converter>, _>(TtsError::Configuration(
                "missing credentials".to_string(),
            ))
        }
    });

    assert!(manager.driver(Some("flaky")).await.is_err());
    assert!(manager.driver(Some("flaky")).await.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn it_should_build_polly_from_static_credentials() {
    let config = TtsConfig {
        driver: Some("polly".to_string()),
        polly: PollyConfig {
            access_key_id: Some(Secret::new("AKIDEXAMPLE")),
            secret_access_key: Some(Secret::new("wJalrXUtnFEMI")),
            ..PollyConfig::default()
        },
        ..TtsConfig::default()
    };
    let manager = manager_with_storage(config, MemoryStorage::new());

    let converter = manager.driver(None).await.unwrap();
    assert_eq!(converter.driver_name(), "polly");
}

#[tokio::test]
async fn it_should_reject_polly_with_half_the_credentials() {
    let config = TtsConfig {
        polly: PollyConfig {
            secret_access_key: Some(Secret::new("wJalrXUtnFEMI")),
            ..PollyConfig::default()
        },
        ..TtsConfig::default()
    };
    let manager = manager_with_storage(config, MemoryStorage::new());

    let err = manager.driver(Some("polly")).await.err().unwrap();
    assert!(matches!(err, TtsError::Configuration(_)));
}
