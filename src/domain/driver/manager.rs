use crate::domain::tts::{Converter, LengthUnit, NullConverter, ProviderSettings, SpeechConverter};
use crate::error::{TtsError, TtsResult};
use crate::infrastructure::clients::{create_google_client, create_polly_client};
use crate::infrastructure::config::TtsConfig;
use crate::infrastructure::repositories::{
    AudioStorage, DefaultTextSource, DiskAudioStorage, GoogleTtsRepository, PollyTtsRepository,
    TextSourceRepository,
};
use futures::future::BoxFuture;
use moka::future::Cache;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

pub const DEFAULT_DRIVER: &str = "null";

/// Shared collaborators handed to every driver factory
#[derive(Clone)]
pub struct DriverContext {
    pub config: Arc<TtsConfig>,
    pub storage: Arc<dyn AudioStorage>,
    pub text_source: Arc<dyn TextSourceRepository>,
}

pub type DriverFactory =
    Arc<dyn Fn(DriverContext) -> BoxFuture<'static, TtsResult<Arc<dyn Converter>>> + Send + Sync>;

/// Resolves driver names to converters, building each one on first use
pub struct DriverManager {
    context: DriverContext,
    factories: HashMap<String, DriverFactory>,
    instances: Cache<String, Arc<dyn Converter>>,
}

impl DriverManager {
    /// Manager with disk storage and the default text sources
    pub fn new(config: TtsConfig) -> Self {
        let storage = Arc::new(DiskAudioStorage::from_config(&config.storage));
        Self::with_collaborators(config, storage, Arc::new(DefaultTextSource::new()))
    }

    pub fn with_collaborators(
        config: TtsConfig,
        storage: Arc<dyn AudioStorage>,
        text_source: Arc<dyn TextSourceRepository>,
    ) -> Self {
        let mut manager = Self {
            context: DriverContext {
                config: Arc::new(config),
                storage,
                text_source,
            },
            factories: HashMap::new(),
            instances: Cache::builder().max_capacity(32).build(),
        };

        manager
            .extend("polly", create_polly_driver)
            .extend("google", create_google_driver)
            .extend("null", |_| async {
                Ok::<_, TtsError>(Arc::new(NullConverter) as Arc<dyn Converter>)
            });

        manager
    }

    /// Register a driver factory, replacing any existing one with the same name.
    ///
    /// Previously built converters are dropped so the next lookup uses the new factory.
    pub fn extend<F, Fut>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(DriverContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TtsResult<Arc<dyn Converter>>> + Send + 'static,
    {
        let factory: DriverFactory = Arc::new(
            move |context: DriverContext| -> BoxFuture<'static, TtsResult<Arc<dyn Converter>>> {
                Box::pin(factory(context))
            },
        );
        self.factories.insert(name.into().to_lowercase(), factory);
        self.instances.invalidate_all();
        self
    }

    pub fn default_driver(&self) -> &str {
        self.context.config.driver.as_deref().unwrap_or(DEFAULT_DRIVER)
    }

    /// Registered driver names, sorted
    pub fn drivers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the converter for `name`, or for the default driver
    ///
    /// # Errors
    /// Returns `Configuration` for unknown drivers or when the driver cannot be built
    /// from the configuration
    pub async fn driver(&self, name: Option<&str>) -> TtsResult<Arc<dyn Converter>> {
        let name = name
            .unwrap_or_else(|| self.default_driver())
            .trim()
            .to_lowercase();

        let factory = self.factories.get(&name).cloned().ok_or_else(|| {
            tracing::error!(driver = %name, "Unknown TTS driver requested");
            TtsError::Configuration(format!("Driver [{}] not supported.", name))
        })?;

        let context = self.context.clone();
        let driver_name = name.clone();
        self.instances
            .try_get_with(name, async move {
                tracing::info!(driver = %driver_name, "Instantiating TTS driver");
                factory(context).await
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Alias of [`DriverManager::driver`]
    pub async fn engine(&self, name: Option<&str>) -> TtsResult<Arc<dyn Converter>> {
        self.driver(name).await
    }
}

fn polly_settings(config: &TtsConfig) -> ProviderSettings {
    ProviderSettings {
        driver: "polly".to_string(),
        chunk_limit: config.polly.chunk_limit,
        length_unit: LengthUnit::Chars,
        voice: Some(config.polly.voice.clone()),
        engine: config.polly.engine,
        format: config.output_format,
        language: config.language.clone(),
        text_type: config.text_type,
        gender: None,
        source: config.source,
    }
}

fn google_settings(config: &TtsConfig) -> ProviderSettings {
    ProviderSettings {
        driver: "google".to_string(),
        chunk_limit: config.google.chunk_limit,
        length_unit: LengthUnit::Bytes,
        voice: config.google.voice.clone(),
        engine: Default::default(),
        format: config.output_format,
        language: config.language.clone(),
        text_type: config.text_type,
        gender: Some(config.google.gender),
        source: config.source,
    }
}

/// Create an Amazon Polly converter
pub async fn create_polly_driver(context: DriverContext) -> TtsResult<Arc<dyn Converter>> {
    let polly_client = create_polly_client(&context.config.polly).await?;
    let tts_repo = Arc::new(PollyTtsRepository::new(Arc::new(polly_client)));

    Ok(Arc::new(SpeechConverter::new(
        polly_settings(&context.config),
        tts_repo,
        context.storage,
        context.text_source,
    )))
}

/// Create a Google Cloud Text-to-Speech converter
pub async fn create_google_driver(context: DriverContext) -> TtsResult<Arc<dyn Converter>> {
    let (http_client, auth) = create_google_client(&context.config.google)?;
    let tts_repo = Arc::new(GoogleTtsRepository::new(
        http_client,
        context.config.google.endpoint.clone(),
        auth,
    ));

    Ok(Arc::new(SpeechConverter::new(
        google_settings(&context.config),
        tts_repo,
        context.storage,
        context.text_source,
    )))
}
