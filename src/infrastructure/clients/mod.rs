//! Provider client construction from configuration.

use crate::error::{TtsError, TtsResult};
use crate::infrastructure::config::{GoogleConfig, PollyConfig};
use crate::infrastructure::repositories::GoogleAuth;
use aws_sdk_polly::config::Credentials;
use std::time::Duration;

const GOOGLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an AWS Polly client.
///
/// Static credentials from the configuration win; without them the AWS default
/// credential chain (environment, profile, instance metadata) is used.
pub async fn create_polly_client(config: &PollyConfig) -> TtsResult<aws_sdk_polly::Client> {
    tracing::info!("Initializing AWS Polly client with region: {}", config.region);

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    match (&config.access_key_id, &config.secret_access_key) {
        (Some(key), Some(secret)) => {
            loader = loader.credentials_provider(Credentials::new(
                key.expose(),
                secret.expose(),
                config
                    .session_token
                    .as_ref()
                    .map(|token| token.expose().to_string()),
                None,
                "tts-drivers",
            ));
        }
        (None, None) => {
            tracing::warn!("AWS credentials not configured. Will attempt to use other credential providers (profile, instance metadata, etc.)");
        }
        _ => {
            return Err(TtsError::Configuration(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".to_string(),
            ));
        }
    }

    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url.clone());
    }

    let aws_config = loader.load().await;

    tracing::info!(
        region = ?aws_config.region(),
        "AWS configuration loaded"
    );

    Ok(aws_sdk_polly::Client::new(&aws_config))
}

/// Build the HTTP client and credentials for Google Cloud Text-to-Speech
pub fn create_google_client(config: &GoogleConfig) -> TtsResult<(reqwest::Client, GoogleAuth)> {
    let auth = match (&config.api_key, &config.access_token) {
        (Some(key), _) => GoogleAuth::ApiKey(key.expose().to_string()),
        (None, Some(token)) => GoogleAuth::AccessToken(token.expose().to_string()),
        (None, None) => {
            return Err(TtsError::Configuration(
                "Google Cloud TTS requires GOOGLE_TTS_API_KEY or GOOGLE_TTS_ACCESS_TOKEN"
                    .to_string(),
            ))
        }
    };

    let http_client = reqwest::Client::builder()
        .timeout(GOOGLE_TIMEOUT)
        .build()
        .map_err(|e| TtsError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

    tracing::info!(endpoint = %config.endpoint, "Google Cloud TTS client initialized");

    Ok((http_client, auth))
}
