/// Default language sent to providers when nothing is configured
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default Polly voice when neither options nor configuration name one
pub const DEFAULT_POLLY_VOICE: &str = "Amy";

/// Get the default Google Cloud voice for a bare ISO 639-1 language code
pub fn google_voice_for_language(language: &str) -> Option<&'static str> {
    let voice = match language.to_lowercase().as_str() {
        "af" => "af-ZA-Standard-A",
        "ar" => "ar-XA-Wavenet-D",
        "bg" => "bg-BG-Standard-A",
        "bn" => "bn-IN-Wavenet-C",
        "cs" => "cs-CZ-Wavenet-A",
        "da" => "da-DK-Neural2-D",
        "de" => "de-DE-Neural2-A",
        "el" => "el-GR-Wavenet-A",
        "en" => "en-GB-News-H",
        "es" => "es-ES-Neural2-A",
        "fi" => "fi-FI-Wavenet-A",
        "fr" => "fr-FR-Neural2-C",
        "he" => "he-IL-Wavenet-C",
        "hi" => "hi-IN-Neural2-D",
        "id" => "id-ID-Wavenet-A",
        _ => return None,
    };
    Some(voice)
}

/// Language code embedded in a Google voice name (`de-DE-Neural2-A` -> `de-DE`)
pub fn language_of_google_voice(voice: &str) -> Option<String> {
    let mut parts = voice.splitn(3, '-');
    let language = parts.next()?;
    let region = parts.next()?;
    if language.is_empty() || region.is_empty() {
        return None;
    }
    Some(format!("{}-{}", language, region))
}

/// True for codes without a region subtag, such as `de` or `fr`
pub fn is_bare_language(language: &str) -> bool {
    !language.is_empty() && !language.contains('-') && !language.contains('_')
}
