pub mod driver;
pub mod tts;
