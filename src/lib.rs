pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::driver::DriverManager;
pub use domain::tts::{Converter, SynthesisOptions};
pub use error::{TtsError, TtsResult};
pub use infrastructure::config::{Config, TtsConfig};
pub use infrastructure::repositories::StoredAudio;
