pub mod manager;

pub use manager::{DriverContext, DriverFactory, DriverManager, DEFAULT_DRIVER};
