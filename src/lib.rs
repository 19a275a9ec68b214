pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod tools;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ApiClient;
pub use config::{Settings, TomlConfig};
pub use core::{map::MapView, session::ChatSession};
pub use utils::error::{Result, StonewalkerError};
