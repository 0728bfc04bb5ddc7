//! Configuration for tracehound
//!
//! Settings live in `.tracehound/config.toml`; environment variables
//! override the file for credentials.

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings};
pub use types::*;
