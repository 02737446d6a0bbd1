mod config;

pub use config::{default_cache_dir, load_settings, save_settings, ShareSettings};
