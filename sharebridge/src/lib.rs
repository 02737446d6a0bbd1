//! Share-target handling for an app shell.
//!
//! The platform hands over [`ShareEvent`]s; images are copied into a
//! [`ScratchCache`]; the resulting [`SharedPayload`] waits in a
//! [`ShareIngestionBuffer`] until the shell polls for it or is pushed it over
//! a [`ShareChannel`]. [`ShareHost`] ties these to the app lifecycle.

mod cache;
mod channel;
mod error;
mod host;
mod intent;
mod resolver;
mod state;
mod storage;

#[cfg(test)]
mod testing;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use cache::{ScratchCache, DEFAULT_FILE_NAME};
pub use channel::{
    ChannelMessage, MethodCall, MethodResult, ShareChannel, SharedSink, DEFAULT_CHANNEL_NAME,
    METHOD_GET_SHARED_DATA, METHOD_ON_SHARED,
};
pub use error::{Result, ShareError};
pub use host::ShareHost;
pub use intent::{ContentUri, ShareAction, ShareEvent, ACTION_SEND, ACTION_SEND_MULTIPLE};
pub use resolver::{ContentResolver, ContentStream, FsContentResolver};
pub use state::{ShareIngestionBuffer, SharedPayload};
pub use storage::{default_cache_dir, load_settings, save_settings, ShareSettings};

/// Install the global tracing subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| ShareError::Config(format!("Failed to initialize logging: {}", e)))
}
