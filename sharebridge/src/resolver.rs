//! Turning content references into bytes.

use std::fs::File;
use std::io::{self, Read};

use tracing::debug;

use crate::intent::ContentUri;

pub type ContentStream = Box<dyn Read + Send>;

/// Platform content access.
pub trait ContentResolver: Send + Sync {
    /// Display-name metadata for the reference, if the provider exposes one.
    fn display_name(&self, uri: &ContentUri) -> Option<String>;

    /// Open a byte stream for the reference. `Ok(None)` means the provider
    /// has no stream for it.
    fn open(&self, uri: &ContentUri) -> io::Result<Option<ContentStream>>;
}

/// Resolves `file:` references against the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentResolver;

impl FsContentResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ContentResolver for FsContentResolver {
    /// The file system has no provider metadata; names come from the path.
    fn display_name(&self, _uri: &ContentUri) -> Option<String> {
        None
    }

    fn open(&self, uri: &ContentUri) -> io::Result<Option<ContentStream>> {
        if uri.scheme() != ContentUri::SCHEME_FILE {
            debug!("No file-system stream for {} reference: {}", uri.scheme(), uri);
            return Ok(None);
        }
        let Ok(path) = uri.as_url().to_file_path() else {
            return Ok(None);
        };
        let file = File::open(path)?;
        Ok(Some(Box::new(file)))
    }
}
