//! Scratch cache for shared images.
//!
//! Shared content arrives as provider references that are only readable while
//! the share is being handled, so every image is copied into a process-owned
//! directory and handed on by path. The platform may purge that directory
//! whenever the app is not running; nothing here tracks files for deletion.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ShareError};
use crate::intent::ContentUri;
use crate::resolver::ContentResolver;

/// File name used when neither the provider nor the reference path yields one.
pub const DEFAULT_FILE_NAME: &str = "shared_image.jpg";

#[derive(Debug, Clone)]
pub struct ScratchCache {
    dir: PathBuf,
    fallback_file_name: String,
}

impl ScratchCache {
    /// Open (creating if needed) the scratch directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        let dir = fs::canonicalize(dir.as_ref())?;
        Ok(Self {
            dir,
            fallback_file_name: DEFAULT_FILE_NAME.to_string(),
        })
    }

    pub fn with_fallback_file_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        self.fallback_file_name = sanitize_file_name(&name)
            .ok_or_else(|| ShareError::Config(format!("Invalid fallback file name: {:?}", name)))?;
        Ok(self)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pick the cache file name for a reference.
    ///
    /// Provider metadata is consulted for `content:` references only, then
    /// the last path segment, then the fallback name.
    pub fn file_name_for<R>(&self, resolver: &R, uri: &ContentUri) -> String
    where
        R: ContentResolver + ?Sized,
    {
        let queried = if uri.scheme() == ContentUri::SCHEME_CONTENT {
            resolver.display_name(uri)
        } else {
            None
        };

        queried
            .as_deref()
            .and_then(sanitize_file_name)
            .or_else(|| uri.last_path_segment().as_deref().and_then(sanitize_file_name))
            .unwrap_or_else(|| self.fallback_file_name.clone())
    }

    /// Copy the referenced content into the cache and return the absolute path
    /// of the written file. An existing file of the same name is replaced.
    ///
    /// On a mid-copy failure the partially written file is left in place.
    pub fn cache_content_reference<R>(&self, resolver: &R, uri: &ContentUri) -> Result<PathBuf>
    where
        R: ContentResolver + ?Sized,
    {
        let file_name = self.file_name_for(resolver, uri);

        let mut input = resolver
            .open(uri)?
            .ok_or_else(|| ShareError::StreamUnavailable(uri.to_string()))?;

        // The platform may have purged the directory since startup.
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(&file_name);
        let mut output = File::create(&path)?;
        let written = io::copy(&mut input, &mut output)?;
        output.flush()?;

        debug!("Cached {} ({} bytes) at {}", uri, written, path.display());
        Ok(path)
    }
}

/// Reduce a provider-supplied name to a single path component.
fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(|c: char| c == '/' || c == '\\').next()?;
    match last {
        "" | "." | ".." => None,
        _ => Some(last.to_string()),
    }
}
