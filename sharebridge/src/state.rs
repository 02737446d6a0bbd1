use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::ScratchCache;
use crate::channel::{SharedSink, METHOD_ON_SHARED};
use crate::intent::{ContentUri, ShareAction, ShareEvent};
use crate::resolver::ContentResolver;

/// What the app shell receives for one share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedPayload {
    /// Shared plain text, if the event carried any.
    pub text: Option<String>,
    /// Paths of cached copies, in the order the references were processed.
    pub images: Vec<String>,
}

impl SharedPayload {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.images.is_empty()
    }
}

/// Holds at most one pending share until the app shell picks it up.
///
/// A new share replaces whatever is pending. Reading the payload, by poll or
/// by push, clears it.
pub struct ShareIngestionBuffer<R> {
    resolver: R,
    cache: ScratchCache,
    pending: Mutex<SharedPayload>,
}

impl<R: ContentResolver> ShareIngestionBuffer<R> {
    pub fn new(resolver: R, cache: ScratchCache) -> Self {
        Self {
            resolver,
            cache,
            pending: Mutex::new(SharedPayload::default()),
        }
    }

    pub fn cache(&self) -> &ScratchCache {
        &self.cache
    }

    /// Normalize a share event and make it the pending payload.
    ///
    /// A missing event leaves the pending payload untouched. References that
    /// fail to resolve or copy are logged and skipped.
    pub fn ingest(&self, event: Option<&ShareEvent>) {
        let Some(event) = event else {
            debug!("No share event to ingest");
            return;
        };

        let mut payload = SharedPayload {
            text: event.text.clone(),
            images: Vec::new(),
        };

        match event.action {
            ShareAction::Send => {
                if event.is_image() {
                    if let Some(uri) = &event.content_ref {
                        self.cache_into(uri, &mut payload.images);
                    }
                } else {
                    debug!("Ignoring single share with type {:?}", event.mime_type);
                }
            }
            // No MIME check here: multi-item shares are cached whatever their declared type.
            ShareAction::SendMultiple => {
                for uri in &event.content_refs {
                    self.cache_into(uri, &mut payload.images);
                }
            }
            ShareAction::Other(ref action) => {
                debug!("Ignoring content of non-share action {}", action);
            }
        }

        info!(
            "Share received: text={}, images={}",
            payload.text.is_some(),
            payload.images.len()
        );

        let previous = std::mem::replace(&mut *self.pending.lock(), payload);
        if !previous.is_empty() {
            debug!("Discarded unread share payload");
        }
    }

    fn cache_into(&self, uri: &ContentUri, images: &mut Vec<String>) {
        match self.cache.cache_content_reference(&self.resolver, uri) {
            Ok(path) => images.push(path.to_string_lossy().into_owned()),
            Err(e) => warn!("Failed to cache shared content {}: {}", uri, e),
        }
    }

    /// Return the pending payload and clear it.
    pub fn take_pending(&self) -> SharedPayload {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.lock().is_empty()
    }

    /// Push the pending payload to `sink` as `onShared` and clear it.
    ///
    /// The payload is cleared whether or not the sink delivers it.
    pub fn notify_and_clear<S>(&self, sink: &S)
    where
        S: SharedSink + ?Sized,
    {
        let payload = self.take_pending();
        sink.notify(METHOD_ON_SHARED, &payload);
    }
}
