//! Wiring between the platform lifecycle, the buffer and the app shell.

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::channel::{MethodCall, MethodResult, ShareChannel, METHOD_GET_SHARED_DATA};
use crate::intent::ShareEvent;
use crate::resolver::ContentResolver;
use crate::state::ShareIngestionBuffer;

/// One running app instance.
///
/// Shares that launch the instance stay pending until the shell polls with
/// `getSharedData`. Shares that arrive later are pushed as `onShared`.
pub struct ShareHost<R> {
    buffer: ShareIngestionBuffer<R>,
    /// Present once the shell engine is up.
    channel: RwLock<Option<ShareChannel>>,
}

impl<R: ContentResolver> ShareHost<R> {
    pub fn new(buffer: ShareIngestionBuffer<R>) -> Self {
        Self {
            buffer,
            channel: RwLock::new(None),
        }
    }

    pub fn buffer(&self) -> &ShareIngestionBuffer<R> {
        &self.buffer
    }

    /// The shell engine is ready: keep its channel and ingest the event the
    /// instance was launched with.
    pub fn attach_channel(&self, channel: ShareChannel, launch_event: Option<&ShareEvent>) {
        info!("Share channel '{}' attached", channel.name());
        *self.channel.write() = Some(channel);
        self.buffer.ingest(launch_event);
    }

    /// A share was delivered to the already running instance.
    pub fn on_new_event(&self, event: Option<&ShareEvent>) {
        self.buffer.ingest(event);

        match self.channel.read().as_ref() {
            Some(channel) => self.buffer.notify_and_clear(channel),
            None => {
                let dropped = self.buffer.take_pending();
                debug!(
                    "No shell listening; dropped share (text={}, images={})",
                    dropped.text.is_some(),
                    dropped.images.len()
                );
            }
        }
    }

    pub fn handle_method_call(&self, call: &MethodCall) -> MethodResult {
        match call.method.as_str() {
            METHOD_GET_SHARED_DATA => match serde_json::to_value(self.buffer.take_pending()) {
                Ok(result) => MethodResult::Success { result },
                Err(e) => MethodResult::error("SERIALIZATION", e),
            },
            other => {
                debug!("Unhandled method call: {}", other);
                MethodResult::NotImplemented
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ScratchCache;
    use crate::channel::{ChannelMessage, METHOD_ON_SHARED};
    use crate::intent::{ContentUri, ShareAction};
    use crate::testing::MemoryResolver;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn host(dir: &tempfile::TempDir) -> ShareHost<MemoryResolver> {
        let cache = ScratchCache::new(dir.path()).unwrap();
        let mut resolver = MemoryResolver::new();
        resolver.insert("content://media/images/5", Some("five.jpg"), b"5");
        ShareHost::new(ShareIngestionBuffer::new(resolver, cache))
    }

    fn attached(
        dir: &tempfile::TempDir,
        launch: Option<&ShareEvent>,
    ) -> (ShareHost<MemoryResolver>, UnboundedReceiver<ChannelMessage>) {
        let host = host(dir);
        let (channel, rx) = ShareChannel::new("shared_channel");
        host.attach_channel(channel, launch);
        (host, rx)
    }

    fn image_event() -> ShareEvent {
        ShareEvent::send("image/jpeg")
            .with_content_ref(ContentUri::parse("content://media/images/5").unwrap())
    }

    #[test]
    fn test_cold_start_share_is_polled() {
        let dir = tempfile::tempdir().unwrap();
        let (host, mut rx) = attached(&dir, Some(&image_event()));

        let reply = host.handle_method_call(&MethodCall::new(METHOD_GET_SHARED_DATA));

        let cached = host.buffer().cache().dir().join("five.jpg");
        assert_eq!(
            reply,
            MethodResult::Success {
                result: json!({ "text": null, "images": [cached.to_string_lossy()] })
            }
        );
        assert!(rx.try_recv().is_err(), "launch shares are not pushed");
    }

    #[test]
    fn test_second_poll_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (host, _rx) = attached(&dir, Some(&image_event()));

        host.handle_method_call(&MethodCall::new(METHOD_GET_SHARED_DATA));
        let reply = host.handle_method_call(&MethodCall::new(METHOD_GET_SHARED_DATA));

        assert_eq!(
            reply,
            MethodResult::Success {
                result: json!({ "text": null, "images": [] })
            }
        );
    }

    #[test]
    fn test_launch_without_event() {
        let dir = tempfile::tempdir().unwrap();
        let (host, _rx) = attached(&dir, None);
        assert!(!host.buffer().has_pending());
    }

    #[test]
    fn test_new_event_is_pushed_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let (host, mut rx) = attached(&dir, None);

        host.on_new_event(Some(&ShareEvent::new(ShareAction::Send).with_text("hot")));

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.method, METHOD_ON_SHARED);
        assert_eq!(msg.arguments, json!({ "text": "hot", "images": [] }));
        assert!(!host.buffer().has_pending());
    }

    #[test]
    fn test_new_event_replaces_unread_launch_share() {
        let dir = tempfile::tempdir().unwrap();
        let (host, mut rx) = attached(&dir, Some(&image_event()));

        host.on_new_event(Some(&ShareEvent::new(ShareAction::Send).with_text("newer")));

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.arguments, json!({ "text": "newer", "images": [] }));
    }

    #[test]
    fn test_new_event_without_channel_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let host = host(&dir);

        host.on_new_event(Some(&ShareEvent::new(ShareAction::Send).with_text("lost")));

        assert!(!host.buffer().has_pending());
    }

    #[test]
    fn test_push_to_closed_shell_still_clears() {
        let dir = tempfile::tempdir().unwrap();
        let (host, rx) = attached(&dir, None);
        drop(rx);

        host.on_new_event(Some(&image_event()));

        assert!(!host.buffer().has_pending());
    }

    #[test]
    fn test_unknown_method_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let (host, _rx) = attached(&dir, Some(&image_event()));

        let reply = host.handle_method_call(&MethodCall::new("getSomethingElse"));

        assert_eq!(reply, MethodResult::NotImplemented);
        assert!(host.buffer().has_pending(), "unknown calls must not consume the share");
    }
}
