//! Inbound share events as delivered by the host platform.

use std::fmt;
use std::path::Path;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::{Result, ShareError};

pub const ACTION_SEND: &str = "android.intent.action.SEND";
pub const ACTION_SEND_MULTIPLE: &str = "android.intent.action.SEND_MULTIPLE";

/// MIME prefix a single-item share must carry for its stream to be cached.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Action kind of a share event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShareAction {
    Send,
    SendMultiple,
    Other(String),
}

impl From<String> for ShareAction {
    fn from(action: String) -> Self {
        match action.as_str() {
            "SEND" | ACTION_SEND => ShareAction::Send,
            "SEND_MULTIPLE" | ACTION_SEND_MULTIPLE => ShareAction::SendMultiple,
            _ => ShareAction::Other(action),
        }
    }
}

impl From<ShareAction> for String {
    fn from(action: ShareAction) -> Self {
        match action {
            ShareAction::Send => "SEND".to_string(),
            ShareAction::SendMultiple => "SEND_MULTIPLE".to_string(),
            ShareAction::Other(other) => other,
        }
    }
}

/// Opaque platform handle to shared content.
///
/// Not a file-system path: it has to go through a
/// [`ContentResolver`](crate::resolver::ContentResolver) before its bytes can be read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentUri(Url);

impl ContentUri {
    pub const SCHEME_CONTENT: &'static str = "content";
    pub const SCHEME_FILE: &'static str = "file";

    /// Parse a URI, or an absolute file-system path which becomes a `file:` URI.
    pub fn parse(input: &str) -> Result<Self> {
        match Url::parse(input) {
            Ok(url) => Ok(Self(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) if Path::new(input).is_absolute() => {
                Self::from_path(Path::new(input))
            }
            Err(e) => Err(ShareError::InvalidUri(format!("{}: {}", input, e))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Url::from_file_path(path)
            .map(Self)
            .map_err(|_| ShareError::InvalidUri(path.display().to_string()))
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Decoded text after the last `/` of the path, if non-empty.
    pub fn last_path_segment(&self) -> Option<String> {
        let raw = self.0.path().rsplit('/').next()?;
        let decoded = percent_decode_str(raw).decode_utf8_lossy().into_owned();
        if decoded.is_empty() {
            None
        } else {
            Some(decoded)
        }
    }
}

impl TryFrom<String> for ContentUri {
    type Error = ShareError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ContentUri> for String {
    fn from(uri: ContentUri) -> Self {
        uri.0.into()
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A share request from another app.
///
/// `content_ref` is populated for single-item shares, `content_refs` for
/// multi-item ones. Absent fields decode as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEvent {
    pub action: ShareAction,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content_ref: Option<ContentUri>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content_refs: Vec<ContentUri>,
}

/// Platforms send `null` for a multi-item share without streams.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ContentUri>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<ContentUri>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ShareEvent {
    pub fn new(action: ShareAction) -> Self {
        Self {
            action,
            mime_type: None,
            text: None,
            content_ref: None,
            content_refs: Vec::new(),
        }
    }

    pub fn send(mime_type: impl Into<String>) -> Self {
        Self::new(ShareAction::Send).with_mime_type(mime_type)
    }

    pub fn send_multiple(content_refs: Vec<ContentUri>) -> Self {
        Self {
            content_refs,
            ..Self::new(ShareAction::SendMultiple)
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_content_ref(mut self, content_ref: ContentUri) -> Self {
        self.content_ref = Some(content_ref);
        self
    }

    /// Whether the declared MIME type is an image type.
    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with(IMAGE_MIME_PREFIX))
    }
}
