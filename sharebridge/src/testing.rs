//! In-memory content provider for tests.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};

use parking_lot::Mutex;

use crate::intent::ContentUri;
use crate::resolver::{ContentResolver, ContentStream};

#[derive(Debug, Clone, Default)]
struct MemoryEntry {
    display_name: Option<String>,
    bytes: Option<Vec<u8>>,
    fails_mid_copy: bool,
}

/// Yields its bytes, then an I/O error instead of end-of-stream.
struct BrokenStream(Cursor<Vec<u8>>);

impl Read for BrokenStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "provider went away")),
            n => Ok(n),
        }
    }
}

/// Serves registered references from memory and records display-name queries.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    entries: HashMap<ContentUri, MemoryEntry>,
    name_queries: Mutex<Vec<ContentUri>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a readable reference. Returns the parsed URI.
    pub fn insert(&mut self, uri: &str, display_name: Option<&str>, bytes: &[u8]) -> ContentUri {
        let uri = ContentUri::parse(uri).unwrap();
        self.entries.insert(
            uri.clone(),
            MemoryEntry {
                display_name: display_name.map(str::to_string),
                bytes: Some(bytes.to_vec()),
                fails_mid_copy: false,
            },
        );
        uri
    }

    /// Register a reference whose provider has no stream.
    pub fn insert_unreadable(&mut self, uri: &str) -> ContentUri {
        let uri = ContentUri::parse(uri).unwrap();
        self.entries.insert(uri.clone(), MemoryEntry::default());
        uri
    }

    /// Register a reference whose stream breaks after yielding `bytes`.
    pub fn insert_failing(&mut self, uri: &str, display_name: Option<&str>, bytes: &[u8]) -> ContentUri {
        let uri = ContentUri::parse(uri).unwrap();
        self.entries.insert(
            uri.clone(),
            MemoryEntry {
                display_name: display_name.map(str::to_string),
                bytes: Some(bytes.to_vec()),
                fails_mid_copy: true,
            },
        );
        uri
    }

    pub fn name_queries(&self) -> Vec<ContentUri> {
        self.name_queries.lock().clone()
    }
}

impl ContentResolver for MemoryResolver {
    fn display_name(&self, uri: &ContentUri) -> Option<String> {
        self.name_queries.lock().push(uri.clone());
        self.entries.get(uri).and_then(|e| e.display_name.clone())
    }

    fn open(&self, uri: &ContentUri) -> io::Result<Option<ContentStream>> {
        match self.entries.get(uri) {
            Some(MemoryEntry {
                bytes: Some(bytes),
                fails_mid_copy: true,
                ..
            }) => Ok(Some(Box::new(BrokenStream(Cursor::new(bytes.clone()))))),
            Some(MemoryEntry {
                bytes: Some(bytes), ..
            }) => Ok(Some(Box::new(Cursor::new(bytes.clone())))),
            Some(_) => Ok(None),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no provider for {}", uri),
            )),
        }
    }
}
