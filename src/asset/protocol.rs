use std::io;
use crate::{AssetPath, HashMap};

/**
 * A method of receiving bytes from files.
 * IE: file, raw, etc.
 */
pub trait Protocol: Send + Sync + 'static {
    /**
     * Name of the protocol. IE: file, raw etc.
     * Should not change across invocations.
     */
    fn name(&self) -> &str;
    /**
     * Retrieves raw bytes from the path specified.
     */
    fn read(&self, path: &AssetPath) -> io::Result<Vec<u8>>;
}

/**
 * An implementation of [`Protocol`] that fetches bytes from the file system.
 */
#[derive(Copy, Clone, Debug)]
pub struct FileProtocol;
impl Protocol for FileProtocol {
    fn name(&self) -> &str { "file" }
    fn read(&self, path: &AssetPath) -> io::Result<Vec<u8>> {
        std::fs::read(path.without_protocol())
    }
}

/**
 * An implementation of [`Protocol`] that always returns the bytes it stores.
 * Useful for testing purposes.
 */
#[derive(Clone, Debug)]
pub struct RawProtocol(pub &'static [u8]);
impl From<&'static str> for RawProtocol {
    fn from(value: &'static str) -> Self {
        Self(value.as_bytes())
    }
}
impl Protocol for RawProtocol {
    fn name(&self) -> &str { "raw" }
    fn read(&self, _path: &AssetPath) -> io::Result<Vec<u8>> {
        Ok(self.0.to_vec())
    }
}

/**
 * An implementation of [`Protocol`] that serves files from memory, keyed by path without protocol.
 * Lets tests stand up several related files, such as a map and the tilesets it references.
 */
#[derive(Clone, Default, Debug)]
pub struct MemoryProtocol {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, contents: impl AsRef<[u8]>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl AsRef<[u8]>) {
        self.files.insert(path.into(), contents.as_ref().to_vec());
    }
}

impl Protocol for MemoryProtocol {
    fn name(&self) -> &str { "mem" }
    fn read(&self, path: &AssetPath) -> io::Result<Vec<u8>> {
        let key = path.without_protocol();
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no file at '{key}'")))
    }
}
