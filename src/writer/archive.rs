//! Where generated entries end up.
//!
//! The generator only ever adds named entries; `ZipSink` packs them into
//! the final `.aia` bytes, `EntryMap` keeps them in memory.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::GenerateResult;

pub trait ArchiveSink {
    fn add_binary(&mut self, path: &str, bytes: &[u8]) -> GenerateResult<()>;

    fn add_text(&mut self, path: &str, text: &str) -> GenerateResult<()> {
        self.add_binary(path, text.as_bytes())
    }
}

/// Deflated zip in memory. Entries carry a fixed timestamp so identical
/// input gives identical bytes.
pub struct ZipSink {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    opts: SimpleFileOptions,
}

impl ZipSink {
    pub fn new() -> Self {
        let opts = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            opts,
        }
    }

    pub fn finish(self) -> GenerateResult<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ZipSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSink for ZipSink {
    fn add_binary(&mut self, path: &str, bytes: &[u8]) -> GenerateResult<()> {
        self.zip.start_file(path, self.opts)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }
}

/// Entries by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMap {
    pub entries: BTreeMap<String, Vec<u8>>,
}

impl EntryMap {
    /// Unpacks an archive produced by `ZipSink`.
    pub fn from_zip(bytes: &[u8]) -> GenerateResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.insert(file.name().to_string(), data);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl ArchiveSink for EntryMap {
    fn add_binary(&mut self, path: &str, bytes: &[u8]) -> GenerateResult<()> {
        self.entries.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }
}
