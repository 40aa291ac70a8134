//! Archive: zip member enumeration, eligibility, and permissive decoding.

use std::io::{Cursor, Read};

use bytes::Bytes;
use zip::ZipArchive;

use crate::error::{IndexError, IndexResult};

/// Prefix of the resource-fork folder macOS adds to archives.
const PLATFORM_METADATA_PREFIX: &str = "__MACOSX";

/// One eligible member, identified by its position in the central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub index: usize,
    pub name: String,
}

/// An opened upload. Cloning is cheap: the buffer and the parsed central
/// directory are shared, so every worker can read its own member.
#[derive(Debug, Clone)]
pub struct Archive {
    zip: ZipArchive<Cursor<Bytes>>,
    members: Vec<MemberRef>,
}

impl Archive {
    /// Parse the central directory and collect eligible members in
    /// enumeration order.
    pub fn open(bytes: Bytes) -> IndexResult<Self> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| IndexError::InvalidArchive(e.to_string()))?;

        let mut members = Vec::new();
        for index in 0..zip.len() {
            let entry = zip
                .by_index_raw(index)
                .map_err(|e| IndexError::InvalidArchive(e.to_string()))?;
            if entry.is_dir() || !is_eligible(entry.name()) {
                continue;
            }
            members.push(MemberRef {
                index,
                name: entry.name().to_string(),
            });
        }

        if members.is_empty() {
            return Err(IndexError::EmptyArchive);
        }

        Ok(Self { zip, members })
    }

    pub fn members(&self) -> &[MemberRef] {
        &self.members
    }

    /// Decompress and decode one member, reading at most `max_bytes`.
    ///
    /// The declared size in the central directory is not trusted: the buffer
    /// grows with the data actually inflated.
    pub fn read_text(&mut self, member: &MemberRef, max_bytes: usize) -> IndexResult<String> {
        let entry = self
            .zip
            .by_index(member.index)
            .map_err(|e| IndexError::InvalidArchive(format!("{}: {}", member.name, e)))?;
        let mut buf = Vec::new();
        entry
            .take((max_bytes as u64).saturating_add(1))
            .read_to_end(&mut buf)?;
        if buf.len() > max_bytes {
            return Err(IndexError::MemberTooLarge {
                name: member.name.clone(),
                max: max_bytes,
            });
        }
        Ok(decode_lossy(buf))
    }
}

/// Platform metadata, dotfiles, and directory entries are skipped.
pub fn is_eligible(name: &str) -> bool {
    if name.is_empty() || name.ends_with('/') {
        return false;
    }
    if name.starts_with(PLATFORM_METADATA_PREFIX) || name.starts_with('.') {
        return false;
    }
    let base = name.rsplit('/').next().unwrap_or(name);
    !base.starts_with('.')
}

/// Invalid UTF-8 sequences become U+FFFD; decoding never fails.
pub fn decode_lossy(buf: Vec<u8>) -> String {
    match String::from_utf8(buf) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
