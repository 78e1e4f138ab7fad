//! On-disk layout of a container file.
//!
//! Header: 4-byte magic `rmkd`, little-endian `u16` format version, `u16`
//! reserved, `u32` record count. Then one record per directory in sorted
//! full-path order: `u16` path byte length followed by the UTF-8 bytes of
//! the `/`-joined path. Sorted order guarantees a parent record precedes
//! its children, which decoding relies on.

use std::collections::BTreeSet;
use std::str;

use super::ContainerError;
use crate::target::InternalPath;

pub const MAGIC: [u8; 4] = *b"rmkd";
pub const VERSION: u16 = 1;

const HEADER_LEN: usize = 12;

pub fn encode(dirs: &BTreeSet<InternalPath>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&(dirs.len() as u32).to_le_bytes());
    for dir in dirs {
        let path = dir.to_string();
        // InternalPath::parse bounds the joined path at u16::MAX bytes.
        buf.extend_from_slice(&(path.len() as u16).to_le_bytes());
        buf.extend_from_slice(path.as_bytes());
    }
    buf
}

pub fn decode(bytes: &[u8]) -> Result<BTreeSet<InternalPath>, ContainerError> {
    if bytes.len() < HEADER_LEN {
        return Err(ContainerError::Format(format!(
            "{} bytes is shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }
    if bytes[..4] != MAGIC {
        return Err(ContainerError::Format("bad magic".to_owned()));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(ContainerError::Format(format!(
            "unsupported format version {version}"
        )));
    }
    let count = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);

    let mut dirs = BTreeSet::new();
    let mut prev: Option<InternalPath> = None;
    let mut offset = HEADER_LEN;
    for idx in 0..count {
        let truncated =
            || ContainerError::Format(format!("truncated at record {idx} of {count}"));
        let len_bytes = bytes.get(offset..offset + 2).ok_or_else(truncated)?;
        let len = usize::from(u16::from_le_bytes([len_bytes[0], len_bytes[1]]));
        offset += 2;
        let raw = bytes.get(offset..offset + len).ok_or_else(truncated)?;
        offset += len;

        let text = str::from_utf8(raw).map_err(|_| {
            ContainerError::Format(format!("record {idx} is not valid UTF-8"))
        })?;
        let path = InternalPath::parse(text).map_err(|_| {
            ContainerError::Format(format!("record {idx} holds invalid path `{text}`"))
        })?;
        if prev.as_ref().is_some_and(|p| *p >= path) {
            return Err(ContainerError::Format(format!(
                "record {idx} `{path}` out of order or duplicated"
            )));
        }
        if let Some(parent) = path.parent() {
            if !dirs.contains(&parent) {
                return Err(ContainerError::Format(format!(
                    "record {idx} `{path}` has no parent record"
                )));
            }
        }
        prev = Some(path.clone());
        dirs.insert(path);
    }
    if offset != bytes.len() {
        return Err(ContainerError::Format(format!(
            "{} trailing bytes after the last record",
            bytes.len() - offset
        )));
    }
    Ok(dirs)
}
