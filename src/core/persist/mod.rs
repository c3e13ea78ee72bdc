//! core::persist
//!
//! Line-oriented repository file format.
//!
//! # Format
//!
//! ```text
//! count <N>
//! id <u64>                  ┐
//! parent <u64>              │
//! ts_ns <i64>               │
//! hash <u64>                │ repeated N times
//! message <quoted-string>   │
//! content <quoted-string>   │
//! ----                      ┘
//! branches <M>
//! bname <quoted-string> bhead <u64>    (repeated M times, by name)
//! current_branch <quoted-string>
//! detached <0|1>
//! head <u64>
//! ```
//!
//! Numbers are decimal. Quoted strings follow [`quoted`]. The output is a
//! pure function of the repository state, so saving the same state twice
//! yields identical bytes.
//!
//! # Loading
//!
//! Loading is strict: a missing keyword, unparseable number, unterminated
//! string or missing `----` separator is [`PersistError::Malformed`]. Beyond
//! syntax, version ids must be sequential, parents must precede their
//! children and a detached HEAD must name a loaded version.

pub mod quoted;
mod reader;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use self::quoted::write_quoted;
use self::reader::Reader;
use super::graph::BranchGraph;
use super::store::{Version, VersionStore};
use super::types::{BranchName, ContentHash, Timestamp, VersionId};

/// Errors from reading or writing a repository file.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed repository file at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// Render the repository file for `store` and `graph`.
pub fn encode(store: &VersionStore, graph: &BranchGraph) -> String {
    let mut out = String::new();

    out.push_str(&format!("count {}\n", store.len()));
    for version in store.iter() {
        out.push_str(&format!("id {}\n", version.id));
        out.push_str(&format!("parent {}\n", version.parent));
        out.push_str(&format!("ts_ns {}\n", version.timestamp.as_nanos()));
        out.push_str(&format!("hash {}\n", version.content_hash.as_u64()));
        out.push_str("message ");
        write_quoted(&mut out, &version.message);
        out.push_str("\ncontent ");
        write_quoted(&mut out, &version.content);
        out.push_str("\n----\n");
    }

    out.push_str(&format!("branches {}\n", graph.branches().count()));
    for (name, head) in graph.branches() {
        out.push_str("bname ");
        write_quoted(&mut out, name.as_str());
        out.push_str(&format!(" bhead {head}\n"));
    }

    out.push_str("current_branch ");
    write_quoted(&mut out, graph.current_branch().as_str());
    out.push('\n');
    out.push_str(&format!("detached {}\n", u8::from(graph.is_detached())));
    out.push_str(&format!("head {}\n", graph.head()));

    out
}

/// Parse a repository file.
pub fn decode(text: &str) -> Result<(VersionStore, BranchGraph), PersistError> {
    let mut reader = Reader::new(text);

    reader.keyword("count")?;
    let count: u64 = reader.number("count")?;
    reader.skip_line();

    let mut store = VersionStore::new();
    for _ in 0..count {
        let version = decode_version(&mut reader)?;
        store
            .restore(version)
            .map_err(|e| reader.malformed(e.to_string()))?;
    }

    reader.keyword("branches")?;
    let branch_count: u64 = reader.number("branches count")?;
    reader.skip_line();

    let mut branches = BTreeMap::new();
    for _ in 0..branch_count {
        reader.keyword("bname")?;
        let name = reader.quoted("branch name")?;
        let name = BranchName::from_stored(name).map_err(|e| reader.malformed(e.to_string()))?;
        reader.keyword("bhead")?;
        let head = VersionId::new(reader.number("bhead")?);
        reader.skip_line();
        branches.insert(name, head);
    }

    reader.keyword("current_branch")?;
    let current = reader.quoted("current_branch")?;
    let current = BranchName::from_stored(current).map_err(|e| reader.malformed(e.to_string()))?;
    reader.skip_line();

    reader.keyword("detached")?;
    let detached = reader.number::<i64>("detached")? != 0;
    reader.skip_line();

    reader.keyword("head")?;
    let head = VersionId::new(reader.number("head")?);

    let graph = BranchGraph::from_parts(&store, branches, current, detached, head)
        .map_err(|e| reader.malformed(format!("head: {e}")))?;

    Ok((store, graph))
}

fn decode_version(reader: &mut Reader<'_>) -> Result<Version, PersistError> {
    reader.keyword("id")?;
    let id = VersionId::new(reader.number("id")?);
    reader.skip_line();

    reader.keyword("parent")?;
    let parent = VersionId::new(reader.number("parent")?);
    reader.skip_line();

    reader.keyword("ts_ns")?;
    let timestamp = Timestamp::from_nanos(reader.number("ts_ns")?);
    reader.skip_line();

    reader.keyword("hash")?;
    let content_hash = ContentHash::from_u64(reader.number("hash")?);
    reader.skip_line();

    reader.keyword("message")?;
    let message = reader.quoted("message")?;
    reader.skip_line();

    reader.keyword("content")?;
    let content = reader.quoted("content")?;
    reader.skip_line();

    match reader.line() {
        Some("----") => {}
        Some(_) => return Err(reader.malformed("expected '----'")),
        None => return Err(reader.malformed("missing separator")),
    }

    Ok(Version {
        id,
        parent,
        timestamp,
        content_hash,
        message,
        content,
    })
}

/// Read a repository file into memory.
///
/// Only failing to read is an error here. The bytes are checked by
/// [`utf8_text`] once the caller has reset its state.
pub fn read_file(path: &Path) -> Result<Vec<u8>, PersistError> {
    fs::read(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// View file contents as text.
///
/// # Errors
///
/// [`PersistError::Malformed`] at the line holding the first byte that is
/// not valid UTF-8.
pub fn utf8_text(bytes: &[u8]) -> Result<&str, PersistError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        PersistError::Malformed {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
        }
    })
}

/// Write `contents` to `path` atomically.
///
/// Writes a sibling temp file and renames it over the target, so a crash
/// mid-write never leaves a truncated repository behind.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<(), PersistError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PersistError::Io { path, source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = fs::File::create(&temp_path).map_err(io_err(&temp_path))?;
    file.write_all(contents.as_bytes())
        .map_err(io_err(&temp_path))?;
    file.sync_all().map_err(io_err(&temp_path))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(io_err(path))
}
