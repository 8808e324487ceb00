//! Filesystem helpers built on `cap-std` and `camino`.

use std::io::{self, BufReader, Write};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CliError;

/// Open a UTF-8 file path using ambient authority.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Resolve the directory holding `path` and return it with the file name.
pub(crate) fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create the parent directory of `path` when it is missing.
pub(crate) fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (anchor, missing) = split_anchor(parent);
    if missing.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&missing)
}

/// Whether `path` exists and is a regular file.
pub(crate) fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Separate the leading root, prefix and `..` components of `dir`, which
/// capability handles cannot traverse, from the descendants below them.
fn split_anchor(dir: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut anchor = Utf8PathBuf::new();
    let mut below = Utf8PathBuf::new();
    for component in dir.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::ParentDir
                if below.as_str().is_empty() =>
            {
                anchor.push(component);
            }
            Utf8Component::CurDir => {}
            other => below.push(other),
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    (anchor, below)
}

/// Check that an input path names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Decode a JSON document from disk; `what` names it in errors.
pub(crate) fn load_json<T: DeserializeOwned>(
    path: &Utf8Path,
    what: &'static str,
) -> Result<T, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::ReadInput {
        what,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file into memory; `what` names it in errors.
pub(crate) fn load_bytes(path: &Utf8Path, what: &'static str) -> Result<Vec<u8>, CliError> {
    let read = || -> io::Result<Vec<u8>> {
        let (dir, name) = open_dir_and_file(path)?;
        dir.read(name.as_str())
    };
    read().map_err(|source| CliError::ReadInput {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Serialise `value` as pretty JSON into `path`, creating parent
/// directories as needed.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    path: &Utf8Path,
    what: &'static str,
    value: &T,
) -> Result<(), CliError> {
    let mut payload = serde_json::to_vec_pretty(value)
        .map_err(|source| CliError::Serialise { what, source })?;
    payload.push(b'\n');
    let write = || -> io::Result<()> {
        ensure_parent_dir(path)?;
        let (dir, name) = open_dir_and_file(path)?;
        let mut file = dir.create(name.as_str())?;
        file.write_all(&payload)?;
        file.flush()
    };
    write().map_err(|source| CliError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Write one report line to the command's output.
pub(crate) fn report(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writeln!(writer, "{line}").map_err(CliError::WriteReport)
}
