//! Whole-file helpers for the file-backed stores, built on `cap-std` and
//! `camino`.
//!
//! Every helper opens the parent directory with ambient authority, performs
//! one operation on the named file and drops the handle again. Nothing is
//! held open between calls.
#![forbid(unsafe_code)]

use std::io::{self, ErrorKind};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open the directory containing `path` and return it with the file name.
///
/// # Errors
///
/// Fails when `path` has no file name or its parent cannot be opened.
pub fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create every missing directory above `path`.
///
/// # Errors
///
/// Propagates failures to open the nearest root or create a directory.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_root(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Create `path` as an empty file unless something already exists there.
///
/// Returns whether a file was created. Parent directories are created as
/// needed.
///
/// # Errors
///
/// Propagates directory or file creation failures.
pub fn create_empty_if_absent(path: &Utf8Path) -> io::Result<bool> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_parent(path)?;
    let mut options = fs_utf8::OpenOptions::new();
    options.write(true).create_new(true);
    match dir.open_with(&name, &options) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(err) => Err(err),
    }
}

/// Read the whole of `path` as UTF-8 text.
///
/// # Errors
///
/// Fails when the file is missing, unreadable or not valid UTF-8.
pub fn read_all(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_parent(path)?;
    dir.read_to_string(&name)
}

/// Read the whole of `path`, or `None` when it does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read.
pub fn read_if_exists(path: &Utf8Path) -> io::Result<Option<String>> {
    match read_all(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replace the contents of `path` with `contents`, creating the file and
/// its parent directories when missing.
///
/// The file is truncated before writing; a failure part way through leaves
/// it incomplete.
///
/// # Errors
///
/// Propagates directory creation and write failures.
pub fn overwrite(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_parent(path)?;
    dir.write(&name, contents)
}

fn split_root(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let (base, relative) = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_text = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_text).join(std::path::MAIN_SEPARATOR_STR);
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip drive prefix"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR);
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((dir, relative))
}
