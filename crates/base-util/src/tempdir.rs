//! Scoped temporary directories under the platform temp root.
//!
//! A [`TempDirectory`] owns one directory below [`temp_root`]. The directory
//! is created on construction, recreated on demand if something removes it,
//! and deleted when a scope entered with [`TempDirectory::enter`] ends (if
//! `clean_on_exit` is set) and unconditionally when the value is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use base_util::TempDirectory;
//!
//! let tmp = TempDirectory::create()?;
//! {
//!     let scope = tmp.enter()?;
//!     let draft = scope.temp_file(Some("draft"), Some("txt"))?;
//!     std::fs::write(&draft, "hello")?;
//! } // directory removed here
//! ```
//!
//! Every live directory is also tracked in a process-wide registry.
//! [`sweep_live`] removes whatever is still registered, for shutdown paths
//! that bypass destructors such as `std::process::exit`.

use crate::error::{Error, Result};
use crate::id::Identifier;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Live directories and the number of managers holding each one.
static LIVE: Lazy<Mutex<HashMap<PathBuf, usize>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Canonical path of the platform temp root (honours `TMPDIR`).
pub fn temp_root() -> Result<PathBuf> {
    Ok(std::env::temp_dir().canonicalize()?)
}

/// Remove every directory still held by a live [`TempDirectory`].
///
/// Returns the number of registered directories. Removal errors are ignored.
pub fn sweep_live() -> usize {
    let paths: Vec<PathBuf> = {
        let mut live = LIVE.lock().unwrap_or_else(|e| e.into_inner());
        live.drain().map(|(path, _)| path).collect()
    };

    for path in &paths {
        remove_best_effort(path);
    }

    paths.len()
}

/// A temporary directory below the platform temp root.
#[derive(Debug)]
pub struct TempDirectory {
    root_path: PathBuf,
    clean_on_exit: bool,
    kept: bool,
}

impl TempDirectory {
    /// Create (or reuse) `sub_dir` below the temp root.
    ///
    /// A missing or empty `sub_dir` is replaced by a random identifier. Fails
    /// with [`Error::PathEscape`] when the canonical path is not strictly
    /// below the temp root and with [`Error::PermissionDenied`] when the
    /// directory is not writable.
    pub fn new(sub_dir: Option<&str>, clean_on_exit: bool) -> Result<Self> {
        Self::new_in(&temp_root()?, sub_dir, clean_on_exit)
    }

    /// Random directory cleaned on scope exit.
    pub fn create() -> Result<Self> {
        Self::new(None, true)
    }

    /// Named directory cleaned on scope exit.
    pub fn named(sub_dir: &str) -> Result<Self> {
        Self::new(Some(sub_dir), true)
    }

    pub(crate) fn new_in(root: &Path, sub_dir: Option<&str>, clean_on_exit: bool) -> Result<Self> {
        let root = root.canonicalize()?;
        let sub_dir = match sub_dir {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => Identifier::uuid(),
        };

        let root_path = resolve_below(&root, &sub_dir)?;
        ensure_dir(&root_path)?;
        register(&root_path);

        Ok(Self {
            root_path,
            clean_on_exit,
            kept: false,
        })
    }

    /// Absolute canonical path of the directory.
    pub fn path(&self) -> &Path {
        &self.root_path
    }

    pub fn clean_on_exit(&self) -> bool {
        self.clean_on_exit
    }

    pub fn set_clean_on_exit(&mut self, clean_on_exit: bool) {
        self.clean_on_exit = clean_on_exit;
    }

    /// Make sure the directory exists and is writable, recreating it if needed.
    pub fn ensure(&self) -> Result<()> {
        ensure_dir(&self.root_path)
    }

    /// Reserve a fresh file name inside the directory.
    ///
    /// The name is `"{prepend} {id}{suffix}"` where `prepend` is trimmed and
    /// dropped if empty, and `suffix` gets a leading `.` if it lacks one. The
    /// file itself is not created.
    pub fn temp_file(&self, prepend: Option<&str>, suffix: Option<&str>) -> Result<PathBuf> {
        self.ensure()?;
        Ok(self
            .root_path
            .join(file_name(prepend, suffix, &Identifier::uuid())))
    }

    /// Enter a scope. The returned guard calls [`TempDirectory::exit`] when dropped.
    pub fn enter(&self) -> Result<TempDirScope<'_>> {
        self.ensure()?;
        Ok(TempDirScope { dir: self })
    }

    /// Same as [`TempDirectory::enter`].
    pub fn acquire(&self) -> Result<TempDirScope<'_>> {
        self.enter()
    }

    /// Leave a scope: remove the directory if `clean_on_exit` is set.
    pub fn exit(&self) {
        if self.clean_on_exit {
            self.clean();
        }
    }

    /// Same as [`TempDirectory::exit`].
    pub fn release(&self) {
        self.exit()
    }

    /// Run `f` inside a scope; the scope is left even if `f` panics.
    pub fn scoped<R>(&self, f: impl FnOnce(&TempDirectory) -> R) -> Result<R> {
        let scope = self.enter()?;
        Ok(f(&scope))
    }

    /// Remove the directory and everything in it, ignoring errors.
    pub fn clean(&self) {
        remove_best_effort(&self.root_path);
    }

    /// Give up ownership: the directory is left on disk when `self` is dropped.
    pub fn keep(mut self) -> PathBuf {
        self.kept = true;
        self.root_path.clone()
    }
}

impl AsRef<Path> for TempDirectory {
    fn as_ref(&self) -> &Path {
        &self.root_path
    }
}

impl Drop for TempDirectory {
    fn drop(&mut self) {
        unregister(&self.root_path);
        if !self.kept {
            self.clean();
        }
    }
}

/// Guard for an entered [`TempDirectory`] scope.
#[derive(Debug)]
pub struct TempDirScope<'a> {
    dir: &'a TempDirectory,
}

impl Deref for TempDirScope<'_> {
    type Target = TempDirectory;

    fn deref(&self) -> &Self::Target {
        self.dir
    }
}

impl Drop for TempDirScope<'_> {
    fn drop(&mut self) {
        self.dir.exit();
    }
}

/// Resolve `root/sub_dir` to a canonical path strictly below `root`.
///
/// `root` must already be canonical. The path is walked one component at a
/// time: every prefix that exists is canonicalized so symlinks are followed,
/// missing components are kept lexically and `..` pops one level. A missing
/// parent is left for `create_dir` to report once the path is known to stay
/// below `root`.
fn resolve_below(root: &Path, sub_dir: &str) -> Result<PathBuf> {
    let mut resolved = PathBuf::new();

    for component in root.join(sub_dir).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                match resolved.canonicalize() {
                    Ok(path) => resolved = path,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    if resolved == root || !resolved.starts_with(root) {
        return Err(Error::path_escape(sub_dir, resolved, root));
    }

    Ok(resolved)
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        match fs::create_dir(path) {
            Ok(()) => debug!(path = %path.display(), "Created temporary directory"),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {}
            Err(err) => return Err(err.into()),
        }
    }

    check_writable(path)
}

/// Checked with an anonymous file; it is gone as soon as the handle closes.
fn check_writable(path: &Path) -> Result<()> {
    match tempfile::tempfile_in(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            Err(Error::permission_denied(path))
        }
        Err(err) => Err(err.into()),
    }
}

fn file_name(prepend: Option<&str>, suffix: Option<&str>, id: &str) -> String {
    let prepend = match prepend.map(str::trim) {
        Some(p) if !p.is_empty() => format!("{p} "),
        _ => String::new(),
    };

    let suffix = match suffix {
        Some(s) if s.is_empty() || s.starts_with('.') => s.to_string(),
        Some(s) => format!(".{s}"),
        None => String::new(),
    };

    format!("{prepend}{id}{suffix}")
}

fn remove_best_effort(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => debug!(path = %path.display(), "Removed temporary directory"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => debug!(
            path = %path.display(),
            error = %err,
            "Ignoring failure to remove temporary directory"
        ),
    }
}

fn register(path: &Path) {
    let mut live = LIVE.lock().unwrap_or_else(|e| e.into_inner());
    *live.entry(path.to_path_buf()).or_insert(0) += 1;
}

fn unregister(path: &Path) {
    let mut live = LIVE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(count) = live.get_mut(path) {
        *count -= 1;
        if *count == 0 {
            live.remove(path);
        }
    }
}

#[cfg(test)]
fn is_live(path: &Path) -> bool {
    LIVE.lock()
        .unwrap_or_else(|e| e.into_inner())
        .contains_key(path)
}
