// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

//! Loads NASL code based on a name.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

/// Defines abstract Loader error cases
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Informs the caller to retry the call
    #[error("There was a temporary issue while reading {0}.")]
    Retry(String),
    /// The given key was not found
    #[error("{0} not found.")]
    NotFound(String),
    /// Not allowed to read data of key
    #[error("Insufficient rights to read {0}.")]
    PermissionDenied(String),
    /// There is a deeper problem with the underlying source
    #[error("Unexpected issue while trying to read {0}")]
    Dirty(String),
}

impl From<(&str, std::io::Error)> for LoadError {
    fn from(value: (&str, std::io::Error)) -> Self {
        let (pstr, value) = value;
        match value.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(pstr.to_owned()),
            std::io::ErrorKind::PermissionDenied => LoadError::PermissionDenied(pstr.to_owned()),
            std::io::ErrorKind::TimedOut => LoadError::Retry(format!("{pstr} timed out.")),
            std::io::ErrorKind::Interrupted => LoadError::Retry(format!("{pstr} interrupted.")),
            _ => LoadError::Dirty(format!("{pstr}: {value:?}")),
        }
    }
}

impl LoadError {
    pub fn filename(&self) -> &str {
        match self {
            LoadError::Retry(x) => x,
            LoadError::NotFound(x) => x,
            LoadError::PermissionDenied(x) => x,
            LoadError::Dirty(x) => x,
        }
    }
}

/// Reads the content of the file at `path`.
///
/// First attempts to read the file as UTF-8 and falls back to mapping each
/// byte to a char, since not every plugin is UTF-8 encoded.
fn read_utf8_or_non_utf8_path(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::from((path.to_str().unwrap_or_default(), e)))?;
    match String::from_utf8(bytes) {
        Ok(code) => Ok(code),
        Err(e) => Ok(e.as_bytes().iter().map(|&b| b as char).collect()),
    }
}

/// A source of NASL code.
trait NaslSource: Send + Sync {
    fn load(&self, filename: &str) -> Result<String, LoadError>;

    fn root_path(&self) -> Option<&Path> {
        None
    }
}

/// Loads files from the file system using paths relative to a root
/// directory.
#[derive(Debug, Clone)]
struct FileSystemSource {
    root: PathBuf,
}

impl NaslSource for FileSystemSource {
    fn load(&self, filename: &str) -> Result<String, LoadError> {
        let path = self.root.join(filename);
        if !path.is_file() {
            return Err(LoadError::NotFound(filename.to_owned()));
        }
        read_utf8_or_non_utf8_path(&path)
    }

    fn root_path(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

/// Files compiled into the binary or registered by tests.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedSource {
    files: HashMap<String, String>,
}

impl NaslSource for EmbeddedSource {
    fn load(&self, filename: &str) -> Result<String, LoadError> {
        self.files
            .get(filename)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(filename.into()))
    }
}

impl EmbeddedSource {
    pub fn insert(&mut self, file_name: &str, contents: &str) {
        self.files.insert(file_name.into(), contents.into());
    }

    pub fn with_file(mut self, file_name: &str, contents: &str) -> Self {
        self.insert(file_name, contents);
        self
    }

    pub fn build(self) -> Loader {
        Loader {
            sources: vec![Arc::new(self)],
        }
    }
}

/// Resolves script names to their code by asking each registered source in
/// order.
#[derive(Clone, Default)]
pub struct Loader {
    sources: Vec<Arc<dyn NaslSource>>,
}

impl Loader {
    /// Create a new loader that loads files from the file system
    /// relative to the given feed path.
    pub fn from_feed_path(path: impl AsRef<Path>) -> Self {
        Self {
            sources: vec![Arc::new(FileSystemSource {
                root: path.as_ref().to_owned(),
            })],
        }
    }

    /// Create an embedded source. Files can be added with
    /// `.with_file` and the result turned into a `Loader` with `.build()`.
    ///
    /// ```
    /// # use nasl_vm::nasl::Loader;
    /// let loader = Loader::embedded()
    ///     .with_file("foo.nasl", "display('hello world');")
    ///     .build();
    /// assert!(loader.load("foo.nasl").is_ok());
    /// ```
    pub fn embedded() -> EmbeddedSource {
        EmbeddedSource::default()
    }

    /// A loader that returns `LoadError::NotFound` for any given filename.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends the sources of `fallback`; they are asked after the sources
    /// of `self`.
    pub fn chain(mut self, fallback: Loader) -> Self {
        self.sources.extend(fallback.sources);
        self
    }

    pub fn load(&self, filename: &str) -> Result<String, LoadError> {
        for source in &self.sources {
            match source.load(filename) {
                Err(LoadError::NotFound(_)) => continue,
                result => return result,
            }
        }
        Err(LoadError::NotFound(filename.to_owned()))
    }

    /// The root of the first file system source.
    pub fn root_path(&self) -> Option<&Path> {
        self.sources.iter().find_map(|s| s.root_path())
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("sources", &self.sources.len())
            .field("root", &self.root_path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nasl-loader-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn file_system_before_embedded() {
        let dir = temp_dir("chain");
        fs::write(dir.join("a.inc"), "a = 1;").unwrap();
        let loader = Loader::from_feed_path(&dir).chain(
            Loader::embedded()
                .with_file("a.inc", "a = 2;")
                .with_file("b.inc", "b = 2;")
                .build(),
        );
        assert_eq!(loader.load("a.inc").unwrap(), "a = 1;");
        assert_eq!(loader.load("b.inc").unwrap(), "b = 2;");
        assert_eq!(
            loader.load("c.inc"),
            Err(LoadError::NotFound("c.inc".into()))
        );
        assert_eq!(loader.root_path(), Some(dir.as_path()));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn non_utf8_files_map_bytes_to_chars() {
        let dir = temp_dir("latin1");
        let mut file = fs::File::create(dir.join("l.nasl")).unwrap();
        file.write_all(&[b'a', 0xe4, b'b']).unwrap();
        let loader = Loader::from_feed_path(&dir);
        assert_eq!(loader.load("l.nasl").unwrap(), "a\u{e4}b");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn empty_loader() {
        assert!(matches!(
            Loader::empty().load("x.nasl"),
            Err(LoadError::NotFound(_))
        ));
    }
}
