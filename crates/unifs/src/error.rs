use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur in virtual filesystem operations
#[derive(Debug, PartialEq)]
pub enum Error {
    NotFound(PathBuf),
    NotADirectory(PathBuf),
    NotAFile(PathBuf),

    /// Component contains multiple wildcards (only one '*' is allowed)
    MultipleWildcards(String),

    /// Glob pattern has no components at all
    EmptyPattern,

    /// Path component could not be converted to string
    InvalidComponent(PathBuf),

    /// Underlying storage failure; the message keeps the error comparable
    Io(PathBuf, String),
}

impl Error {
    pub fn not_found<P: AsRef<Path>>(path: P) -> Self {
        Error::NotFound(path.as_ref().to_path_buf())
    }

    pub fn not_a_directory<P: AsRef<Path>>(path: P) -> Self {
        Error::NotADirectory(path.as_ref().to_path_buf())
    }

    pub fn not_a_file<P: AsRef<Path>>(path: P) -> Self {
        Error::NotAFile(path.as_ref().to_path_buf())
    }

    pub fn multiple_wildcards<S: AsRef<str>>(s: S) -> Self {
        Error::MultipleWildcards(s.as_ref().into())
    }

    pub fn invalid_component<P: AsRef<Path>>(p: P) -> Self {
        Error::InvalidComponent(p.as_ref().into())
    }

    pub fn io<P: AsRef<Path>>(path: P, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(path)
        } else {
            Error::Io(path.as_ref().to_path_buf(), err.to_string())
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NotFound(path) => write!(f, "Path not found: {}", path.display()),
            Error::NotADirectory(path) => write!(f, "Not a directory: {}", path.display()),
            Error::NotAFile(path) => write!(f, "Not a file: {}", path.display()),
            Error::MultipleWildcards(part) => write!(f, "Multiple wildcards: {}", part),
            Error::EmptyPattern => write!(f, "Glob pattern is empty"),
            Error::InvalidComponent(path) => write!(f, "Invalid component: {}", path.display()),
            Error::Io(path, err) => write!(f, "I/O failure at {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {}
