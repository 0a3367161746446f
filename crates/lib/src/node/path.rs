//! Dotted paths addressing leaves in nested mappings.
//!
//! The [`Path`]/[`PathBuf`] pair follows the borrowed/owned pattern of
//! `std::path::Path`/`PathBuf`: `PathBuf` owns a normalized dotted string,
//! `Path` is the unsized borrowed view. Paths are always normalized on
//! construction, so building one is infallible.
//!
//! # Usage
//!
//! ```
//! use treeform::node::PathBuf;
//!
//! // Construct from string (automatically normalized)
//! let path: PathBuf = "server.listen.port".parse().unwrap();
//!
//! // Build incrementally
//! let path = PathBuf::new().push("server").push("listen").push("port");
//! assert_eq!(path.as_str(), "server.listen.port");
//! ```

use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

/// Normalizes a dotted path string.
///
/// Empty components are dropped: leading, trailing and consecutive dots
/// collapse away, and a string of only dots becomes the empty (root) path.
pub fn normalize_path(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    input
        .split('.')
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// An owned, normalized dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathBuf {
    inner: String,
}

/// A borrowed, normalized dotted path.
///
/// This type is unsized and must always be used behind a reference.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl PathBuf {
    /// Creates the empty (root) path.
    pub fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Creates a path by normalizing the input string.
    pub fn normalize(path: &str) -> Self {
        Self {
            inner: normalize_path(path),
        }
    }

    /// Appends a path fragment, normalizing it first.
    ///
    /// Pushing an empty fragment is a no-op, so chained pushes never produce
    /// consecutive dots.
    pub fn push(mut self, fragment: impl AsRef<str>) -> Self {
        let normalized = normalize_path(fragment.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if self.inner.is_empty() {
            self.inner = normalized;
        } else {
            self.inner.push('.');
            self.inner.push_str(&normalized);
        }
        self
    }

    /// Returns a new path with `fragment` appended, leaving `self` intact.
    pub fn join(&self, fragment: impl AsRef<str>) -> PathBuf {
        self.clone().push(fragment)
    }

    /// Returns the parent path, or `None` if this is the root.
    pub fn parent(&self) -> Option<PathBuf> {
        if self.inner.is_empty() {
            return None;
        }
        Some(match self.inner.rfind('.') {
            Some(last_dot) => PathBuf {
                inner: self.inner[..last_dot].to_string(),
            },
            None => PathBuf::new(),
        })
    }
}

impl Path {
    fn from_normalized(s: &str) -> &Path {
        // SAFETY: Path is a repr-transparent view of str
        unsafe { &*(s as *const str as *const Path) }
    }

    /// Iterates the path components in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.').filter(|s| !s.is_empty())
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        if self.inner.is_empty() {
            0
        } else {
            self.inner.split('.').count()
        }
    }

    /// Returns true if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the last component, or `None` for the root path.
    pub fn leaf(&self) -> Option<&str> {
        if self.inner.is_empty() {
            None
        } else {
            self.inner.split('.').next_back()
        }
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts this `Path` into an owned `PathBuf`.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf {
            inner: self.inner.to_string(),
        }
    }
}

impl Default for PathBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        Path::from_normalized(&self.inner)
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self
    }
}

impl FromStr for PathBuf {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for PathBuf {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", &self.inner)
        }
    }
}
