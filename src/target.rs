use std::fmt;

use camino::Utf8PathBuf;

use crate::container::ContainerError;

/// Longest directory name a container record may hold, in bytes.
pub const MAX_SEGMENT_LEN: usize = 255;

/// One parsed `container-path[:internal/dir/path]` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub container: Utf8PathBuf,
    pub path: Option<InternalPath>,
}

impl TargetSpec {
    /// Split a raw command-line token at the first `:`. A token without a
    /// colon names the container file itself.
    pub fn parse(token: &str) -> Result<Self, ContainerError> {
        let (file, path) = match token.split_once(':') {
            None => (token, None),
            Some((file, path)) => (file, Some(path)),
        };
        if file.is_empty() {
            return Err(ContainerError::InvalidPath(
                token.to_owned(),
                "missing container path before `:`",
            ));
        }
        let path = path.map(InternalPath::parse).transpose()?;
        Ok(Self {
            container: Utf8PathBuf::from(file),
            path,
        })
    }
}

/// Ordered directory-name segments inside a container, like `dir1/dir2/dir3`.
///
/// Ordering is lexicographic over segments, so a parent always sorts before
/// its children.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InternalPath {
    segments: Vec<String>,
}

impl InternalPath {
    pub fn parse(raw: &str) -> Result<Self, ContainerError> {
        let invalid =
            |reason: &'static str| ContainerError::InvalidPath(raw.to_owned(), reason);
        if raw.is_empty() {
            return Err(invalid("empty directory path"));
        }
        if raw.len() > u16::MAX as usize {
            return Err(invalid("directory path too long for a container record"));
        }
        let mut segments = Vec::new();
        for segment in raw.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty directory name"));
            }
            if segment == "." || segment == ".." {
                return Err(invalid("directory name may not be `.` or `..`"));
            }
            if segment.len() > MAX_SEGMENT_LEN {
                return Err(invalid("directory name longer than 255 bytes"));
            }
            if segment.contains('\0') {
                return Err(invalid("directory name contains a NUL byte"));
            }
            segments.push(segment.to_owned());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path of the enclosing directory, or `None` for a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        (self.segments.len() > 1).then(|| Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Every leading sub-path, shortest first, ending with the path itself.
    pub fn prefixes(&self) -> impl Iterator<Item = Self> + '_ {
        (1..=self.segments.len()).map(|n| Self {
            segments: self.segments[..n].to_vec(),
        })
    }
}

impl fmt::Display for InternalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
