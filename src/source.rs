//! Reading shader source text off disk.
use std::{
    ffi::{CStr, CString},
    fs,
    path::{Path, PathBuf},
};

use crate::error::DemoError;

/// Shader source code, NUL-terminated and ready to hand to OpenGL.
///
/// The bytes are passed through as they are on disk, no encoding checks.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    /// Where this came from, for log messages.
    origin: PathBuf,
    text: CString,
}

impl ShaderSource {
    /// Read the whole file at `path`.
    ///
    /// # Errors
    /// Errors if the file cannot be read, or if it contains a NUL byte.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DemoError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| DemoError::SourceRead {
            path: path.to_owned(),
            source,
        })?;
        let source = Self::from_bytes(path, bytes)?;
        log::debug!(
            "read shader source '{}' ({} bytes)",
            path.display(),
            source.len()
        );
        Ok(source)
    }

    /// Wrap in-memory source code. `origin` is only used for messages.
    ///
    /// # Errors
    /// Errors if `bytes` contains a NUL byte.
    pub fn from_bytes(origin: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Result<Self, DemoError> {
        let origin = origin.into();
        let text = CString::new(bytes).map_err(|err| DemoError::SourceNul {
            offset: err.nul_position(),
            path: origin.clone(),
        })?;
        Ok(Self { origin, text })
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.text
    }

    /// Length in bytes, without the terminating NUL.
    pub fn len(&self) -> usize {
        self.text.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The two shader files the demo is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Load both sources, vertex first.
    ///
    /// # Errors
    /// Errors on the first file that cannot be loaded.
    pub fn load_pair(&self) -> Result<(ShaderSource, ShaderSource), DemoError> {
        let vertex = ShaderSource::load(&self.vertex)?;
        let fragment = ShaderSource::load(&self.fragment)?;
        Ok((vertex, fragment))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#version 330 core\nvoid main() {}\n").unwrap();

        let source = ShaderSource::load(file.path()).unwrap();
        assert_eq!(
            source.as_c_str().to_bytes(),
            b"#version 330 core\nvoid main() {}\n"
        );
        assert_eq!(source.len(), 33);
        assert_eq!(source.origin(), file.path());
    }

    #[test]
    fn load_passes_raw_bytes_through() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'x']).unwrap();

        let source = ShaderSource::load(file.path()).unwrap();
        assert_eq!(source.as_c_str().to_bytes(), &[0xff, 0xfe, b'x']);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vertex.vert");

        match ShaderSource::load(&path) {
            Err(DemoError::SourceRead { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected SourceRead, got {other:?}"),
        }
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = ShaderSource::from_bytes("colors.frag", b"void\0main".to_vec()).unwrap_err();
        assert!(matches!(err, DemoError::SourceNul { offset: 4, .. }));
    }

    #[test]
    fn empty_file_is_an_empty_source() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let source = ShaderSource::load(file.path()).unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn load_pair_fails_on_missing_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let vertex = dir.path().join("vertex.vert");
        fs::write(&vertex, "void main() {}").unwrap();
        let paths = ShaderPaths::new(&vertex, dir.path().join("colors.frag"));

        let err = paths.load_pair().unwrap_err();
        assert!(matches!(err, DemoError::SourceRead { .. }));
    }
}
