//! Detection of name, version and extension from a `name-version.extension` filename.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::coordinates::{CoordinateFields, Detector, Field};
use crate::error::Error;

// The name is the shortest prefix followed by a hyphen and a digit. The version runs from that
// digit to the last dot, the extension is whatever follows the last dot.
static NAME_VER_EXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)-(\d.*)\.([^.]+)$").expect("name-version-extension pattern is valid")
});

/// Split the base name of `path` into `(name, version, extension)`. Only the name of the file is
/// inspected; the file need not exist.
pub fn detect_name_ver_ext<P: AsRef<Path>>(path: P) -> Result<(String, String, String), Error> {
    let path = path.as_ref();
    let failed = || Error::NameVerDetection {
        path: path.to_path_buf(),
    };
    let base_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(failed)?;
    let captures = NAME_VER_EXT.captures(base_name).ok_or_else(failed)?;
    let (name, version, extension) = (&captures[1], &captures[2], &captures[3]);
    tracing::debug!(name, version, extension, "detected from filename");
    Ok((name.to_string(), version.to_string(), extension.to_string()))
}

/// Supplies artifact, version and extension from the local file's name.
#[derive(Debug, Clone)]
pub struct FilenameDetector {
    path: PathBuf,
}

impl FilenameDetector {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Detector for FilenameDetector {
    fn name(&self) -> &'static str {
        "filename"
    }

    fn provides(&self) -> &'static [Field] {
        &[Field::Artifact, Field::Version, Field::Extension]
    }

    fn detect(&self, _: &CoordinateFields) -> Result<CoordinateFields, Error> {
        let (artifact, version, extension) = detect_name_ver_ext(&self.path)?;
        Ok(CoordinateFields::new()
            .artifact(artifact)
            .version(version)
            .extension(extension))
    }
}
