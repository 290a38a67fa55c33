//! Detection of coordinates from native package metadata (RPM headers).
//!
//! Reading headers is a capability provided through [`PackageHeaderReader`]. The RPM
//! implementation, [`RpmHeaderReader`], needs the `rpm` feature; without it
//! [`default_header_reader`] fails with [`Error::CapabilityUnavailable`] and every other kind of
//! artifact keeps working.

use std::path::{Path, PathBuf};

use crate::coordinates::{CoordinateFields, Detector, Field};
use crate::error::Error;

/// The header fields needed to identify a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHeaders {
    pub name: String,
    pub version: String,
    pub release: String,
    /// The project's homepage, if the package declares one.
    pub url: Option<String>,
}

impl PackageHeaders {
    /// `<version>-<release>`
    pub fn full_version(&self) -> String {
        format!("{}-{}", self.version, self.release)
    }
}

/// Reads the header table embedded in a package file.
pub trait PackageHeaderReader {
    fn read_headers(&self, path: &Path) -> Result<PackageHeaders, Error>;
}

/// Reads RPM headers with the `rpm` crate.
#[cfg(feature = "rpm")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RpmHeaderReader;

#[cfg(feature = "rpm")]
impl PackageHeaderReader for RpmHeaderReader {
    fn read_headers(&self, path: &Path) -> Result<PackageHeaders, Error> {
        let headers_error = |err: rpm::Error| Error::PackageHeaders {
            path: path.to_path_buf(),
            err: Box::new(err),
        };
        let package = rpm::Package::open(path).map_err(headers_error)?;
        let metadata = &package.metadata;
        let headers = PackageHeaders {
            name: metadata.get_name().map_err(headers_error)?.to_string(),
            version: metadata.get_version().map_err(headers_error)?.to_string(),
            release: metadata.get_release().map_err(headers_error)?.to_string(),
            url: metadata
                .get_url()
                .ok()
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        };
        tracing::debug!(path = %path.display(), headers = ?headers, "read rpm headers");
        Ok(headers)
    }
}

/// The header reader available in this build.
pub fn default_header_reader() -> Result<Box<dyn PackageHeaderReader>, Error> {
    #[cfg(feature = "rpm")]
    {
        Ok(Box::new(RpmHeaderReader))
    }
    #[cfg(not(feature = "rpm"))]
    {
        Err(Error::CapabilityUnavailable {
            capability: "rpm",
            requires: "rpm",
        })
    }
}

/// Derive a group from a homepage URL by reversing its host's labels and dropping `www`, so
/// `http://www.fooware.com/` becomes `com.fooware`. Hosts with fewer than two remaining labels,
/// IP addresses and URLs without a host are rejected.
pub fn group_from_url(url: &str) -> Result<String, Error> {
    let underivable = || Error::GroupUnderivable {
        url: url.to_string(),
    };
    let parsed = url::Url::parse(url).map_err(|_| underivable())?;
    let domain = match parsed.host() {
        Some(url::Host::Domain(domain)) => domain,
        _ => return Err(underivable()),
    };
    let labels = domain
        .split('.')
        .rev()
        .filter(|label| !label.is_empty() && *label != "www")
        .collect::<Vec<_>>();
    if labels.len() < 2 {
        return Err(underivable());
    }
    Ok(labels.join("."))
}

/// Supplies group, artifact and version from a package's headers. The group is only derived
/// from the homepage URL when it is not already known.
pub struct PackageDetector<'r> {
    path: PathBuf,
    reader: &'r dyn PackageHeaderReader,
}

impl<'r> PackageDetector<'r> {
    pub fn new<P: Into<PathBuf>>(path: P, reader: &'r dyn PackageHeaderReader) -> Self {
        Self {
            path: path.into(),
            reader,
        }
    }
}

impl std::fmt::Debug for PackageDetector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageDetector")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Detector for PackageDetector<'_> {
    fn name(&self) -> &'static str {
        "package"
    }

    fn provides(&self) -> &'static [Field] {
        &[Field::Group, Field::Artifact, Field::Version]
    }

    fn detect(&self, known: &CoordinateFields) -> Result<CoordinateFields, Error> {
        let headers = self.reader.read_headers(&self.path)?;
        let mut fields = CoordinateFields::new()
            .artifact(headers.name.as_str())
            .version(headers.full_version());
        if !known.is_set(Field::Group) {
            let url = headers.url.as_deref().ok_or_else(|| Error::MissingUrl {
                path: self.path.clone(),
            })?;
            fields = fields.group(group_from_url(url)?);
        }
        tracing::debug!(path = %self.path.display(), fields = ?fields, "detected from package headers");
        Ok(fields)
    }
}
