//! Artifacts to be published to, or fetched from, a repository.

use std::path::{Path, PathBuf};

use crate::coordinates::{CoordinateFields, Coordinates};
use crate::descriptor::DescriptorDetector;
use crate::error::Error;
use crate::filename::FilenameDetector;
use crate::package::{PackageDetector, PackageHeaderReader, default_header_reader};

/// An artifact on the local filesystem, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    coordinates: Coordinates,
    local_path: PathBuf,
    descriptor_path: Option<PathBuf>,
}

impl LocalArtifact {
    /// Any of artifact, version or extension not given in `explicit` is detected from the name
    /// of the file at `local_path`, which must then look like `name-version.extension`.
    pub fn new<P: Into<PathBuf>>(local_path: P, explicit: CoordinateFields) -> Result<Self, Error> {
        let local_path = local_path.into();
        let coordinates = explicit
            .fill_from(&FilenameDetector::new(&local_path))?
            .build();
        Ok(Self {
            coordinates,
            local_path,
            descriptor_path: None,
        })
    }

    /// Any field not given in `explicit` is taken from the POM beside `local_path`. The POM must
    /// exist even when every field is given.
    pub fn with_descriptor<P: Into<PathBuf>>(
        local_path: P,
        explicit: CoordinateFields,
    ) -> Result<Self, Error> {
        let local_path = local_path.into();
        let detector = DescriptorDetector::new(&local_path);
        let descriptor_path = detector.descriptor_path();
        if !descriptor_path.is_file() {
            return Err(Error::DescriptorNotFound {
                path: descriptor_path,
            });
        }
        let coordinates = explicit.fill_from(&detector)?.build();
        Ok(Self {
            coordinates,
            local_path,
            descriptor_path: Some(descriptor_path),
        })
    }

    /// Artifact and version come from the package headers read by `reader`. The group comes from
    /// the package's homepage unless given. The extension is still taken from the filename.
    pub fn from_package<P: Into<PathBuf>>(
        local_path: P,
        group: Option<&str>,
        reader: &dyn PackageHeaderReader,
    ) -> Result<Self, Error> {
        let local_path = local_path.into();
        let explicit = match group {
            Some(group) => CoordinateFields::new().group(group),
            None => CoordinateFields::new(),
        };
        let coordinates = explicit
            .fill_from(&PackageDetector::new(&local_path, reader))?
            .fill_from(&FilenameDetector::new(&local_path))?
            .build();
        Ok(Self {
            coordinates,
            local_path,
            descriptor_path: None,
        })
    }

    /// Like [`LocalArtifact::from_package`] using the RPM header reader. Fails with
    /// [`Error::CapabilityUnavailable`] when built without the `rpm` feature.
    pub fn from_rpm<P: Into<PathBuf>>(local_path: P, group: Option<&str>) -> Result<Self, Error> {
        let reader = default_header_reader()?;
        Self::from_package(local_path, group, reader.as_ref())
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// The file to be uploaded.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// The POM describing this artifact, if it was built from one.
    pub fn descriptor_path(&self) -> Option<&Path> {
        self.descriptor_path.as_deref()
    }

    pub fn group(&self) -> &str {
        &self.coordinates.group
    }

    pub fn artifact(&self) -> &str {
        &self.coordinates.artifact
    }

    pub fn version(&self) -> &str {
        &self.coordinates.version
    }

    pub fn classifier(&self) -> &str {
        &self.coordinates.classifier
    }

    pub fn extension(&self) -> &str {
        &self.coordinates.extension
    }
}

impl AsRef<Coordinates> for LocalArtifact {
    fn as_ref(&self) -> &Coordinates {
        &self.coordinates
    }
}

impl std::fmt::Display for LocalArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.coordinates)
    }
}

/// An artifact hosted in a remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifact {
    coordinates: Coordinates,
    repo_id: String,
    url: Option<String>,
}

impl RemoteArtifact {
    pub fn new<S: Into<String>>(repo_id: S, coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            repo_id: repo_id.into(),
            url: None,
        }
    }

    /// Parse coordinates such as `com.fooware:foo:1.0.0` for an artifact in `repo_id`.
    pub fn from_repo_id_and_coordinates<S, C>(repo_id: S, coordinates: C) -> Result<Self, Error>
    where
        S: Into<String>,
        C: AsRef<str>,
    {
        Ok(Self::new(repo_id, Coordinates::parse(coordinates)?))
    }

    /// Set the URL the artifact is known to be served from.
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl AsRef<Coordinates> for RemoteArtifact {
    fn as_ref(&self) -> &Coordinates {
        &self.coordinates
    }
}

impl std::fmt::Display for RemoteArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.coordinates)
    }
}

/// Either kind of artifact, as produced when resolving a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Local(LocalArtifact),
    Remote(RemoteArtifact),
}

impl Artifact {
    pub fn coordinates(&self) -> &Coordinates {
        match self {
            Artifact::Local(local) => local.coordinates(),
            Artifact::Remote(remote) => remote.coordinates(),
        }
    }
}

impl AsRef<Coordinates> for Artifact {
    fn as_ref(&self) -> &Coordinates {
        self.coordinates()
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Artifact::Local(local) => write!(f, "{local} ({})", local.local_path().display()),
            Artifact::Remote(remote) => write!(f, "{remote} (repo: {})", remote.repo_id()),
        }
    }
}
