use std::path::PathBuf;

/// The main error enum for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The filename does not follow the `name-version.extension` convention.
    #[error("automatic detection of name and/or version failed for '{}'", path.display())]
    NameVerDetection { path: PathBuf },

    /// The descriptor expected beside a local artifact is missing.
    #[error("descriptor '{}' does not exist", path.display())]
    DescriptorNotFound { path: PathBuf },

    #[error("failed to read descriptor '{}'", path.display())]
    DescriptorRead {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// The descriptor exists but is not a well-formed document.
    #[error("descriptor with invalid structure '{}': {reason}", path.display())]
    DescriptorMalformed { path: PathBuf, reason: String },

    /// Reading native package headers needs a capability this build does not have.
    #[error("cannot read {capability} package headers: needs disabled feature '{requires}'")]
    CapabilityUnavailable {
        capability: &'static str,
        requires: &'static str,
    },

    #[error("failed to read package headers from '{}'", path.display())]
    PackageHeaders {
        path: PathBuf,
        #[source]
        err: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(
        "homepage URL not present in package metadata of '{}', please fill the URL tag in the specfile",
        path.display()
    )]
    MissingUrl { path: PathBuf },

    #[error("cannot derive a group from URL '{url}'")]
    GroupUnderivable { url: String },

    #[error("incorrect coordinates '{coordinates}', at least group, artifact and version are obligatory")]
    TooFewCoordinateFields { coordinates: String },

    #[error("incorrect coordinates '{coordinates}', expected at most group:artifact:version:classifier:extension")]
    TooManyCoordinateFields { coordinates: String },
}

/// A declaration from a manifest which could not be resolved into an artifact.
#[derive(Debug, thiserror::Error)]
#[error("failed to resolve artifact '{name}'")]
pub struct ResolveError {
    pub name: String,
    #[source]
    pub err: Error,
}
