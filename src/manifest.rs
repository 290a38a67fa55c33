//! Artifacts declared in the `[artifacts]` table of a TOML manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::artifact::{Artifact, LocalArtifact, RemoteArtifact};
use crate::coordinates::{CoordinateFields, Coordinates};
use crate::error::{Error, ResolveError};

const ARTIFACTS_TABLE: &str = "artifacts";

/// Errors encountered when parsing artifacts from a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestParseError {
    /// None of the keys names a kind of artifact.
    #[error("artifact '{name}' does not say what it is: give one of {}", Kind::expected())]
    VariantUnknown { name: String },

    /// More than one key names a kind of artifact.
    #[error("artifact '{name}' is declared as more than one kind: give only one of {}", Kind::expected())]
    VariantMultiple { name: String },

    /// The kind of artifact is only understood with a feature this build lacks.
    #[error("artifact '{name}' is a '{variant}' artifact, which needs disabled feature '{requires}'")]
    VariantDisabled {
        name: String,
        variant: String,
        requires: String,
    },

    #[error("expected value '{name}' to be a toml table")]
    ValueNotTable { name: String },

    #[error("required table 'artifacts' not found in manifest")]
    ArtifactTableNotFound,

    /// The document is not TOML, or a declaration's keys have the wrong shape.
    #[error(transparent)]
    TomlInvalid(#[from] toml::de::Error),
}

/// The key which says what kind of artifact a declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Pom,
    Rpm,
    Remote,
}

impl Kind {
    const ALL: [Kind; 4] = [Kind::File, Kind::Pom, Kind::Rpm, Kind::Remote];

    fn key(self) -> &'static str {
        match self {
            Kind::File => "file",
            Kind::Pom => "pom",
            Kind::Rpm => "rpm",
            Kind::Remote => "remote",
        }
    }

    fn expected() -> String {
        Self::ALL.map(Kind::key).join(", ")
    }

    /// Find the single kind key present in `declaration`.
    fn of(name: &str, declaration: &toml::Table) -> Result<Self, ManifestParseError> {
        let mut present = Self::ALL
            .into_iter()
            .filter(|kind| declaration.contains_key(kind.key()));
        match (present.next(), present.next()) {
            (Some(kind), None) => Ok(kind),
            (Some(_), Some(_)) => Err(ManifestParseError::VariantMultiple {
                name: name.to_owned(),
            }),
            (None, _) => Err(ManifestParseError::VariantUnknown {
                name: name.to_owned(),
            }),
        }
    }
}

/// A local file whose coordinates come from its name.
#[derive(Debug, serde::Deserialize, PartialEq, Eq, Clone)]
pub struct FileDeclaration {
    #[serde(rename = "file")]
    pub path: PathBuf,
    #[serde(flatten)]
    pub fields: CoordinateFields,
}

/// A local file described by the POM beside it.
#[derive(Debug, serde::Deserialize, PartialEq, Eq, Clone)]
pub struct PomDeclaration {
    #[serde(rename = "pom")]
    pub path: PathBuf,
    #[serde(flatten)]
    pub fields: CoordinateFields,
}

/// A local package whose coordinates come from its headers.
#[cfg(feature = "rpm")]
#[derive(Debug, serde::Deserialize, PartialEq, Eq, Clone)]
pub struct RpmDeclaration {
    #[serde(rename = "rpm")]
    pub path: PathBuf,
    #[serde(default)]
    pub group: Option<String>,
}

/// An artifact in a remote repository.
#[derive(Debug, serde::Deserialize, PartialEq, Eq, Clone)]
pub struct RemoteDeclaration {
    #[serde(rename = "remote")]
    pub coordinates: Coordinates,
    pub repo: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Represents an entry in the `artifacts` table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Declaration {
    File(FileDeclaration),
    Pom(PomDeclaration),
    #[cfg(feature = "rpm")]
    Rpm(RpmDeclaration),
    Remote(RemoteDeclaration),
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Declaration::File(file) => write!(f, "file: {}", file.path.display()),
            Declaration::Pom(pom) => write!(f, "pom: {}", pom.path.display()),
            #[cfg(feature = "rpm")]
            Declaration::Rpm(rpm) => write!(f, "rpm: {}", rpm.path.display()),
            Declaration::Remote(remote) => {
                write!(f, "remote: {} (repo: {})", remote.coordinates, remote.repo)
            }
        }
    }
}

impl Declaration {
    /// Parse a TOML table into a `Declaration`. Exactly one key in the table must name an
    /// enabled kind of artifact; the rest of the table is then read as that kind.
    pub fn parse<S: AsRef<str>>(name: S, declaration: toml::Table) -> Result<Self, ManifestParseError> {
        let name = name.as_ref();
        let kind = Kind::of(name, &declaration)?;
        let value = toml::Value::Table(declaration);
        let parsed = match kind {
            Kind::File => Self::File(value.try_into()?),
            Kind::Pom => Self::Pom(value.try_into()?),
            #[cfg(feature = "rpm")]
            Kind::Rpm => Self::Rpm(value.try_into()?),
            #[cfg(not(feature = "rpm"))]
            Kind::Rpm => {
                return Err(ManifestParseError::VariantDisabled {
                    name: name.to_owned(),
                    variant: kind.key().to_owned(),
                    requires: "rpm".to_owned(),
                });
            }
            Kind::Remote => Self::Remote(value.try_into()?),
        };
        Ok(parsed)
    }

    /// Build the declared artifact. Relative paths are taken relative to `base_dir`.
    pub fn resolve<P: AsRef<Path>>(&self, base_dir: P) -> Result<Artifact, Error> {
        let base_dir = base_dir.as_ref();
        let artifact = match self {
            Declaration::File(file) => Artifact::Local(LocalArtifact::new(
                base_dir.join(&file.path),
                file.fields.clone(),
            )?),
            Declaration::Pom(pom) => Artifact::Local(LocalArtifact::with_descriptor(
                base_dir.join(&pom.path),
                pom.fields.clone(),
            )?),
            #[cfg(feature = "rpm")]
            Declaration::Rpm(rpm) => Artifact::Local(LocalArtifact::from_rpm(
                base_dir.join(&rpm.path),
                rpm.group.as_deref(),
            )?),
            Declaration::Remote(remote) => {
                let artifact = RemoteArtifact::new(&remote.repo, remote.coordinates.clone());
                Artifact::Remote(match &remote.url {
                    Some(url) => artifact.with_url(url),
                    None => artifact,
                })
            }
        };
        Ok(artifact)
    }
}

/// Represents the contents of the `artifacts` table, in key order.
pub type ArtifactsTable = BTreeMap<String, Declaration>;

/// Parse an `artifacts` table into an [`ArtifactsTable`](crate::manifest::ArtifactsTable) map.
pub fn try_parse(table: &toml::Table) -> Result<ArtifactsTable, ManifestParseError> {
    let mut artifacts = ArtifactsTable::new();
    for (name, value) in table {
        let toml::Value::Table(declaration) = value else {
            return Err(ManifestParseError::ValueNotTable { name: name.clone() });
        };
        artifacts.insert(name.clone(), Declaration::parse(name, declaration.clone())?);
    }
    Ok(artifacts)
}

/// Parse the contents of a manifest containing the `artifacts` table into an
/// [`ArtifactsTable`](crate::manifest::ArtifactsTable) map.
pub fn try_parse_toml<S: AsRef<str>>(document: S) -> Result<ArtifactsTable, ManifestParseError> {
    let mut root = document.as_ref().parse::<toml::Table>()?;
    match root.remove(ARTIFACTS_TABLE) {
        Some(toml::Value::Table(artifacts)) => try_parse(&artifacts),
        _ => Err(ManifestParseError::ArtifactTableNotFound),
    }
}

/// Resolve every declaration independently. One failure does not prevent the others resolving.
pub fn resolve_all<P: AsRef<Path>>(
    table: &ArtifactsTable,
    base_dir: P,
) -> Vec<Result<(String, Artifact), ResolveError>> {
    table
        .iter()
        .map(|(name, declaration)| {
            tracing::debug!(name, declaration = %declaration, "resolving artifact");
            declaration
                .resolve(&base_dir)
                .map(|artifact| (name.to_owned(), artifact))
                .map_err(|err| ResolveError {
                    name: name.to_owned(),
                    err,
                })
        })
        .collect()
}

#[cfg(test)]
use ManifestParseError::*;
