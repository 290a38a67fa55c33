#![allow(rustdoc::redundant_explicit_links)]
//! Identify build artifacts and work out their repository coordinates.
//!
//! An artifact is addressed in a repository by the coordinate tuple
//! `group:artifact:version:classifier:extension`. This crate builds that tuple from whatever the
//! caller knows plus one source of evidence:
//!
//! - the filename, when it follows the `name-version.extension` convention;
//! - a POM descriptor stored beside the file;
//! - native package headers (RPM, behind the `rpm` feature);
//! - a coordinate string naming an artifact in a remote repository.
//!
//! Fields supplied by the caller always win over detected ones. A detector is only consulted
//! when a field it could provide is missing.
//!
//! Uploading and downloading are left to the caller, which receives a [`LocalArtifact`] or a
//! [`RemoteArtifact`].
//!
//! # Optional Features
//!
//! - `rpm`: Read name, version, release and homepage from RPM headers using the [`rpm`] crate.
//!   Without it, [`LocalArtifact::from_rpm`] fails with [`Error::CapabilityUnavailable`].
//!
//! [`rpm`]: https://crates.io/crates/rpm
//!
//! # Usage
//!
//! Detect coordinates from a filename:
//!
//! ```rust
//! use repositorytools::{CoordinateFields, LocalArtifact};
//!
//! let artifact = LocalArtifact::new(
//!     "dist/update-hostname-0.1.4-1.el6.noarch.rpm",
//!     CoordinateFields::new().group("com.fooware"),
//! )?;
//! assert_eq!(artifact.artifact(), "update-hostname");
//! assert_eq!(artifact.version(), "0.1.4-1.el6.noarch");
//! assert_eq!(artifact.to_string(), "com.fooware:update-hostname:0.1.4-1.el6.noarch::rpm");
//! # Ok::<(), repositorytools::Error>(())
//! ```
//!
//! Refer to an artifact in a remote repository:
//!
//! ```rust
//! use repositorytools::RemoteArtifact;
//!
//! let artifact = RemoteArtifact::from_repo_id_and_coordinates("releases", "com.fooware:foo:1.0.0")?;
//! assert_eq!(artifact.coordinates().group, "com.fooware");
//! assert_eq!(artifact.to_string(), "com.fooware:foo:1.0.0::");
//! # Ok::<(), repositorytools::Error>(())
//! ```
//!
//! Declare artifacts in a manifest:
//!
//! ```rust
//! use repositorytools::manifest;
//!
//! let document = r#"
//! [artifacts]
//! devbox = { file = "dist/devbox-2.0.0.tgz", group = "com.fooware" }
//! foo = { remote = "com.fooware:foo:1.0.0", repo = "releases" }
//! "#;
//!
//! let table = manifest::try_parse_toml(document)?;
//! for result in manifest::resolve_all(&table, ".") {
//!     let (name, artifact) = result?;
//!     println!("{name}: {artifact}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Structure of the `artifacts` table
//!
//! Each value in this table must be a table with exactly one of these keys:
//!
//! - `file`: path of a local file named `name-version.extension`. Any of `group`, `artifact`,
//!   `version`, `classifier` and `extension` may be given to override detection.
//! - `pom`: path of a local file with a POM beside it. Takes the same overrides as `file`.
//! - `rpm`: path of a local RPM. An optional `group` overrides the one derived from the
//!   package's homepage. Needs the `rpm` feature.
//! - `remote`: coordinates of an artifact in the repository named by the required `repo` key.
//!   An optional `url` may be given.
//!
//! Relative paths are resolved against the directory passed to
//! [`resolve_all`](crate::manifest::resolve_all).

pub mod artifact;
pub mod coordinates;
pub mod descriptor;
mod error;
pub mod filename;
pub mod manifest;
pub mod package;

#[doc(inline)]
pub use crate::artifact::{Artifact, LocalArtifact, RemoteArtifact};
#[doc(inline)]
pub use crate::coordinates::{CoordinateFields, Coordinates, Detector, Field};
#[doc(inline)]
pub use crate::error::{Error, ResolveError};
#[doc(inline)]
pub use crate::package::{PackageHeaderReader, PackageHeaders};
