//! Integration tests for the repositorytools library.
//!
//! Descriptor tests read the fixtures in `tests/data`; everything else works on filenames or
//! scratch directories.

use std::path::{Path, PathBuf};

use repositorytools::manifest::{self, ManifestParseError};
use repositorytools::{
    Artifact, CoordinateFields, Coordinates, Error, LocalArtifact, PackageHeaderReader,
    PackageHeaders, RemoteArtifact,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn test_data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

/// Stands in for a native package reader, returning fixed headers.
struct StaticHeaders(PackageHeaders);

impl PackageHeaderReader for StaticHeaders {
    fn read_headers(&self, _: &Path) -> Result<PackageHeaders, Error> {
        Ok(self.0.clone())
    }
}

fn hostname_headers(url: Option<&str>) -> StaticHeaders {
    StaticHeaders(PackageHeaders {
        name: "update-hostname".to_string(),
        version: "0.1.4".to_string(),
        release: "1.el6".to_string(),
        url: url.map(str::to_string),
    })
}

#[test]
fn test_detect_name_ver_ext() {
    init_tracing();
    let artifacts = [
        ("my_local_path/devbox-2.0.0.tgz", ("devbox", "2.0.0", "tgz")),
        ("my_local_path/python-foo2-2.3.4.ext", ("python-foo2", "2.3.4", "ext")),
        ("my_local_path/infra-6.6-4.tgz", ("infra", "6.6-4", "tgz")),
        (
            "my_local_path/update-hostname-0.1.4-1.el6.noarch.rpm",
            ("update-hostname", "0.1.4-1.el6.noarch", "rpm"),
        ),
        ("my_local_path/test-1.0.txt", ("test", "1.0", "txt")),
    ];

    for (local_path, (name, version, extension)) in artifacts {
        let artifact = LocalArtifact::new(local_path, CoordinateFields::new().group("com.fooware"))
            .unwrap_or_else(|err| panic!("detection failed for {local_path}: {err}"));
        assert_eq!(artifact.group(), "com.fooware");
        assert_eq!(artifact.artifact(), name);
        assert_eq!(artifact.version(), version);
        assert_eq!(artifact.extension(), extension);
        assert_eq!(artifact.classifier(), "");
    }
}

#[test]
fn test_pom_file_parses_neo4j() {
    init_tracing();
    let artifact = LocalArtifact::with_descriptor(test_data("neo4j.jar"), CoordinateFields::new())
        .expect("Failed to detect from neo4j.pom");
    assert_eq!(
        artifact.to_string(),
        "org.neo4j:neo4j-cypher-compiler-2.1:2.1.2:jdk15:jar"
    );
    assert_eq!(artifact.descriptor_path(), Some(test_data("neo4j.pom").as_path()));
    assert_eq!(artifact.local_path(), test_data("neo4j.jar"));
}

#[test]
fn test_pom_fields_can_be_overridden() {
    let artifact = LocalArtifact::with_descriptor(
        test_data("neo4j.jar"),
        CoordinateFields::new().classifier("jdk17").version(""),
    )
    .unwrap();
    assert_eq!(artifact.version(), "2.1.2");
    assert_eq!(artifact.classifier(), "jdk17");
}

#[test]
fn test_pom_missing_fields_are_empty() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("foo-1.0.zip.pom"),
        "<project><artifactId>foo</artifactId><version>1.0</version></project>",
    )
    .unwrap();
    // Only the final extension is replaced.
    let artifact =
        LocalArtifact::with_descriptor(dir.path().join("foo-1.0.zip.tgz"), CoordinateFields::new())
            .unwrap();
    assert_eq!(artifact.to_string(), ":foo:1.0::");
}

#[test]
fn test_pom_with_invalid_structure_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pom = dir.path().join("foo-1.0.pom");
    std::fs::write(&pom, "<project><groupId>broken</project>").unwrap();
    let result = LocalArtifact::with_descriptor(dir.path().join("foo-1.0.jar"), CoordinateFields::new());
    match result {
        Err(err @ Error::DescriptorMalformed { .. }) => {
            assert!(err.to_string().contains(&pom.display().to_string()));
        }
        other => panic!("expected a malformed descriptor error, got {other:?}"),
    }
}

#[test]
fn test_package_headers_give_coordinates() {
    init_tracing();
    let reader = hostname_headers(Some("http://www.fooware.com/hostname"));
    let artifact = LocalArtifact::from_package(
        "rpms/update-hostname-0.1.4-1.el6.noarch.rpm",
        None,
        &reader,
    )
    .unwrap();
    assert_eq!(artifact.to_string(), "com.fooware:update-hostname:0.1.4-1.el6::rpm");
}

#[test]
fn test_package_group_given_without_url() {
    let reader = hostname_headers(None);
    let artifact = LocalArtifact::from_package(
        "rpms/update-hostname-0.1.4-1.el6.noarch.rpm",
        Some("org.example"),
        &reader,
    )
    .unwrap();
    assert_eq!(artifact.group(), "org.example");
    assert_eq!(artifact.version(), "0.1.4-1.el6");
}

#[test]
fn test_package_without_url_or_group_fails() {
    let reader = hostname_headers(None);
    let result = LocalArtifact::from_package("rpms/update-hostname-0.1.4-1.el6.noarch.rpm", None, &reader);
    assert!(matches!(result, Err(Error::MissingUrl { .. })));
}

#[test]
fn test_remote_coordinates_round_trip() {
    let all = [
        Coordinates::new("com.fooware", "foo", "1.0.0", "sources", "jar"),
        Coordinates::new("org.neo4j", "neo4j-cypher-compiler-2.1", "2.1.2", "jdk15", "jar"),
        Coordinates::new("g", "a", "1", "", ""),
        Coordinates::new("g", "a", "1", "", "tgz"),
    ];
    for coordinates in all {
        let remote =
            RemoteArtifact::from_repo_id_and_coordinates("releases", coordinates.to_string()).unwrap();
        assert_eq!(remote.coordinates(), &coordinates);
    }
}

#[test]
fn test_manifest_resolves_local_and_remote_artifacts() {
    init_tracing();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("lib")).unwrap();
    std::fs::copy(test_data("neo4j.pom"), dir.path().join("lib").join("neo4j.pom")).unwrap();

    let document = r#"
        [artifacts]
        devbox = { file = "dist/devbox-2.0.0.tgz", group = "com.fooware" }
        neo4j = { pom = "lib/neo4j.jar", classifier = "" }
        foo = { remote = "com.fooware:foo:1.0.0", repo = "releases" }
        missing = { pom = "lib/missing-1.0.jar" }
    "#;
    let table = manifest::try_parse_toml(document).expect("Failed to parse TOML");
    assert_eq!(table.len(), 4);

    let results = manifest::resolve_all(&table, dir.path());
    let mut resolved = Vec::new();
    let mut failed = Vec::new();
    for result in results {
        match result {
            Ok(named) => resolved.push(named),
            Err(err) => failed.push(err),
        }
    }

    assert_eq!(resolved.len(), 3);
    let names = resolved.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["devbox", "foo", "neo4j"]);
    assert_eq!(resolved[1].1.coordinates().to_string(), "com.fooware:foo:1.0.0::");
    assert!(matches!(&resolved[1].1, Artifact::Remote(remote) if remote.repo_id() == "releases"));
    assert_eq!(
        resolved[2].1.coordinates().to_string(),
        "org.neo4j:neo4j-cypher-compiler-2.1:2.1.2:jdk15:jar"
    );

    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "missing");
    assert!(matches!(failed[0].err, Error::DescriptorNotFound { .. }));
}

#[test]
fn test_manifest_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let manifest_path = dir.path().join("artifacts.toml");
    std::fs::write(
        &manifest_path,
        r#"
        [artifacts]
        foo = { remote = "com.fooware:foo", repo = "releases" }
        "#,
    )
    .unwrap();
    let document = std::fs::read_to_string(&manifest_path).unwrap();
    match manifest::try_parse_toml(document) {
        Err(ManifestParseError::TomlInvalid(err)) => {
            assert!(err.to_string().contains("com.fooware:foo"), "{err}");
        }
        other => panic!("expected invalid coordinates, got {other:?}"),
    }
}
