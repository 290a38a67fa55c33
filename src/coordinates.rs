//! The coordinate tuple identifying an artifact within a repository, and the merging of
//! caller-supplied fields with fields detected from auxiliary evidence.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;

/// The (group, artifact, version, classifier, extension) quintuple. An empty string means unset.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub classifier: String,
    pub extension: String,
}

impl Coordinates {
    pub fn new<S: Into<String>>(group: S, artifact: S, version: S, classifier: S, extension: S) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            classifier: classifier.into(),
            extension: extension.into(),
        }
    }

    /// Parse `group:artifact:version[:classifier[:extension]]`.
    pub fn parse<S: AsRef<str>>(coordinates: S) -> Result<Self, Error> {
        let coordinates = coordinates.as_ref();
        let fields = coordinates.split(':').collect::<Vec<_>>();
        match fields.as_slice() {
            [group, artifact, version, rest @ ..] if rest.len() <= 2 => Ok(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: version.to_string(),
                classifier: rest.first().map(|c| c.to_string()).unwrap_or_default(),
                extension: rest.get(1).map(|e| e.to_string()).unwrap_or_default(),
            }),
            [_, _, _, ..] => Err(Error::TooManyCoordinateFields {
                coordinates: coordinates.to_string(),
            }),
            _ => Err(Error::TooFewCoordinateFields {
                coordinates: coordinates.to_string(),
            }),
        }
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.group, self.artifact, self.version, self.classifier, self.extension
        )
    }
}

impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct CoordinatesVisitor;

impl<'de> serde::de::Visitor<'de> for CoordinatesVisitor {
    type Value = Coordinates;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("coordinates of the form group:artifact:version[:classifier[:extension]]")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Coordinates::parse(v).map_err(E::custom)
    }
}

impl<'de> serde::Deserialize<'de> for Coordinates {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(CoordinatesVisitor)
    }
}

impl serde::Serialize for Coordinates {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Names one slot of the coordinate tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Group,
    Artifact,
    Version,
    Classifier,
    Extension,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::Group,
        Field::Artifact,
        Field::Version,
        Field::Classifier,
        Field::Extension,
    ];
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group => write!(f, "group"),
            Self::Artifact => write!(f, "artifact"),
            Self::Version => write!(f, "version"),
            Self::Classifier => write!(f, "classifier"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// A partially-known coordinate tuple. Used both for the fields a caller supplies explicitly
/// and for the fields a [`Detector`] finds. `None` and `Some("")` both mean unset.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CoordinateFields {
    pub group: Option<String>,
    pub artifact: Option<String>,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub extension: Option<String>,
}

impl CoordinateFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group<S: Into<String>>(mut self, group: S) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn artifact<S: Into<String>>(mut self, artifact: S) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn classifier<S: Into<String>>(mut self, classifier: S) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub(crate) fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Group => &mut self.group,
            Field::Artifact => &mut self.artifact,
            Field::Version => &mut self.version,
            Field::Classifier => &mut self.classifier,
            Field::Extension => &mut self.extension,
        }
    }

    /// The value of `field` if it is set to a non-empty string.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Group => &self.group,
            Field::Artifact => &self.artifact,
            Field::Version => &self.version,
            Field::Classifier => &self.classifier,
            Field::Extension => &self.extension,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Fill every unset field from `detected`. Set fields always win.
    pub fn merge(mut self, mut detected: CoordinateFields) -> Self {
        for &field in Field::ALL {
            if !self.is_set(field) {
                *self.slot_mut(field) = detected.slot_mut(field).take();
            }
        }
        self
    }

    /// Consult `detector` only if one of the fields it provides is still unset, then merge.
    pub fn fill_from<D: Detector + ?Sized>(self, detector: &D) -> Result<Self, Error> {
        let missing = detector
            .provides()
            .iter()
            .filter(|field| !self.is_set(**field))
            .map(|field| field.to_string())
            .collect::<Vec<_>>();
        if missing.is_empty() {
            tracing::debug!(detector = detector.name(), "all fields supplied, detection skipped");
            return Ok(self);
        }
        tracing::debug!(detector = detector.name(), missing = ?missing, "detecting missing fields");
        let detected = detector.detect(&self)?;
        Ok(self.merge(detected))
    }

    /// Freeze into a [`Coordinates`]. Anything still unset becomes the empty string.
    pub fn build(self) -> Coordinates {
        Coordinates {
            group: self.group.unwrap_or_default(),
            artifact: self.artifact.unwrap_or_default(),
            version: self.version.unwrap_or_default(),
            classifier: self.classifier.unwrap_or_default(),
            extension: self.extension.unwrap_or_default(),
        }
    }
}

impl From<Coordinates> for CoordinateFields {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            group: Some(coordinates.group),
            artifact: Some(coordinates.artifact),
            version: Some(coordinates.version),
            classifier: Some(coordinates.classifier),
            extension: Some(coordinates.extension),
        }
    }
}

/// A source of evidence which can fill in some coordinate fields.
pub trait Detector {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// The fields [`Detector::detect`] is able to supply.
    fn provides(&self) -> &'static [Field];

    /// Detect fields from this detector's evidence. `known` holds the fields already set, which
    /// need not be detected again.
    fn detect(&self, known: &CoordinateFields) -> Result<CoordinateFields, Error>;
}
