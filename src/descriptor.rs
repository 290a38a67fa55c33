//! Detection of coordinates from a POM descriptor stored beside the local artifact.
//!
//! The descriptor shares the artifact's path with its final extension replaced by `.pom`, so
//! `dist/devbox-2.0.0.jar` is described by `dist/devbox-2.0.0.pom`. Only the direct children of
//! a `<project>` root element are consulted:
//!
//! | Element      | Field        |
//! |--------------|--------------|
//! | `groupId`    | `group`      |
//! | `artifactId` | `artifact`   |
//! | `version`    | `version`    |
//! | `classifier` | `classifier` |
//! | `packaging`  | `extension`  |
//!
//! Absent elements resolve to the empty string.

use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};

use crate::coordinates::{CoordinateFields, Detector, Field};
use crate::error::Error;

pub const DESCRIPTOR_EXTENSION: &str = "pom";

const ROOT_ELEMENT: &[u8] = b"project";

/// The path of the descriptor describing the artifact at `path`.
pub fn descriptor_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let descriptor = path.as_ref().with_extension(DESCRIPTOR_EXTENSION);
    tracing::trace!(artifact = %path.as_ref().display(), descriptor = %descriptor.display(), "derived descriptor path");
    descriptor
}

fn field_for(element: &[u8]) -> Option<Field> {
    match element {
        b"groupId" => Some(Field::Group),
        b"artifactId" => Some(Field::Artifact),
        b"version" => Some(Field::Version),
        b"classifier" => Some(Field::Classifier),
        b"packaging" => Some(Field::Extension),
        _ => None,
    }
}

fn check_attributes(element: &BytesStart<'_>) -> Result<(), AttrError> {
    element.attributes().try_for_each(|attribute| attribute.map(drop))
}

/// Extract coordinate fields from the text of a descriptor. `path` is only used for errors.
pub fn parse_descriptor(content: &str, path: &Path) -> Result<CoordinateFields, Error> {
    let malformed = |reason: String| Error::DescriptorMalformed {
        path: path.to_path_buf(),
        reason,
    };

    let bad_attribute = |element: &BytesStart<'_>, err: AttrError| {
        malformed(format!(
            "bad attribute in <{}>: {err}",
            String::from_utf8_lossy(element.name().as_ref())
        ))
    };

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut fields = CoordinateFields::new();
    let mut is_project = false;
    let mut seen_root = false;
    let mut depth = 0usize;
    // The field whose element is currently open as a direct child of the root.
    let mut current: Option<Field> = None;

    loop {
        match reader.read_event() {
            Err(err) => {
                return Err(malformed(format!(
                    "error at position {}: {err}",
                    reader.error_position()
                )));
            }
            Ok(Event::Start(element)) => {
                check_attributes(&element).map_err(|err| bad_attribute(&element, err))?;
                if depth == 0 {
                    if seen_root {
                        return Err(malformed("junk after document element".to_string()));
                    }
                    seen_root = true;
                    is_project = element.name().as_ref() == ROOT_ELEMENT;
                } else if depth == 1 && is_project {
                    // A repeated element keeps its first non-empty value.
                    current = field_for(element.name().as_ref()).filter(|field| !fields.is_set(*field));
                    if let Some(field) = current {
                        *fields.slot_mut(field) = Some(String::new());
                    }
                } else {
                    current = None;
                }
                depth += 1;
            }
            Ok(Event::Empty(element)) => {
                check_attributes(&element).map_err(|err| bad_attribute(&element, err))?;
                if depth == 0 {
                    if seen_root {
                        return Err(malformed("junk after document element".to_string()));
                    }
                    seen_root = true;
                    is_project = element.name().as_ref() == ROOT_ELEMENT;
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                current = None;
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|err| malformed(err.to_string()))?;
                if depth == 0 {
                    return Err(malformed(format!("text outside of the root element: '{text}'")));
                }
                if let Some(field) = current {
                    fields.slot_mut(field).get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(field) = current {
                    let data = data.into_inner();
                    fields
                        .slot_mut(field)
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
        }
    }

    if !seen_root {
        return Err(malformed("no element found".to_string()));
    }
    if depth != 0 {
        return Err(malformed("unclosed element at end of document".to_string()));
    }
    tracing::debug!(fields = ?fields, "detected from descriptor");
    Ok(fields)
}

/// Read the descriptor beside `path` and extract its coordinate fields. The descriptor must
/// exist; there is no fallback to filename detection.
pub fn detect_from_descriptor<P: AsRef<Path>>(path: P) -> Result<CoordinateFields, Error> {
    let descriptor = descriptor_path(path);
    if !descriptor.is_file() {
        return Err(Error::DescriptorNotFound { path: descriptor });
    }
    let content = std::fs::read_to_string(&descriptor).map_err(|err| Error::DescriptorRead {
        path: descriptor.clone(),
        err,
    })?;
    parse_descriptor(&content, &descriptor)
}

/// Supplies every coordinate field from the descriptor beside the local file.
#[derive(Debug, Clone)]
pub struct DescriptorDetector {
    path: PathBuf,
}

impl DescriptorDetector {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn descriptor_path(&self) -> PathBuf {
        descriptor_path(&self.path)
    }
}

impl Detector for DescriptorDetector {
    fn name(&self) -> &'static str {
        "descriptor"
    }

    fn provides(&self) -> &'static [Field] {
        Field::ALL
    }

    fn detect(&self, _: &CoordinateFields) -> Result<CoordinateFields, Error> {
        detect_from_descriptor(&self.path)
    }
}
