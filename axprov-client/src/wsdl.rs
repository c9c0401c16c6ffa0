//! Lenient reader for the service-description (WSDL) document shipped with
//! the call manager.
//!
//! Only the parts the client needs are extracted: the target namespace, the
//! declared bindings, and the operations with their SOAPAction values. The
//! document is treated as read-only input and never validated against the
//! WSDL schema; mildly non-conformant documents are accepted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DescriptionError;

#[derive(Debug)]
pub struct ServiceDescription {
    path: PathBuf,
    target_namespace: String,
    bindings: Vec<String>,
    operations: HashMap<String, String>,
}

impl ServiceDescription {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptionError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)
            .map_err(|cause| DescriptionError::Unreadable { path: Clone::clone(&path), cause: cause.to_string() })?;
        Self::parse(path, &content)
    }

    pub(crate) fn parse(path: PathBuf, content: &str) -> Result<Self, DescriptionError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = false;

        let mut target_namespace: Option<String> = None;
        let mut bindings = Vec::new();
        let mut operations = HashMap::new();
        let mut in_binding = false;
        let mut current_operation: Option<String> = None;

        let mut buf = Vec::new();
        loop {
            let event = reader.read_event_into(&mut buf)
                .map_err(|cause| DescriptionError::Malformed { path: Clone::clone(&path), cause: cause.to_string() })?;

            match event {
                Event::Start(ref element) | Event::Empty(ref element) => {
                    match element.name().local_name().as_ref() {
                        b"definitions" => {
                            target_namespace = attribute(element, b"targetNamespace");
                        }
                        b"binding" if !in_binding => {
                            if let Some(name) = attribute(element, b"name") {
                                bindings.push(name);
                                in_binding = true;
                            }
                        }
                        b"operation" => {
                            if let Some(name) = attribute(element, b"name") {
                                current_operation = Some(name);
                            }
                            if let (Some(operation), Some(action)) = (&current_operation, attribute(element, b"soapAction")) {
                                if in_binding {
                                    operations.insert(Clone::clone(operation), action);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(ref element) => {
                    match element.name().local_name().as_ref() {
                        b"binding" => in_binding = false,
                        b"operation" => current_operation = None,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let target_namespace = target_namespace
            .filter(|namespace| !namespace.is_empty())
            .ok_or(DescriptionError::MissingNamespace { path: Clone::clone(&path) })?;

        Ok(Self { path, target_namespace, bindings, operations })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    pub fn has_operation(&self, operation: &str) -> bool {
        self.operations.contains_key(operation)
    }

    pub fn soap_action(&self, operation: &str) -> Option<&str> {
        self.operations.get(operation).map(String::as_str)
    }

    pub fn operations(&self) -> Vec<&str> {
        let mut operations = self.operations.keys().map(String::as_str).collect::<Vec<_>>();
        operations.sort_unstable();
        operations
    }

    pub fn require_binding(&self, binding: &str) -> Result<(), DescriptionError> {
        if self.bindings.iter().any(|declared| declared == binding) {
            Ok(())
        } else {
            Err(DescriptionError::MissingBinding {
                path: Clone::clone(&self.path),
                binding: String::from(binding),
            })
        }
    }
}

fn attribute(element: &BytesStart, key: &[u8]) -> Option<String> {
    element.attributes()
        .flatten()
        .find(|attribute| attribute.key.local_name().as_ref() == key)
        .and_then(|attribute| attribute.unescape_value().ok().map(|value| value.to_string()))
}
