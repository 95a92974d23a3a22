// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::download::Download;
use crate::error::Result;
use crate::extension::ExtensionDeclaration;
use crate::parser;

/// A service definition parsed into its typed form.
///
/// A descriptor is produced from document text via [`ServiceDescriptor::from_xml`]
/// and answers the questions the wrapper itself would ask: who the service is,
/// what it runs, and which extras (downloads, extensions) it carries.
///
/// # Example
///
/// ```
/// use livery::ServiceDescriptor;
///
/// let descriptor = ServiceDescriptor::from_xml(
///     "<service>\
///        <id>svc1</id>\
///        <name>Service 1</name>\
///        <description>A sample</description>\
///        <executable>run.exe</executable>\
///      </service>",
/// )?;
///
/// assert_eq!(descriptor.id(), "svc1");
/// assert_eq!(descriptor.executable(), "run.exe");
/// # Ok::<(), livery::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) executable: String,
    pub(crate) delayed_auto_start: bool,
    pub(crate) downloads: Vec<Download>,
    pub(crate) extensions: Vec<ExtensionDeclaration>,
}

impl ServiceDescriptor {
    /// Parses a service definition document.
    ///
    /// Identity elements (`id`, `name`, `description`, `executable`) are
    /// required; when one appears more than once the first occurrence wins.
    /// Element text is trimmed of surrounding whitespace, so indentation in
    /// pretty-printed documents does not leak into values. Elements the model
    /// doesn't know are skipped wholesale, so documents may carry extra
    /// configuration without breaking parsing.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is not well formed, when a required
    /// element or attribute is absent, or when a value (a boolean, an `auth`
    /// scheme, a timeout) cannot be interpreted. The error message names the
    /// offending element or attribute.
    pub fn from_xml(document: &str) -> Result<Self> {
        parser::parse(document)
    }

    /// The service id registered with the service control manager.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Path of the executable the wrapper launches.
    #[must_use]
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Whether the service opts into delayed automatic startup.
    #[must_use]
    pub fn delayed_auto_start(&self) -> bool {
        self.delayed_auto_start
    }

    /// Download directives, in document order.
    #[must_use]
    pub fn downloads(&self) -> &[Download] {
        &self.downloads
    }

    /// Extension declarations, in document order.
    #[must_use]
    pub fn extensions(&self) -> &[ExtensionDeclaration] {
        &self.extensions
    }
}
