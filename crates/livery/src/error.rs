// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;

/// A specialized [`Result`](std::result::Result) type for descriptor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error returned when a service definition document cannot be understood.
///
/// The error's [`Display`](std::fmt::Display) output names the offending
/// element or attribute so a failing test points straight at the broken
/// portion of the document.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    pub(crate) fn missing_element(name: impl Into<Cow<'static, str>>) -> Self {
        Self(ErrorKind::MissingElement(name.into()))
    }

    pub(crate) fn missing_attribute(
        attribute: impl Into<Cow<'static, str>>,
        element: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self(ErrorKind::MissingAttribute {
            attribute: attribute.into(),
            element: element.into(),
        })
    }

    pub(crate) fn invalid_value(what: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self(ErrorKind::InvalidValue {
            what: what.into(),
            value: value.into(),
        })
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self(ErrorKind::UnexpectedEof)
    }

    /// Returns the error's kind, for tests that need to assert on causes.
    #[cfg(test)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.0
    }
}

impl From<quick_xml::Error> for Error {
    fn from(error: quick_xml::Error) -> Self {
        Self(ErrorKind::Xml(error))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        Self(ErrorKind::Attr(error))
    }
}

impl From<quick_xml::escape::EscapeError> for Error {
    fn from(error: quick_xml::escape::EscapeError) -> Self {
        Self(ErrorKind::Escape(error))
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorKind {
    #[error(transparent)]
    Xml(quick_xml::Error),

    #[error(transparent)]
    Attr(quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    Escape(quick_xml::escape::EscapeError),

    #[error("required element '{0}' is missing")]
    MissingElement(Cow<'static, str>),

    #[error("required attribute '{attribute}' is missing on element '{element}'")]
    MissingAttribute {
        attribute: Cow<'static, str>,
        element: Cow<'static, str>,
    },

    #[error("invalid value '{value}' for '{what}'")]
    InvalidValue {
        what: Cow<'static, str>,
        value: String,
    },

    #[error("unexpected end of document")]
    UnexpectedEof,
}
