// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Authentication scheme used by a [`Download`] directive.
///
/// The canonical wire form is lowercase (`none`, `sspi`, `basic`); parsing
/// accepts any capitalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthKind {
    /// Fetch anonymously.
    #[default]
    None,

    /// Authenticate with the current Windows credentials.
    Sspi,

    /// Authenticate with an explicit username and password pair.
    Basic,
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::None => "none",
            Self::Sspi => "sspi",
            Self::Basic => "basic",
        };

        f.write_str(kind)
    }
}

impl FromStr for AuthKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else if s.eq_ignore_ascii_case("sspi") {
            Ok(Self::Sspi)
        } else if s.eq_ignore_ascii_case("basic") {
            Ok(Self::Basic)
        } else {
            Err(Error::invalid_value("auth", s))
        }
    }
}

/// A directive instructing the service wrapper to fetch a remote file before
/// the service starts.
///
/// Only the source and destination are mandatory; everything else defaults to
/// the wrapper's own defaults (no authentication, failures ignored).
///
/// # Example
///
/// ```
/// use livery::{AuthKind, Download};
///
/// let download = Download::new("https://example.com/pkg.zip", r"%BASE%\pkg.zip")
///     .with_auth(AuthKind::Basic)
///     .with_username("aladdin")
///     .with_password("opensesame");
///
/// assert_eq!(download.from(), "https://example.com/pkg.zip");
/// assert_eq!(download.auth(), AuthKind::Basic);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) fail_on_error: bool,
    pub(crate) auth: AuthKind,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) unsecure_auth: bool,
}

impl Download {
    /// Creates a directive that fetches `from` into the local path `to`.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            fail_on_error: false,
            auth: AuthKind::None,
            username: None,
            password: None,
            unsecure_auth: false,
        }
    }

    /// Sets whether a failed transfer prevents the service from starting.
    #[must_use]
    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }

    /// Sets the authentication scheme.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthKind) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the username for [`AuthKind::Basic`] authentication.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password for [`AuthKind::Basic`] authentication.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Permits credentials to travel over an unencrypted connection.
    #[must_use]
    pub fn with_unsecure_auth(mut self, unsecure_auth: bool) -> Self {
        self.unsecure_auth = unsecure_auth;
        self
    }

    /// The source URL.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// The destination path.
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Whether a failed transfer prevents the service from starting.
    #[must_use]
    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error
    }

    /// The authentication scheme.
    #[must_use]
    pub fn auth(&self) -> AuthKind {
        self.auth
    }

    /// The username, when one was supplied.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The password, when one was supplied.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Whether credentials may travel over an unencrypted connection.
    #[must_use]
    pub fn unsecure_auth(&self) -> bool {
        self.unsecure_auth
    }
}
