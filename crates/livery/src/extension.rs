// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// Settings for the extension that kills a runaway process left behind by a
/// previous service run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunawayProcessKiller {
    pub(crate) pidfile: String,
    pub(crate) stop_timeout: Duration,
    pub(crate) check_winsw_env_var: bool,
}

impl RunawayProcessKiller {
    /// Creates settings that watch `pidfile` and terminate the recorded
    /// process, waiting up to `stop_timeout` for a graceful exit.
    #[must_use]
    pub fn new(pidfile: impl Into<String>, stop_timeout: Duration, check_winsw_env_var: bool) -> Self {
        Self {
            pidfile: pidfile.into(),
            stop_timeout,
            check_winsw_env_var,
        }
    }

    /// The wrapper-side class name this extension is registered under.
    #[must_use]
    pub fn class_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Path of the file holding the process id to watch.
    #[must_use]
    pub fn pidfile(&self) -> &str {
        &self.pidfile
    }

    /// How long to wait for a graceful exit before killing the process.
    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    /// Whether the extension verifies the process was started by the wrapper
    /// before killing it.
    #[must_use]
    pub fn check_winsw_env_var(&self) -> bool {
        self.check_winsw_env_var
    }
}

/// One `<extension>` block parsed out of a service definition document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDeclaration {
    pub(crate) enabled: bool,
    pub(crate) class_name: String,
    pub(crate) id: String,
    pub(crate) settings: RunawayProcessKiller,
}

impl ExtensionDeclaration {
    /// Whether the wrapper should load this extension.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The declared implementation class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The declaration's unique id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The extension's settings.
    #[must_use]
    pub fn settings(&self) -> &RunawayProcessKiller {
        &self.settings
    }
}
