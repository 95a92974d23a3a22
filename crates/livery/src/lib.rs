// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Typed model and parser for Windows service wrapper definition documents.
//!
//! A service wrapper hosts an ordinary executable as a Windows service and is
//! configured through a small XML document: identity elements describing the
//! service, plus optional download directives, extension declarations, and
//! startup tweaks. This crate turns such documents into a typed
//! [`ServiceDescriptor`] so tools and tests can inspect them without touching
//! XML themselves.
//!
//! The parser is deliberately forgiving about what it does not model: unknown
//! elements and attributes are skipped wholesale. It is strict about what it
//! does model: identity elements are required, booleans must be booleans, and
//! every error names the element or attribute that caused it.
//!
//! # Quick Start
//!
//! ```
//! use livery::ServiceDescriptor;
//!
//! let descriptor = ServiceDescriptor::from_xml(
//!     "<service>\
//!        <id>svc1</id>\
//!        <name>Service 1</name>\
//!        <description>A sample</description>\
//!        <executable>run.exe</executable>\
//!        <delayedAutoStart>true</delayedAutoStart>\
//!      </service>",
//! )?;
//!
//! assert_eq!(descriptor.id(), "svc1");
//! assert!(descriptor.delayed_auto_start());
//! # Ok::<(), livery::Error>(())
//! ```

mod descriptor;
mod download;
mod error;
mod extension;
mod parser;

pub use descriptor::ServiceDescriptor;
pub use download::{AuthKind, Download};
pub use error::{Error, Result};
pub use extension::{ExtensionDeclaration, RunawayProcessKiller};
