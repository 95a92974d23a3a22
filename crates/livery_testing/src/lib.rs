// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Test fixtures for service definition documents.
//!
//! Parser tests need many small variations of the same document: one more
//! attribute here, a deliberately broken entry there. Writing those documents
//! by hand buries the interesting difference in boilerplate. This crate's
//! [`DocumentBuilder`] starts from a complete placeholder service and lets a
//! test state only what it cares about:
//!
//! ```
//! use livery_testing::DocumentBuilder;
//!
//! let descriptor = DocumentBuilder::new()
//!     .id("svc1")
//!     .delayed_auto_start()
//!     .to_descriptor()?;
//!
//! assert_eq!(descriptor.id(), "svc1");
//! assert!(descriptor.delayed_auto_start());
//! # Ok::<(), livery::Error>(())
//! ```
//!
//! Rendered documents can be echoed to a [`DiagnosticsSink`] so a failing
//! test's log shows exactly the document it was working with; the default
//! sink forwards to [`tracing`].

mod document_builder;
mod sink;

pub use document_builder::DocumentBuilder;
pub use sink::{CaptureSink, DiagnosticsSink, TracingSink};
