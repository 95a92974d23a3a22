// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Fluent synthesis of service definition documents.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use livery::{AuthKind, Download, RunawayProcessKiller, ServiceDescriptor};

use crate::sink::{DiagnosticsSink, TracingSink};

/// How the comment line below the XML declaration is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Comment {
    /// Emit [`DocumentBuilder::DEFAULT_COMMENT`].
    Filler,

    /// Emit caller-supplied text.
    Custom(String),

    /// Emit no comment line at all.
    Omitted,
}

/// A fluent builder that synthesizes service definition documents for tests.
///
/// A fresh builder already renders a complete, valid document describing a
/// placeholder service, so tests only state what they care about and inherit
/// sensible defaults for the rest:
///
/// ```
/// use livery_testing::DocumentBuilder;
///
/// let document = DocumentBuilder::new()
///     .id("svc1")
///     .delayed_auto_start()
///     .render();
///
/// assert!(document.contains("<id>svc1</id>"));
/// assert!(document.contains("<delayedAutoStart>true</delayedAutoStart>"));
/// ```
///
/// Rendering is pure: the builder can be rendered repeatedly and keeps
/// producing the same document. Raw entries are inserted verbatim, with no
/// escaping or validation, so tests can deliberately produce broken documents
/// to probe parser error handling.
pub struct DocumentBuilder {
    id: String,
    name: String,
    description: String,
    executable: String,
    declaration: bool,
    comment: Comment,
    entries: Vec<String>,
    extensions: Vec<String>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl DocumentBuilder {
    /// Comment text used when a builder was not given an explicit comment.
    pub const DEFAULT_COMMENT: &str =
        "Just a sample configuration file generated by the test suite";

    /// Creates a builder whose diagnostics go to the active [`tracing`]
    /// subscriber.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Creates a builder that sends diagnostics to `sink`.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            id: "myapp".to_owned(),
            name: "MyApp Service".to_owned(),
            description: "MyApp Service (powered by livery)".to_owned(),
            executable: r"%BASE%\myExecutable.exe".to_owned(),
            declaration: true,
            comment: Comment::Filler,
            entries: Vec::new(),
            extensions: Vec::new(),
            sink,
        }
    }

    /// Sets the service id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the executable path.
    #[must_use]
    pub fn executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Sets whether the document opens with an XML declaration line.
    #[must_use]
    pub fn declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    /// Sets the comment rendered below the declaration.
    ///
    /// Empty text restores the default filler comment; use
    /// [`without_comment`](Self::without_comment) to drop the line entirely.
    #[must_use]
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        let text = text.into();

        self.comment = if text.is_empty() {
            Comment::Filler
        } else {
            Comment::Custom(text)
        };

        self
    }

    /// Drops the comment line entirely.
    #[must_use]
    pub fn without_comment(mut self) -> Self {
        self.comment = Comment::Omitted;
        self
    }

    /// Appends one verbatim entry to the service body.
    ///
    /// Entries are rendered in insertion order after the identity elements,
    /// with no escaping or validation applied.
    #[must_use]
    pub fn raw_entry(mut self, entry: impl Into<String>) -> Self {
        self.entries.push(entry.into());
        self
    }

    /// Appends a simple `<name>value</name>` entry.
    #[must_use]
    pub fn tag(self, name: &str, value: &str) -> Self {
        self.raw_entry(format!("<{name}>{value}</{name}>"))
    }

    /// Declares the runaway process killer extension under its conventional
    /// id, enabled.
    #[must_use]
    pub fn extension(self, settings: &RunawayProcessKiller) -> Self {
        self.extension_with(settings, "killRunawayProcess", true)
    }

    /// Declares the runaway process killer extension with an explicit id and
    /// enabled flag.
    #[must_use]
    pub fn extension_with(mut self, settings: &RunawayProcessKiller, id: impl Into<String>, enabled: bool) -> Self {
        let id = id.into();
        let mut block = String::new();

        _ = writeln!(
            block,
            "    <extension enabled=\"{enabled}\" className=\"{}\" id=\"{id}\">",
            RunawayProcessKiller::class_name()
        );
        _ = writeln!(block, "      <pidfile>{}</pidfile>", settings.pidfile());
        _ = writeln!(
            block,
            "      <stopTimeout>{}</stopTimeout>",
            settings.stop_timeout().as_millis()
        );
        _ = writeln!(
            block,
            "      <checkWinSWEnvironmentVariable>{}</checkWinSWEnvironmentVariable>",
            settings.check_winsw_env_var()
        );
        block.push_str("    </extension>\n");

        self.extensions.push(block);
        self
    }

    /// Appends one verbatim extension block.
    ///
    /// The block lands inside `<extensions>` exactly as given, so callers
    /// control indentation and trailing newlines themselves.
    #[must_use]
    pub fn raw_extension(mut self, block: impl Into<String>) -> Self {
        self.extensions.push(block.into());
        self
    }

    /// Appends a `<download>` directive.
    ///
    /// Attributes follow the wrapper's conventions: `from`, `to` and
    /// `failOnError` are always present; `auth` and its dependent attributes
    /// appear only when authentication is requested.
    ///
    /// ```
    /// use livery::{AuthKind, Download};
    /// use livery_testing::DocumentBuilder;
    ///
    /// let download = Download::new("https://example.com/pkg.zip", r"%BASE%\pkg.zip")
    ///     .with_auth(AuthKind::Basic)
    ///     .with_username("aladdin")
    ///     .with_password("opensesame");
    ///
    /// let document = DocumentBuilder::new().download(&download).render();
    ///
    /// assert!(document.contains(r#"auth="basic" user="aladdin" password="opensesame""#));
    /// ```
    #[must_use]
    pub fn download(self, download: &Download) -> Self {
        let mut xml = String::new();

        _ = write!(
            xml,
            "<download from=\"{}\" to=\"{}\" failOnError=\"{}\"",
            download.from(),
            download.to(),
            download.fail_on_error()
        );

        if download.auth() != AuthKind::None {
            _ = write!(xml, " auth=\"{}\"", download.auth());

            if download.auth() == AuthKind::Basic {
                if let Some(username) = download.username() {
                    _ = write!(xml, " user=\"{username}\"");
                }

                if let Some(password) = download.password() {
                    _ = write!(xml, " password=\"{password}\"");
                }
            }

            if download.unsecure_auth() {
                xml.push_str(" unsecureAuth=\"true\"");
            }
        }

        xml.push_str("/>");
        self.raw_entry(xml)
    }

    /// Opts the service into delayed automatic startup.
    #[must_use]
    pub fn delayed_auto_start(self) -> Self {
        self.raw_entry("<delayedAutoStart>true</delayedAutoStart>")
    }

    /// Renders the document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut document = String::new();

        if self.declaration {
            document.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        }

        match &self.comment {
            Comment::Filler => _ = writeln!(document, "<!--{}-->", Self::DEFAULT_COMMENT),
            Comment::Custom(text) => _ = writeln!(document, "<!--{text}-->"),
            Comment::Omitted => {}
        }

        document.push_str("<service>\n");
        _ = writeln!(document, "  <id>{}</id>", self.id);
        _ = writeln!(document, "  <name>{}</name>", self.name);
        _ = writeln!(document, "  <description>{}</description>", self.description);
        _ = writeln!(document, "  <executable>{}</executable>", self.executable);

        for entry in &self.entries {
            _ = writeln!(document, "  {entry}");
        }

        if !self.extensions.is_empty() {
            document.push_str("  <extensions>\n");

            for extension in &self.extensions {
                document.push_str(extension);
            }

            document.push_str("  </extensions>\n");
        }

        document.push_str("</service>\n");
        document
    }

    /// Renders the document and also writes it to the diagnostics sink,
    /// prefixed with a `Produced config:` label line.
    #[must_use]
    pub fn render_captured(&self) -> String {
        let document = self.render();

        self.sink.write_line("Produced config:");
        self.sink.write_line(&document);

        document
    }

    /// Renders the document and parses it back into a typed descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error when the rendered document does not parse, which
    /// happens when raw entries or raw extension blocks broke it.
    pub fn to_descriptor(&self) -> livery::Result<ServiceDescriptor> {
        ServiceDescriptor::from_xml(&self.render())
    }

    /// Like [`to_descriptor`](Self::to_descriptor), but also writes the
    /// rendered document to the diagnostics sink.
    ///
    /// # Errors
    ///
    /// Returns an error when the rendered document does not parse.
    pub fn to_descriptor_captured(&self) -> livery::Result<ServiceDescriptor> {
        ServiceDescriptor::from_xml(&self.render_captured())
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocumentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("executable", &self.executable)
            .field("declaration", &self.declaration)
            .field("comment", &self.comment)
            .field("entries", &self.entries)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::sink::{CaptureSink, MockDiagnosticsSink};

    use super::*;

    #[test]
    fn default_document_renders_exactly() {
        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<!--Just a sample configuration file generated by the test suite-->\n",
            "<service>\n",
            "  <id>myapp</id>\n",
            "  <name>MyApp Service</name>\n",
            "  <description>MyApp Service (powered by livery)</description>\n",
            "  <executable>%BASE%\\myExecutable.exe</executable>\n",
            "</service>\n",
        );

        assert_eq!(DocumentBuilder::new().render(), expected);
    }

    #[test]
    fn minimal_overrides_inherit_the_rest() {
        let document = DocumentBuilder::new().id("svc1").delayed_auto_start().render();

        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<!--Just a sample configuration file generated by the test suite-->\n",
            "<service>\n",
            "  <id>svc1</id>\n",
            "  <name>MyApp Service</name>\n",
            "  <description>MyApp Service (powered by livery)</description>\n",
            "  <executable>%BASE%\\myExecutable.exe</executable>\n",
            "  <delayedAutoStart>true</delayedAutoStart>\n",
            "</service>\n",
        );

        assert_eq!(document, expected);
    }

    #[test]
    fn identity_setters_replace_defaults() {
        let document = DocumentBuilder::new()
            .id("svc1")
            .name("Service 1")
            .description("A sample")
            .executable("run.exe")
            .render();

        assert!(document.contains("  <id>svc1</id>\n"));
        assert!(document.contains("  <name>Service 1</name>\n"));
        assert!(document.contains("  <description>A sample</description>\n"));
        assert!(document.contains("  <executable>run.exe</executable>\n"));
    }

    #[test]
    fn declaration_can_be_suppressed() {
        let document = DocumentBuilder::new().declaration(false).render();

        assert!(document.starts_with("<!--"));
    }

    #[test]
    fn comment_can_be_customized_or_dropped() {
        let custom = DocumentBuilder::new().comment("hand made").render();
        assert!(custom.contains("<!--hand made-->\n"));
        assert!(!custom.contains(DocumentBuilder::DEFAULT_COMMENT));

        let filler = DocumentBuilder::new().comment("").render();
        assert!(filler.contains(DocumentBuilder::DEFAULT_COMMENT));

        let bare = DocumentBuilder::new().without_comment().declaration(false).render();
        assert!(bare.starts_with("<service>\n"));
        assert!(!bare.contains("<!--"));
    }

    #[test]
    fn raw_entries_keep_insertion_order() {
        let document = DocumentBuilder::new()
            .raw_entry("<logpath>C:\\logs</logpath>")
            .tag("priority", "high")
            .render();

        let logpath = document.find("<logpath>").unwrap();
        let priority = document.find("<priority>high</priority>").unwrap();

        assert!(document.contains("  <logpath>C:\\logs</logpath>\n"));
        assert!(document.contains("  <priority>high</priority>\n"));
        assert!(logpath < priority);
        assert!(priority < document.find("</service>").unwrap());
    }

    #[test]
    fn raw_entries_render_before_the_extensions_container() {
        let settings = RunawayProcessKiller::new("p", Duration::from_millis(1), false);
        let document = DocumentBuilder::new()
            .extension(&settings)
            .raw_entry("<logpath>C:\\logs</logpath>")
            .render();

        let entry = document.find("<logpath>").unwrap();
        let container = document.find("<extensions>").unwrap();

        assert!(entry < container);
    }

    #[test]
    fn raw_entries_are_not_escaped() {
        let document = DocumentBuilder::new().raw_entry("<broken & unescaped").render();

        assert!(document.contains("  <broken & unescaped\n"));
    }

    #[test]
    fn extensions_container_appears_only_when_used() {
        assert!(!DocumentBuilder::new().render().contains("<extensions>"));

        let settings = RunawayProcessKiller::new(r"%BASE%\pid.txt", Duration::from_secs(5), true);
        let document = DocumentBuilder::new().extension(&settings).render();

        let expected = concat!(
            "  <extensions>\n",
            "    <extension enabled=\"true\" className=\"livery::extension::RunawayProcessKiller\" id=\"killRunawayProcess\">\n",
            "      <pidfile>%BASE%\\pid.txt</pidfile>\n",
            "      <stopTimeout>5000</stopTimeout>\n",
            "      <checkWinSWEnvironmentVariable>true</checkWinSWEnvironmentVariable>\n",
            "    </extension>\n",
            "  </extensions>\n",
            "</service>\n",
        );

        assert!(document.ends_with(expected), "document was: {document}");
    }

    #[test]
    fn extension_with_controls_id_and_enabled() {
        let settings = RunawayProcessKiller::new("p", Duration::from_millis(1), false);
        let document = DocumentBuilder::new().extension_with(&settings, "custom", false).render();

        assert!(document.contains(" enabled=\"false\" "));
        assert!(document.contains(" id=\"custom\">"));
        assert!(document.contains("<checkWinSWEnvironmentVariable>false</checkWinSWEnvironmentVariable>"));
    }

    #[test]
    fn raw_extension_blocks_land_verbatim() {
        let document = DocumentBuilder::new()
            .raw_extension("    <extension enabled=\"true\" className=\"x\" id=\"one\"/>\n")
            .render();

        assert!(document.contains("  <extensions>\n    <extension enabled=\"true\" className=\"x\" id=\"one\"/>\n  </extensions>\n"));
    }

    #[rstest]
    #[case::plain(
        Download::new("http://example.com/f.zip", "f.zip"),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false"/>"#
    )]
    #[case::fail_on_error(
        Download::new("http://example.com/f.zip", "f.zip").with_fail_on_error(true),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="true"/>"#
    )]
    #[case::unsecure_without_auth_is_ignored(
        Download::new("http://example.com/f.zip", "f.zip").with_unsecure_auth(true),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false"/>"#
    )]
    #[case::credentials_without_auth_are_ignored(
        Download::new("http://example.com/f.zip", "f.zip").with_username("u").with_password("p"),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false"/>"#
    )]
    #[case::sspi(
        Download::new("http://example.com/f.zip", "f.zip").with_auth(AuthKind::Sspi),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false" auth="sspi"/>"#
    )]
    #[case::sspi_ignores_credentials(
        Download::new("http://example.com/f.zip", "f.zip")
            .with_auth(AuthKind::Sspi)
            .with_username("u")
            .with_password("p"),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false" auth="sspi"/>"#
    )]
    #[case::sspi_unsecure(
        Download::new("http://example.com/f.zip", "f.zip")
            .with_auth(AuthKind::Sspi)
            .with_unsecure_auth(true),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false" auth="sspi" unsecureAuth="true"/>"#
    )]
    #[case::basic_full(
        Download::new("http://example.com/f.zip", "f.zip")
            .with_auth(AuthKind::Basic)
            .with_username("aladdin")
            .with_password("opensesame"),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false" auth="basic" user="aladdin" password="opensesame"/>"#
    )]
    #[case::basic_username_only(
        Download::new("http://example.com/f.zip", "f.zip")
            .with_auth(AuthKind::Basic)
            .with_username("aladdin"),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false" auth="basic" user="aladdin"/>"#
    )]
    #[case::basic_password_only(
        Download::new("http://example.com/f.zip", "f.zip")
            .with_auth(AuthKind::Basic)
            .with_password("opensesame"),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false" auth="basic" password="opensesame"/>"#
    )]
    #[case::basic_unsecure(
        Download::new("http://example.com/f.zip", "f.zip")
            .with_auth(AuthKind::Basic)
            .with_username("aladdin")
            .with_password("opensesame")
            .with_unsecure_auth(true),
        r#"<download from="http://example.com/f.zip" to="f.zip" failOnError="false" auth="basic" user="aladdin" password="opensesame" unsecureAuth="true"/>"#
    )]
    fn download_renders_expected_attributes(#[case] download: Download, #[case] expected: &str) {
        let document = DocumentBuilder::new().download(&download).render();

        assert!(
            document.contains(&format!("  {expected}\n")),
            "document was: {document}"
        );
    }

    #[test]
    fn delayed_auto_start_appends_its_element() {
        let document = DocumentBuilder::new().delayed_auto_start().render();

        assert!(document.contains("  <delayedAutoStart>true</delayedAutoStart>\n"));
    }

    #[test]
    fn rendering_is_pure() {
        let builder = DocumentBuilder::new().id("svc1").delayed_auto_start();

        assert_eq!(builder.render(), builder.render());
    }

    #[test]
    fn render_captured_writes_label_then_document() {
        let capture = CaptureSink::new();
        let builder = DocumentBuilder::with_sink(Arc::new(capture.clone()));

        let document = builder.render_captured();

        assert_eq!(capture.lines(), vec!["Produced config:".to_owned(), document.clone()]);
        assert_eq!(document, builder.render());
    }

    #[test]
    fn render_captured_drives_the_sink_in_order() {
        let mut sink = MockDiagnosticsSink::new();
        let mut sequence = mockall::Sequence::new();

        sink.expect_write_line()
            .withf(|line| line == "Produced config:")
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        sink.expect_write_line()
            .withf(|line| line.starts_with("<?xml") && line.ends_with("</service>\n"))
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());

        _ = DocumentBuilder::with_sink(Arc::new(sink)).render_captured();
    }

    #[test]
    fn to_descriptor_reads_back_what_was_built() {
        let descriptor = DocumentBuilder::new()
            .id("svc1")
            .delayed_auto_start()
            .to_descriptor()
            .unwrap();

        assert_eq!(descriptor.id(), "svc1");
        assert_eq!(descriptor.name(), "MyApp Service");
        assert!(descriptor.delayed_auto_start());
    }

    #[test]
    fn to_descriptor_surfaces_parse_failures() {
        let error = DocumentBuilder::new()
            .raw_entry("<unclosed>")
            .to_descriptor()
            .unwrap_err();

        assert!(!error.to_string().is_empty());
    }

    #[test]
    fn to_descriptor_captured_still_writes_the_document() {
        let capture = CaptureSink::new();
        let builder = DocumentBuilder::with_sink(Arc::new(capture.clone())).id("svc1");

        let descriptor = builder.to_descriptor_captured().unwrap();

        assert_eq!(descriptor.id(), "svc1");
        capture.assert_contains("<id>svc1</id>");
    }

    #[test]
    fn builder_is_send_and_sync() {
        static_assertions::assert_impl_all!(DocumentBuilder: Send, Sync);
    }

    #[test]
    fn debug_output_omits_the_sink() {
        let rendered = format!("{:?}", DocumentBuilder::new());

        assert!(rendered.starts_with("DocumentBuilder {"));
        assert!(rendered.contains("id: \"myapp\""));
        assert!(rendered.ends_with(".. }"));
    }
}
