// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Event-driven extraction of [`ServiceDescriptor`] values from document text.

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::descriptor::ServiceDescriptor;
use crate::download::{AuthKind, Download};
use crate::error::{Error, Result};
use crate::extension::{ExtensionDeclaration, RunawayProcessKiller};

pub(crate) fn parse(document: &str) -> Result<ServiceDescriptor> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut id = None;
    let mut name = None;
    let mut description = None;
    let mut executable = None;
    let mut delayed_auto_start = false;
    let mut downloads = Vec::new();
    let mut extensions = Vec::new();

    if enter_root(&mut reader)? {
        loop {
            match reader.read_event()? {
                Event::Start(element) => match element.name().as_ref() {
                    b"id" => store_first(&mut id, element_text(&mut reader)?),
                    b"name" => store_first(&mut name, element_text(&mut reader)?),
                    b"description" => store_first(&mut description, element_text(&mut reader)?),
                    b"executable" => store_first(&mut executable, element_text(&mut reader)?),
                    b"delayedAutoStart" => {
                        let text = element_text(&mut reader)?;
                        delayed_auto_start = parse_bool("delayedAutoStart", &text)?;
                    }
                    b"download" => {
                        downloads.push(parse_download(&element)?);
                        reader.read_to_end(element.name())?;
                    }
                    b"extensions" => parse_extensions(&mut reader, &mut extensions)?,
                    _ => {
                        reader.read_to_end(element.name())?;
                    }
                },
                Event::Empty(element) => {
                    if element.name().as_ref() == b"download" {
                        downloads.push(parse_download(&element)?);
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(Error::unexpected_eof()),
                _ => {}
            }
        }
    }

    Ok(ServiceDescriptor {
        id: id.ok_or_else(|| Error::missing_element("id"))?,
        name: name.ok_or_else(|| Error::missing_element("name"))?,
        description: description.ok_or_else(|| Error::missing_element("description"))?,
        executable: executable.ok_or_else(|| Error::missing_element("executable"))?,
        delayed_auto_start,
        downloads,
        extensions,
    })
}

/// Advances the reader past the prolog to the root element.
///
/// Returns `false` for a self-closing root, which carries no children at all.
fn enter_root(reader: &mut Reader<&[u8]>) -> Result<bool> {
    loop {
        match reader.read_event()? {
            Event::Start(_) => return Ok(true),
            Event::Empty(_) => return Ok(false),
            Event::Eof => return Err(Error::missing_element("service")),
            _ => {}
        }
    }
}

// First occurrence wins for repeated identity elements.
fn store_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Collects the text content of the element just opened, skipping any nested
/// markup, and consumes the matching end tag.
fn element_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0_u32;

    loop {
        match reader.read_event()? {
            Event::Text(content) => text.push_str(&content.unescape()?),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(text);
                }

                depth -= 1;
            }
            Event::Eof => return Err(Error::unexpected_eof()),
            _ => {}
        }
    }
}

fn parse_bool(what: &'static str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::invalid_value(what, value))
    }
}

fn parse_millis(what: &'static str, value: &str) -> Result<Duration> {
    match value.parse::<u64>() {
        Ok(millis) => Ok(Duration::from_millis(millis)),
        Err(_) => Err(Error::invalid_value(what, value)),
    }
}

fn parse_download(element: &BytesStart<'_>) -> Result<Download> {
    let mut from = None;
    let mut to = None;
    let mut fail_on_error = false;
    let mut auth = AuthKind::None;
    let mut username = None;
    let mut password = None;
    let mut unsecure_auth = false;

    for attribute in element.attributes() {
        let attribute = attribute?;
        let value = attribute.unescape_value()?;

        match attribute.key.as_ref() {
            b"from" => from = Some(value.into_owned()),
            b"to" => to = Some(value.into_owned()),
            b"failOnError" => fail_on_error = parse_bool("failOnError", &value)?,
            b"auth" => auth = value.parse()?,
            b"user" => username = Some(value.into_owned()),
            b"password" => password = Some(value.into_owned()),
            b"unsecureAuth" => unsecure_auth = parse_bool("unsecureAuth", &value)?,
            _ => {}
        }
    }

    let mut download = Download::new(
        from.ok_or_else(|| Error::missing_attribute("from", "download"))?,
        to.ok_or_else(|| Error::missing_attribute("to", "download"))?,
    )
    .with_fail_on_error(fail_on_error)
    .with_auth(auth)
    .with_unsecure_auth(unsecure_auth);

    if let Some(username) = username {
        download = download.with_username(username);
    }

    if let Some(password) = password {
        download = download.with_password(password);
    }

    Ok(download)
}

fn parse_extensions(reader: &mut Reader<&[u8]>, extensions: &mut Vec<ExtensionDeclaration>) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if element.name().as_ref() == b"extension" {
                    extensions.push(parse_extension(reader, &element, false)?);
                } else {
                    reader.read_to_end(element.name())?;
                }
            }
            Event::Empty(element) => {
                if element.name().as_ref() == b"extension" {
                    extensions.push(parse_extension(reader, &element, true)?);
                }
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(Error::unexpected_eof()),
            _ => {}
        }
    }
}

// A self-closing extension carries no children, so the required-element
// checks below reject it after its attributes are read.
fn parse_extension(
    reader: &mut Reader<&[u8]>,
    element: &BytesStart<'_>,
    self_closing: bool,
) -> Result<ExtensionDeclaration> {
    let mut enabled = None;
    let mut class_name = None;
    let mut id = None;

    for attribute in element.attributes() {
        let attribute = attribute?;
        let value = attribute.unescape_value()?;

        match attribute.key.as_ref() {
            b"enabled" => enabled = Some(parse_bool("enabled", &value)?),
            b"className" => class_name = Some(value.into_owned()),
            b"id" => id = Some(value.into_owned()),
            _ => {}
        }
    }

    let mut pidfile = None;
    let mut stop_timeout = None;
    let mut check_winsw_env_var = None;

    while !self_closing {
        match reader.read_event()? {
            Event::Start(child) => match child.name().as_ref() {
                b"pidfile" => pidfile = Some(element_text(reader)?),
                b"stopTimeout" => {
                    let text = element_text(reader)?;
                    stop_timeout = Some(parse_millis("stopTimeout", &text)?);
                }
                b"checkWinSWEnvironmentVariable" => {
                    let text = element_text(reader)?;
                    check_winsw_env_var = Some(parse_bool("checkWinSWEnvironmentVariable", &text)?);
                }
                _ => {
                    reader.read_to_end(child.name())?;
                }
            },
            Event::End(_) => break,
            Event::Eof => return Err(Error::unexpected_eof()),
            _ => {}
        }
    }

    let settings = RunawayProcessKiller::new(
        pidfile.ok_or_else(|| Error::missing_element("pidfile"))?,
        stop_timeout.ok_or_else(|| Error::missing_element("stopTimeout"))?,
        check_winsw_env_var.ok_or_else(|| Error::missing_element("checkWinSWEnvironmentVariable"))?,
    );

    Ok(ExtensionDeclaration {
        enabled: enabled.ok_or_else(|| Error::missing_attribute("enabled", "extension"))?,
        class_name: class_name.ok_or_else(|| Error::missing_attribute("className", "extension"))?,
        id: id.ok_or_else(|| Error::missing_attribute("id", "extension"))?,
        settings,
    })
}
