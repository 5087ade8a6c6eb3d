//! Discovery document parsing.
//!
//! The vendor publishes an XML tree of `app` elements, each carrying the
//! `action` elements it supports. Only the attributes the host consumes are
//! extracted; unrecognized elements and attributes are ignored so vendor
//! additions never break parsing.

use crate::error::{DiscoveryError, DiscoveryResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One `app` element with its actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    /// Application display name (e.g. "Excel").
    pub name: String,
    /// Icon URL for the application.
    pub fav_icon_url: String,
    /// Actions declared under this app.
    pub actions: Vec<ActionEntry>,
}

/// One `action` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    /// Action verb (e.g. "view", "edit", "editnew").
    pub name: String,
    /// File extension the action applies to. Empty for URL-scheme actions,
    /// which the host does not index.
    pub ext: String,
    /// Session URL template.
    pub urlsrc: String,
}

/// A parsed discovery document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryDocument {
    /// All applications in document order.
    pub apps: Vec<AppEntry>,
}

impl DiscoveryDocument {
    /// Parses a discovery document from its XML text.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Malformed`] if the XML does not parse, if
    /// an `app` element lacks a `name`, if an `action` element lacks a
    /// `name` or `urlsrc`, or if the document contains no `app` elements.
    pub fn parse(xml: &str) -> DiscoveryResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut apps: Vec<AppEntry> = Vec::new();
        let mut current_app: Option<AppEntry> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                    match element.name().as_ref() {
                        b"app" => {
                            // An app element never nests inside another; a
                            // dangling one is closed implicitly.
                            if let Some(app) = current_app.take() {
                                apps.push(app);
                            }
                            current_app = Some(Self::parse_app(&element)?);
                        }
                        b"action" => {
                            let action = Self::parse_action(&element)?;
                            match current_app.as_mut() {
                                Some(app) => app.actions.push(action),
                                None => {
                                    return Err(DiscoveryError::malformed(
                                        "action element outside of an app element",
                                    ))
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(element)) => {
                    if element.name().as_ref() == b"app" {
                        if let Some(app) = current_app.take() {
                            apps.push(app);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(error) => {
                    return Err(DiscoveryError::malformed(format!(
                        "invalid XML at byte {}: {error}",
                        reader.buffer_position()
                    )))
                }
            }
        }

        if let Some(app) = current_app.take() {
            apps.push(app);
        }

        if apps.is_empty() {
            return Err(DiscoveryError::malformed(
                "document contains no app elements",
            ));
        }

        Ok(Self { apps })
    }

    fn parse_app(element: &BytesStart<'_>) -> DiscoveryResult<AppEntry> {
        let mut name = None;
        let mut fav_icon_url = String::new();

        for attribute in element.attributes() {
            let attribute = attribute
                .map_err(|e| DiscoveryError::malformed(format!("invalid app attribute: {e}")))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| DiscoveryError::malformed(format!("invalid app attribute: {e}")))?;
            match attribute.key.as_ref() {
                b"name" => name = Some(value.into_owned()),
                b"favIconUrl" => fav_icon_url = value.into_owned(),
                _ => {}
            }
        }

        let name = name.ok_or_else(|| DiscoveryError::malformed("app element missing name"))?;
        Ok(AppEntry {
            name,
            fav_icon_url,
            actions: Vec::new(),
        })
    }

    fn parse_action(element: &BytesStart<'_>) -> DiscoveryResult<ActionEntry> {
        let mut name = None;
        let mut ext = String::new();
        let mut urlsrc = None;

        for attribute in element.attributes() {
            let attribute = attribute
                .map_err(|e| DiscoveryError::malformed(format!("invalid action attribute: {e}")))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| DiscoveryError::malformed(format!("invalid action attribute: {e}")))?;
            match attribute.key.as_ref() {
                b"name" => name = Some(value.into_owned()),
                b"ext" => ext = value.into_owned(),
                b"urlsrc" => urlsrc = Some(value.into_owned()),
                _ => {}
            }
        }

        let name = name.ok_or_else(|| DiscoveryError::malformed("action element missing name"))?;
        let urlsrc = urlsrc.ok_or_else(|| {
            DiscoveryError::malformed(format!("action '{name}' missing urlsrc"))
        })?;

        Ok(ActionEntry { name, ext, urlsrc })
    }
}
