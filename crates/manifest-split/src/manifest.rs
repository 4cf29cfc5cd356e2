// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Manifest document model, parsing, serialization and project filtering.
//!
//! The tree keeps attributes in document order and serializes them back in
//! that order, so the bytes written for a logical document never depend on
//! hashing or map iteration order. Serializing a parsed document is a fixed
//! point: parsing the output and serializing again yields the same bytes.

use std::collections::BTreeSet;
use std::path::Path;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Error, Result, PROJECT_ELEMENT};

#[cfg(test)]
#[path = "./manifest_test.rs"]
mod manifest_test;

/// Declaration written ahead of the root element when saving.
const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

/// XML element with ordered attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute append.
    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Value of attribute `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `key` in place, or append it last.
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Direct child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn push_child(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Serialize this element and its subtree.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Append the serialization of this element to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str(" />");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(out),
                Node::Text(text) => out.push_str(&escape(text.as_str())),
                Node::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A checkout manifest: a single root element holding `<project>` entries
/// among other opaque elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    root: Element,
}

impl Manifest {
    /// Wrap an existing root element.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse a manifest from an XML string.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|error| Error::InvalidManifest { error })?;
            match event {
                Event::Start(start) => open.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = open.pop().ok_or_else(|| {
                        Error::MalformedManifest("closing tag without opening tag".to_string())
                    })?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|error| Error::InvalidManifest { error })?;
                    push_text(&mut open, &text)?;
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data).map_err(|e| {
                        Error::MalformedManifest(format!("CDATA is not valid UTF-8: {e}"))
                    })?;
                    push_text(&mut open, text)?;
                }
                Event::Comment(comment) => {
                    if let Some(parent) = open.last_mut() {
                        let comment = std::str::from_utf8(&comment).map_err(|e| {
                            Error::MalformedManifest(format!("comment is not valid UTF-8: {e}"))
                        })?;
                        parent.children.push(Node::Comment(comment.to_string()));
                    }
                }
                Event::Eof => break,
                // Declarations, processing instructions and doctypes are not
                // part of the hashed root.
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(Error::MalformedManifest(format!(
                "element <{}> is never closed",
                unclosed.name
            )));
        }
        let root =
            root.ok_or_else(|| Error::MalformedManifest("document has no root element".into()))?;
        Ok(Self { root })
    }

    /// Load manifest from file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let xml = crate::error::read_to_string(path.as_ref())?;
        Self::parse(&xml)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// `<project>` children of the root, in document order.
    pub fn projects(&self) -> impl Iterator<Item = &Element> {
        self.root
            .child_elements()
            .filter(|element| element.name == PROJECT_ELEMENT)
    }

    /// Names of every `<project>` child, in document order.
    pub fn project_names(&self) -> Vec<&str> {
        self.projects()
            .filter_map(|project| project.attribute("name"))
            .collect()
    }

    /// Names from `names` with no matching project in this manifest.
    pub fn missing_projects<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let present: BTreeSet<&str> = self.project_names().into_iter().collect();
        names
            .into_iter()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Serialized bytes of the root element; the input to the manifest hash.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.root.to_xml_string().into_bytes()
    }

    /// Full document text as written by [`Manifest::save`].
    pub fn to_document_string(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        self.root.write_to(&mut out);
        out.push('\n');
        out
    }

    /// Write the document to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_document_string()).map_err(|error| Error::WriteFailed {
            path: path.to_path_buf(),
            error,
        })
    }
}

/// Filter the `<project>` children of `manifest`.
///
/// Keeps every non-project child and each project whose `name` is in
/// `input_projects` but not in `remove_projects`, preserving document order.
/// A dropped project takes the whitespace text right before it along, which
/// keeps the remaining entries on their original lines.
pub fn update_manifest(
    manifest: &Manifest,
    input_projects: &BTreeSet<String>,
    remove_projects: &BTreeSet<String>,
) -> Manifest {
    let keep = |element: &Element| {
        element.name != PROJECT_ELEMENT
            || element.attribute("name").is_some_and(|name| {
                input_projects.contains(name) && !remove_projects.contains(name)
            })
    };

    let mut root = Element {
        name: manifest.root.name.clone(),
        attributes: manifest.root.attributes.clone(),
        children: Vec::with_capacity(manifest.root.children.len()),
    };

    let mut dropped = 0usize;
    for child in &manifest.root.children {
        match child {
            Node::Element(element) if !keep(element) => {
                dropped += 1;
                if root.children.last().is_some_and(Node::is_whitespace) {
                    root.children.pop();
                }
            }
            other => root.children.push(other.clone()),
        }
    }

    tracing::debug!(dropped, "filtered manifest projects");
    Manifest { root }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| Error::MalformedManifest(format!("element name is not valid UTF-8: {e}")))?
        .to_string();

    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| Error::InvalidManifest { error: e.into() })?;
        let key = std::str::from_utf8(attribute.key.as_ref()).map_err(|e| {
            Error::MalformedManifest(format!("attribute name is not valid UTF-8: {e}"))
        })?;
        let value = attribute
            .unescape_value()
            .map_err(|error| Error::InvalidManifest { error })?;
        element
            .attributes
            .push((key.to_string(), value.into_owned()));
    }
    Ok(element)
}

fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::MalformedManifest(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(open: &mut [Element], text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let Some(parent) = open.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(Error::MalformedManifest(
            "text outside of the root element".to_string(),
        ));
    };

    // Adjacent text and CDATA runs collapse into one node.
    match parent.children.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
    Ok(())
}
