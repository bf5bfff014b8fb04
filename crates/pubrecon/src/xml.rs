//! Minimal XML element tree for provider feeds.
//!
//! Both providers answer with Atom documents whose interesting parts sit a few
//! levels deep under namespaced elements. The tree keeps local names only
//! (`api:records` becomes `records`), so lookups don't depend on the prefix a
//! provider happens to bind.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{FetchError, FetchResult};

/// An element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local element name.
    pub name: String,

    /// Attributes as (local name, unescaped value) pairs, in document order.
    pub attributes: Vec<(String, String)>,

    /// Concatenated text content directly inside this element.
    pub text: String,

    /// Child elements in document order.
    pub children: Vec<Self>,
}

impl XmlNode {
    /// Parse a document and return its root element.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Parse`] for anything that is not a single
    /// well-formed element tree.
    pub fn parse(xml: &str) -> FetchResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(Self::from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let node = Self::from_start(e)?;
                    attach(&mut stack, &mut root, node);
                }
                Ok(Event::End(_)) => {
                    let node = stack.pop().ok_or_else(FetchError::parse)?;
                    attach(&mut stack, &mut root, node);
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e.unescape().map_err(|_| FetchError::parse())?;
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(err) => {
                    tracing::debug!(error = %err, "XML reader error");
                    return Err(FetchError::parse());
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(FetchError::parse());
        }
        root.ok_or_else(FetchError::parse)
    }

    fn from_start(e: &BytesStart<'_>) -> FetchResult<Self> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|_| FetchError::parse())?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
            let value = attr.unescape_value().map_err(|_| FetchError::parse())?;
            attributes.push((key, value.to_string()));
        }
        Ok(Self { name, attributes, text: String::new(), children: Vec::new() })
    }

    /// First child element with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a chain of child names, taking the first match at each level.
    #[must_use]
    pub fn path(&self, names: &[&str]) -> Option<&Self> {
        names.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Attribute value by local name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Text of the first child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}
