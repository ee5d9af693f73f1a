//! Owned XML tree used for WordprocessingML parts.
//!
//! Element names are kept as written (`w:p`, `w:r`, ...). Markup the model
//! does not interpret (declarations, comments, processing instructions,
//! CDATA) is kept as raw events so a part round-trips.

use crate::error::{DocxError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// A node in the owned XML tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Raw(Event<'static>),
}

/// An element with its attributes and children, in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.set_attribute(key, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(XmlNode::Text(text.to_string()));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Element children, skipping text and raw nodes
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First element child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.name == name)
    }

    /// Concatenated text of all descendant text nodes
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(child) => collect_text(child, out),
            XmlNode::Raw(_) => {}
        }
    }
}

/// A parsed XML part: prolog, root element, and anything after the root
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub prolog: Vec<XmlNode>,
    pub root: XmlElement,
    pub epilog: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse a complete XML part
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let node = match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(element_from_start(&reader, &start)?);
                    continue;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        DocxError::Malformed("closing tag without an open element".to_string())
                    })?;
                    XmlNode::Element(element)
                }
                Event::Empty(start) => XmlNode::Element(element_from_start(&reader, &start)?),
                Event::Text(text) => XmlNode::Text(text.unescape()?.into_owned()),
                Event::Eof => break,
                other => XmlNode::Raw(other.into_owned()),
            };

            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
                continue;
            }

            match node {
                XmlNode::Element(element) => {
                    if root.is_some() {
                        return Err(DocxError::Malformed(format!(
                            "second root element <{}>",
                            element.name
                        )));
                    }
                    root = Some(element);
                }
                other if root.is_some() => epilog.push(other),
                other => prolog.push(other),
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocxError::Malformed(format!("unclosed element <{}>", open.name)));
        }

        let root = root.ok_or_else(|| DocxError::Malformed("no root element".to_string()))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Serialize the part back to a string
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

fn element_from_start(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.decode_and_unescape_value(reader)?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Element(element) => write_element(writer, element)?,
        XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        XmlNode::Raw(event) => writer.write_event(event.clone())?,
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
