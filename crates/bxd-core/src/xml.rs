//! Structural XML writer for the legacy skeleton file
//!
//! Wraps `quick_xml::Writer` with the start/attribute/element/end protocol the
//! skeleton format is written in. Attributes may only follow `start_element`
//! directly, so the open tag is held back until its first child, text or end.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::math::Vector3;

/// Format a number the way the skeleton format expects: fixed notation, six decimals
pub fn format_number(value: f32) -> String {
    format!("{value:.6}")
}

/// XML writer errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum XmlError {
    #[error("Failed to write XML: {0}")]
    Write(String),
    #[error("Attribute '{0}' written outside of a start tag")]
    AttributeOutsideStartTag(String),
    #[error("end_element called with no open element")]
    Unbalanced,
    #[error("Document finished with {0} unclosed element(s)")]
    UnclosedElements(usize),
}

pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl<W: Write> XmlWriter<W> {
    /// Create an indented writer
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            pending: None,
            open: Vec::new(),
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn write_declaration(&mut self) -> Result<(), XmlError> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
    }

    pub fn start_element(&mut self, name: &str) -> Result<(), XmlError> {
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(())
    }

    pub fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), XmlError> {
        let start = self
            .pending
            .as_mut()
            .ok_or_else(|| XmlError::AttributeOutsideStartTag(name.to_string()))?;
        start.push_attribute((name, value));
        Ok(())
    }

    /// Write `<name>text</name>` as a child of the current element
    pub fn write_element(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        self.flush_pending()?;
        self.emit(Event::Start(BytesStart::new(name)))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.emit(Event::End(BytesEnd::new(name)))
    }

    /// Write the X/Y/Z components of a vector as child elements
    pub fn write_vector(&mut self, v: &Vector3) -> Result<(), XmlError> {
        self.write_element("X", &format_number(v.x))?;
        self.write_element("Y", &format_number(v.y))?;
        self.write_element("Z", &format_number(v.z))
    }

    pub fn end_element(&mut self) -> Result<(), XmlError> {
        let name = self.open.pop().ok_or(XmlError::Unbalanced)?;
        match self.pending.take() {
            Some(start) => self.emit(Event::Empty(start)),
            None => self.emit(Event::End(BytesEnd::new(name))),
        }
    }

    /// Finish the document, returning the underlying sink
    pub fn finish(self) -> Result<W, XmlError> {
        if !self.open.is_empty() {
            return Err(XmlError::UnclosedElements(self.open.len()));
        }
        Ok(self.writer.into_inner())
    }

    fn flush_pending(&mut self) -> Result<(), XmlError> {
        match self.pending.take() {
            Some(start) => self.emit(Event::Start(start)),
            None => Ok(()),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), XmlError> {
        self.writer
            .write_event(event)
            .map_err(|e| XmlError::Write(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut XmlWriter<Vec<u8>>) -> Result<(), XmlError>) -> String {
        let mut writer = XmlWriter::new(Vec::new());
        f(&mut writer).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_format_number_is_fixed_notation() {
        assert_eq!(format_number(-45.0), "-45.000000");
        assert_eq!(format_number(0.125), "0.125000");
        assert!(!format_number(f32::MAX).contains('e'));
    }

    #[test]
    fn test_vector_with_attribute() {
        let xml = render(|w| {
            w.start_element("BXDVector3")?;
            w.write_attribute("VectorID", "Axis")?;
            w.write_vector(&Vector3::Z)?;
            w.end_element()
        });

        assert!(xml.contains(r#"<BXDVector3 VectorID="Axis">"#));
        assert!(xml.contains("<Z>1.000000</Z>"));
        assert!(xml.trim_end().ends_with("</BXDVector3>"));
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let xml = render(|w| {
            w.start_element("Nodes")?;
            w.end_element()
        });
        assert_eq!(xml.trim(), "<Nodes/>");
    }

    #[test]
    fn test_depth_tracking() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_element("A").unwrap();
        w.start_element("B").unwrap();
        assert_eq!(w.depth(), 2);
        w.end_element().unwrap();
        w.end_element().unwrap();
        assert_eq!(w.depth(), 0);
        assert!(matches!(w.end_element(), Err(XmlError::Unbalanced)));
    }

    #[test]
    fn test_finish_rejects_open_elements() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_element("A").unwrap();
        assert!(matches!(w.finish(), Err(XmlError::UnclosedElements(1))));
    }

    #[test]
    fn test_attribute_requires_start_tag() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_element("A").unwrap();
        w.write_element("B", "text").unwrap();
        assert!(matches!(
            w.write_attribute("late", "1"),
            Err(XmlError::AttributeOutsideStartTag(_))
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(|w| w.write_element("ModelID", "a<b"));
        assert!(xml.contains("a&lt;b"));
    }
}
