//! Small wrapper over the quick-xml writer used by the descriptor emitters

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Result, SqlGenError};

pub(crate) struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    /// Start a document with an XML declaration and two-space indentation
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(SqlGenError::xml)?;
        Ok(Self { writer })
    }

    pub(crate) fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.writer
            .write_event(Event::Start(start))
            .map_err(SqlGenError::xml)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(SqlGenError::xml)
    }

    /// `<name attr="..." />`
    pub(crate) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.writer
            .write_event(Event::Empty(start))
            .map_err(SqlGenError::xml)
    }

    /// `<name>value</name>`
    pub(crate) fn element(&mut self, name: &str, value: &str) -> Result<()> {
        self.element_with(name, &[], value)
    }

    pub(crate) fn element_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        value: &str,
    ) -> Result<()> {
        self.start(name, attributes)?;
        self.writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(SqlGenError::xml)?;
        self.end(name)
    }

    pub(crate) fn finish(self) -> Result<String> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(SqlGenError::xml)
    }
}

/// MSBuild-style boolean text
pub(crate) fn msbuild_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
