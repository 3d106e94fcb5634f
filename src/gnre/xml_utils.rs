use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::{Decimal, RoundingStrategy};
use std::borrow::Cow;
use std::io::Cursor;

use crate::core::GnreError;

fn xml_io(e: std::io::Error) -> GnreError {
    GnreError::Xml(e.to_string())
}

/// Indenting writer for guide fragments.
///
/// Free text goes through [`XmlWriter::text_element`] and is escaped;
/// codes, digit strings and amounts go through
/// [`XmlWriter::code_element`] and are written verbatim.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// Start a fragment: no XML declaration, two-space indentation.
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    pub fn into_string(self) -> Result<String, GnreError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| GnreError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, GnreError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, GnreError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, GnreError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    fn raw_text(&mut self, text: Cow<'_, str>) -> Result<(), GnreError> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(text)))
            .map_err(xml_io)
    }

    /// Element with escaped, trimmed free text (names, addresses).
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, GnreError> {
        self.start_element(name)?;
        self.raw_text(escape_text(text))?;
        self.end_element(name)
    }

    /// Element with a pre-sanitized code written as-is.
    pub fn code_element(&mut self, name: &str, code: &str) -> Result<&mut Self, GnreError> {
        self.code_element_with_attrs(name, code, &[])
    }

    pub fn code_element_with_attrs(
        &mut self,
        name: &str,
        code: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, GnreError> {
        self.start_element_with_attrs(name, attrs)?;
        self.raw_text(Cow::Borrowed(code))?;
        self.end_element(name)
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape the five XML-reserved characters after trimming.
///
/// ```
/// use gnre_batch::gnre::escape_text;
///
/// assert_eq!(escape_text(" A & B <C> \"D\" 'E' "), "A &amp; B &lt;C&gt; &quot;D&quot; &apos;E&apos;");
/// ```
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text.trim())
}

/// Round half away from zero to cents and always print two decimals.
///
/// ```
/// use gnre_batch::gnre::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(150)), "150.00");
/// assert_eq!(format_amount(dec!(10.005)), "10.01");
/// ```
pub fn format_amount(d: Decimal) -> String {
    round_cents(d).to_string()
}

/// Amount rounded to two decimals with scale fixed at 2.
pub fn round_cents(d: Decimal) -> Decimal {
    let mut rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
