use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::ExtractError;
use crate::models::{Block, TypeFilter};

/// Element names whose character content is captured.
const CAPTURABLE: [&[u8]; 2] = [b"sourcecode", b"artwork"];

/// Pull-based extractor for the markup-tag pipeline.
///
/// The document is scanned in one forward pass with quick-xml's event
/// reader. Blocks completed before a malformed-markup point are still
/// yielded; the parse failure follows them as the final item.
pub struct XmlBlocks {
    items: std::vec::IntoIter<Result<Block, ExtractError>>,
}

impl XmlBlocks {
    pub fn new(content: String, source: &str, filter: &TypeFilter) -> Self {
        Self {
            items: scan(&content, source, filter).into_iter(),
        }
    }
}

impl Iterator for XmlBlocks {
    type Item = Result<Block, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

/// Maps byte offsets in a document to 1-based line and 0-based column.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(offset + 1);
            }
        }
        Self { starts }
    }

    fn locate(&self, offset: usize) -> (u32, u32) {
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        (line as u32 + 1, (offset - self.starts[line]) as u32)
    }
}

fn scan(content: &str, source: &str, filter: &TypeFilter) -> Vec<Result<Block, ExtractError>> {
    let index = LineIndex::new(content);
    let mut reader = Reader::from_str(content);
    let mut out = Vec::new();
    // The block currently accumulating character data, if any. Any element
    // end closes it; nesting of capturable elements is not supported.
    let mut current: Option<Block> = None;

    loop {
        let at = reader.buffer_position() as usize;
        match reader.read_event() {
            Err(e) => {
                out.push(Err(ExtractError::Xml(e)));
                break;
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                if CAPTURABLE.contains(&e.name().as_ref()) {
                    match block_type(&e) {
                        Ok(type_tag) => {
                            if filter.matches(&type_tag) {
                                let (line, column) = index.locate(at);
                                current = Some(Block::new(source, line, column, type_tag));
                            }
                        }
                        Err(e) => {
                            out.push(Err(e));
                            break;
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                if let Some(block) = current.take() {
                    out.push(Ok(block));
                }
            }
            Ok(Event::Empty(e)) => {
                // A self-closing element is an element start followed
                // immediately by an element end.
                if CAPTURABLE.contains(&e.name().as_ref()) {
                    match block_type(&e) {
                        Ok(type_tag) => {
                            if filter.matches(&type_tag) {
                                let (line, column) = index.locate(at);
                                current = Some(Block::new(source, line, column, type_tag));
                            }
                        }
                        Err(e) => {
                            out.push(Err(e));
                            break;
                        }
                    }
                }
                if let Some(block) = current.take() {
                    out.push(Ok(block));
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(block) = current.as_mut() {
                    match t.unescape() {
                        Ok(text) => block.append(&text),
                        Err(e) => {
                            out.push(Err(ExtractError::Xml(quick_xml::Error::from(e))));
                            break;
                        }
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(block) = current.as_mut() {
                    block.append(&String::from_utf8_lossy(&t));
                }
            }
            Ok(_) => {}
        }
    }
    out
}

/// Value of the `type` attribute, or an empty string when absent.
fn block_type(e: &BytesStart<'_>) -> Result<String, ExtractError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"type" {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            return Ok(value.into_owned());
        }
    }
    Ok(String::new())
}
