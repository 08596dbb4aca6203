use std::fmt;

/// One extracted region of text with its position and type metadata.
///
/// A block is created when a capturable region opens, grows by appends while
/// the region is open, and is frozen once the producing pipeline hands it to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Verbatim captured content, including interior newlines.
    pub text: String,
    /// Originating document: a file path, or `-` for standard input.
    pub source: String,
    /// Position of the start of the captured region. The XML pipeline
    /// reports the parser's line (1-based); the markdown pipeline reports
    /// the line at emission.
    pub line: u32,
    /// Byte column of the region start. Always 0 for the markdown pipeline,
    /// which has no column concept.
    pub column: u32,
    /// Declared type of the block, empty when the source declared none.
    pub type_tag: String,
}

impl Block {
    pub fn new(source: impl Into<String>, line: u32, column: u32, type_tag: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            source: source.into(),
            line,
            column,
            type_tag: type_tag.into(),
        }
    }

    /// Append a run of character data to the block, preserving it exactly.
    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
