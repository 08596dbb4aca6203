use std::io::BufRead;
use std::mem;

use super::ExtractError;
use crate::models::{Block, TypeFilter};

/// Fence marker detection for the line-oriented pipeline.
pub struct Fence;

impl Fence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Whether the first three characters of a line are a fence marker.
    pub fn is_fence(line: &str) -> bool {
        line.starts_with(Self::BACKTICKS) || line.starts_with(Self::TILDES)
    }

    /// Type tag declared on an opening fence line: the remainder after the
    /// marker, stripped of any further marker characters and whitespace.
    pub fn type_tag(line: &str) -> &str {
        line[Self::BACKTICKS.len()..]
            .trim_start_matches(['`', '~'])
            .trim()
    }
}

/// Pull-based fence-line extractor over a line-oriented document.
///
/// Fence lines toggle capture state; lines inside a kept block accumulate
/// verbatim (terminators included) and are emitted as one [`Block`] when the
/// closing fence is reached. A block still open at end of input is flushed
/// with whatever text accumulated.
pub struct MarkdownBlocks<R: BufRead> {
    reader: R,
    source: String,
    filter: TypeFilter,
    line: u32,
    inside: bool,
    keep: bool,
    type_tag: String,
    text: String,
    done: bool,
}

impl<R: BufRead> MarkdownBlocks<R> {
    pub fn new(reader: R, source: impl Into<String>, filter: TypeFilter) -> Self {
        Self {
            reader,
            source: source.into(),
            filter,
            line: 0,
            inside: false,
            keep: true,
            type_tag: String::new(),
            text: String::new(),
            done: false,
        }
    }

    fn take_block(&mut self) -> Block {
        let mut block = Block::new(
            self.source.clone(),
            self.line,
            0,
            mem::take(&mut self.type_tag),
        );
        block.text = mem::take(&mut self.text);
        block
    }
}

impl<R: BufRead> Iterator for MarkdownBlocks<R> {
    type Item = Result<Block, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = String::new();
        loop {
            buf.clear();
            match self.reader.read_line(&mut buf) {
                Err(e) => {
                    self.done = true;
                    return Some(Err(ExtractError::Io(e)));
                }
                Ok(0) => {
                    // End of input: flush an unterminated block exactly once.
                    self.done = true;
                    if !self.text.is_empty() {
                        return Some(Ok(self.take_block()));
                    }
                    return None;
                }
                Ok(_) => {}
            }
            self.line += 1;

            if Fence::is_fence(&buf) {
                self.inside = !self.inside;
                if self.inside {
                    self.type_tag = Fence::type_tag(&buf).to_string();
                    self.keep = self.filter.matches(&self.type_tag);
                } else if !self.text.is_empty() {
                    return Some(Ok(self.take_block()));
                } else {
                    self.type_tag.clear();
                }
            } else if self.inside && self.keep {
                self.text.push_str(&buf);
            }
        }
    }
}
