pub mod markdown;
pub mod xml;

use std::io::BufRead;

use crate::io::{open_source, read_source};
use crate::models::{Block, TypeFilter};

pub use markdown::MarkdownBlocks;
pub use xml::XmlBlocks;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("cannot infer a file type for '{0}': no extension")]
    MissingExtension(String),
    #[error("file type '{0}' not supported")]
    UnsupportedType(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// The document kinds the extractor knows how to scan.
///
/// Dispatch is a closed enum rather than open-ended string matching so the
/// unsupported-extension failure is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Markdown,
    Xml,
}

impl DocKind {
    /// Map a file extension (case-insensitive) to a pipeline.
    pub fn from_ext(ext: &str) -> Result<Self, ExtractError> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "mkd" => Ok(Self::Markdown),
            "xml" => Ok(Self::Xml),
            other => Err(ExtractError::UnsupportedType(other.to_string())),
        }
    }

    /// Resolve the pipeline for a source, preferring an explicit extension
    /// over the one inferred from the source identifier.
    pub fn resolve(source: &str, ext: Option<&str>) -> Result<Self, ExtractError> {
        match ext.filter(|e| !e.is_empty()) {
            Some(ext) => Self::from_ext(ext),
            None => {
                let (_, inferred) = source
                    .rsplit_once('.')
                    .ok_or_else(|| ExtractError::MissingExtension(source.to_string()))?;
                Self::from_ext(inferred)
            }
        }
    }
}

/// Lazy sequence of blocks from one document, whichever pipeline produced it.
pub enum Blocks {
    Markdown(MarkdownBlocks<Box<dyn BufRead>>),
    Xml(XmlBlocks),
}

impl Iterator for Blocks {
    type Item = Result<Block, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Blocks::Markdown(blocks) => blocks.next(),
            Blocks::Xml(blocks) => blocks.next(),
        }
    }
}

/// Extract sourcecode or artwork blocks from a document.
///
/// `source` is a file path or `-` for standard input. `filter` holds the
/// type tags to keep; an empty filter captures all blocks. `ext` overrides
/// the extension inferred from `source`.
///
/// The pipeline is chosen before any document access, so an unsupported
/// extension fails without touching the file.
pub fn extract(
    source: &str,
    filter: &TypeFilter,
    ext: Option<&str>,
) -> Result<Blocks, ExtractError> {
    match DocKind::resolve(source, ext)? {
        DocKind::Markdown => {
            let reader = open_source(source)?;
            Ok(Blocks::Markdown(MarkdownBlocks::new(
                reader,
                source,
                filter.clone(),
            )))
        }
        DocKind::Xml => {
            let content = read_source(source)?;
            Ok(Blocks::Xml(XmlBlocks::new(content, source, filter)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("md", DocKind::Markdown)]
    #[case("mkd", DocKind::Markdown)]
    #[case("xml", DocKind::Xml)]
    #[case("XML", DocKind::Xml)]
    #[case("Md", DocKind::Markdown)]
    fn known_extensions_resolve(#[case] ext: &str, #[case] expected: DocKind) {
        assert_eq!(DocKind::from_ext(ext).unwrap(), expected);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let result = DocKind::from_ext("txt");
        assert!(matches!(result, Err(ExtractError::UnsupportedType(ext)) if ext == "txt"));
    }

    #[test]
    fn explicit_extension_wins_over_filename() {
        let kind = DocKind::resolve("notes.md", Some("xml")).unwrap();
        assert_eq!(kind, DocKind::Xml);
    }

    #[test]
    fn empty_explicit_extension_falls_back_to_filename() {
        let kind = DocKind::resolve("notes.md", Some("")).unwrap();
        assert_eq!(kind, DocKind::Markdown);
    }

    #[test]
    fn extension_inferred_from_last_dot() {
        let kind = DocKind::resolve("draft.v2.xml", None).unwrap();
        assert_eq!(kind, DocKind::Xml);
    }

    #[test]
    fn source_without_extension_is_rejected() {
        let result = DocKind::resolve("-", None);
        assert!(matches!(result, Err(ExtractError::MissingExtension(_))));
    }

    #[test]
    fn unsupported_extension_fails_before_file_access() {
        // The path does not exist; dispatch must fail on the extension, not
        // on the missing file.
        let result = extract("/no/such/file.txt", &TypeFilter::any(), None);
        assert!(matches!(result, Err(ExtractError::UnsupportedType(_))));
    }
}
