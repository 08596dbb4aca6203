use anyhow::Result;
use codeblocks_config::Config;
use codeblocks_engine::{Block, TypeFilter, extract};
use std::io::Write;
use std::{env, process};

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    files: Vec<String>,
    types: Vec<String>,
    ext: Option<String>,
}

/// Parse the raw argument list. `None` means the caller should print usage.
fn parse_args(argv: &[String]) -> Option<Args> {
    let mut args = Args::default();
    let mut iter = argv.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-t" => {
                let list = iter.next()?;
                args.types
                    .extend(list.split(',').map(|t| t.trim().to_string()));
            }
            "-x" => {
                args.ext = Some(iter.next()?.trim().to_string());
            }
            "-" => args.files.push("-".to_string()),
            flag if flag.starts_with('-') => return None,
            file => args.files.push(file.to_string()),
        }
    }

    if args.files.is_empty() {
        return None;
    }
    Some(args)
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [-t <types...>] [-x <md|xml>] file...");
    process::exit(2);
}

/// Header plus block text with each line indented by four spaces, followed
/// by a blank line.
fn render_block(block: &Block) -> String {
    format!(
        "{}:{}:{}:{}\n    {}\n\n",
        block.source,
        block.line,
        block.column,
        block.type_tag,
        block.text.replace('\n', "\n    "),
    )
}

/// Extract and print all matching blocks from one file. Returns whether any
/// block was found.
fn run_file(
    source: &str,
    filter: &TypeFilter,
    ext: Option<&str>,
    out: &mut impl Write,
) -> Result<bool> {
    let mut found = false;
    for item in extract(source, filter, ext)? {
        let block = item?;
        out.write_all(render_block(&block).as_bytes())?;
        found = true;
    }
    Ok(found)
}

fn default_types() -> Vec<String> {
    match Config::load() {
        Ok(Some(config)) => config.default_types,
        Ok(None) => Vec::new(),
        Err(e) => {
            eprintln!("Warning: ignoring config file: {e}");
            Vec::new()
        }
    }
}

fn main() {
    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("codeblocks");
    let Some(args) = parse_args(&argv[1..]) else {
        usage(program);
    };

    let types = if args.types.is_empty() {
        default_types()
    } else {
        args.types
    };
    let filter: TypeFilter = types.iter().collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for file in &args.files {
        match run_file(file, &filter, args.ext.as_deref(), &mut out) {
            Ok(true) => {}
            Ok(false) => println!("{file}: no blocks found"),
            Err(e) => {
                eprintln!("{file}: {e}");
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_files_and_flags() {
        let args = parse_args(&argv(&["-t", "c,go", "-x", "md", "a.md", "b.xml"])).unwrap();
        assert_eq!(args.files, vec!["a.md", "b.xml"]);
        assert_eq!(args.types, vec!["c", "go"]);
        assert_eq!(args.ext.as_deref(), Some("md"));
    }

    #[test]
    fn type_list_is_whitespace_trimmed() {
        let args = parse_args(&argv(&["-t", " c , go ", "a.md"])).unwrap();
        assert_eq!(args.types, vec!["c", "go"]);
    }

    #[test]
    fn repeated_type_flags_accumulate() {
        let args = parse_args(&argv(&["-t", "c", "-t", "go", "a.md"])).unwrap();
        assert_eq!(args.types, vec!["c", "go"]);
    }

    #[test]
    fn dash_is_a_file_argument() {
        let args = parse_args(&argv(&["-"])).unwrap();
        assert_eq!(args.files, vec!["-"]);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert_eq!(parse_args(&argv(&["--help", "a.md"])), None);
    }

    #[test]
    fn no_files_is_rejected() {
        assert_eq!(parse_args(&argv(&["-t", "c"])), None);
        assert_eq!(parse_args(&argv(&[])), None);
    }

    #[test]
    fn flag_without_value_is_rejected() {
        assert_eq!(parse_args(&argv(&["a.md", "-t"])), None);
    }

    #[test]
    fn rendering_indents_every_line() {
        let mut block = Block::new("doc.md", 3, 0, "python");
        block.append("print(1)\n");
        assert_eq!(
            render_block(&block),
            "doc.md:3:0:python\n    print(1)\n    \n\n"
        );
    }

    #[test]
    fn rendering_handles_multi_line_blocks() {
        let mut block = Block::new("doc.xml", 2, 4, "c");
        block.append("int x;\nint y;");
        assert_eq!(
            render_block(&block),
            "doc.xml:2:4:c\n    int x;\n    int y;\n\n"
        );
    }

    #[test]
    fn run_file_writes_blocks_and_reports_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "```python\nprint(1)\n```\n").unwrap();
        let path = path.to_str().unwrap();

        let mut out = Vec::new();
        let found = run_file(path, &TypeFilter::any(), None, &mut out).unwrap();

        assert!(found);
        let expected = format!("{path}:3:0:python\n    print(1)\n    \n\n");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn run_file_reports_nothing_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "no fences here\n").unwrap();

        let mut out = Vec::new();
        let found = run_file(path.to_str().unwrap(), &TypeFilter::any(), None, &mut out).unwrap();

        assert!(!found);
        assert!(out.is_empty());
    }

    #[test]
    fn run_file_surfaces_unsupported_extension() {
        let mut out = Vec::new();
        let result = run_file("notes.txt", &TypeFilter::any(), None, &mut out);
        assert!(result.is_err());
    }
}
