//! laxml CLI - Parse, check, and round-trip XML-ish documents
//!
//! Usage:
//!   lxcli [OPTIONS] <FILE>
//!
//! Commands:
//!   parse      Parse and display document structure (default)
//!   validate   Report unopened/unclosed tags
//!   roundtrip  Verify byte-exact reconstruction

use std::env;
use std::fs;
use std::process;

use laxml_core::{parse, AttrValue, Document, Element, Pos, PosSpan};
use serde::Serialize;

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    }
}

fn run(args: &[String]) -> Result<i32, String> {
    let config = parse_args(args)?;

    let input = fs::read_to_string(&config.file)
        .map_err(|e| format!("failed to read '{}': {}", config.file, e))?;

    let document = parse(&input);

    match config.command {
        Command::Parse => cmd_parse(&document, &config),
        Command::Validate => cmd_validate(&document, &config),
        Command::Roundtrip => cmd_roundtrip(&document, &input, &config),
    }
}

#[derive(Debug)]
struct Config {
    command: Command,
    file: String,
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Parse,
    Validate,
    Roundtrip,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut command = Command::Parse;
    let mut format = OutputFormat::Text;
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "parse" if file.is_none() => command = Command::Parse,
            "validate" if file.is_none() => command = Command::Validate,
            "roundtrip" if file.is_none() => command = Command::Roundtrip,
            "--format" | "-f" => {
                i += 1;
                match args.get(i).map(String::as_str) {
                    Some("text") => format = OutputFormat::Text,
                    Some("json") => format = OutputFormat::Json,
                    other => return Err(format!("unknown format: {:?}", other)),
                }
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            arg if !arg.starts_with('-') => file = Some(arg.to_string()),
            arg => return Err(format!("unknown option: {}", arg)),
        }
        i += 1;
    }

    let file = file.ok_or("no input file given (try --help)")?;
    Ok(Config {
        command,
        file,
        format,
    })
}

fn print_usage() {
    println!("Usage: lxcli [parse|validate|roundtrip] [--format text|json] <FILE>");
    println!();
    println!("Commands:");
    println!("  parse      Parse and display document structure (default)");
    println!("  validate   Report unopened/unclosed tags; exits 1 if any");
    println!("  roundtrip  Verify byte-exact reconstruction; exits 1 on mismatch");
}

// ============================================================================
// parse
// ============================================================================

#[derive(Serialize)]
struct NodeSummary {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeSummary>,
}

fn summarize(element: &Element<PosSpan<'_>>) -> NodeSummary {
    match element {
        Element::Tag(tag) => NodeSummary {
            kind: "tag",
            name: Some(tag.name().to_string()),
            attrs: tag
                .attrs()
                .iter()
                .map(|a| (a.name().to_string(), render_value(a.value())))
                .collect(),
            children: tag.children.iter().map(summarize).collect(),
        },
        Element::Text(_) => leaf("text"),
        Element::Cdata(_) => leaf("cdata"),
        Element::Comment(_) => leaf("comment"),
        Element::EntityRef(entity) => NodeSummary {
            kind: "entity",
            name: Some(entity.name.value.clone()),
            attrs: Vec::new(),
            children: Vec::new(),
        },
        Element::Pi(pi) => NodeSummary {
            kind: "pi",
            name: Some(pi.name.value.clone()),
            attrs: Vec::new(),
            children: Vec::new(),
        },
        Element::UnopenedTag(closing) => NodeSummary {
            kind: "unopened-tag",
            name: Some(closing.name.value.clone()),
            attrs: Vec::new(),
            children: Vec::new(),
        },
        Element::UnclosedTag(opening) => NodeSummary {
            kind: "unclosed-tag",
            name: Some(opening.name.value.clone()),
            attrs: Vec::new(),
            children: Vec::new(),
        },
    }
}

fn leaf(kind: &'static str) -> NodeSummary {
    NodeSummary {
        kind,
        name: None,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

fn render_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Str(_) => format!("\"{}\"", value.literal()),
        _ => value.literal(),
    }
}

fn cmd_parse(document: &Document<PosSpan<'_>>, config: &Config) -> Result<i32, String> {
    match config.format {
        OutputFormat::Json => {
            let summaries: Vec<NodeSummary> = document.children.iter().map(summarize).collect();
            let json = serde_json::to_string_pretty(&summaries)
                .map_err(|e| format!("failed to serialize: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for child in &document.children {
                print_tree(child, 0);
            }
        }
    }
    Ok(0)
}

fn print_tree(element: &Element<PosSpan<'_>>, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        Element::Tag(tag) => {
            let attrs: Vec<String> = tag
                .attrs()
                .iter()
                .map(|a| format!("{}={}", a.name(), render_value(a.value())))
                .collect();
            if attrs.is_empty() {
                println!("{}<{}>", indent, tag.name());
            } else {
                println!("{}<{} {}>", indent, tag.name(), attrs.join(" "));
            }
            for child in &tag.children {
                print_tree(child, depth + 1);
            }
        }
        Element::Text(t) => println!("{}text {:?}", indent, t.value),
        Element::Cdata(t) => println!("{}cdata {:?}", indent, t.value),
        Element::Comment(t) => println!("{}comment {:?}", indent, t.value),
        Element::EntityRef(entity) => println!("{}entity &{};", indent, entity.name.value),
        Element::Pi(pi) => println!("{}pi <?{}?>", indent, pi.name.value),
        Element::UnopenedTag(closing) => println!("{}UNOPENED </{}>", indent, closing.name.value),
        Element::UnclosedTag(opening) => println!("{}UNCLOSED <{}>", indent, opening.name.value),
    }
}

// ============================================================================
// validate
// ============================================================================

#[derive(Serialize)]
struct Issue {
    kind: &'static str,
    name: String,
    line: u32,
    column: u32,
}

fn issue_at(kind: &'static str, name: &str, pos: Pos) -> Issue {
    Issue {
        kind,
        name: name.to_string(),
        line: pos.line,
        column: pos.column,
    }
}

fn collect_issues(document: &Document<PosSpan<'_>>) -> Vec<Issue> {
    document
        .invalid_tags()
        .into_iter()
        .filter_map(|element| match element {
            Element::UnopenedTag(closing) => Some(issue_at(
                "unopened-tag",
                &closing.name.value,
                closing.open.span.start,
            )),
            Element::UnclosedTag(opening) => Some(issue_at(
                "unclosed-tag",
                &opening.name.value,
                opening.open.span.start,
            )),
            _ => None,
        })
        .collect()
}

fn cmd_validate(document: &Document<PosSpan<'_>>, config: &Config) -> Result<i32, String> {
    let issues = collect_issues(document);

    match config.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&issues)
                .map_err(|e| format!("failed to serialize: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for issue in &issues {
                println!(
                    "{}:{}: {} '{}'",
                    issue.line, issue.column, issue.kind, issue.name
                );
            }
            println!("{} issue(s)", issues.len());
        }
    }

    Ok(if issues.is_empty() { 0 } else { 1 })
}

// ============================================================================
// roundtrip
// ============================================================================

#[derive(Serialize)]
struct RoundtripReport {
    input_bytes: usize,
    output_bytes: usize,
    exact: bool,
}

fn cmd_roundtrip(
    document: &Document<PosSpan<'_>>,
    input: &str,
    config: &Config,
) -> Result<i32, String> {
    let rendered = document.raw_xml();
    let report = RoundtripReport {
        input_bytes: input.len(),
        output_bytes: rendered.len(),
        exact: rendered == input,
    };

    match config.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("failed to serialize: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if report.exact {
                println!("roundtrip exact ({} bytes)", report.input_bytes);
            } else {
                println!(
                    "roundtrip MISMATCH: {} bytes in, {} bytes out",
                    report.input_bytes, report.output_bytes
                );
            }
        }
    }

    Ok(if report.exact { 0 } else { 1 })
}
