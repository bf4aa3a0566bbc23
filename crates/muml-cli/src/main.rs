#![doc = include_str!("../README.md")]
//! Disambiguation: a first argument naming a subcommand (`tokens`, `tree`)
//! selects subcommand mode; anything else is an input file, with `-` for
//! stdin.

use std::io::{self, Read, Write};

use facet::Facet;
use figue as args;
use muml_format::{FormatOptions, MumlWriter, TextType};
use muml_parse::{Diagnostic, SourceErrors};
use muml_tokenizer::Tokenizer;
use muml_tree::{Document, Element};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_USAGE_ERROR: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON serialisation recurses, so deeper trees are refused.
const MAX_JSON_DEPTH: usize = 512;

const SUBCOMMANDS: [&str; 2] = ["tokens", "tree"];

const STYLES: [(&str, TextType); 6] = [
    ("double", TextType::DoubleQuote),
    ("single", TextType::SingleQuote),
    ("backtick", TextType::Backtick),
    ("double-fence", TextType::DoubleQuoteFence),
    ("single-fence", TextType::SingleQuoteFence),
    ("backtick-fence", TextType::BacktickFence),
];

// ============================================================================
// CLI argument structures
// ============================================================================

/// File mode arguments: `muml <file> [options]`
#[derive(Facet, Debug, Default)]
struct FileArgs {
    /// Input file path (or "-" for stdin)
    #[facet(args::positional)]
    input: String,

    /// Write the formatted document to a file instead of stdout
    #[facet(args::named, args::short = 'o', default)]
    output: Option<String>,

    /// Everything on one line
    #[facet(args::named, default)]
    compact: bool,

    /// Shortest output that reads back to the same document
    #[facet(args::named, default)]
    minimize: bool,

    /// Quoting style for strings that are not identifiers
    #[facet(args::named, default)]
    style: Option<String>,

    /// Only report syntax errors
    #[facet(args::named, default)]
    check: bool,
}

/// Top-level CLI with a subcommand
#[derive(Facet, Debug)]
struct Args {
    #[facet(args::subcommand, default)]
    command: Option<Command>,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum Command {
    /// Print one token per line
    Tokens {
        #[facet(args::positional)]
        file: String,
    },

    /// Print the document tree as JSON
    Tree {
        #[facet(args::positional)]
        file: String,

        /// Single-line JSON
        #[facet(args::named, default)]
        compact: bool,
    },
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    init_tracing();
    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    let Some(first) = raw_args.first() else {
        print_help();
        std::process::exit(EXIT_SUCCESS);
    };
    match first.as_str() {
        "--help" | "-h" => {
            print_help();
            std::process::exit(EXIT_SUCCESS);
        }
        "--version" | "-V" => {
            println!("muml {VERSION}");
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    let result = if is_subcommand(first) {
        run_subcommand_mode(&raw_args)
    } else {
        run_file_mode(&raw_args)
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MUML_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn is_subcommand(arg: &str) -> bool {
    SUBCOMMANDS.contains(&arg)
}

fn print_help() {
    eprintln!("muml {VERSION} - check, format and inspect Muml documents\n");
    eprintln!("USAGE:");
    eprintln!("    muml <file> [options]           Format a file ('-' reads stdin)");
    eprintln!("    muml <command> <file>           Run a subcommand\n");
    eprintln!("FILE MODE OPTIONS:");
    eprintln!("    -o, --output <FILE>             Write to a file instead of stdout");
    eprintln!("        --compact                   Everything on one line");
    eprintln!("        --minimize                  Shortest equivalent output");
    eprintln!("        --style <STYLE>             double, single, backtick, double-fence,");
    eprintln!("                                    single-fence or backtick-fence");
    eprintln!("        --check                     Only report syntax errors\n");
    eprintln!("SUBCOMMANDS:");
    eprintln!("    tokens <file>                   Print one token per line");
    eprintln!("    tree <file> [--compact]         Print the document tree as JSON\n");
    eprintln!("ENVIRONMENT:");
    eprintln!("    MUML_LOG                        Log filter, e.g. muml_parse=trace");
}

fn run_file_mode(args: &[String]) -> Result<(), CliError> {
    let args_strs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let opts: FileArgs =
        figue::from_slice(&args_strs).map_err(|e| CliError::Usage(e.to_string()))?;
    let options = format_options(&opts)?;

    let input = read_input(&opts.input)?;
    let document = muml_parse::parse_named(input.filename.clone(), &input.source);
    report_errors(&document.errors, &input)?;
    if opts.check {
        return Ok(());
    }

    debug!("Formatting {} with {:?}", input.filename, options);
    let mut writer = MumlWriter::new(options);
    writer.write_document(&document);
    let mut output = writer.finish();
    if !output.ends_with('\n') {
        output.push('\n');
    }

    match &opts.output {
        Some(path) => write_output(path, &output)?,
        None => io::stdout().write_all(output.as_bytes())?,
    }
    Ok(())
}

fn run_subcommand_mode(args: &[String]) -> Result<(), CliError> {
    let args_strs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let parsed: Args =
        figue::from_slice(&args_strs).map_err(|e| CliError::Usage(e.to_string()))?;

    match parsed.command {
        Some(Command::Tokens { file }) => run_tokens(&file),
        Some(Command::Tree { file, compact }) => run_tree(&file, compact),
        None => {
            print_help();
            Ok(())
        }
    }
}

fn run_tokens(file: &str) -> Result<(), CliError> {
    let input = read_input(file)?;
    let mut tokenizer = Tokenizer::new(&input.source).with_file_name(input.filename.clone());
    let mut out = io::stdout().lock();
    while let Some(token) = tokenizer.next_token() {
        writeln!(out, "{token}")?;
    }
    report_errors(tokenizer.errors(), &input)
}

fn run_tree(file: &str, compact: bool) -> Result<(), CliError> {
    let input = read_input(file)?;
    let document = muml_parse::parse_named(input.filename.clone(), &input.source);

    let depth = document.depth();
    if depth > MAX_JSON_DEPTH {
        return Err(CliError::Usage(format!(
            "document nests {depth} levels deep, JSON output supports at most {MAX_JSON_DEPTH}"
        )));
    }

    let json = document_to_json(&document);
    let output = if compact {
        serde_json::to_string(&json)
    } else {
        serde_json::to_string_pretty(&json)
    }
    .map_err(|e| CliError::Io(io::Error::other(e)))?;
    println!("{output}");
    report_errors(&document.errors, &input)
}

// ============================================================================
// Input, output and diagnostics
// ============================================================================

struct Input {
    source: String,
    filename: String,
}

fn read_input(file: &str) -> Result<Input, CliError> {
    if file == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok(Input {
            source,
            filename: "<stdin>".to_string(),
        });
    }
    Ok(Input {
        source: std::fs::read_to_string(file)?,
        filename: file.to_string(),
    })
}

fn write_output(path: &str, content: &str) -> Result<(), io::Error> {
    if path == "-" {
        io::stdout().write_all(content.as_bytes())
    } else {
        std::fs::write(path, content)
    }
}

/// Render every error with source context on stderr.
fn report_errors(errors: &SourceErrors, input: &Input) -> Result<(), CliError> {
    if errors.is_empty() {
        return Ok(());
    }
    let mut stderr = io::stderr().lock();
    for error in errors.iter() {
        Diagnostic::from(error).write_report(&input.filename, &input.source, &mut stderr)?;
    }
    Err(CliError::Syntax {
        filename: input.filename.clone(),
        count: errors.len(),
    })
}

fn format_options(opts: &FileArgs) -> Result<FormatOptions, CliError> {
    let options = match (opts.compact, opts.minimize) {
        (true, true) => {
            return Err(CliError::Usage(
                "--compact and --minimize cannot be combined".into(),
            ));
        }
        (true, false) => FormatOptions::condensed(),
        (false, true) => FormatOptions::minimized(),
        (false, false) => FormatOptions::default(),
    };
    match &opts.style {
        Some(style) => Ok(options.prefer(parse_style(style)?)),
        None => Ok(options),
    }
}

fn parse_style(style: &str) -> Result<TextType, CliError> {
    STYLES
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, text_type)| *text_type)
        .ok_or_else(|| {
            let names: Vec<&str> = STYLES.iter().map(|(name, _)| *name).collect();
            CliError::Usage(format!(
                "unknown style '{style}', expected one of: {}",
                names.join(", ")
            ))
        })
}

// ============================================================================
// JSON tree dump
// ============================================================================

fn document_to_json(document: &Document) -> serde_json::Value {
    json!({
        "text": document.text,
        "values": document.values,
        "members": document.members.iter().map(element_to_json).collect::<Vec<_>>(),
        "errors": document.errors.to_strings(),
    })
}

fn element_to_json(element: &Element) -> serde_json::Value {
    let attributes: Vec<_> = element
        .attributes
        .iter()
        .map(|a| json!({ "name": a.name, "value": a.value }))
        .collect();
    json!({
        "name": element.name,
        "span": element.span.map(|span| span.to_string()),
        "text": element.text,
        "values": element.values,
        "attributes": attributes,
        "members": element.members.iter().map(element_to_json).collect::<Vec<_>>(),
    })
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Syntax { filename: String, count: usize },
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Syntax { .. } => EXIT_SYNTAX_ERROR,
            CliError::Usage(_) => EXIT_USAGE_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Syntax { filename, count } => {
                let noun = if *count == 1 { "error" } else { "errors" };
                write!(f, "{filename}: {count} syntax {noun}")
            }
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
