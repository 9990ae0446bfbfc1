// Command-line interface for quill
//
// This binary provides commands for converting, classifying and inspecting
// article bodies written in quill's extended markdown or in HTML.
//
// All the work is done by the quill-babel library; this crate reads input,
// loads configuration, and writes output.
//
// Converting:
//
// The conversion needs a to and from pair. The from is detected from the file extension, and
// when that is not possible (stdin, unknown extension) from the content itself. An explicit
// --from always wins.
// Usage:
//  quill <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  quill convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  quill classify <input>                                                   - Print markdown or html
//  quill normalize <input>                                                  - Repair blank-line tables
//  quill inspect <input> [<transform>]                                      - Print the token stream
//
// Input may be `-` for stdin everywhere.

use quill_cli::transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use quill_babel::{ContentFormat, Pipeline};
use quill_config::{Loader, QuillConfig};
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "classify", "normalize", "inspect", "help"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or '-' for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert article bodies between extended markdown and HTML")
        .long_about(
            "quill converts article bodies between quill's extended markdown and HTML.\n\n\
            Commands:\n  \
            - convert:   Markdown to HTML or HTML to markdown (default command)\n  \
            - classify:  Guess whether a text is markdown or HTML\n  \
            - normalize: Join pipe-table rows separated by blank lines\n  \
            - inspect:   View the token stream of a markdown text\n\n\
            Examples:\n  \
            quill post.md --to html                 # Render to stdout\n  \
            quill post.html --to markdown -o post.md\n  \
            cat body.txt | quill classify -         # Prints 'markdown' or 'html'",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a quill.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline stages to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between markdown and HTML (default command)")
                .long_about(
                    "Convert a document between markdown and HTML.\n\n\
                    Supported formats:\n  \
                    - markdown: extended markdown (.md, .markdown)\n  \
                    - html:     HTML fragment or document (.html, .htm)\n\n\
                    The source format is detected from the file extension, then from the\n\
                    content. Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(input_arg())
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected if not specified)")
                        .value_parser(["markdown", "html"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_parser(["markdown", "html"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("classify")
                .about("Print the detected format: markdown or html")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("normalize")
                .about("Join pipe-table rows separated by blank lines")
                .long_about(
                    "Join pipe-table rows separated by blank lines, leaving everything else\n\
                    (including fenced code) untouched. Output is written to stdout.",
                )
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect the token stream of a markdown text")
                .arg(input_arg())
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'tokens-simple'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // `quill post.md --to html`: a leading path means convert
            if args.len() > 1 && !args[1].starts_with('-') && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_flag("verbose"));

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    let pipeline = Pipeline::new(config.into());

    match matches.subcommand() {
        Some(("convert", sub_matches)) => handle_convert_command(sub_matches, &pipeline),
        Some(("classify", sub_matches)) => {
            let source = read_input(required(sub_matches, "input"));
            println!("{}", pipeline.classify(&source));
        }
        Some(("normalize", sub_matches)) => {
            let source = read_input(required(sub_matches, "input"));
            print!("{}", pipeline.normalize_tables(&source));
        }
        Some(("inspect", sub_matches)) => {
            let source = read_input(required(sub_matches, "input"));
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            let output = transforms::execute_transform(&source, transform, &pipeline)
                .unwrap_or_else(|e| fail(&e));
            print!("{output}");
        }
        _ => fail("Unknown subcommand. Use --help for usage information."),
    }
}

fn handle_convert_command(matches: &ArgMatches, pipeline: &Pipeline) {
    let input = required(matches, "input");
    let to = parse_format(required(matches, "to"));
    let source = read_input(input);

    let from = match matches.get_one::<String>("from") {
        Some(name) => parse_format(name),
        None => ContentFormat::from_filename(input).unwrap_or_else(|| {
            let detected = pipeline.classify(&source);
            tracing::debug!(format = %detected, "detected source format from content");
            detected
        }),
    };

    let result = match (from, to) {
        (ContentFormat::Markdown, ContentFormat::Html) => pipeline.try_markdown_to_html(&source),
        (ContentFormat::Html, ContentFormat::Markdown) => pipeline.try_html_to_markdown(&source),
        _ => {
            tracing::debug!(format = %from, "source and target formats match, copying input");
            Ok(source)
        }
    };
    let converted = result.unwrap_or_else(|e| fail(&e.to_string()));

    match matches.get_one::<String>("output") {
        Some(path) => fs::write(path, converted)
            .unwrap_or_else(|e| fail(&format!("Cannot write file '{path}': {e}"))),
        None => print!("{converted}"),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| fail(&format!("Missing required argument '{name}'")))
}

fn parse_format(name: &str) -> ContentFormat {
    name.parse().unwrap_or_else(|e: String| fail(&e))
}

fn read_input(path: &str) -> String {
    if path == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .unwrap_or_else(|e| fail(&format!("Cannot read stdin: {e}")));
        return source;
    }
    fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Cannot read file '{path}': {e}")))
}

fn load_cli_config(explicit_path: Option<&str>) -> QuillConfig {
    let loader = Loader::new().with_optional_file("quill.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| fail(&format!("Failed to load configuration: {err}")))
}

/// Logs go to stderr so stdout stays clean for converted output.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}
