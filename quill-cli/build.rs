use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["tokens-simple", "tokens-json"];

const FORMATS: &[&str] = &["markdown", "html"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or '-' for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert article bodies between extended markdown and HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .arg(input_arg())
                .arg(Arg::new("from").long("from").value_parser(FORMATS.to_vec()))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(FORMATS.to_vec()),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("classify").arg(input_arg()))
        .subcommand(Command::new("normalize").arg(input_arg()))
        .subcommand(
            Command::new("inspect").arg(input_arg()).arg(
                Arg::new("transform")
                    .value_parser(clap::builder::PossibleValuesParser::new(
                        AVAILABLE_TRANSFORMS,
                    ))
                    .index(2)
                    .value_hint(ValueHint::Other),
            ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "quill", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "quill", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "quill", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
