//! Small CLI front-end over the core: parses a file and dumps its AST.
//!
//! Usage:
//!   helix-dump <input-file> [--format pretty|json]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use termcolor::{ColorChoice, StandardStream};

use helix_front::ast::Node;
use helix_front::{parse_file, FileCache};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(ClapParser, Debug)]
#[command(name = "helix-dump", about = "Parse a Helix source file and dump its AST")]
struct Args {
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    format: Format,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let (program, sink) = parse_file(&args.input);

    if !sink.is_empty() {
        let mut stream = StandardStream::stderr(ColorChoice::Auto);
        let cache = FileCache::new();
        if let Ok(contents) = std::fs::read_to_string(&args.input) {
            cache.put(helix_front::source::canonical_path(&args.input), contents.into());
        }
        if sink.render_all(&mut stream, &cache).is_err() {
            eprintln!("failed to render diagnostics");
        }
    }

    let root: Node = program.into();
    match args.format {
        Format::Pretty => print!("{}", root.to_string(0)),
        Format::Json => {
            let value = helix_front::ast::to_json(&root);
            match serde_json::to_string_pretty(&value) {
                Ok(s) => println!("{s}"),
                Err(err) => {
                    eprintln!("failed to serialize AST: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if sink.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
