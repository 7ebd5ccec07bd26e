use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use serde_json::json;

use clike_lexer as clex;

use clex::arena::DEFAULT_SCRATCH_CAPACITY;
use clex::intern::Interner;
use clex::packer::TokenBuffer;
use clex::token::Token;
use clex::value::Value;
use clex::{Lexer, LexerConfig};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lexer for a compact C-like language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to lexer.log
    #[arg(long, global = true)]
    log: bool,

    /// Memory ceiling in bytes for packed token buffers
    #[arg(long, global = true, default_value_t = DEFAULT_SCRATCH_CAPACITY)]
    scratch_capacity: usize,

    /// Pack end-of-line markers so replayed tokens carry line numbers
    #[arg(long, global = true)]
    line_markers: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file and prints each replayed token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token
        #[arg(long)]
        json: bool,
    },

    /// Tokenizes a file and prints the packed buffer as hex
    Dump { filename: PathBuf },

    /// Tokenizes standard input line by line
    Repl {
        /// Print one JSON object per token
        #[arg(long)]
        json: bool,
    },
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("lexer.log").context("Failed to create lexer.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'clike_lexer::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("clike_lexer::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to lexer.log");
    Ok(())
}

/// Lex or exit with status 65, printing `<file>:<line>: <message>`.
fn lex_or_exit(result: clex::Result<TokenBuffer>) -> TokenBuffer {
    match result {
        Ok(buffer) => buffer,

        Err(e) => {
            debug!("Lexing failed: {:?}", e);
            eprintln!("{}", e);
            std::process::exit(65);
        }
    }
}

fn token_json(token: &Token, interner: &Interner, line: usize) -> serde_json::Value {
    let value = match token.value {
        None | Some(Value::Void) => serde_json::Value::Null,
        Some(Value::Int(n)) => json!(n),
        Some(Value::Float(n)) => json!(n),
        // a word from another interner prints as its raw handle
        Some(Value::Str(word)) => interner
            .try_resolve(word)
            .map_or_else(|| json!(word.raw()), |text| json!(text)),
    };

    json!({
        "type": token.token_type.name(),
        "value": value,
        "line": line,
    })
}

fn print_tokens(buffer: &TokenBuffer, interner: &Interner, as_json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut cursor = buffer.cursor();

    while let Some(token) = cursor.next() {
        let token = token.context("Packed buffer failed to replay")?;

        if as_json {
            writeln!(out, "{}", token_json(&token, interner, cursor.line()))?;
        } else {
            writeln!(out, "{}", token.display(interner))?;
        }
    }

    out.flush()?;
    Ok(())
}

fn print_hex(buffer: &TokenBuffer) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    writeln!(out, "{} bytes", buffer.len())?;

    for (row, chunk) in buffer.as_bytes().chunks(16).enumerate() {
        write!(out, "{:08x} ", row * 16)?;
        for b in chunk {
            write!(out, " {:02x}", b)?;
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let lexer = Lexer::new(LexerConfig {
        scratch_capacity: args.scratch_capacity,
        line_markers: args.line_markers,
    });

    match args.commands {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");

            let source = std::fs::read_to_string(&filename)
                .with_context(|| format!("Failed to read file {:?}", filename))?;
            let name = filename.display().to_string();

            let buffer = lex_or_exit(lexer.analyse(&name, &source));
            print_tokens(&buffer, lexer.interner(), json)?;

            info!("Tokenization completed successfully");
        }

        Commands::Dump { filename } => {
            info!("Running Dump subcommand");

            let source = std::fs::read_to_string(&filename)
                .with_context(|| format!("Failed to read file {:?}", filename))?;
            let name = filename.display().to_string();

            let buffer = lex_or_exit(lexer.analyse(&name, &source));
            print_hex(&buffer)?;
        }

        Commands::Repl { json } => {
            info!("Running Repl subcommand");

            let stdin = io::stdin();
            let buffer = lex_or_exit(lexer.analyse_with_input("<stdin>", "", stdin.lock()));
            print_tokens(&buffer, lexer.interner(), json)?;
        }
    }

    Ok(())
}
