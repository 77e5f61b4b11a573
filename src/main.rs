use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use ember::{evaluate_program, parse, tokenize, Environment, Value};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};

/// Tokenize, parse and evaluate ember programs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run; without one the REPL starts
    script: Option<PathBuf>,

    /// Print the token stream of every input
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program of every input
    #[arg(long)]
    ast: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = match &args.script {
        Some(path) => run_script(path, &args),
        None => run_repl(&args).map_err(|err| err.to_string()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn execute(source: &str, env: &mut Environment, args: &Args) -> Result<Value, ember::Error> {
    let tokens = tokenize(source)?;
    if args.tokens {
        println!("Tokens:");
        for token in tokens.iter() {
            println!("{token}");
        }
    }
    let program = parse(&tokens)?;
    if args.ast {
        println!("Parsed result:");
        for statement in program.body.iter() {
            println!("{statement:?}");
        }
    }
    Ok(evaluate_program(&program, env)?)
}

fn run_script(path: &Path, args: &Args) -> Result<(), String> {
    let source = fs::read_to_string(path)
        .map_err(|err| format!("Could not read {}: {err}", path.display()))?;
    let mut env = Environment::new();
    let value = execute(&source, &mut env, args).map_err(|err| format!("Error: {err}"))?;
    println!("{value}");
    Ok(())
}

fn run_repl(args: &Args) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    #[cfg(feature = "with-file-history")]
    if rl.load_history("history.txt").is_err() {
        println!("No previous history.");
    }
    let mut env = Environment::new();
    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.eq_ignore_ascii_case("exit") {
                    break;
                }
                if input.is_empty() {
                    continue;
                }
                rl.add_history_entry(input)?;
                match execute(input, &mut env, args) {
                    Ok(value) => println!("{value}"),
                    Err(err) => eprintln!("Error: {err}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    #[cfg(feature = "with-file-history")]
    rl.save_history("history.txt")?;
    Ok(())
}
