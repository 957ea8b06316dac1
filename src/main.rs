use std::io::Write;

use clap::{Args, Parser, Subcommand};
use huruf::interpreter::{Interpreter, DEFAULT_SYMBOL_LIMIT};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Repl)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a source file.
    Run(RunArgs),
    /// Print the tokens of a source file.
    Tokens(TokensArgs),
    Repl,
}

#[derive(Debug, Args)]
struct RunArgs {
    file: String,
    /// Maximum number of distinct variables.
    #[arg(long, default_value_t = DEFAULT_SYMBOL_LIMIT)]
    max_symbols: usize,
}

#[derive(Debug, Args)]
struct TokensArgs {
    file: String,
}

fn main() {
    let args = Cli::parse();

    match args.command() {
        Command::Repl => {
            repl_command();
        }
        Command::Run(args) => {
            run_command(args);
        }
        Command::Tokens(args) => {
            tokens_command(args);
        }
    }
}

fn repl_command() {
    println!("EOF to exit. (Ctrl+D on *nix, Ctrl+Z on Windows)");

    let mut interpreter = Interpreter::default();
    loop {
        let mut input = String::new();

        print!("> ");
        if std::io::stdout().flush().is_err() {
            break;
        }

        match std::io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        }

        if let Err(e) = huruf::interpret(input.trim(), &mut interpreter) {
            eprintln!("Error: {e}");
        }
    }
}

fn run_command(args: &RunArgs) {
    let source = read_source(&args.file);
    let mut interpreter = Interpreter::with_symbol_limit(
        std::rc::Rc::new(std::cell::RefCell::new(std::io::stdout())),
        args.max_symbols,
    );
    if let Err(e) = huruf::interpret(&source, &mut interpreter) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn tokens_command(args: &TokensArgs) {
    let source = read_source(&args.file);
    match huruf::tokenizer::tokens(&source) {
        Ok(tokens) => {
            for token in tokens {
                println!("{:<24} {}", format!("{:?}", token), token);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn read_source(file: &str) -> String {
    match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Could not read {file}: {e}");
            std::process::exit(1);
        }
    }
}
