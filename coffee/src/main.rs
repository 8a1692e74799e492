mod cli;
mod help;
mod repl;
mod rlpl;
mod rppl;

use std::{path::PathBuf, process::ExitCode, rc::Rc};

use clap::Parser;
use cli::{print_finished, print_running, ConsoleErrorEmitter};
use coffee_core::{
    eval::prelude::Interpreter,
    lexer::prelude::tokenize,
    runner::prelude::Session,
    utils::prelude::ErrorEmitter
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coffee", version, about = "Coffee Filter interpreter")]
struct Cli {
    /// Print `[line N] Error ...` text instead of rendered diagnostics
    #[arg(long, global = true, default_value_t = false)]
    plain_diagnostics: bool,
    #[command(subcommand)]
    command: Command
}

#[derive(clap::Subcommand)]
enum Command {
    /// Runs a source file
    Run {
        /// Path of source file
        path: PathBuf,
        /// Print every token before running
        #[arg(long, default_value_t = false)]
        print_tokens: bool
    },
    /// Runs the interactive prompt
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl {
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("COFFEE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let Cli { plain_diagnostics, command } = Cli::parse();

    let finished = match command {
        Command::Run { path, print_tokens } => {
            let mut session = Session::new(
                Interpreter::new(),
                ErrorEmitter::new(Rc::new(ConsoleErrorEmitter { plain: plain_diagnostics }))
            );

            if print_tokens {
                // An unreadable file is reported by the run itself.
                if let Ok(src) = std::fs::read_to_string(&path) {
                    tokenize(&src).iter().for_each(|token| println!("{token}"));
                }
            }

            print_running(&path.display().to_string());
            let start = std::time::Instant::now();

            let status = session.run_file(&path);

            print_finished(std::time::Instant::now() - start);

            return ExitCode::from(status.exit_code());
        },
        Command::Repl => repl::start(plain_diagnostics),
        Command::Rlpl => rlpl::start(),
        Command::Rppl { print_ast } => rppl::start(print_ast, plain_diagnostics)
    };

    match finished {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "prompt failed");
            ExitCode::from(74)
        }
    }
}
