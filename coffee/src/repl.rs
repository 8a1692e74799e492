use std::{io::{self, Write}, path::Path, rc::Rc};

use coffee_core::{
    eval::prelude::Interpreter,
    runner::prelude::Session,
    utils::prelude::ErrorEmitter
};

use crate::{cli::ConsoleErrorEmitter, help};

const PROMPT: &str = "> ";
const FAREWELL: &str = "Leaving prompt!";

fn handle_interrupt() -> io::Result<()> {
    ctrlc::set_handler(|| {
        println!("\n{FAREWELL}");
        std::process::exit(0);
    })
    .map_err(io::Error::other)
}

pub fn start(plain: bool) -> io::Result<()> {
    handle_interrupt()?;

    println!("Welcome to Coffee Filter prompt!");
    println!("Enter any valid Coffee Filter Line or:");
    println!("-h for help");
    println!("-r {{path}} to run a file");
    println!("-e to exit the prompt");

    let mut session = Session::new(
        Interpreter::new(),
        ErrorEmitter::new(Rc::new(ConsoleErrorEmitter { plain }))
    );

    let stdin = io::stdin();

    loop {
        let mut input = String::from("");

        print!("{}", PROMPT);
        io::stdout().flush()?;

        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        let line = input.trim_end_matches(['\n', '\r']);

        if line.starts_with('-') {
            if prompt_command(&mut session, line) {
                break;
            }

            continue;
        }

        if !line.trim().is_empty() {
            session.run(Path::new("prompt"), line);
        }
    }

    println!("{FAREWELL}");

    Ok(())
}

/// Handles a `-` line. Returns `true` when the prompt should close.
fn prompt_command(session: &mut Session, line: &str) -> bool {
    let mut args = line.split_whitespace();

    let name = args.next().unwrap_or_default().to_lowercase();
    let argument = args.next();

    match (name.as_str(), argument) {
        ("-h" | "-help", topic) => {
            if let Some(text) = help::topic(topic) {
                println!("{text}");
            }
        },
        ("-r" | "-run", None) => println!("run requires a path like: -r test.coffee"),
        ("-r" | "-run", Some(path)) => {
            let status = session.run_file(Path::new(path));
            tracing::debug!(?status, path, "prompt run finished");
        },
        ("-e" | "-exit", None) => return true,
        _ => {}
    }

    false
}
