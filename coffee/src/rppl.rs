use std::{io::Write, path::PathBuf};

use coffee_core::{
	parser::prelude::{parse_source, Outcome, Parsed},
	utils::prelude::{Error, ErrorEmitterIO}
};

use crate::cli::ConsoleErrorEmitter;

const PROMPT: &str = ">> ";

pub fn start(print_ast: bool, plain: bool) -> std::io::Result<()> {
	let stdin = std::io::stdin();
	let emitter = ConsoleErrorEmitter { plain };

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => match parse_source(&input) {
				Outcome::Ok(parsed) => print_parsed(&parsed, print_ast),
				Outcome::PartialFailure(parsed, errors) => {
					print_parsed(&parsed, print_ast);

					emitter.emit_error(Error::Parse {
						path: PathBuf::from("prompt"),
						src: input.clone(),
						errors
					});
				}
			}
		}
	}
}

fn print_parsed(parsed: &Parsed, print_ast: bool) {
	if print_ast {
		println!("{:#?}", parsed.statements);
	} else {
		println!("{parsed}");
	}
}
