use std::{fs, path::Path};

use tracing::debug;

use crate::{
    eval::prelude::Interpreter,
    lexer::prelude::tokenize,
    parser::prelude::{parse, Outcome},
    utils::prelude::{Error, ErrorEmitter}
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    SyntaxError,
    RuntimeError,
    IoError
}

impl RunStatus {
    /// sysexits-style process status.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::SyntaxError => 65,
            Self::IoError => 66,
            Self::RuntimeError => 70
        }
    }
}

/// One interpreter whose globals outlive each `run`, plus where its errors go.
pub struct Session {
    interpreter: Interpreter,
    emitter: ErrorEmitter,
}

impl Session {
    pub fn new(interpreter: Interpreter, emitter: ErrorEmitter) -> Self {
        Self { interpreter, emitter }
    }

    pub fn emitter(&self) -> &ErrorEmitter {
        &self.emitter
    }

    #[tracing::instrument(level = "debug", skip(self, src), fields(path = %path.display()))]
    pub fn run(&mut self, path: &Path, src: &str) -> RunStatus {
        let tokens = tokenize(src);
        debug!(tokens = tokens.len(), "tokenized");

        let parsed = match parse(tokens) {
            Outcome::Ok(parsed) => parsed,
            Outcome::PartialFailure(_, errors) => {
                debug!(errors = errors.len(), "not interpreting");

                self.emitter.emit(Error::Parse {
                    path: path.to_path_buf(),
                    src: src.to_string(),
                    errors
                });

                return RunStatus::SyntaxError;
            }
        };

        match self.interpreter.interpret(&parsed.statements) {
            Ok(()) => RunStatus::Completed,
            Err(error) => {
                debug!(line = error.token.line, "runtime error");

                self.emitter.emit(Error::Runtime {
                    path: path.to_path_buf(),
                    src: src.to_string(),
                    error
                });

                RunStatus::RuntimeError
            }
        }
    }

    pub fn run_file(&mut self, path: &Path) -> RunStatus {
        match fs::read_to_string(path) {
            Ok(src) => self.run(path, &src),
            Err(err) => {
                debug!(path = %path.display(), "unable to read");

                self.emitter.emit(Error::StdIo { err: err.kind() });

                RunStatus::IoError
            }
        }
    }
}
