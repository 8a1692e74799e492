use std::{io, path::PathBuf};

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    parser::prelude::ParseError
};
use super::{
    diagnostic::{Diagnostic, Label, Location},
    src_span::SrcSpan
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        errors: Vec<ParseError>
    },
    #[error("runtime error")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: io::ErrorKind
    }
}

fn fits(src: &str, span: SrcSpan) -> bool {
    src.is_char_boundary(span.start as usize) && src.is_char_boundary(span.end as usize)
}

impl Error {
    pub fn pretty_string(&self) -> io::Result<String> {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor)?;

        String::from_utf8(nocolor.into_inner())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    pub fn pretty(&self, buf: &mut Buffer) -> io::Result<()> {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf)?;
            writeln!(buf)?;
        }

        Ok(())
    }

    /// The bare `[line N] ...` lines, one per reported error.
    pub fn plain(&self) -> String {
        match self {
            Error::Parse { errors, .. } => errors.iter()
                .map(|error| error.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            Error::Runtime { error, .. } => error.to_string(),
            Error::StdIo { err } => format!("Standard IO error: {err}")
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, errors } => errors.iter()
                .map(|error| Diagnostic {
                    title: error.to_string(),
                    text: String::new(),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(error.details()),
                            span: error.token.location,
                        },
                        extra_labels: vec![],
                    }),
                })
                .collect(),
            Error::Runtime { path, src, error } => {
                // The token may come from an earlier source, e.g. a function defined on a previous prompt line.
                let span = error.token.location;
                let location = fits(src, span).then(|| Location {
                    src,
                    path: path.clone(),
                    label: Label {
                        text: None,
                        span,
                    },
                    extra_labels: vec![],
                });

                vec![Diagnostic {
                    title: error.details(),
                    text: format!("[line {}]", error.token.line),
                    location,
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    location: None,
                }]
            }
        }
    }
}
