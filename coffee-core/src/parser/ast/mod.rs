pub mod expression;
pub mod statement;

pub use expression::*;
pub use statement::*;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub statements: Vec<Statement>,
    pub comments: Vec<SrcSpan>,
}

impl std::fmt::Display for Parsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", join(&self.statements, "\n"))
    }
}

/// Joins displayable nodes with `sep`.
pub(crate) fn join<T: std::fmt::Display>(nodes: &[T], sep: &str) -> String {
    nodes.iter()
        .map(|node| node.to_string())
        .collect::<Vec<String>>()
        .join(sep)
}
