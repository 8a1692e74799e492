pub mod error;
pub mod interpreter;
pub mod operators;

pub mod prelude {
    pub use super::{
        error::*,
        interpreter::*
    };
}

#[cfg(test)]
mod tests;
