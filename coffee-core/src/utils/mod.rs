pub mod diagnostic;
pub mod emitter;
pub mod error;
pub mod src_span;
pub mod stack;

pub mod prelude {
    pub use super::{
        diagnostic::*,
        emitter::*,
        error::*,
        src_span::*,
        stack::*
    };
}
