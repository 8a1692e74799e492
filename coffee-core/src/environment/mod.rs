pub mod callable;
pub mod environment;
pub mod native;
pub mod value;

pub mod prelude {
    pub use super::{
        callable::*,
        environment::*,
        native::*,
        value::*
    };
}
