//! Built-in supplier parsers.

mod generic;
mod omnia;

pub use generic::{GenericParser, GENERIC_WARNING};
pub use omnia::{OmniaParser, NO_ITEMS_WARNING};
