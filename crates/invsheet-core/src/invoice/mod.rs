//! Invoice row reconstruction.
//!
//! Text flows through [`rules`] (normalization and line classification) into
//! the [`assembler`] state machine. Supplier-specific layouts live in
//! [`suppliers`] and are looked up through the [`registry`].

pub mod assembler;
pub mod parser;
pub mod registry;
pub mod rules;
pub mod suppliers;

pub use assembler::{AssembledRows, AssemblerState, RowAssembler};
pub use parser::{parse_document, SupplierParser};
pub use registry::{ParserRegistry, Supplier};
pub use suppliers::{GenericParser, OmniaParser};
