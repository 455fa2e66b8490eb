//! Rule-based building blocks for invoice row reconstruction.

pub mod amounts;
pub mod classify;
pub mod lines;
pub mod patterns;

pub use amounts::{normalize_number, parse_amount, total_mismatch};
pub use classify::{is_code_token, LineClassifier, LineKind, NumericTail};
pub use lines::{normalize_line, split_lines};
