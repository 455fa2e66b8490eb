//! Line classification for row reconstruction.
//!
//! Classification depends only on the line text and the classifier's fixed
//! configuration, never on where the line occurs.

use std::collections::HashSet;

use regex::Regex;

use super::amounts::normalize_number;
use super::patterns::*;
use crate::models::config::{ParseOptions, RepairQuirk};

/// Quantity, unit price and total of one row, as canonical decimal strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericTail {
    pub quantity: String,
    pub unit_price: String,
    pub total: String,
}

/// What a normalized line contributes to a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Repeated table header or footer.
    Header,
    /// Code prefix alone on the line (`VEN-`).
    PrefixOnly { prefix: String },
    /// Prefix glued to the first description word (`SS-POIGNEE EQUIPEE`).
    PrefixedDescription { prefix: String, description: String },
    /// Code, description and numeric tail on one line.
    FullRow {
        code: String,
        description: String,
        tail: NumericTail,
    },
    /// Numeric tail, possibly preceded by description text.
    NumericTail { lead: Option<String>, tail: NumericTail },
    /// Code followed by description, tail still to come.
    CodeDescription { code: String, description: String },
    /// A lone digits-and-dots token (`161.167`).
    NumericCode { code: String },
    /// Free text.
    Continuation { text: String },
    /// Nothing alphanumeric.
    Unknown,
}

/// Pure line classifier configured for one supplier layout.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    tail: &'static Regex,
    tail_start: &'static Regex,
    header_words: &'static [&'static str],
    header_threshold: usize,
    merged_prefix_word: bool,
}

impl LineClassifier {
    /// Classifier for Omnia invoices (`PZ` units, euro prices).
    pub fn omnia(options: &ParseOptions) -> Self {
        Self {
            tail: &OMNIA_NUMERIC_TAIL,
            tail_start: &OMNIA_TAIL_START,
            header_words: OMNIA_HEADER_WORDS,
            header_threshold: 3,
            merged_prefix_word: options.has_quirk(RepairQuirk::MergedPrefixWord),
        }
    }

    /// Classify one normalized line. More complete readings win.
    pub fn classify(&self, line: &str) -> LineKind {
        if self.is_header(line) {
            return LineKind::Header;
        }

        if PREFIX_ONLY.is_match(line) {
            return LineKind::PrefixOnly {
                prefix: line.to_string(),
            };
        }

        if let Some((lead, tail)) = self.numeric_tail(line) {
            // A code alone in front of the tail is not a full row: it may be
            // the last description word ("40W") or a code for a pending prefix.
            if let Some(lead) = lead.as_deref() {
                let (first, rest) = split_first_token(lead);
                if !rest.is_empty() && is_code_token(first) {
                    return LineKind::FullRow {
                        code: first.to_string(),
                        description: rest.to_string(),
                        tail,
                    };
                }
            }
            return LineKind::NumericTail { lead, tail };
        }

        // A tail broken over lines is description-buffer material.
        if self.tail_start.is_match(line) {
            return LineKind::Continuation {
                text: line.to_string(),
            };
        }

        let (first, rest) = split_first_token(line);

        if self.merged_prefix_word {
            if let Some(caps) = MERGED_PREFIX_WORD.captures(first) {
                let description = join_words(&caps["word"], rest);
                return LineKind::PrefixedDescription {
                    prefix: caps["prefix"].to_string(),
                    description,
                };
            }
        }

        if rest.chars().any(|c| c.is_alphabetic()) && is_code_token(first) {
            return LineKind::CodeDescription {
                code: first.to_string(),
                description: rest.to_string(),
            };
        }

        if rest.is_empty() && NUMERIC_CODE.is_match(first) {
            return LineKind::NumericCode {
                code: first.to_string(),
            };
        }

        if line.chars().any(|c| c.is_alphanumeric()) {
            LineKind::Continuation {
                text: line.to_string(),
            }
        } else {
            LineKind::Unknown
        }
    }

    /// Whether the line repeats the column header vocabulary.
    pub fn is_header(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        let hits: HashSet<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| self.header_words.contains(word))
            .collect();
        hits.len() >= self.header_threshold
    }

    /// Match a numeric tail at the end of `text`, returning any text before it.
    pub fn numeric_tail(&self, text: &str) -> Option<(Option<String>, NumericTail)> {
        let caps = self.tail.captures(text)?;
        let tail = NumericTail {
            quantity: normalize_number(&caps["qty"]),
            unit_price: normalize_number(&caps["price"]),
            total: normalize_number(&caps["total"]),
        };
        let lead = caps
            .name("lead")
            .map(|m| m.as_str().trim().to_string())
            .filter(|lead| !lead.is_empty());
        Some((lead, tail))
    }
}

/// Whether a whitespace-free token looks like a product code.
pub fn is_code_token(token: &str) -> bool {
    CODE_TOKEN.is_match(token) && token.chars().any(|c| c.is_ascii_digit())
}

fn split_first_token(text: &str) -> (&str, &str) {
    match text.split_once(' ') {
        Some((first, rest)) => (first, rest.trim()),
        None => (text, ""),
    }
}

fn join_words(head: &str, rest: &str) -> String {
    if rest.is_empty() {
        head.to_string()
    } else {
        format!("{} {}", head, rest)
    }
}
