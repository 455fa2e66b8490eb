//! Row reconstruction state machine.
//!
//! Invoice rows arrive split over one to several physical lines. The
//! assembler folds classified lines into a single pending row and emits an
//! [`InvoiceRow`] once code, description and numeric tail are all known.
//! Anything it cannot resolve becomes a warning; malformed input never
//! produces an error or a partial row.

use tracing::{debug, trace, warn};

use super::rules::amounts::total_mismatch;
use super::rules::classify::{is_code_token, LineClassifier, LineKind, NumericTail};
use super::rules::lines::normalize_line;
use super::rules::patterns::NUMERIC_CODE;
use crate::models::config::{ParseOptions, RepairQuirk};
use crate::models::invoice::InvoiceRow;

/// Where the assembler stands with respect to the pending row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// Nothing buffered.
    Idle,
    /// A code prefix is known, its suffix is not.
    AwaitingCodeAfterPrefix,
    /// The code is known, the numeric tail is not.
    AwaitingTail,
}

/// Rows and diagnostics produced from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledRows {
    pub items: Vec<InvoiceRow>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
struct PendingRow {
    prefix: Option<String>,
    code: Option<String>,
    description: Vec<String>,
    /// Lines folded in since the row started.
    age: usize,
}

impl PendingRow {
    fn state(&self) -> AssemblerState {
        match (&self.prefix, &self.code) {
            (_, Some(_)) => AssemblerState::AwaitingTail,
            (Some(_), None) => AssemblerState::AwaitingCodeAfterPrefix,
            (None, None) if self.description.is_empty() => AssemblerState::Idle,
            // Description without prefix or code cannot be reached through
            // the transitions; treat it like a prefix-less carry.
            (None, None) => AssemblerState::AwaitingCodeAfterPrefix,
        }
    }

    fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.code.is_none() && self.description.is_empty()
    }

    fn description_text(&self) -> String {
        self.description.join(" ")
    }

    fn summary(&self) -> String {
        let mut parts = Vec::new();
        match (&self.code, &self.prefix) {
            (Some(code), _) => parts.push(code.clone()),
            (None, Some(prefix)) => parts.push(prefix.clone()),
            (None, None) => {}
        }
        let description = self.description_text();
        if !description.is_empty() {
            parts.push(description);
        }
        parts.join(" ")
    }

    fn buffered_chars(&self) -> usize {
        self.summary().chars().count()
    }
}

/// Stateful line-by-line row reconstruction for one document.
///
/// One instance per document; [`RowAssembler::finish`] consumes it.
#[derive(Debug)]
pub struct RowAssembler {
    classifier: LineClassifier,
    options: ParseOptions,
    pending: PendingRow,
    items: Vec<InvoiceRow>,
    warnings: Vec<String>,
    line_no: usize,
}

impl RowAssembler {
    /// Create an assembler using `classifier` and the bounds in `options`.
    pub fn new(classifier: LineClassifier, options: ParseOptions) -> Self {
        Self {
            classifier,
            options,
            pending: PendingRow::default(),
            items: Vec::new(),
            warnings: Vec::new(),
            line_no: 0,
        }
    }

    /// Run a whole document through a fresh assembler.
    pub fn assemble<I, S>(classifier: LineClassifier, options: ParseOptions, lines: I) -> AssembledRows
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut assembler = Self::new(classifier, options);
        for line in lines {
            assembler.push_line(line.as_ref());
        }
        assembler.finish()
    }

    /// Current state of the pending row.
    pub fn state(&self) -> AssemblerState {
        self.pending.state()
    }

    /// Rows emitted so far.
    pub fn items(&self) -> &[InvoiceRow] {
        &self.items
    }

    /// Fold one physical line into the pending row.
    pub fn push_line(&mut self, raw: &str) {
        let line = normalize_line(raw);
        if line.is_empty() {
            return;
        }
        self.line_no += 1;

        let kind = self.classifier.classify(&line);
        trace!("line {}: {:?} <- '{}'", self.line_no, kind, line);

        match kind {
            LineKind::Header => {
                debug!("line {}: skipping header '{}'", self.line_no, line);
                return;
            }
            LineKind::PrefixOnly { prefix } => {
                self.abandon(&format!("superseded by prefix '{}'", prefix));
                self.pending.prefix = Some(prefix);
            }
            LineKind::PrefixedDescription { prefix, description } => {
                self.abandon(&format!("superseded by prefix '{}'", prefix));
                self.pending.prefix = Some(prefix);
                self.pending.description.push(description);
            }
            LineKind::FullRow {
                code,
                description,
                tail,
            } => {
                if self.state() == AssemblerState::AwaitingTail {
                    self.abandon("superseded by a complete row");
                }
                let code = self.resolve_code(code);
                self.pending.code = Some(code);
                if !description.is_empty() {
                    self.pending.description.push(description);
                }
                self.emit(tail);
                return;
            }
            LineKind::NumericTail { lead, tail } => match self.state() {
                AssemblerState::AwaitingTail => {
                    if let Some(lead) = lead {
                        self.pending.description.push(lead);
                    }
                    self.emit(tail);
                    return;
                }
                AssemblerState::AwaitingCodeAfterPrefix => {
                    // "SS-POIGNEE EQUIPEE" then "2230002839 2 PZ ...": the lead carries the code.
                    let code = lead.as_deref().and_then(|lead| {
                        let (first, rest) = lead.split_once(' ').unwrap_or((lead, ""));
                        is_code_token(first).then(|| (first.to_string(), rest.trim().to_string()))
                    });
                    match code {
                        Some((code, rest)) => {
                            let code = self.resolve_code(code);
                            self.pending.code = Some(code);
                            if !rest.is_empty() {
                                self.pending.description.push(rest);
                            }
                            self.emit(tail);
                        }
                        None => self.abandon("numeric tail arrived before the code"),
                    }
                    return;
                }
                AssemblerState::Idle => {
                    self.warn(format!(
                        "line {}: numeric tail without a product code ignored: '{}'",
                        self.line_no, line
                    ));
                    return;
                }
            },
            LineKind::CodeDescription { code, description } => {
                if self.state() == AssemblerState::AwaitingTail {
                    self.abandon(&format!("superseded by code '{}'", code));
                }
                let code = self.resolve_code(code);
                self.pending.code = Some(code);
                self.pending.description.push(description);
            }
            LineKind::NumericCode { code } => match self.state() {
                AssemblerState::AwaitingTail => {
                    if self.append(code) {
                        return;
                    }
                }
                AssemblerState::AwaitingCodeAfterPrefix => {
                    let code = self.resolve_code(code);
                    self.pending.code = Some(code);
                }
                // Dates, invoice numbers and page totals look the same.
                AssemblerState::Idle => {
                    debug!("line {}: ignoring lone number outside a row '{}'", self.line_no, code);
                    return;
                }
            },
            LineKind::Continuation { text } => {
                if self.state() == AssemblerState::Idle {
                    debug!("line {}: ignoring text outside a row '{}'", self.line_no, text);
                    return;
                }
                if self.append(text) {
                    return;
                }
            }
            LineKind::Unknown => {
                if self.pending.is_empty() {
                    return;
                }
            }
        }

        if !self.pending.is_empty() {
            self.pending.age += 1;
            self.enforce_bounds();
        }
    }

    /// Resolve what is still pending and return the collected rows.
    pub fn finish(mut self) -> AssembledRows {
        if !self.pending.is_empty() {
            let resolved = self.state() == AssemblerState::AwaitingTail && self.resolve_from_buffer();
            if !resolved {
                let summary = self.pending.summary();
                self.warn(format!("end of input: unresolved row discarded: '{}'", summary));
                self.pending = PendingRow::default();
            }
        }

        debug!(
            "assembled {} rows from {} lines with {} warnings",
            self.items.len(),
            self.line_no,
            self.warnings.len()
        );

        AssembledRows {
            items: self.items,
            warnings: self.warnings,
        }
    }

    /// Combine a code token with a pending prefix.
    fn resolve_code(&mut self, token: String) -> String {
        let Some(prefix) = self.pending.prefix.take() else {
            return token;
        };

        let suffix = if self.options.has_quirk(RepairQuirk::StripLeadingDigitAfterPrefix)
            && has_spurious_leading_digit(&token)
        {
            debug!("stripping leading digit from '{}' after prefix '{}'", token, prefix);
            token[1..].to_string()
        } else {
            token
        };

        format!("{}{}", prefix, suffix)
    }

    /// Append description text; returns true when this completed the row.
    fn append(&mut self, text: String) -> bool {
        self.pending.description.push(text);
        self.state() == AssemblerState::AwaitingTail && self.resolve_from_buffer()
    }

    /// Emit the pending row when its description ends in a numeric tail that
    /// was split over several lines.
    fn resolve_from_buffer(&mut self) -> bool {
        let buffer = self.pending.description_text();
        let Some((lead, tail)) = self.classifier.numeric_tail(&buffer) else {
            return false;
        };
        debug!("line {}: numeric tail reassembled from split lines", self.line_no);
        self.pending.description = lead.into_iter().collect();
        self.emit(tail);
        true
    }

    fn emit(&mut self, tail: NumericTail) {
        let pending = std::mem::take(&mut self.pending);
        let code = pending.code.clone().unwrap_or_default();
        let description = pending.description_text();

        if code.is_empty() {
            self.warn(format!(
                "line {}: row without product code discarded: '{}'",
                self.line_no,
                pending.summary()
            ));
            return;
        }
        if description.is_empty() {
            self.warn(format!(
                "line {}: row {} has no description, discarded",
                self.line_no, code
            ));
            return;
        }
        if tail.quantity.is_empty() || tail.unit_price.is_empty() || tail.total.is_empty() {
            self.warn(format!(
                "line {}: row {} has unreadable numbers, discarded",
                self.line_no, code
            ));
            return;
        }

        if self.options.check_totals {
            if let Some(computed) = total_mismatch(&tail.quantity, &tail.unit_price, &tail.total) {
                self.warn(format!(
                    "line {}: row {}: {} x {} = {} but total is {}",
                    self.line_no, code, tail.quantity, tail.unit_price, computed, tail.total
                ));
            }
        }

        debug!("line {}: emitting row {}", self.line_no, code);
        self.items.push(InvoiceRow {
            product_number: code,
            product_name: description,
            customs_code: String::new(),
            weight_g: String::new(),
            delivered_qty: tail.quantity,
            net_unit_price: tail.unit_price,
            total_price: tail.total,
        });
    }

    fn enforce_bounds(&mut self) {
        if self.pending.age > self.options.max_pending_lines {
            let reason = format!(
                "no numeric tail within {} lines",
                self.options.max_pending_lines
            );
            self.abandon(&reason);
        } else if self.pending.buffered_chars() > self.options.max_pending_chars {
            let reason = format!(
                "more than {} characters buffered",
                self.options.max_pending_chars
            );
            self.abandon(&reason);
        }
    }

    /// Drop the pending row, if any, with one warning.
    fn abandon(&mut self, reason: &str) {
        if self.pending.is_empty() {
            return;
        }
        let summary = self.pending.summary();
        self.pending = PendingRow::default();
        self.warn(format!(
            "line {}: abandoned unresolved row ({}): '{}'",
            self.line_no, reason, summary
        ));
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

/// `9161.167`: dotted code whose integer part is longer than three digits.
fn has_spurious_leading_digit(token: &str) -> bool {
    NUMERIC_CODE.is_match(token)
        && token.contains('.')
        && token.split('.').next().map_or(false, |int| int.len() > 3)
}
