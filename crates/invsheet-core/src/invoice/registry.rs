//! Supplier keys and parser lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::parser::SupplierParser;
use super::suppliers::{GenericParser, OmniaParser};
use crate::error::RegistryError;

/// Suppliers with a built-in parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Supplier {
    Omnia,
    Generic,
}

impl Supplier {
    /// Every built-in supplier.
    pub fn all() -> &'static [Supplier] {
        &[Supplier::Omnia, Supplier::Generic]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Supplier::Omnia => "omnia",
            Supplier::Generic => "generic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Supplier::Omnia => "Omnia Components",
            Supplier::Generic => "Generic (no extraction)",
        }
    }

    /// A fresh parser for this supplier.
    pub fn parser(&self) -> Box<dyn SupplierParser> {
        match self {
            Supplier::Omnia => Box::new(OmniaParser),
            Supplier::Generic => Box::new(GenericParser),
        }
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Supplier {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Supplier::all()
            .iter()
            .copied()
            .find(|supplier| supplier.key() == key)
            .ok_or_else(|| RegistryError::UnknownSupplier {
                key: s.to_string(),
                available: sorted_keys(),
            })
    }
}

fn sorted_keys() -> Vec<String> {
    let mut keys: Vec<String> = Supplier::all().iter().map(|s| s.key().to_string()).collect();
    keys.sort();
    keys
}

/// Parsers keyed by supplier key, iterated in key order.
pub struct ParserRegistry {
    parsers: BTreeMap<&'static str, Box<dyn SupplierParser>>,
}

impl ParserRegistry {
    /// Registry of every built-in parser.
    pub fn builtin() -> Self {
        Self::from_parsers(Supplier::all().iter().map(|supplier| supplier.parser()))
    }

    /// Registry of the given parsers. A later parser replaces an earlier one with the same key.
    pub fn from_parsers<I>(parsers: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SupplierParser>>,
    {
        let parsers = parsers
            .into_iter()
            .map(|parser| (parser.key(), parser))
            .collect();
        Self { parsers }
    }

    /// Look up a parser by key, case-insensitively.
    pub fn get(&self, key: &str) -> Result<&dyn SupplierParser, RegistryError> {
        let normalized = key.trim().to_lowercase();
        self.parsers
            .get(normalized.as_str())
            .map(|parser| parser.as_ref())
            .ok_or_else(|| RegistryError::UnknownSupplier {
                key: key.to_string(),
                available: self.keys().iter().map(|k| k.to_string()).collect(),
            })
    }

    /// All parsers, sorted by key.
    pub fn all(&self) -> impl Iterator<Item = &dyn SupplierParser> {
        self.parsers.values().map(|parser| parser.as_ref())
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&'static str> {
        self.parsers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
