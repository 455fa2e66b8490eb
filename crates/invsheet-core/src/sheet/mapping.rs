//! Header label to row field mapping.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SheetError;
use crate::models::invoice::RowField;

/// Template header labels shipped with the default Czech import sheet.
const DEFAULT_LABELS: [(&str, RowField); 7] = [
    ("Číslo produktu", RowField::ProductNumber),
    ("Označení produktu", RowField::ProductName),
    ("Celní kód zboží", RowField::CustomsCode),
    ("Hmotnost v gramech", RowField::WeightG),
    ("Dodané množství", RowField::DeliveredQty),
    ("Čistá cena za jednotku", RowField::NetUnitPrice),
    ("Celková cena za množství produktu", RowField::TotalPrice),
];

/// Ordered mapping from template header labels to row fields.
///
/// Serialized as a JSON object; key order is preserved. The first label
/// decides where previous data ends when clearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: Vec<(String, RowField)>,
}

impl ColumnMapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Map `label` to `field`, replacing an existing entry for the label.
    pub fn insert(&mut self, label: impl Into<String>, field: RowField) {
        let label = label.into().trim().to_string();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = field,
            None => self.entries.push((label, field)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, label: impl Into<String>, field: RowField) -> Self {
        self.insert(label, field);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in mapping order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Entries in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, RowField)> {
        self.entries.iter().map(|(label, field)| (label.as_str(), *field))
    }

    /// Field mapped to `label`, if any.
    pub fn field(&self, label: &str) -> Option<RowField> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label.trim())
            .map(|(_, field)| *field)
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        DEFAULT_LABELS
            .iter()
            .fold(Self::new(), |mapping, (label, field)| mapping.with(*label, *field))
    }
}

impl Serialize for ColumnMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, field) in &self.entries {
            map.serialize_entry(label, field.key())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ColumnMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MappingVisitor)
    }
}

struct MappingVisitor;

impl<'de> Visitor<'de> for MappingVisitor {
    type Value = ColumnMapping;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping header labels to row field names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut mapping = ColumnMapping::new();
        while let Some((label, field)) = access.next_entry::<String, String>()? {
            let field: RowField = field
                .parse()
                .map_err(|name| serde::de::Error::custom(SheetError::UnknownField(name)))?;
            mapping.insert(label, field);
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_mapping() {
        let mapping = ColumnMapping::default();
        assert_eq!(mapping.len(), 7);
        assert_eq!(mapping.labels().next(), Some("Číslo produktu"));
        assert_eq!(mapping.field("Dodané množství"), Some(RowField::DeliveredQty));
        assert_eq!(mapping.field(" Hmotnost v gramech "), Some(RowField::WeightG));
    }

    #[test]
    fn test_json_keeps_order() {
        let mapping: ColumnMapping =
            serde_json::from_str(r#"{"Qty": "delivered_qty", "Code": "product_number"}"#).unwrap();
        let labels: Vec<&str> = mapping.labels().collect();
        assert_eq!(labels, vec!["Qty", "Code"]);

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"Qty":"delivered_qty","Code":"product_number"}"#);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ColumnMapping, _> = serde_json::from_str(r#"{"Code": "sku"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("sku"));
    }

    #[test]
    fn test_insert_replaces_label() {
        let mut mapping = ColumnMapping::new().with("Code", RowField::ProductNumber);
        mapping.insert("Code", RowField::CustomsCode);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.field("Code"), Some(RowField::CustomsCode));
    }
}
