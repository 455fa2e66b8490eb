//! Invoice row models shared by parsers and the spreadsheet writer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single reconstructed invoice line item.
///
/// Numeric fields hold canonical decimal strings (dot separator, no
/// thousands separators) exactly as they appeared on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRow {
    /// Supplier product code, prefix included (e.g. `VEN-161.167`).
    pub product_number: String,

    /// Product description.
    pub product_name: String,

    /// Customs tariff code. Not printed by supported suppliers.
    #[serde(default)]
    pub customs_code: String,

    /// Weight in grams. Not printed by supported suppliers.
    #[serde(default)]
    pub weight_g: String,

    /// Delivered quantity.
    pub delivered_qty: String,

    /// Net price per unit.
    pub net_unit_price: String,

    /// Total price for the delivered quantity.
    pub total_price: String,
}

impl InvoiceRow {
    /// Value of a single field, as written to a spreadsheet cell.
    pub fn field(&self, field: RowField) -> &str {
        match field {
            RowField::ProductNumber => &self.product_number,
            RowField::ProductName => &self.product_name,
            RowField::CustomsCode => &self.customs_code,
            RowField::WeightG => &self.weight_g,
            RowField::DeliveredQty => &self.delivered_qty,
            RowField::NetUnitPrice => &self.net_unit_price,
            RowField::TotalPrice => &self.total_price,
        }
    }
}

/// Addressable fields of an [`InvoiceRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowField {
    ProductNumber,
    ProductName,
    CustomsCode,
    #[serde(rename = "weight_g")]
    WeightG,
    DeliveredQty,
    NetUnitPrice,
    TotalPrice,
}

impl RowField {
    /// All fields in output column order.
    pub const ALL: [RowField; 7] = [
        RowField::ProductNumber,
        RowField::ProductName,
        RowField::CustomsCode,
        RowField::WeightG,
        RowField::DeliveredQty,
        RowField::NetUnitPrice,
        RowField::TotalPrice,
    ];

    /// Key used in JSON mappings and CSV headers.
    pub fn key(&self) -> &'static str {
        match self {
            RowField::ProductNumber => "product_number",
            RowField::ProductName => "product_name",
            RowField::CustomsCode => "customs_code",
            RowField::WeightG => "weight_g",
            RowField::DeliveredQty => "delivered_qty",
            RowField::NetUnitPrice => "net_unit_price",
            RowField::TotalPrice => "total_price",
        }
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RowField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RowField::ALL
            .into_iter()
            .find(|field| field.key() == s.trim())
            .ok_or_else(|| s.to_string())
    }
}

/// Outcome of parsing one document with a supplier parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    /// Document-level facts (supplier key, page and line counts).
    pub header: serde_json::Map<String, serde_json::Value>,

    /// Reconstructed rows in document order.
    pub items: Vec<InvoiceRow>,

    /// Diagnostics in the order they were raised.
    pub warnings: Vec<String>,
}

impl ParseResult {
    /// Whether any diagnostics were raised.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
