//! Procurement item - one requested product line

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

/// A requested product with quantity and optional price target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementItem {
    /// Free-text product name as typed by the buyer
    pub product: String,

    /// Requested quantity
    pub quantity: u32,

    /// Price the buyer hopes to pay per unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,

    /// Unit label (pcs, carton, unit, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ProcurementItem {
    pub fn new(product: impl Into<String>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            quantity,
            target_price: None,
            unit: None,
        }
    }

    pub fn with_target_price(mut self, price: f64) -> Self {
        self.target_price = Some(price);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Unit label for display, "pcs" when unset
    pub fn unit_label(&self) -> &str {
        self.unit.as_deref().unwrap_or("pcs")
    }

    /// Parse a `NAME:QTY[:PRICE[:UNIT]]` item spec
    pub fn parse_spec(input: &str) -> Result<Self, ItemParseError> {
        let parts: Vec<&str> = input.split(':').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 4 {
            return Err(ItemParseError::Format(input.to_string()));
        }

        let product = parts[0];
        if product.is_empty() {
            return Err(ItemParseError::EmptyName(input.to_string()));
        }

        let quantity = parse_quantity(parts[1])?;
        let mut item = ProcurementItem::new(product, quantity);

        if let Some(price) = parts.get(2).filter(|p| !p.is_empty()) {
            item.target_price = Some(parse_price(price)?);
        }
        if let Some(unit) = parts.get(3).filter(|u| !u.is_empty()) {
            item.unit = Some(unit.to_string());
        }

        Ok(item)
    }

    /// Read items from CSV with headers `product,quantity[,target_price][,unit]`
    ///
    /// Header names are matched case-insensitively; `name` and `qty` are
    /// accepted as aliases.
    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Self>, ItemParseError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| ItemParseError::Csv(e.to_string()))?
            .clone();
        let header_map = build_header_map(&headers);

        let product_col = column(&header_map, &["product", "name"])
            .ok_or_else(|| ItemParseError::MissingColumn("product".to_string()))?;
        let quantity_col = column(&header_map, &["quantity", "qty"])
            .ok_or_else(|| ItemParseError::MissingColumn("quantity".to_string()))?;
        let price_col = column(&header_map, &["target_price", "price"]);
        let unit_col = column(&header_map, &["unit"]);

        let mut items = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| ItemParseError::Csv(format!("row {}: {}", row + 2, e)))?;
            let field = |idx: usize| record.get(idx).map(str::trim).filter(|s| !s.is_empty());

            let Some(product) = field(product_col) else {
                // blank lines
                continue;
            };
            let quantity = parse_quantity(field(quantity_col).unwrap_or(""))?;
            let mut item = ProcurementItem::new(product, quantity);
            if let Some(price) = price_col.and_then(field) {
                item.target_price = Some(parse_price(price)?);
            }
            if let Some(unit) = unit_col.and_then(field) {
                item.unit = Some(unit.to_string());
            }
            items.push(item);
        }

        Ok(items)
    }
}

fn build_header_map(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| header_map.get(*n).copied())
}

fn parse_quantity(raw: &str) -> Result<u32, ItemParseError> {
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(ItemParseError::Quantity(raw.to_string())),
        Ok(q) => Ok(q),
    }
}

fn parse_price(raw: &str) -> Result<f64, ItemParseError> {
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| ItemParseError::Price(raw.to_string()))
}

/// Errors reading item specs or item CSV files
#[derive(Debug, Error, Diagnostic)]
pub enum ItemParseError {
    #[error("invalid item '{0}'")]
    #[diagnostic(
        code(baskit::item::format),
        help("use NAME:QTY, NAME:QTY:TARGET_PRICE or NAME:QTY:TARGET_PRICE:UNIT")
    )]
    Format(String),

    #[error("item '{0}' has an empty product name")]
    #[diagnostic(code(baskit::item::name))]
    EmptyName(String),

    #[error("invalid quantity '{0}'")]
    #[diagnostic(code(baskit::item::quantity), help("quantities are whole numbers of at least 1"))]
    Quantity(String),

    #[error("invalid target price '{0}'")]
    #[diagnostic(code(baskit::item::price))]
    Price(String),

    #[error("item CSV is missing the '{0}' column")]
    #[diagnostic(code(baskit::item::csv_column))]
    MissingColumn(String),

    #[error("item CSV error: {0}")]
    #[diagnostic(code(baskit::item::csv))]
    Csv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_name_and_quantity() {
        let item = ProcurementItem::parse_spec("Indomie Goreng:100").unwrap();
        assert_eq!(item.product, "Indomie Goreng");
        assert_eq!(item.quantity, 100);
        assert_eq!(item.target_price, None);
        assert_eq!(item.unit_label(), "pcs");
    }

    #[test]
    fn test_parse_spec_full() {
        let item = ProcurementItem::parse_spec(" Bear Brand : 48 : 9500 : can ").unwrap();
        assert_eq!(item.product, "Bear Brand");
        assert_eq!(item.quantity, 48);
        assert_eq!(item.target_price, Some(9500.0));
        assert_eq!(item.unit.as_deref(), Some("can"));
    }

    #[test]
    fn test_parse_spec_skips_empty_price() {
        let item = ProcurementItem::parse_spec("Chitato:12::bag").unwrap();
        assert_eq!(item.target_price, None);
        assert_eq!(item.unit.as_deref(), Some("bag"));
    }

    #[test]
    fn test_parse_spec_errors() {
        assert!(matches!(
            ProcurementItem::parse_spec("Indomie"),
            Err(ItemParseError::Format(_))
        ));
        assert!(matches!(
            ProcurementItem::parse_spec(":5"),
            Err(ItemParseError::EmptyName(_))
        ));
        assert!(matches!(
            ProcurementItem::parse_spec("Indomie:0"),
            Err(ItemParseError::Quantity(_))
        ));
        assert!(matches!(
            ProcurementItem::parse_spec("Indomie:ten"),
            Err(ItemParseError::Quantity(_))
        ));
        assert!(matches!(
            ProcurementItem::parse_spec("Indomie:1:-3"),
            Err(ItemParseError::Price(_))
        ));
    }

    #[test]
    fn test_read_csv() {
        let data = "Product,Qty,Target_Price,Unit\nIndomie Goreng,100,3000,pcs\n,,,\nChitato,20,,\n";
        let items = ProcurementItem::read_csv(data.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].target_price, Some(3000.0));
        assert_eq!(items[1].product, "Chitato");
        assert_eq!(items[1].unit, None);
    }

    #[test]
    fn test_read_csv_missing_quantity_column() {
        let data = "product\nIndomie\n";
        assert!(matches!(
            ProcurementItem::read_csv(data.as_bytes()),
            Err(ItemParseError::MissingColumn(_))
        ));
    }
}
