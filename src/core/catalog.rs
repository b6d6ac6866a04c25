//! Catalog loading
//!
//! The marketplace fixtures (suppliers, stock, distances, demands, quotes,
//! sales orders, loyalty and partner data) live in one YAML document. A
//! default copy is embedded in the binary; a project may override it with
//! `.baskit/catalog.yaml`.

use miette::Diagnostic;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::project::Project;
use crate::entities::{
    Campaign, DistributorDemand, Member, Partner, Receipt, SalesOrder, StockRecord, Supplier,
    SupplierQuote, Transaction,
};
use crate::ranking::distance::DistanceTable;
use crate::yaml::YamlSyntaxError;

#[derive(Embed)]
#[folder = "data/"]
struct EmbeddedData;

const CATALOG_FILE: &str = "catalog.yaml";

/// Per-supplier stock: supplier id -> supplier product name -> record
pub type StockTable = BTreeMap<String, BTreeMap<String, StockRecord>>;

/// Loyalty module fixtures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoyaltyData {
    pub campaigns: Vec<Campaign>,
    pub members: Vec<Member>,
    pub receipts: Vec<Receipt>,
}

/// Partner portal fixtures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerData {
    pub partners: Vec<Partner>,
    pub transactions: Vec<Transaction>,
}

/// The full marketplace catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub suppliers: Vec<Supplier>,

    #[serde(default)]
    pub stock: StockTable,

    #[serde(default)]
    pub distances: DistanceTable,

    #[serde(default)]
    pub demands: Vec<DistributorDemand>,

    #[serde(default)]
    pub quotes: Vec<SupplierQuote>,

    #[serde(default)]
    pub sales_orders: Vec<SalesOrder>,

    #[serde(default)]
    pub loyalty: LoyaltyData,

    #[serde(default)]
    pub partners: PartnerData,
}

impl Catalog {
    /// Raw YAML of the embedded default catalog
    pub fn default_source() -> Result<String, CatalogError> {
        let file = EmbeddedData::get(CATALOG_FILE).ok_or(CatalogError::MissingEmbedded)?;
        String::from_utf8(file.data.into_owned()).map_err(|_| CatalogError::MissingEmbedded)
    }

    /// The embedded default catalog
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::parse(&Self::default_source()?, "<embedded catalog.yaml>")
    }

    /// Parse a catalog document, reporting YAML errors with source spans
    pub fn parse(source: &str, filename: &str) -> Result<Self, CatalogError> {
        serde_yml::from_str(source)
            .map_err(|e| CatalogError::Syntax(YamlSyntaxError::from_serde_error(&e, source, filename)))
    }

    /// Read a catalog file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    /// The project's override when present, otherwise the embedded catalog
    pub fn load(project: Option<&Project>) -> Result<Self, CatalogError> {
        if let Some(project) = project {
            let path = project.catalog_path();
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading project catalog");
                return Self::from_file(&path);
            }
        }
        tracing::debug!("loading embedded catalog");
        Self::embedded()
    }

    /// Supplier by catalog key, case-insensitive
    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        let id = id.trim();
        self.suppliers.iter().find(|s| s.id.eq_ignore_ascii_case(id))
    }

    /// Stock table of one supplier, if it has one
    pub fn stock_for(&self, supplier_id: &str) -> Option<&BTreeMap<String, StockRecord>> {
        self.stock.get(supplier_id)
    }

    pub fn demand(&self, id: &str) -> Option<&DistributorDemand> {
        let id = id.trim();
        self.demands.iter().find(|d| d.id.eq_ignore_ascii_case(id))
    }

    /// Quotes answering a demand, in catalog order
    pub fn quotes_for(&self, demand_id: &str) -> Vec<&SupplierQuote> {
        self.quotes.iter().filter(|q| q.demand_id == demand_id).collect()
    }

    /// Quote references the catalog cannot resolve
    pub fn dangling_refs(&self, quote: &SupplierQuote) -> Vec<DanglingRef> {
        let mut refs = Vec::new();
        if self.demand(&quote.demand_id).is_none() {
            refs.push(DanglingRef::Demand(quote.demand_id.clone()));
        }
        if self.supplier(&quote.supplier_id).is_none() {
            refs.push(DanglingRef::Supplier(quote.supplier_id.clone()));
        }
        refs
    }

    pub fn campaign(&self, id: &str) -> Option<&Campaign> {
        let id = id.trim();
        self.loyalty.campaigns.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        let id = id.trim();
        self.loyalty.members.iter().find(|m| m.id.eq_ignore_ascii_case(id))
    }

    pub fn partner(&self, id: &str) -> Option<&Partner> {
        let id = id.trim();
        self.partners.partners.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        let id = id.trim();
        self.partners
            .transactions
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
    }
}
/// A quote reference that points at nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingRef {
    Demand(String),
    Supplier(String),
}

impl std::fmt::Display for DanglingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DanglingRef::Demand(id) => write!(f, "unknown demand {}", id),
            DanglingRef::Supplier(id) => write!(f, "unknown supplier {}", id),
        }
    }
}

/// Errors loading a catalog
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("cannot read catalog {path:?}: {message}")]
    #[diagnostic(code(baskit::catalog::io))]
    Io { path: PathBuf, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("embedded catalog is missing from this build")]
    #[diagnostic(code(baskit::catalog::embedded))]
    MissingEmbedded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.suppliers.len() >= 6);
        assert!(!catalog.sales_orders.is_empty());
        assert!(!catalog.loyalty.campaigns.is_empty());
        assert!(!catalog.partners.transactions.is_empty());
    }

    #[test]
    fn test_every_stock_table_belongs_to_a_supplier() {
        let catalog = Catalog::embedded().unwrap();
        for supplier_id in catalog.stock.keys() {
            assert!(catalog.supplier(supplier_id).is_some(), "{}", supplier_id);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.supplier(" sup-001 ").unwrap().id, "SUP-001");
        assert!(catalog.supplier("SUP-404").is_none());
    }

    #[test]
    fn test_dangling_quote_refs_are_reported() {
        let catalog = Catalog::embedded().unwrap();
        let orphan = catalog.quotes.iter().find(|q| q.id == "QT-005").unwrap();
        assert_eq!(
            catalog.dangling_refs(orphan),
            vec![
                DanglingRef::Demand("DMD-009".into()),
                DanglingRef::Supplier("SUP-099".into())
            ]
        );
        let fine = catalog.quotes.iter().find(|q| q.id == "QT-001").unwrap();
        assert!(catalog.dangling_refs(fine).is_empty());
    }

    #[test]
    fn test_parse_error_has_diagnostic() {
        let err = Catalog::parse("suppliers: [\n", "broken.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Syntax(_)));
    }

    #[test]
    fn test_project_override_is_used() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(
            project.catalog_path(),
            "suppliers:\n  - id: SUP-X\n    name: Only One\n    rating: 3.0\n    price: 1\n    lead_time: 1 day\n    location: Depok\n",
        )
        .unwrap();

        let catalog = Catalog::load(Some(&project)).unwrap();
        assert_eq!(catalog.suppliers.len(), 1);
        assert!(catalog.sales_orders.is_empty());
    }
}
