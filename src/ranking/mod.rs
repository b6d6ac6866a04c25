//! Supplier evaluation and ranking
//!
//! A supplier is evaluated against an item list (matched lines, total,
//! match percentage, distance, lead days) and evaluations are ordered by one
//! of six sort modes. Sorting is stable: ties beyond a mode's keys keep
//! catalog order.

pub mod distance;

use serde::Serialize;
use std::cmp::Ordering;

use crate::core::catalog::Catalog;
use crate::entities::{ProcurementItem, Supplier};
use crate::matching::Matcher;
use distance::DistanceEntry;

/// Supplier sort modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// AI-recommended first, then rating descending
    #[default]
    Recommended,
    /// Total ascending, zero totals last
    Cheapest,
    /// Distance ascending
    Closest,
    /// Lead-time days ascending, unparseable last
    Fastest,
    /// Rating descending
    TopRated,
    /// Match percentage descending, then rating descending
    BestMatch,
}

impl SortMode {
    pub fn all() -> &'static [SortMode] {
        &[
            SortMode::Recommended,
            SortMode::Cheapest,
            SortMode::Closest,
            SortMode::Fastest,
            SortMode::TopRated,
            SortMode::BestMatch,
        ]
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Recommended => write!(f, "recommended"),
            SortMode::Cheapest => write!(f, "cheapest"),
            SortMode::Closest => write!(f, "closest"),
            SortMode::Fastest => write!(f, "fastest"),
            SortMode::TopRated => write!(f, "top-rated"),
            SortMode::BestMatch => write!(f, "best-match"),
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "recommended" | "ai" => Ok(SortMode::Recommended),
            "cheapest" | "price" => Ok(SortMode::Cheapest),
            "closest" | "distance" => Ok(SortMode::Closest),
            "fastest" | "lead-time" => Ok(SortMode::Fastest),
            "top-rated" | "rating" => Ok(SortMode::TopRated),
            "best-match" | "match" => Ok(SortMode::BestMatch),
            _ => Err(format!(
                "Invalid sort mode: {}. Use recommended, cheapest, closest, fastest, top-rated or best-match",
                s
            )),
        }
    }
}

/// Evaluation of one requested item at one supplier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEvaluation {
    pub product: String,
    pub quantity: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Supplier product or coverage entry that matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,

    /// Matched and in stock
    pub available: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// Zero unless available
    pub line_total: f64,

    /// Units on hand, when the supplier publishes stock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// A supplier evaluated against an item list
#[derive(Debug, Clone, Serialize)]
pub struct SupplierEvaluation<'a> {
    pub supplier: &'a Supplier,
    pub lines: Vec<LineEvaluation>,
    pub total: f64,
    pub match_percentage: u8,
    pub distance: DistanceEntry,
    pub lead_days: Option<u32>,
}

impl<'a> SupplierEvaluation<'a> {
    /// Evaluate `supplier` for `items`
    ///
    /// Suppliers with a stock table are matched product by product and only
    /// available products count. Suppliers without one are matched on
    /// coverage and priced at their fixed unit price.
    pub fn new(
        matcher: &Matcher<'_>,
        catalog: &Catalog,
        supplier: &'a Supplier,
        items: &[ProcurementItem],
    ) -> Self {
        let stock = catalog.stock_for(&supplier.id);

        let lines: Vec<LineEvaluation> = items
            .iter()
            .map(|item| {
                let qty = f64::from(item.quantity);
                let mut line = LineEvaluation {
                    product: item.product.clone(),
                    quantity: item.quantity,
                    unit: item.unit.clone(),
                    matched: None,
                    available: false,
                    unit_price: None,
                    line_total: 0.0,
                    stock: None,
                };

                match stock {
                    Some(table) => {
                        if let Some(found) = matcher.match_stock(&item.product, table) {
                            line.available = found.available;
                            line.unit_price = Some(found.price);
                            line.stock = Some(found.quantity);
                            if found.available {
                                line.line_total = found.price * qty;
                            }
                            line.matched = Some(found.product);
                        }
                    }
                    None => {
                        if let Some(entry) = matcher.matched_coverage(&item.product, &supplier.coverage)
                        {
                            line.matched = Some(entry.to_string());
                            line.available = true;
                            line.unit_price = Some(supplier.price);
                            line.line_total = supplier.price * qty;
                        }
                    }
                }
                line
            })
            .collect();

        let found = lines.iter().filter(|l| l.available).count();
        let total = lines.iter().map(|l| l.line_total).sum();

        tracing::debug!(
            supplier = %supplier.id,
            found,
            requested = items.len(),
            total,
            "supplier evaluated"
        );

        Self {
            supplier,
            match_percentage: match_percentage(found, items.len()),
            lines,
            total,
            distance: catalog.distances.lookup(&supplier.location),
            lead_days: parse_lead_days(&supplier.lead_time),
        }
    }

    /// Evaluation for plain catalog listings: no items, total is the
    /// supplier's listed unit price
    pub fn listing(catalog: &Catalog, supplier: &'a Supplier) -> Self {
        Self {
            supplier,
            lines: Vec::new(),
            total: supplier.price,
            match_percentage: 0,
            distance: catalog.distances.lookup(&supplier.location),
            lead_days: parse_lead_days(&supplier.lead_time),
        }
    }

    /// Number of requested items available here
    pub fn found(&self) -> usize {
        self.lines.iter().filter(|l| l.available).count()
    }

    /// Requested products this supplier cannot fill
    pub fn missing(&self) -> impl Iterator<Item = &LineEvaluation> {
        self.lines.iter().filter(|l| !l.available)
    }
}

/// Evaluate every catalog supplier for `items`, in catalog order
pub fn evaluate_all<'a>(catalog: &'a Catalog, items: &[ProcurementItem]) -> Vec<SupplierEvaluation<'a>> {
    let matcher = Matcher::default();
    catalog
        .suppliers
        .iter()
        .map(|s| SupplierEvaluation::new(&matcher, catalog, s, items))
        .collect()
}

/// Integer share of requested items found, rounded half up; 0 when nothing
/// was requested
pub fn match_percentage(found: usize, requested: usize) -> u8 {
    if requested == 0 {
        return 0;
    }
    let found = found.min(requested);
    ((found * 100 + requested / 2) / requested) as u8
}

/// Leading integer of a free-text lead time ("3-5 days" -> 3)
pub fn parse_lead_days(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn rating_desc(a: &Supplier, b: &Supplier) -> Ordering {
    b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
}

/// Comparator for one sort mode
pub fn compare(mode: SortMode, a: &SupplierEvaluation<'_>, b: &SupplierEvaluation<'_>) -> Ordering {
    match mode {
        SortMode::Recommended => b
            .supplier
            .ai_recommended
            .cmp(&a.supplier.ai_recommended)
            .then_with(|| rating_desc(a.supplier, b.supplier)),
        SortMode::Cheapest => {
            let a_zero = a.total <= 0.0;
            let b_zero = b.total <= 0.0;
            a_zero
                .cmp(&b_zero)
                .then_with(|| a.total.partial_cmp(&b.total).unwrap_or(Ordering::Equal))
        }
        SortMode::Closest => a
            .distance
            .km
            .partial_cmp(&b.distance.km)
            .unwrap_or(Ordering::Equal),
        SortMode::Fastest => a
            .lead_days
            .unwrap_or(u32::MAX)
            .cmp(&b.lead_days.unwrap_or(u32::MAX)),
        SortMode::TopRated => rating_desc(a.supplier, b.supplier),
        SortMode::BestMatch => b
            .match_percentage
            .cmp(&a.match_percentage)
            .then_with(|| rating_desc(a.supplier, b.supplier)),
    }
}

/// Stable in-place sort
pub fn sort_evaluations(evaluations: &mut [SupplierEvaluation<'_>], mode: SortMode) {
    evaluations.sort_by(|a, b| compare(mode, a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ProcurementItem> {
        vec![
            ProcurementItem::new("Indomie Goreng", 100),
            ProcurementItem::new("Bear Brand", 50),
            ProcurementItem::new("Chitato", 20),
        ]
    }

    fn ids(evals: &[SupplierEvaluation<'_>]) -> Vec<String> {
        evals.iter().map(|e| e.supplier.id.clone()).collect()
    }

    #[test]
    fn test_match_percentage() {
        assert_eq!(match_percentage(0, 0), 0);
        assert_eq!(match_percentage(0, 3), 0);
        assert_eq!(match_percentage(1, 3), 33);
        assert_eq!(match_percentage(2, 3), 67);
        assert_eq!(match_percentage(1, 2), 50);
        assert_eq!(match_percentage(3, 3), 100);
        assert_eq!(match_percentage(5, 3), 100);
    }

    #[test]
    fn test_parse_lead_days() {
        assert_eq!(parse_lead_days("3-5 days"), Some(3));
        assert_eq!(parse_lead_days("  14 days"), Some(14));
        assert_eq!(parse_lead_days("7"), Some(7));
        assert_eq!(parse_lead_days("Same day"), None);
        assert_eq!(parse_lead_days(""), None);
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("top_rated".parse::<SortMode>().unwrap(), SortMode::TopRated);
        assert_eq!("Best-Match".parse::<SortMode>().unwrap(), SortMode::BestMatch);
        for mode in SortMode::all() {
            assert_eq!(mode.to_string().parse::<SortMode>().unwrap(), *mode);
        }
        assert!("random".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_evaluation_against_catalog() {
        let catalog = Catalog::embedded().unwrap();
        let evals = evaluate_all(&catalog, &items());

        let sup1 = evals.iter().find(|e| e.supplier.id == "SUP-001").unwrap();
        assert_eq!(sup1.found(), 1);
        assert_eq!(sup1.match_percentage, 33);
        assert_eq!(sup1.total, 310_000.0);
        // Chitato is listed but out of stock
        let chitato = &sup1.lines[2];
        assert_eq!(chitato.matched.as_deref(), Some("Chitato Sapi Panggang"));
        assert!(!chitato.available);
        assert_eq!(chitato.line_total, 0.0);

        // coverage-only supplier priced at its fixed price
        let sup6 = evals.iter().find(|e| e.supplier.id == "SUP-006").unwrap();
        assert_eq!(sup6.total, 600_000.0);
        assert_eq!(sup6.lines[1].matched.as_deref(), Some("Susu Kental Manis"));
    }

    #[test]
    fn test_cheapest_pushes_zero_totals_last() {
        let catalog = Catalog::embedded().unwrap();
        let mut evals = evaluate_all(&catalog, &items());
        sort_evaluations(&mut evals, SortMode::Cheapest);
        assert_eq!(
            ids(&evals),
            ["SUP-004", "SUP-001", "SUP-002", "SUP-006", "SUP-003", "SUP-005"]
        );
        // zero totals after positive ones regardless of rating
        let first_zero = evals.iter().position(|e| e.total == 0.0).unwrap();
        assert!(evals[..first_zero].iter().all(|e| e.total > 0.0));
        assert!(evals[first_zero..].iter().all(|e| e.total == 0.0));
    }

    #[test]
    fn test_closest_is_non_decreasing_with_default() {
        let catalog = Catalog::embedded().unwrap();
        let mut evals = evaluate_all(&catalog, &items());
        sort_evaluations(&mut evals, SortMode::Closest);
        for pair in evals.windows(2) {
            assert!(pair[0].distance.km <= pair[1].distance.km);
        }
        // Bogor is not in the distance table
        let last = evals.last().unwrap();
        assert_eq!(last.supplier.location, "Bogor");
        assert_eq!(last.distance.km, distance::DEFAULT_DISTANCE_KM);
        assert_eq!(last.distance.eta, distance::DEFAULT_ETA);
    }

    #[test]
    fn test_recommended_then_rating() {
        let catalog = Catalog::embedded().unwrap();
        let mut evals = evaluate_all(&catalog, &[]);
        sort_evaluations(&mut evals, SortMode::Recommended);
        assert_eq!(
            ids(&evals),
            ["SUP-001", "SUP-003", "SUP-004", "SUP-002", "SUP-005", "SUP-006"]
        );
    }

    #[test]
    fn test_fastest_puts_unparseable_last() {
        let catalog = Catalog::embedded().unwrap();
        let mut evals = evaluate_all(&catalog, &[]);
        sort_evaluations(&mut evals, SortMode::Fastest);
        assert_eq!(evals.last().unwrap().supplier.lead_time, "Same day");
        assert_eq!(evals[0].lead_days, Some(1));
    }

    #[test]
    fn test_best_match_then_rating() {
        let catalog = Catalog::embedded().unwrap();
        let wanted = vec![
            ProcurementItem::new("Indomie Goreng", 10),
            ProcurementItem::new("Teh Botol", 10),
        ];
        let mut evals = evaluate_all(&catalog, &wanted);
        sort_evaluations(&mut evals, SortMode::BestMatch);
        assert_eq!(evals[0].supplier.id, "SUP-001");
        assert_eq!(evals[0].match_percentage, 100);
        // SUP-005 covers beverages only (50%)
        assert_eq!(evals[1].supplier.id, "SUP-005");
        for pair in evals.windows(2) {
            assert!(pair[0].match_percentage >= pair[1].match_percentage);
        }
    }

    #[test]
    fn test_top_rated_is_non_increasing() {
        let catalog = Catalog::embedded().unwrap();
        let mut evals = evaluate_all(&catalog, &[]);
        sort_evaluations(&mut evals, SortMode::TopRated);
        for pair in evals.windows(2) {
            assert!(pair[0].supplier.rating >= pair[1].supplier.rating);
        }
    }

    #[test]
    fn test_listing_uses_supplier_price() {
        let catalog = Catalog::embedded().unwrap();
        let mut evals: Vec<_> = catalog
            .suppliers
            .iter()
            .map(|s| SupplierEvaluation::listing(&catalog, s))
            .collect();
        sort_evaluations(&mut evals, SortMode::Cheapest);
        assert_eq!(evals[0].supplier.id, "SUP-001");
        assert_eq!(evals.last().unwrap().supplier.id, "SUP-003");
    }
}
