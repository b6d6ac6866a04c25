//! Ordered category rule table
//!
//! Rules are evaluated top to bottom and the first rule whose trigger list
//! hits the requested name decides the outcome. A name containing keywords
//! of two categories (say "mie" and "snack") is classified under whichever
//! rule comes first here.

/// One product category rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Category name for logs and display
    pub category: &'static str,

    /// Substrings looked for in the normalized requested name
    pub triggers: &'static [&'static str],

    /// Substrings looked for in each lowercased coverage entry
    pub accepts: &'static [&'static str],
}

impl CategoryRule {
    /// Whether the normalized name hits one of the trigger keywords
    pub fn triggered_by(&self, normalized_name: &str) -> bool {
        self.triggers.iter().any(|kw| normalized_name.contains(kw))
    }

    /// Whether a lowercased coverage entry carries an acceptance keyword
    pub fn accepts_coverage(&self, coverage_lower: &str) -> bool {
        self.accepts.iter().any(|kw| coverage_lower.contains(kw))
    }

    /// Whether a lowercased supplier product name belongs to this category
    pub fn covers_product(&self, product_lower: &str) -> bool {
        self.triggers
            .iter()
            .chain(self.accepts.iter())
            .any(|kw| product_lower.contains(kw))
    }
}

/// Default rules in priority order
pub const DEFAULT_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: "noodles",
        triggers: &["indomie", "mie", "noodle", "ramen", "sarimi"],
        accepts: &["noodle", "mie"],
    },
    CategoryRule {
        category: "dairy",
        triggers: &["bear brand", "susu", "milk", "dairy", "dancow", "keju", "cheese"],
        accepts: &["dairy", "milk", "susu"],
    },
    CategoryRule {
        category: "motorcycles",
        triggers: &["motor", "honda", "yamaha", "vario", "scoopy", "beat"],
        accepts: &["motor"],
    },
    CategoryRule {
        category: "snacks",
        triggers: &["snack", "chitato", "keripik", "chips", "biskuit", "biscuit", "qtela"],
        accepts: &["snack", "biscuit", "chips"],
    },
    CategoryRule {
        category: "beverages",
        triggers: &[
            "teh", "tea", "kopi", "coffee", "minuman", "drink", "aqua", "air mineral", "water",
            "juice", "sosro",
        ],
        accepts: &["beverage", "drink", "water", "tea"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = DEFAULT_RULES.iter().map(|r| r.category).collect();
        assert_eq!(
            names,
            ["noodles", "dairy", "motorcycles", "snacks", "beverages"]
        );
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for rule in DEFAULT_RULES {
            for kw in rule.triggers.iter().chain(rule.accepts.iter()) {
                assert_eq!(*kw, kw.to_lowercase(), "{} in {}", kw, rule.category);
            }
        }
    }

    #[test]
    fn test_covers_product_uses_both_lists() {
        let dairy = &DEFAULT_RULES[1];
        assert!(dairy.covers_product("bear brand 189ml"));
        assert!(dairy.covers_product("uht milk 1l"));
        assert!(!dairy.covers_product("indomie goreng"));
    }
}
