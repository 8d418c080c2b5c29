//! Item archetypes
//!
//! Nine fixed archetypes split into a positive and a negative pool. Pool
//! membership follows the `positive` flag, not the sign of `customers`, so
//! Budget Cut (0 customers) still counts as a negative item.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Item identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    DirectMail,
    Seo,
    Ads,
    Website,
    Branding,
    Email,
    DiyDisaster,
    BudgetCut,
    Competitor,
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemArchetype {
    pub kind: ItemKind,
    pub label: &'static str,
    pub icon: &'static str,
    /// Signed change in customers when caught
    pub customers: i32,
    pub color: Color,
    pub text_color: Color,
    pub positive: bool,
}

const BRAND_CYAN: Color = Color::rgb(0, 169, 197);
const BRAND_DARK: Color = Color::rgb(0, 61, 81);
const WHITE: Color = Color::rgb(255, 255, 255);

const fn good(kind: ItemKind, label: &'static str, icon: &'static str, color: Color) -> ItemArchetype {
    ItemArchetype {
        kind,
        label,
        icon,
        customers: 25,
        color,
        text_color: WHITE,
        positive: true,
    }
}

const fn bad(
    kind: ItemKind,
    label: &'static str,
    icon: &'static str,
    customers: i32,
    color: Color,
) -> ItemArchetype {
    ItemArchetype {
        kind,
        label,
        icon,
        customers,
        color,
        text_color: WHITE,
        positive: false,
    }
}

/// Channels worth catching (+25 customers each)
pub static POSITIVE_ITEMS: [ItemArchetype; 6] = [
    good(ItemKind::DirectMail, "Direct Mail", "📬", BRAND_CYAN),
    good(ItemKind::Seo, "SEO Campaign", "🔍", BRAND_DARK),
    good(ItemKind::Ads, "Online Ads", "📢", BRAND_CYAN),
    good(ItemKind::Website, "New Website", "💻", BRAND_DARK),
    good(ItemKind::Branding, "Identity", "✨", BRAND_CYAN),
    good(ItemKind::Email, "Email Blast", "📧", BRAND_DARK),
];

/// Obstacles
pub static NEGATIVE_ITEMS: [ItemArchetype; 3] = [
    bad(ItemKind::DiyDisaster, "Bad DIY", "🔨", -10, Color::rgb(239, 68, 68)),
    // Scare only: no score effect
    bad(ItemKind::BudgetCut, "Budget Cut", "✂️", 0, Color::rgb(153, 27, 27)),
    bad(ItemKind::Competitor, "Competitor", "📉", -15, Color::rgb(71, 85, 105)),
];

impl ItemKind {
    pub const ALL: [ItemKind; 9] = [
        ItemKind::DirectMail,
        ItemKind::Seo,
        ItemKind::Ads,
        ItemKind::Website,
        ItemKind::Branding,
        ItemKind::Email,
        ItemKind::DiyDisaster,
        ItemKind::BudgetCut,
        ItemKind::Competitor,
    ];

    /// Catalog entry for this kind
    pub fn archetype(self) -> &'static ItemArchetype {
        let (pool, index): (&'static [ItemArchetype], usize) = match self {
            ItemKind::DirectMail => (&POSITIVE_ITEMS, 0),
            ItemKind::Seo => (&POSITIVE_ITEMS, 1),
            ItemKind::Ads => (&POSITIVE_ITEMS, 2),
            ItemKind::Website => (&POSITIVE_ITEMS, 3),
            ItemKind::Branding => (&POSITIVE_ITEMS, 4),
            ItemKind::Email => (&POSITIVE_ITEMS, 5),
            ItemKind::DiyDisaster => (&NEGATIVE_ITEMS, 0),
            ItemKind::BudgetCut => (&NEGATIVE_ITEMS, 1),
            ItemKind::Competitor => (&NEGATIVE_ITEMS, 2),
        };
        &pool[index]
    }
}

/// Spawn pool for a polarity
pub fn pool(positive: bool) -> &'static [ItemArchetype] {
    if positive {
        &POSITIVE_ITEMS
    } else {
        &NEGATIVE_ITEMS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_partition_by_polarity_flag() {
        assert_eq!(POSITIVE_ITEMS.len() + NEGATIVE_ITEMS.len(), 9);
        assert!(POSITIVE_ITEMS.iter().all(|a| a.positive && a.customers == 25));
        assert!(NEGATIVE_ITEMS.iter().all(|a| !a.positive));
    }

    #[test]
    fn test_budget_cut_is_negative_with_zero_delta() {
        let cut = ItemKind::BudgetCut.archetype();
        assert_eq!(cut.customers, 0);
        assert!(!cut.positive);
        assert!(pool(false).iter().any(|a| a.kind == ItemKind::BudgetCut));
    }

    #[test]
    fn test_archetype_lookup_matches_kind() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.archetype().kind, kind);
        }
        let deltas: Vec<i32> = NEGATIVE_ITEMS.iter().map(|a| a.customers).collect();
        assert_eq!(deltas, vec![-10, 0, -15]);
    }
}
