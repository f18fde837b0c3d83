//! Derived views over the item collection.
//!
//! Pure functions: no mutation, no I/O. Each call recomputes from the slice
//! it is given. All sorts are stable, so items with equal keys keep the
//! collection's insertion order.

use crate::types::{Item, StoreLabel};
use std::collections::HashMap;

/// Maximum number of quick-fill name suggestions.
pub const SUGGESTION_LIMIT: usize = 8;

/// Maximum number of remembered favorites.
pub const FAVORITE_LIMIT: usize = 20;

/// Active store filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Filter {
    /// Show every store.
    #[default]
    All,
    /// Show a single store.
    Store(StoreLabel),
}

impl Filter {
    fn admits(&self, store: StoreLabel) -> bool {
        match self {
            Filter::All => true,
            Filter::Store(label) => *label == store,
        }
    }
}

/// One store's slice of the list.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreSection {
    pub store: StoreLabel,
    pub items: Vec<Item>,
}

/// A name offered as an autocomplete hint while typing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// First-seen spelling of the name.
    pub name: String,
    /// Summed purchase count across same-named items.
    pub count: u32,
}

/// A remembered name for quick re-adding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Favorite {
    /// First-seen spelling of the name.
    pub name: String,
    /// Summed purchase count across same-named items purchased >= 2 times.
    pub total: u32,
}

/// Group the collection into one section per store label.
///
/// Every label in the fixed vocabulary gets a section, empty or not. A
/// section holds the items targeted at its store that the filter admits,
/// unpurchased first.
pub fn grouped_lists(items: &[Item], filter: Filter) -> Vec<StoreSection> {
    StoreLabel::ALL
        .iter()
        .map(|&store| {
            let mut section: Vec<Item> = items
                .iter()
                .filter(|it| it.store == store && filter.admits(it.store))
                .cloned()
                .collect();

            // Stable: equal `needed` keeps insertion order.
            section.sort_by_key(|it| !it.needed);

            StoreSection {
                store,
                items: section,
            }
        })
        .collect()
}

/// Top purchased names, for quick-fill while typing.
///
/// Items are grouped by case-insensitive name; every member's purchase count
/// contributes to the group sum. Groups with a zero sum are dropped.
pub fn suggestions(items: &[Item]) -> Vec<Suggestion> {
    let mut ranked: Vec<Suggestion> = aggregate_by_name(items, 1)
        .into_iter()
        .map(|(name, count)| Suggestion { name, count })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(SUGGESTION_LIMIT);
    ranked
}

/// Remembered favorites: names bought often enough to quick-add again.
///
/// Like [`suggestions`], but only members purchased at least twice contribute
/// to the group total.
pub fn favorites(items: &[Item]) -> Vec<Favorite> {
    let mut ranked: Vec<Favorite> = aggregate_by_name(items, 2)
        .into_iter()
        .map(|(name, total)| Favorite { name, total })
        .collect();

    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked.truncate(FAVORITE_LIMIT);
    ranked
}

/// Sum purchase counts by case-insensitive name, counting only members with
/// `purchase_count >= min_count`. Returns groups with a positive sum, in
/// first-seen order.
fn aggregate_by_name(items: &[Item], min_count: u32) -> Vec<(String, u32)> {
    let mut totals: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = item.name.to_lowercase();
        let slot = *index.entry(key).or_insert_with(|| {
            totals.push((item.name.clone(), 0));
            totals.len() - 1
        });

        if item.purchase_count >= min_count {
            totals[slot].1 += item.purchase_count;
        }
    }

    totals.retain(|(_, total)| *total > 0);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(name: &str, store: StoreLabel, needed: bool, purchase_count: u32) -> Item {
        let mut it = Item::new(name, 1, store);
        it.needed = needed;
        it.purchase_count = purchase_count;
        it
    }

    #[test]
    fn test_grouped_lists_one_section_per_store() {
        let sections = grouped_lists(&[], Filter::All);
        assert_eq!(sections.len(), StoreLabel::ALL.len());
        assert!(sections.iter().all(|s| s.items.is_empty()));
    }

    #[test]
    fn test_grouped_lists_unpurchased_first_stable() {
        let items = vec![
            item("Milk", StoreLabel::Costco, false, 0),
            item("Eggs", StoreLabel::Costco, true, 0),
            item("Bread", StoreLabel::Costco, false, 0),
            item("Butter", StoreLabel::Costco, true, 0),
        ];

        let sections = grouped_lists(&items, Filter::All);
        let costco = sections
            .iter()
            .find(|s| s.store == StoreLabel::Costco)
            .unwrap();

        let names: Vec<&str> = costco.items.iter().map(|it| it.name.as_str()).collect();
        // Needed items first, insertion order preserved within each half.
        assert_eq!(names, vec!["Eggs", "Butter", "Milk", "Bread"]);
    }

    #[test]
    fn test_grouped_lists_filter_empties_other_stores() {
        let items = vec![
            item("Milk", StoreLabel::Costco, true, 0),
            item("Bread", StoreLabel::Walmart, true, 0),
        ];

        let sections = grouped_lists(&items, Filter::Store(StoreLabel::Costco));
        for section in sections {
            if section.store == StoreLabel::Costco {
                assert_eq!(section.items.len(), 1);
            } else {
                assert!(section.items.is_empty());
            }
        }
    }

    #[test]
    fn test_suggestions_aggregate_case_insensitive() {
        let items = vec![
            item("Milk", StoreLabel::Costco, false, 3),
            item("milk", StoreLabel::Walmart, false, 2),
            item("Eggs", StoreLabel::Costco, true, 0),
        ];

        let suggestions = suggestions(&items);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Milk");
        assert_eq!(suggestions[0].count, 5);
    }

    #[test]
    fn test_suggestions_limit_and_order() {
        let mut items = Vec::new();
        for i in 1..=12u32 {
            items.push(item(&format!("item{}", i), StoreLabel::Other, false, i));
        }

        let suggestions = suggestions(&items);
        assert_eq!(suggestions.len(), SUGGESTION_LIMIT);
        assert_eq!(suggestions[0].name, "item12");
        assert!(suggestions
            .windows(2)
            .all(|pair| pair[0].count >= pair[1].count));
    }

    #[test]
    fn test_suggestions_ties_keep_insertion_order() {
        let items = vec![
            item("Apples", StoreLabel::Other, false, 2),
            item("Bananas", StoreLabel::Other, false, 2),
            item("Cherries", StoreLabel::Other, false, 2),
        ];

        let suggestions = suggestions(&items);
        let names: Vec<&str> = suggestions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Apples", "Bananas", "Cherries"]);
    }

    #[test]
    fn test_favorites_require_two_purchases() {
        let items = vec![
            item("Milk", StoreLabel::Costco, false, 1),
            item("Eggs", StoreLabel::Costco, false, 2),
        ];

        let favorites = favorites(&items);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "Eggs");
        assert_eq!(favorites[0].total, 2);
    }

    #[test]
    fn test_favorites_single_purchase_members_excluded_from_total() {
        // Two "Milk" rows: one purchased once (below threshold), one thrice.
        let items = vec![
            item("Milk", StoreLabel::Costco, false, 1),
            item("milk", StoreLabel::Walmart, false, 3),
        ];

        let favorites = favorites(&items);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].total, 3);
    }

    #[test]
    fn test_favorites_limit() {
        let mut items = Vec::new();
        for i in 0..25u32 {
            items.push(item(&format!("fav{}", i), StoreLabel::Other, false, 2 + i));
        }

        assert_eq!(favorites(&items).len(), FAVORITE_LIMIT);
    }

    proptest! {
        /// Every suggestion's count equals the sum of purchase counts across
        /// the items sharing its name case-insensitively.
        #[test]
        fn prop_suggestion_counts_match_sums(counts in proptest::collection::vec(0u32..20, 1..40)) {
            let names = ["Milk", "milk", "Eggs", "EGGS", "Bread"];
            let items: Vec<Item> = counts
                .iter()
                .enumerate()
                .map(|(i, &c)| item(names[i % names.len()], StoreLabel::Other, false, c))
                .collect();

            for suggestion in suggestions(&items) {
                let expected: u32 = items
                    .iter()
                    .filter(|it| it.name.eq_ignore_ascii_case(&suggestion.name))
                    .map(|it| it.purchase_count)
                    .sum();
                prop_assert!(suggestion.count > 0);
                prop_assert_eq!(suggestion.count, expected);
            }
        }
    }
}
