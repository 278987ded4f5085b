//! Property tests for the category mapping.

use proptest::prelude::*;

use census_model::{Category, CategoryMapper};

fn known_index() -> impl Strategy<Value = usize> {
    0..CategoryMapper::all_labels().len()
}

/// Flip the case of characters selected by `mask`.
fn mix_case(input: &str, mask: &[bool]) -> String {
    input
        .chars()
        .zip(mask.iter().cycle())
        .map(|(ch, upper)| {
            if *upper {
                ch.to_uppercase().collect::<String>()
            } else {
                ch.to_lowercase().collect::<String>()
            }
        })
        .collect()
}

proptest! {
    /// label -> display name -> label is the identity.
    #[test]
    fn label_round_trip(index in known_index()) {
        let label = CategoryMapper::all_labels()[index];
        let display = CategoryMapper::to_display_name(label).unwrap();
        prop_assert_eq!(CategoryMapper::to_label(display).unwrap(), label);
    }

    /// display name -> label -> display name is the identity.
    #[test]
    fn display_round_trip(index in known_index()) {
        let display = CategoryMapper::all_display_names()[index];
        let label = CategoryMapper::to_label(display).unwrap();
        prop_assert_eq!(CategoryMapper::to_display_name(label).unwrap(), display);
    }

    /// Any casing of a label or display name parses to the same category.
    #[test]
    fn parse_ignores_case(index in known_index(), mask in prop::collection::vec(any::<bool>(), 1..8)) {
        let label = CategoryMapper::all_labels()[index];
        let display = CategoryMapper::all_display_names()[index];
        prop_assert_eq!(
            CategoryMapper::parse_from_external(&mix_case(label, &mask)).unwrap(),
            display
        );
        prop_assert_eq!(
            CategoryMapper::parse_from_external(&mix_case(display, &mask)).unwrap(),
            display
        );
    }

    /// Parsing never panics and only accepts table entries.
    #[test]
    fn parse_accepts_only_table_entries(input in "\\PC{0,24}") {
        if let Ok(display) = CategoryMapper::parse_from_external(&input) {
            prop_assert!(CategoryMapper::is_valid_display_name(display));
            let lowered = input.trim().to_lowercase();
            let category = Category::from_display_name(display).unwrap();
            prop_assert!(
                category.label().to_lowercase() == lowered
                    || category.display_name().to_lowercase() == lowered
            );
        }
    }
}

#[test]
fn tables_have_matching_lengths() {
    assert_eq!(CategoryMapper::all_labels().len(), 7);
    assert_eq!(
        CategoryMapper::all_labels().len(),
        CategoryMapper::all_display_names().len()
    );
    assert_eq!(Category::all().count(), 7);
}

#[test]
fn validity_checks_do_not_cross_forms() {
    assert!(CategoryMapper::is_valid_label("IntePediatrico"));
    assert!(!CategoryMapper::is_valid_label("Inte. Pediátrico"));
    assert!(CategoryMapper::is_valid_display_name("Inte. Pediátrico"));
    assert!(!CategoryMapper::is_valid_display_name("IntePediatrico"));
}
