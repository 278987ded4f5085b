//! Tests for category resolution from command line input.

use census_cli::resolve::{resolve_category, status_targets};
use census_model::CategoryError;

#[test]
fn resolves_labels_and_display_names_in_any_case() {
    for input in ["neonatologia", "NEONATOLOGÍA", "  Neonatología "] {
        let resolution = resolve_category(input).unwrap();
        assert_eq!(resolution.label, "Neonatologia");
        assert_eq!(resolution.display_name, "Neonatología");
    }
    assert_eq!(
        resolve_category("inte. pediátrico").unwrap().label,
        "IntePediatrico"
    );
}

#[test]
fn unknown_input_lists_valid_options() {
    let error = resolve_category("oncologia").unwrap_err();
    let CategoryError::InvalidCategory { input, valid } = &error;
    assert_eq!(input, "oncologia");
    assert!(valid.contains("maternidad"));
    assert!(valid.ends_with("(case-insensitive)"));
    insta::assert_snapshot!(
        error.to_string(),
        @"invalid category: oncologia. Valid options: baja, media, alta, neonatologia, pediatria, intepediatrico, maternidad (case-insensitive)"
    );
}

#[test]
fn status_targets_default_to_every_category() {
    let labels: Vec<&str> = status_targets(None)
        .unwrap()
        .into_iter()
        .map(|category| category.label())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Baja",
            "Media",
            "Alta",
            "Neonatologia",
            "Pediatria",
            "IntePediatrico",
            "Maternidad"
        ]
    );
    assert_eq!(status_targets(Some("alta")).unwrap().len(), 1);
    assert!(status_targets(Some("nope")).is_err());
}
