//! Fixed ward complexity categories.
//!
//! Each category has two spellings: the accented display name used inside the
//! workbook and in reports, and an ASCII label used for file names and API
//! routes. The table below is the single source of truth for both; adding a
//! category is a change to [`CATEGORY_TABLE`], never a runtime mutation.
//!
//! | Label          | Display name     | Weekly demand floor |
//! |----------------|------------------|---------------------|
//! | Baja           | Baja             | yes                 |
//! | Media          | Media            | yes                 |
//! | Alta           | Alta             | yes                 |
//! | Neonatologia   | Neonatología     | no                  |
//! | Pediatria      | Pediatría        | yes                 |
//! | IntePediatrico | Inte. Pediátrico | yes                 |
//! | Maternidad     | Maternidad       | yes                 |

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CategoryError;

/// One row of the category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry {
    /// ASCII label used for storage paths and API routes.
    pub label: &'static str,
    /// Canonical display name as it appears in the lookup sheet.
    pub display_name: &'static str,
    /// Whether weeks below the minimum weekly demand are dropped.
    pub demand_floor: bool,
}

/// The fixed category table, in reporting order.
pub static CATEGORY_TABLE: &[CategoryEntry] = &[
    CategoryEntry {
        label: "Baja",
        display_name: "Baja",
        demand_floor: true,
    },
    CategoryEntry {
        label: "Media",
        display_name: "Media",
        demand_floor: true,
    },
    CategoryEntry {
        label: "Alta",
        display_name: "Alta",
        demand_floor: true,
    },
    CategoryEntry {
        label: "Neonatologia",
        display_name: "Neonatología",
        demand_floor: false,
    },
    CategoryEntry {
        label: "Pediatria",
        display_name: "Pediatría",
        demand_floor: true,
    },
    CategoryEntry {
        label: "IntePediatrico",
        display_name: "Inte. Pediátrico",
        demand_floor: true,
    },
    CategoryEntry {
        label: "Maternidad",
        display_name: "Maternidad",
        demand_floor: true,
    },
];

/// Handle to a row of [`CATEGORY_TABLE`].
///
/// Ordering follows table position, so maps keyed by `Category` iterate in
/// reporting order. Serializes as its label.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category(usize);

impl Category {
    /// Iterate over every known category in table order.
    pub fn all() -> impl Iterator<Item = Category> {
        (0..CATEGORY_TABLE.len()).map(Category)
    }

    /// Look up a category by its exact ASCII label.
    pub fn from_label(label: &str) -> Option<Category> {
        CATEGORY_TABLE
            .iter()
            .position(|entry| entry.label == label)
            .map(Category)
    }

    /// Look up a category by its exact display name.
    pub fn from_display_name(display_name: &str) -> Option<Category> {
        CATEGORY_TABLE
            .iter()
            .position(|entry| entry.display_name == display_name)
            .map(Category)
    }

    fn entry(self) -> &'static CategoryEntry {
        &CATEGORY_TABLE[self.0]
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Whether low-demand weeks are filtered out for this category.
    pub fn applies_demand_floor(self) -> bool {
        self.entry().demand_floor
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Category").field(&self.label()).finish()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CategoryMapper::parse_category(&raw).map_err(serde::de::Error::custom)
    }
}

/// Bidirectional label/display-name mapping over [`CATEGORY_TABLE`].
///
/// Storage naming, CLI routing and the pipeline's per-category loop all go
/// through this type.
pub struct CategoryMapper;

impl CategoryMapper {
    /// Convert an ASCII label to its display name.
    pub fn to_display_name(label: &str) -> Result<&'static str, CategoryError> {
        Category::from_label(label)
            .map(Category::display_name)
            .ok_or_else(|| invalid(label, Self::all_labels()))
    }

    /// Convert a display name to its ASCII label.
    pub fn to_label(display_name: &str) -> Result<&'static str, CategoryError> {
        Category::from_display_name(display_name)
            .map(Category::label)
            .ok_or_else(|| invalid(display_name, Self::all_display_names()))
    }

    /// Parse a user-supplied category (e.g. a URL path segment) into the
    /// canonical display name.
    ///
    /// Matching is case-insensitive and accepts either the label or the
    /// display name.
    pub fn parse_from_external(input: &str) -> Result<&'static str, CategoryError> {
        Self::parse_category(input).map(Category::display_name)
    }

    /// Same as [`CategoryMapper::parse_from_external`] but returns the handle.
    pub fn parse_category(input: &str) -> Result<Category, CategoryError> {
        let needle = input.trim().to_lowercase();
        Category::all()
            .find(|category| {
                category.label().to_lowercase() == needle
                    || category.display_name().to_lowercase() == needle
            })
            .ok_or_else(|| {
                let options: Vec<String> = Self::all_labels()
                    .into_iter()
                    .map(str::to_lowercase)
                    .collect();
                CategoryError::InvalidCategory {
                    input: input.to_string(),
                    valid: format!("{} (case-insensitive)", options.join(", ")),
                }
            })
    }

    pub fn is_valid_label(label: &str) -> bool {
        Category::from_label(label).is_some()
    }

    pub fn is_valid_display_name(display_name: &str) -> bool {
        Category::from_display_name(display_name).is_some()
    }

    /// Every label, in table order.
    pub fn all_labels() -> Vec<&'static str> {
        CATEGORY_TABLE.iter().map(|entry| entry.label).collect()
    }

    /// Every display name, in table order.
    pub fn all_display_names() -> Vec<&'static str> {
        CATEGORY_TABLE.iter().map(|entry| entry.display_name).collect()
    }

    pub fn applies_demand_floor(category: Category) -> bool {
        category.applies_demand_floor()
    }
}

fn invalid(input: &str, options: Vec<&'static str>) -> CategoryError {
    CategoryError::InvalidCategory {
        input: input.to_string(),
        valid: options.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_ascii_and_unique() {
        let labels = CategoryMapper::all_labels();
        assert!(labels.iter().all(|label| label.is_ascii()));
        let mut deduped = labels.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), labels.len());
    }

    #[test]
    fn only_neonatology_skips_the_demand_floor() {
        let exempt: Vec<&str> = Category::all()
            .filter(|category| !category.applies_demand_floor())
            .map(Category::label)
            .collect();
        assert_eq!(exempt, vec!["Neonatologia"]);
    }

    #[test]
    fn accented_names_map_to_ascii_labels() {
        assert_eq!(CategoryMapper::to_label("Neonatología").unwrap(), "Neonatologia");
        assert_eq!(
            CategoryMapper::to_label("Inte. Pediátrico").unwrap(),
            "IntePediatrico"
        );
        assert_eq!(CategoryMapper::to_display_name("Pediatria").unwrap(), "Pediatría");
    }

    #[test]
    fn to_label_rejects_ascii_spelling() {
        let error = CategoryMapper::to_label("Neonatologia").unwrap_err();
        assert!(error.to_string().contains("Neonatologia"));
    }

    #[test]
    fn parse_accepts_display_names_case_insensitively() {
        assert_eq!(
            CategoryMapper::parse_from_external("neonatología").unwrap(),
            "Neonatología"
        );
        assert_eq!(
            CategoryMapper::parse_from_external(" intepediatrico ").unwrap(),
            "Inte. Pediátrico"
        );
    }

    #[test]
    fn unknown_input_names_the_offender() {
        let error = CategoryMapper::parse_from_external("Oncologia").unwrap_err();
        let CategoryError::InvalidCategory { input, valid } = &error;
        assert_eq!(input, "Oncologia");
        assert!(valid.contains("neonatologia"));
    }

    #[test]
    fn category_serializes_as_label() {
        let category = Category::from_label("Pediatria").unwrap();
        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, "\"Pediatria\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, category);
    }

    #[test]
    fn categories_order_by_table_position() {
        let baja = Category::from_label("Baja").unwrap();
        let maternidad = Category::from_label("Maternidad").unwrap();
        assert!(baja < maternidad);
    }
}
