//! Resolution of user-supplied category names.

use census_model::{Category, CategoryError, CategoryMapper};

/// A category resolved from external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub category: Category,
    pub label: &'static str,
    pub display_name: &'static str,
}

/// Resolve a label or display name, in any case, to its category.
pub fn resolve_category(input: &str) -> Result<Resolution, CategoryError> {
    let display_name = CategoryMapper::parse_from_external(input)?;
    let category = CategoryMapper::parse_category(display_name)?;
    Ok(Resolution {
        category,
        label: category.label(),
        display_name,
    })
}

/// Categories targeted by `status`: the named one, or all in table order.
pub fn status_targets(input: Option<&str>) -> Result<Vec<Category>, CategoryError> {
    match input {
        Some(input) => Ok(vec![resolve_category(input)?.category]),
        None => Ok(Category::all().collect()),
    }
}
