//! Category catalog used at the presentation boundary.
//!
//! Categories are stored on tasks as plain strings. This module only maps the
//! known names to display colors; it never rejects an unknown name.

/// Display metadata for one known category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub color: &'static str,
}

/// Work category.
pub const CATEGORY_WORK: &str = "Trabalho";
/// Study category.
pub const CATEGORY_STUDY: &str = "Estudo";
/// Personal category.
pub const CATEGORY_PERSONAL: &str = "Pessoal";
/// Health category.
pub const CATEGORY_HEALTH: &str = "Saúde";

/// Color for any category outside the known set.
pub const FALLBACK_COLOR: &str = "gray";

const KNOWN_CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        name: CATEGORY_WORK,
        color: "blue",
    },
    CategoryInfo {
        name: CATEGORY_STUDY,
        color: "purple",
    },
    CategoryInfo {
        name: CATEGORY_PERSONAL,
        color: "green",
    },
    CategoryInfo {
        name: CATEGORY_HEALTH,
        color: "red",
    },
];

/// Returns the fixed category list in display order.
pub fn known_categories() -> &'static [CategoryInfo] {
    KNOWN_CATEGORIES
}

/// Maps a category name to its display color.
///
/// Matching is exact, like the stored value; unknown names get
/// [`FALLBACK_COLOR`].
pub fn category_color(name: &str) -> &'static str {
    KNOWN_CATEGORIES
        .iter()
        .find(|info| info.name == name)
        .map_or(FALLBACK_COLOR, |info| info.color)
}

#[cfg(test)]
mod tests {
    use super::{category_color, known_categories, FALLBACK_COLOR};

    #[test]
    fn known_categories_keep_display_order() {
        let names: Vec<_> = known_categories().iter().map(|info| info.name).collect();
        assert_eq!(names, ["Trabalho", "Estudo", "Pessoal", "Saúde"]);
    }

    #[test]
    fn colors_map_known_and_fallback() {
        assert_eq!(category_color("Trabalho"), "blue");
        assert_eq!(category_color("Saúde"), "red");
        assert_eq!(category_color("Lazer"), FALLBACK_COLOR);
        assert_eq!(category_color("trabalho"), FALLBACK_COLOR);
    }
}
