use common::CategoryDto;

/// Colour used for categories outside the catalogue.
pub const DEFAULT_CATEGORY_COLOR: &str = "#F5F5F5";

/// Category name sent by filter drop-downs to mean "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Known product categories and their display colours.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("Grains", "#E1F5FE"),
    ("Vegetables", "#F1F8E9"),
    ("Fruits", "#FFFDE7"),
    ("Herbs", "#E8F5E9"),
    ("Roots", "#FBE9E7"),
    ("Nuts", "#FFF3E0"),
    ("Dairy", "#FFF3E0"),
    ("Meat", "#FFEBEE"),
    ("Eggs", "#FFFDE7"),
    ("Poultry", "#F3E5F5"),
    ("Fish", "#E3F2FD"),
    ("Honey", "#FFFDE7"),
    ("Livestock", "#E8F5E9"),
    ("Organic", "#E8F5E9"),
    ("Mushrooms", "#F3E5F5"),
    ("Beverages", "#E1F5FE"),
    ("Wool", "#F5F5F5"),
    ("Compost", "#E0F2F1"),
    ("Seeds", "#FFFDE7"),
    ("Saplings", "#E8F5E9"),
    ("Feed", "#FFF3E0"),
    ("Fertilisers", "#FBE9E7"),
    ("Biogas", "#E0F7FA"),
];

/// Case-insensitive colour lookup.
pub fn category_color(name: &str) -> &'static str {
    let name = name.trim();
    CATEGORIES
        .iter()
        .find(|(category, _)| category.eq_ignore_ascii_case(name))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

pub fn all_categories() -> Vec<CategoryDto> {
    CATEGORIES
        .iter()
        .map(|(name, color)| CategoryDto {
            name: name.to_string(),
            color: color.to_string(),
        })
        .collect()
}

/// Normalizes a category filter: blank or "All Categories" means none.
pub fn category_filter(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
}
