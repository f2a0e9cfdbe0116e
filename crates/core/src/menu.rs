//! Menu items, filtering, and menu file validation.
//!
//! The menu lives in a JSON document shaped `{ "menuItems": [...] }` that
//! staff edit through the admin API. Prices are JSON numbers in the file.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::LineItemInput;
use crate::types::{Money, ProductId};

static IMAGE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/images/dishes/.*\.(jpg|jpeg|png|webp)$").expect("Invalid regex")
});

/// Menu section a dish is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuCategory {
    Thali,
    GharKaKhana,
    StreetDelights,
    Mithai,
    SattuSpecials,
}

impl MenuCategory {
    pub const ALL: [Self; 5] = [
        Self::Thali,
        Self::GharKaKhana,
        Self::StreetDelights,
        Self::Mithai,
        Self::SattuSpecials,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Thali => "thali",
            Self::GharKaKhana => "ghar-ka-khana",
            Self::StreetDelights => "street-delights",
            Self::Mithai => "mithai",
            Self::SattuSpecials => "sattu-specials",
        }
    }
}

impl std::str::FromStr for MenuCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("invalid menu category: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiceLevel {
    Mild,
    Medium,
    Hot,
}

/// One dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: ProductId,
    pub name: String,
    pub name_hi: String,
    pub description: String,
    pub description_hi: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: MenuCategory,
    /// Site-relative path under `/images/dishes/`.
    pub image: String,
    pub is_veg: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
    pub is_available: bool,
    pub featured: bool,
}

impl MenuItem {
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        Money::new(self.price)
    }

    /// What the cart needs to know about this dish.
    #[must_use]
    pub fn to_line_item(&self) -> LineItemInput {
        LineItemInput {
            product_id: self.id.clone(),
            name: self.name.clone(),
            localized_name: self.name_hi.clone(),
            unit_price: self.unit_price(),
            image: self.image.clone(),
        }
    }

    fn matches_query(&self, needle: &str) -> bool {
        [
            &self.name,
            &self.description,
            &self.name_hi,
            &self.description_hi,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// On-disk shape of the menu file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDocument {
    pub menu_items: Vec<MenuItem>,
}

/// Vegetarian preference when browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dietary {
    #[default]
    All,
    Veg,
    NonVeg,
}

/// Menu browsing filter. Every criterion left empty matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFilter {
    pub category: Option<MenuCategory>,
    #[serde(default, rename = "diet")]
    pub dietary: Dietary,
    /// Case-insensitive substring over English and Hindi names and descriptions.
    #[serde(rename = "q")]
    pub query: Option<String>,
}

impl MenuFilter {
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        let category = self.category.is_none_or(|c| c == item.category);
        let dietary = match self.dietary {
            Dietary::All => true,
            Dietary::Veg => item.is_veg,
            Dietary::NonVeg => !item.is_veg,
        };
        let query = match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => item.matches_query(&q.to_lowercase()),
        };

        category && dietary && query
    }

    /// Items passing the filter, in menu order. Unavailable items are kept.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Why a proposed menu was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuValidationError {
    /// `path` is `{index}.{field}` for item fields, or empty for the list itself.
    #[error("Validation error: {path} - {message}")]
    Invalid { path: String, message: String },
    #[error("Duplicate menu item IDs found")]
    DuplicateIds,
}

impl MenuValidationError {
    fn at(index: usize, field: &str, message: &str) -> Self {
        Self::Invalid {
            path: format!("{index}.{field}"),
            message: message.to_owned(),
        }
    }
}

fn check_text(
    index: usize,
    field: &str,
    value: &str,
    max: usize,
    empty: &str,
    too_long: &str,
) -> Result<(), MenuValidationError> {
    match value.chars().count() {
        0 => Err(MenuValidationError::at(index, field, empty)),
        n if n > max => Err(MenuValidationError::at(index, field, too_long)),
        _ => Ok(()),
    }
}

/// Check one item's field rules. `index` is its position in the list.
///
/// # Errors
///
/// Returns the first failing field.
pub fn validate_menu_item(index: usize, item: &MenuItem) -> Result<(), MenuValidationError> {
    if item.id.as_str().is_empty() {
        return Err(MenuValidationError::at(index, "id", "ID is required"));
    }
    check_text(
        index,
        "name",
        &item.name,
        100,
        "Name is required",
        "Name must be less than 100 characters",
    )?;
    check_text(
        index,
        "nameHi",
        &item.name_hi,
        100,
        "Hindi name is required",
        "Hindi name must be less than 100 characters",
    )?;
    check_text(
        index,
        "description",
        &item.description,
        500,
        "Description is required",
        "Description must be less than 500 characters",
    )?;
    check_text(
        index,
        "descriptionHi",
        &item.description_hi,
        500,
        "Hindi description is required",
        "Hindi description must be less than 500 characters",
    )?;
    if item.price <= Decimal::ZERO {
        return Err(MenuValidationError::at(
            index,
            "price",
            "Price must be a positive number",
        ));
    }
    if item.image.is_empty() {
        return Err(MenuValidationError::at(index, "image", "Image path is required"));
    }
    if !IMAGE_PATH_RE.is_match(&item.image) {
        return Err(MenuValidationError::at(index, "image", "Invalid image path format"));
    }
    Ok(())
}

/// Check a whole replacement menu: non-empty, every item valid, ids unique.
///
/// # Errors
///
/// Returns the first problem found, item errors before duplicate ids.
pub fn validate_menu(items: &[MenuItem]) -> Result<(), MenuValidationError> {
    if items.is_empty() {
        return Err(MenuValidationError::Invalid {
            path: String::new(),
            message: "At least one menu item is required".to_owned(),
        });
    }

    for (index, item) in items.iter().enumerate() {
        validate_menu_item(index, item)?;
    }

    let mut seen = HashSet::with_capacity(items.len());
    if !items.iter().all(|item| seen.insert(&item.id)) {
        return Err(MenuValidationError::DuplicateIds);
    }

    Ok(())
}

/// Decode an untyped JSON array into menu items, reporting the first item
/// that does not have the menu item shape.
///
/// # Errors
///
/// Returns [`MenuValidationError::Invalid`] naming the offending index.
pub fn parse_menu_items(value: serde_json::Value) -> Result<Vec<MenuItem>, MenuValidationError> {
    let serde_json::Value::Array(values) = value else {
        return Err(MenuValidationError::Invalid {
            path: String::new(),
            message: "Expected an array of menu items".to_owned(),
        });
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|e| MenuValidationError::Invalid {
                path: index.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
