//! Menu file checks.
//!
//! `bb-cli menu check` runs the same validation the admin API applies
//! before saving a menu, so a hand-edited file can be checked before deploy.

use std::collections::BTreeMap;
use std::path::Path;

use bihar_bhojan_core::menu::validate_menu;
use bihar_bhojan_storefront::services::menu::{MenuError, read_menu_file};

/// Read, decode and validate a menu file, then print a per-category summary.
pub async fn check(path: &Path) -> Result<(), MenuError> {
    tracing::info!("Checking {}", path.display());

    let items = read_menu_file(path).await?;
    validate_menu(&items)?;

    let mut by_category: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for item in &items {
        let entry = by_category.entry(item.category.as_str()).or_default();
        entry.0 += 1;
        if !item.is_available {
            entry.1 += 1;
        }
    }

    tracing::info!("Menu is valid: {} items", items.len());
    for (category, (count, unavailable)) in by_category {
        tracing::info!("  {category}: {count} items ({unavailable} unavailable)");
    }
    Ok(())
}
