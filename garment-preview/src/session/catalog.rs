use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentType {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentColor {
    pub id: String,
    pub name: String,
    pub hex_code: String,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

fn active() -> bool {
    true
}

/// Read access to the product catalog.
pub trait CatalogLookup: Send + Sync {
    fn garment_type(&self, id: &str) -> Option<&GarmentType>;
    fn garment_color(&self, id: &str) -> Option<&GarmentColor>;
    /// Active colours in display order.
    fn active_colors(&self) -> Vec<&GarmentColor>;
}

/// Catalog shipped in the customizer manifest.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticCatalog {
    pub garment_types: Vec<GarmentType>,
    pub garment_colors: Vec<GarmentColor>,
}

impl CatalogLookup for StaticCatalog {
    fn garment_type(&self, id: &str) -> Option<&GarmentType> {
        self.garment_types.iter().find(|garment| garment.id == id)
    }

    fn garment_color(&self, id: &str) -> Option<&GarmentColor> {
        self.garment_colors.iter().find(|color| color.id == id)
    }

    fn active_colors(&self) -> Vec<&GarmentColor> {
        let mut colors: Vec<_> = self.garment_colors.iter().filter(|c| c.is_active).collect();
        colors.sort_by_key(|color| color.display_order);
        colors
    }
}

#[cfg(test)]
pub(crate) fn sample_catalog() -> StaticCatalog {
    let color = |id: &str, hex: &str, is_active: bool, display_order: i32| GarmentColor {
        id: id.to_string(),
        name: id.to_string(),
        hex_code: hex.to_string(),
        is_active,
        display_order,
    };
    StaticCatalog {
        garment_types: vec![GarmentType {
            id: "classic".to_string(),
            name: "Classic Tee".to_string(),
            price: 19.0,
            is_active: true,
            display_order: 0,
        }],
        garment_colors: vec![
            color("navy", "#1f2a44", true, 2),
            color("white", "#ffffff", true, 1),
            color("lime", "#a4ff00", false, 0),
        ],
    }
}
