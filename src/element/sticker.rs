use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ElementId, Placement};
use crate::geometry::CanvasPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerElement {
    #[serde(default = "Uuid::new_v4")]
    pub id: ElementId,
    /// Key into the fixed sticker asset catalog.
    #[serde(default)]
    pub image_name: String,
    #[serde(flatten)]
    pub placement: Placement,
}

impl StickerElement {
    pub fn new(image_name: impl Into<String>, position: CanvasPoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_name: image_name.into(),
            placement: Placement::at(position),
        }
    }

    pub fn is_catalog_asset(&self) -> bool {
        sticker_catalog().iter().any(|name| *name == self.image_name)
    }
}

/// Unscaled square edge a sticker renders into before its transform applies.
pub const STICKER_BASE_SIZE: f64 = 90.0;

/// Asset keys the sticker picker offers, in display order.
pub fn sticker_catalog() -> Vec<String> {
    let mut catalog: Vec<String> = (1..=16).map(|n| format!("sticker1_{n:02}")).collect();
    catalog.extend((1..=9).map(|n| format!("sticker3_{n:02}")));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_holds_both_sheets_in_display_order() {
        let catalog = sticker_catalog();
        assert_eq!(catalog.len(), 25);
        assert_eq!(catalog.first().map(String::as_str), Some("sticker1_01"));
        assert_eq!(catalog.get(15).map(String::as_str), Some("sticker1_16"));
        assert_eq!(catalog.get(16).map(String::as_str), Some("sticker3_01"));
        assert_eq!(catalog.last().map(String::as_str), Some("sticker3_09"));
    }

    #[test]
    fn catalog_membership_checks_the_exact_key() {
        let known = StickerElement::new("sticker3_02", CanvasPoint::new(0.0, 0.0));
        let unknown = StickerElement::new("sticker9_99", CanvasPoint::new(0.0, 0.0));
        assert!(known.is_catalog_asset());
        assert!(!unknown.is_catalog_asset());
    }

    #[test]
    fn sticker_record_fills_missing_transform_fields() {
        let json = r#"{"id":"4ee8ef06-5a9c-4ad1-a0fc-0f31f3766f3f","imageName":"sticker1_07","x":120.0,"y":88.0}"#;
        let sticker: StickerElement =
            serde_json::from_str(json).expect("partial record should deserialize");
        assert_eq!(sticker.image_name, "sticker1_07");
        assert_eq!(sticker.placement.scale, 1.0);
        assert_eq!(sticker.placement.rotation_degrees, 0.0);
        assert_eq!(sticker.placement.z_order, 0);
    }
}
