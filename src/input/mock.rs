use async_trait::async_trait;

use crate::core::{Inventory, InventoryError, MediaItem, MediaKind, Vehicle};
use crate::input::InventorySource;

/// Built-in demo inventory for running a display without a data service
///
/// Four vehicles: the first carries a showcase video, aerial footage and an
/// interior 360, the second a video and a gallery photo, the last two a
/// single photo each.
pub struct MockInventory {
    name: String,
}

impl Default for MockInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInventory {
    pub fn new() -> Self {
        Self {
            name: "demo".to_string(),
        }
    }

    /// Build the demo inventory synchronously
    pub fn inventory() -> Inventory {
        let vehicles = vec![
            demo_vehicle(
                "clx1a2b3c4d5e6f7g8h9i0",
                "BT2024001",
                (2024, "Continental GT"),
                185_500,
                450,
                "Beluga Black",
                &["Premium Package", "Mulliner Specification", "Panoramic Roof", "Bang & Olufsen Audio"],
            ),
            demo_vehicle(
                "clx2b3c4d5e6f7g8h9i1j",
                "BT2024002",
                (2024, "Bentayga V8"),
                165_800,
                1_200,
                "Extreme Silver",
                &["Air Suspension", "Panoramic Sunroof", "22\" Alloy Wheels"],
            ),
            demo_vehicle(
                "clx3c4d5e6f7g8h9i2jk",
                "BT2024003",
                (2024, "Flying Spur"),
                195_900,
                890,
                "Glacier White",
                &[],
            ),
            demo_vehicle(
                "clx4d5e6f7g8h9i3jkl",
                "BT2023004",
                (2023, "Mulsanne Speed"),
                225_400,
                3_200,
                "Damson",
                &[],
            ),
        ];

        let media = vec![
            demo_media("media1", "clx1a2b3c4d5e6f7g8h9i0", MediaKind::Video, Some(180), "Continental GT Showcase", 1),
            demo_media("media2", "clx1a2b3c4d5e6f7g8h9i0", MediaKind::Drone, Some(90), "Continental GT Aerial View", 2),
            demo_media("media3", "clx1a2b3c4d5e6f7g8h9i0", MediaKind::Panorama, None, "Continental GT Interior 360°", 3),
            demo_media("media4", "clx2b3c4d5e6f7g8h9i1j", MediaKind::Video, Some(120), "Bentayga V8 Showcase", 1),
            demo_media("media5", "clx2b3c4d5e6f7g8h9i1j", MediaKind::Photo, None, "Bentayga V8 Gallery", 2),
            demo_media("media6", "clx3c4d5e6f7g8h9i2jk", MediaKind::Photo, None, "Flying Spur Gallery", 1),
            demo_media("media7", "clx4d5e6f7g8h9i3jkl", MediaKind::Photo, None, "Mulsanne Speed Gallery", 1),
        ];

        Inventory::new(vehicles, media)
    }
}

fn demo_vehicle(
    id: &str,
    stock: &str,
    (year, model): (u16, &str),
    price: u64,
    mileage: u64,
    color: &str,
    features: &[&str],
) -> Vehicle {
    let mut v = Vehicle::new(id);
    v.stock_number = Some(stock.to_string());
    v.year = Some(year);
    v.make = Some("Bentley".to_string());
    v.model = Some(model.to_string());
    v.price = Some(price);
    v.mileage = Some(mileage);
    v.color = Some(color.to_string());
    v.features = features.iter().map(|f| f.to_string()).collect();
    v
}

fn demo_media(
    id: &str,
    vehicle_id: &str,
    kind: MediaKind,
    duration: Option<u32>,
    title: &str,
    order: u32,
) -> MediaItem {
    let mut item = MediaItem::new(id, vehicle_id, kind).with_title(title);
    item.duration = duration;
    item.order = Some(order);
    item.url = format!("https://media.example.com/{}/{}", vehicle_id, id);
    item.thumbnail = format!("https://media.example.com/{}/{}-thumb.jpg", vehicle_id, id);
    item
}

#[async_trait]
impl InventorySource for MockInventory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Inventory, InventoryError> {
        let inventory = Self::inventory();
        inventory.validate()?;
        Ok(inventory)
    }
}
