use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::core::{Inventory, InventoryError, MediaItem, MediaKind, Vehicle, VehicleId};

const VEHICLE_ID: &[&str] = &["vehicle_id", "vehicleid", "vehicle"];
const STOCK: &[&str] = &["stock_number", "stocknumber", "stock"];
const VIN: &[&str] = &["vin"];
const YEAR: &[&str] = &["year"];
const MAKE: &[&str] = &["make"];
const MODEL: &[&str] = &["model"];
const PRICE: &[&str] = &["price"];
const MILEAGE: &[&str] = &["mileage", "miles", "odometer"];
const COLOR: &[&str] = &["color", "colour"];
const MEDIA_ID: &[&str] = &["media_id", "mediaid"];
const KIND: &[&str] = &["type", "kind", "media_type"];
const URL: &[&str] = &["url", "media_url"];
const THUMBNAIL: &[&str] = &["thumbnail", "thumb"];
const DURATION: &[&str] = &["duration", "length", "seconds"];
const TITLE: &[&str] = &["title", "name"];
const ORDER: &[&str] = &["order", "position", "sort"];

/// Column positions located from the header row
struct Columns {
    vehicle_id: usize,
    stock: Option<usize>,
    vin: Option<usize>,
    year: Option<usize>,
    make: Option<usize>,
    model: Option<usize>,
    price: Option<usize>,
    mileage: Option<usize>,
    color: Option<usize>,
    media_id: Option<usize>,
    kind: Option<usize>,
    url: Option<usize>,
    thumbnail: Option<usize>,
    duration: Option<usize>,
    title: Option<usize>,
    order: Option<usize>,
}

/// Load an inventory from a flat CSV media manifest
///
/// Each row describes one media item together with its vehicle's columns:
/// - vehicle_id,make,model,year,media_id,type,url,duration,title
/// - vehicle,stock,price,mileage,mediaid,kind,thumbnail,order
///
/// Vehicles are deduplicated by id in first-seen order. A row with an empty
/// media id only contributes its vehicle.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Inventory, InventoryError> {
    let file = std::fs::File::open(path)?;
    let inventory = parse_csv(file)?;
    inventory.validate()?;
    Ok(inventory)
}

/// Parse a CSV media manifest from any reader
pub fn parse_csv<R: Read>(reader: R) -> Result<Inventory, InventoryError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let cols = detect_columns(rdr.headers()?)?;

    let mut vehicles: Vec<Vehicle> = Vec::new();
    let mut seen: HashMap<VehicleId, usize> = HashMap::new();
    let mut media = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        // Header is line 1
        let row = idx + 2;
        let record = result?;

        let vehicle_id = field(&record, Some(cols.vehicle_id))
            .map(VehicleId::new)
            .ok_or_else(|| row_error(row, "missing vehicle id"))?;

        if !seen.contains_key(&vehicle_id) {
            seen.insert(vehicle_id.clone(), vehicles.len());
            vehicles.push(parse_vehicle(&record, &cols, vehicle_id.clone(), row)?);
        }

        if let Some(media_id) = field(&record, cols.media_id) {
            let kind_name = field(&record, cols.kind)
                .ok_or_else(|| row_error(row, "media row without a type"))?;
            let kind = MediaKind::parse(kind_name)
                .ok_or_else(|| row_error(row, &format!("unknown media type '{}'", kind_name)))?;

            let mut item = MediaItem::new(media_id, vehicle_id, kind);
            item.url = field(&record, cols.url).unwrap_or_default().to_string();
            item.thumbnail = field(&record, cols.thumbnail).unwrap_or_default().to_string();
            item.title = field(&record, cols.title).unwrap_or_default().to_string();
            item.duration = number(&record, cols.duration, row)?;
            item.order = number(&record, cols.order, row)?;
            media.push(item);
        }
    }

    Ok(Inventory::new(vehicles, media))
}

fn parse_vehicle(
    record: &csv::StringRecord,
    cols: &Columns,
    id: VehicleId,
    row: usize,
) -> Result<Vehicle, InventoryError> {
    let text = |col: Option<usize>| field(record, col).map(str::to_string);

    let mut vehicle = Vehicle::new(id);
    vehicle.stock_number = text(cols.stock);
    vehicle.vin = text(cols.vin);
    vehicle.make = text(cols.make);
    vehicle.model = text(cols.model);
    vehicle.color = text(cols.color);
    vehicle.year = number(record, cols.year, row)?;
    vehicle.price = number(record, cols.price, row)?;
    vehicle.mileage = number(record, cols.mileage, row)?;
    Ok(vehicle)
}

/// Non-empty field at an optional column
fn field(record: &csv::StringRecord, col: Option<usize>) -> Option<&str> {
    col.and_then(|c| record.get(c)).filter(|s| !s.is_empty())
}

/// Parse an optional numeric field, tolerating "$185,500" style formatting
fn number<T: FromStr>(
    record: &csv::StringRecord,
    col: Option<usize>,
    row: usize,
) -> Result<Option<T>, InventoryError> {
    let Some(raw) = field(record, col) else {
        return Ok(None);
    };

    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',' | '_')).collect();
    cleaned
        .parse::<T>()
        .map(Some)
        .map_err(|_| row_error(row, &format!("invalid number '{}'", raw)))
}

fn row_error(row: usize, message: &str) -> InventoryError {
    InventoryError::Row {
        row,
        message: message.to_string(),
    }
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<Columns, InventoryError> {
    let media_id = find_column(headers, MEDIA_ID);
    let kind = find_column(headers, KIND);
    if media_id.is_some() && kind.is_none() {
        return Err(InventoryError::MissingColumn(KIND));
    }

    Ok(Columns {
        vehicle_id: find_column(headers, VEHICLE_ID).ok_or(InventoryError::MissingColumn(VEHICLE_ID))?,
        stock: find_column(headers, STOCK),
        vin: find_column(headers, VIN),
        year: find_column(headers, YEAR),
        make: find_column(headers, MAKE),
        model: find_column(headers, MODEL),
        price: find_column(headers, PRICE),
        mileage: find_column(headers, MILEAGE),
        color: find_column(headers, COLOR),
        media_id,
        kind,
        url: find_column(headers, URL),
        thumbnail: find_column(headers, THUMBNAIL),
        duration: find_column(headers, DURATION),
        title: find_column(headers, TITLE),
        order: find_column(headers, ORDER),
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header_lower = header.trim().to_lowercase();
        names.iter().any(|&name| header_lower == name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
vehicle_id,make,model,year,price,media_id,type,duration,title,order
clx1,Bentley,Continental GT,2024,\"$185,500\",media2,drone,90,Aerial,2
clx1,Bentley,Continental GT,2024,\"$185,500\",media1,video,180,Showcase,1
clx2,Bentley,Bentayga,2024,165800,media4,photo,,Gallery,
clx3,Bentley,Flying Spur,2024,195900,,,,,
";

    #[test]
    fn test_parse_manifest() {
        let inv = parse_csv(MANIFEST.as_bytes()).unwrap();

        let ids: Vec<&str> = inv.vehicles.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["clx1", "clx2", "clx3"]);
        assert_eq!(inv.vehicles[0].price, Some(185_500));
        assert_eq!(inv.vehicles[1].model.as_deref(), Some("Bentayga"));

        let media: Vec<&str> = inv
            .media_for(&VehicleId::new("clx1"))
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(media, vec!["media1", "media2"]);
        assert!(inv.media_for(&VehicleId::new("clx3")).is_empty());
        assert!(inv.validate().is_ok());
    }

    #[test]
    fn test_header_aliases() {
        let csv = "Vehicle,Stock,MediaId,Kind,Length\n7,BT7,m7,360,\n";
        let inv = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(inv.vehicles[0].stock_number.as_deref(), Some("BT7"));
        assert_eq!(inv.media[0].kind, MediaKind::Panorama);
        assert_eq!(inv.media[0].duration, None);
    }

    #[test]
    fn test_missing_vehicle_column() {
        let csv = "make,model,year\nBentley,Bentayga,2024\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(InventoryError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_bad_number_reports_row() {
        let csv = "vehicle_id,year\na,2024\nb,soon\n";
        match parse_csv(csv.as_bytes()) {
            Err(InventoryError::Row { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected row error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_media_type() {
        let csv = "vehicle_id,media_id,type\na,m1,hologram\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(InventoryError::Row { row: 2, .. })));
    }
}
