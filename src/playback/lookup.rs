use std::collections::HashSet;

use crate::core::{Inventory, MediaId, MediaItem, VehicleId};

/// Maps a vehicle to its ordered media sequence
pub trait MediaLookup {
    fn sequence_for(&self, vehicle: &VehicleId) -> Vec<MediaItem>;
}

impl MediaLookup for Inventory {
    fn sequence_for(&self, vehicle: &VehicleId) -> Vec<MediaItem> {
        Inventory::media_for(self, vehicle).into_iter().cloned().collect()
    }
}

impl<L: MediaLookup + ?Sized> MediaLookup for &L {
    fn sequence_for(&self, vehicle: &VehicleId) -> Vec<MediaItem> {
        (**self).sequence_for(vehicle)
    }
}

/// Decides which media items are eligible for display
pub trait MediaFilter {
    fn admits(&self, item: &MediaItem) -> bool;
}

/// Admits everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AllMedia;

impl MediaFilter for AllMedia {
    fn admits(&self, _item: &MediaItem) -> bool {
        true
    }
}

/// Admits only the listed media ids (shared customer links)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowList {
    ids: HashSet<MediaId>,
}

impl AllowList {
    pub fn new(ids: impl IntoIterator<Item = MediaId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: &MediaId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl MediaFilter for AllowList {
    fn admits(&self, item: &MediaItem) -> bool {
        self.ids.contains(&item.id)
    }
}

impl<F: MediaFilter + ?Sized> MediaFilter for Box<F> {
    fn admits(&self, item: &MediaItem) -> bool {
        (**self).admits(item)
    }
}

impl<F: MediaFilter> MediaFilter for Option<F> {
    fn admits(&self, item: &MediaItem) -> bool {
        self.as_ref().map_or(true, |f| f.admits(item))
    }
}

/// A lookup whose sequences are narrowed by a filter, order preserved
pub struct FilteredLookup<L, F> {
    inner: L,
    filter: F,
}

impl<L: MediaLookup, F: MediaFilter> FilteredLookup<L, F> {
    pub fn new(inner: L, filter: F) -> Self {
        Self { inner, filter }
    }
}

impl<L: MediaLookup, F: MediaFilter> MediaLookup for FilteredLookup<L, F> {
    fn sequence_for(&self, vehicle: &VehicleId) -> Vec<MediaItem> {
        self.inner
            .sequence_for(vehicle)
            .into_iter()
            .filter(|item| self.filter.admits(item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MediaKind, Vehicle};

    fn inventory() -> Inventory {
        Inventory::new(
            vec![Vehicle::new("a")],
            vec![
                MediaItem::new("m1", "a", MediaKind::Video),
                MediaItem::new("m2", "a", MediaKind::Photo),
                MediaItem::new("m3", "a", MediaKind::Panorama),
            ],
        )
    }

    #[test]
    fn test_allow_list_keeps_order() {
        let inv = inventory();
        let lookup = FilteredLookup::new(&inv, AllowList::new([MediaId::new("m3"), MediaId::new("m1")]));
        let ids: Vec<String> = lookup
            .sequence_for(&VehicleId::new("a"))
            .into_iter()
            .map(|m| m.id.into())
            .collect();
        assert_eq!(ids, vec!["m1", "m3"]);
    }

    #[test]
    fn test_no_filter_admits_all() {
        let inv = inventory();
        let lookup = FilteredLookup::new(&inv, None::<AllowList>);
        assert_eq!(lookup.sequence_for(&VehicleId::new("a")).len(), 3);
        let lookup = FilteredLookup::new(&inv, AllMedia);
        assert_eq!(lookup.sequence_for(&VehicleId::new("a")).len(), 3);
    }
}
