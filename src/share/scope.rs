use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::{Inventory, MediaId, Vehicle};
use crate::playback::{AllowList, FilteredLookup, PlaybackSequencer, SequencerConfig};
use crate::share::ShareData;

/// What a display is allowed to show after applying a share link
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayScope {
    pub display_set: Vec<Vehicle>,
    /// Media allow-list; `None` shows every item
    pub media_filter: Option<AllowList>,
    pub allow_vehicle_advance: bool,
}

impl DisplayScope {
    /// The whole inventory with free navigation
    pub fn unrestricted(inventory: &Inventory) -> Self {
        Self {
            display_set: inventory.vehicles.clone(),
            media_filter: None,
            allow_vehicle_advance: true,
        }
    }

    /// Narrow the inventory to what a share link names
    ///
    /// Malformed links degrade instead of failing: an unknown vehicle id
    /// falls back to the whole inventory, and unknown media ids are dropped
    /// (no filter at all if none survive).
    pub fn resolve(inventory: &Inventory, share: Option<&ShareData>) -> Self {
        let Some(share) = share else {
            return Self::unrestricted(inventory);
        };

        let mut scope = Self::unrestricted(inventory);

        if let Some(id) = &share.vehicle_id {
            match inventory.vehicle(id) {
                Some(vehicle) => {
                    scope.display_set = vec![vehicle.clone()];
                    scope.allow_vehicle_advance = false;
                }
                None => warn!("Shared vehicle {} not found, showing full inventory", id),
            }
        }

        let requested = share.media_ids.as_deref().unwrap_or_default();
        if requested.is_empty() {
            return scope;
        }

        let in_scope: HashSet<_> = scope.display_set.iter().map(|v| &v.id).collect();
        let known: Vec<MediaId> = requested
            .iter()
            .filter(|id| {
                let found = inventory
                    .media_item(id)
                    .is_some_and(|m| in_scope.contains(&m.vehicle_id));
                if !found {
                    debug!("Ignoring shared media {} outside the display set", id);
                }
                found
            })
            .cloned()
            .collect();

        if known.is_empty() {
            warn!("None of {} shared media ids resolved, showing all media", requested.len());
            return scope;
        }

        // No vehicle lock: keep only vehicles owning a listed item
        if scope.allow_vehicle_advance {
            let owners: HashSet<_> = known
                .iter()
                .filter_map(|id| inventory.media_item(id))
                .map(|m| m.vehicle_id.clone())
                .collect();
            scope.display_set.retain(|v| owners.contains(&v.id));
        }

        scope.media_filter = Some(AllowList::new(known));
        scope
    }

    pub fn config(&self) -> SequencerConfig {
        if self.allow_vehicle_advance {
            SequencerConfig::showroom()
        } else {
            SequencerConfig::shared_vehicle()
        }
    }

    /// Build a sequencer over this scope, keeping timer periods from `base`
    pub fn sequencer(self, inventory: &Inventory, base: &SequencerConfig) -> PlaybackSequencer {
        let config = SequencerConfig {
            allow_vehicle_advance: self.allow_vehicle_advance,
            ..base.clone()
        };
        let lookup = FilteredLookup::new(inventory, self.media_filter);
        PlaybackSequencer::new(self.display_set, lookup, config)
    }
}
