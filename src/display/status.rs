use crate::core::MediaKind;
use crate::display::format::format_time;
use crate::playback::Snapshot;

pub const NO_VEHICLES: &str = "No vehicles selected for display";
pub const NO_MEDIA: &str = "No media for this vehicle";

/// One-line rendering of the player state
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLine {
    /// Show 360 items as an interactive view rather than a still
    pub immersive_360: bool,
}

impl StatusLine {
    pub fn new(immersive_360: bool) -> Self {
        Self { immersive_360 }
    }

    pub fn render(&self, snapshot: &Snapshot) -> String {
        if snapshot.vehicle.is_none() {
            return NO_VEHICLES.to_string();
        }
        let Some(media) = &snapshot.media else {
            return NO_MEDIA.to_string();
        };

        let mut parts = Vec::with_capacity(6);

        if media.title.is_empty() {
            parts.push(media.kind.label().to_string());
        } else {
            parts.push(format!("{}: {}", media.kind.label(), media.title));
        }

        parts.push(format!(
            "Vehicle {}/{} • Media {}/{}",
            snapshot.vehicle_index + 1,
            snapshot.vehicle_count,
            snapshot.media_index + 1,
            snapshot.media_count
        ));

        if snapshot.is_time_based() {
            let state = if snapshot.is_playing { "Playing" } else { "Paused" };
            let clock = match snapshot.duration {
                Some(d) => format!("{} / {}", format_time(snapshot.elapsed), format_time(d)),
                None => format_time(snapshot.elapsed),
            };
            parts.push(format!("{} {}", state, clock));
            parts.push(if snapshot.is_muted {
                "Muted".to_string()
            } else {
                format!("Vol {}%", snapshot.volume)
            });
        }

        if snapshot.is_slideshow_active {
            parts.push("LIVE SLIDESHOW".to_string());
        }

        if self.immersive_360 && media.kind == MediaKind::Panorama {
            parts.push("360° View".to_string());
        }

        parts.join(" | ")
    }
}
