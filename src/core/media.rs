use serde::{Deserialize, Serialize};
use crate::core::VehicleId;

string_id!(
    /// Identifier of a media item
    MediaId
);

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Kind of media attached to a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Drone,
    Photo,
    #[serde(rename = "360")]
    Panorama,
}

impl MediaKind {
    /// Video and drone footage have a duration and a playback position
    pub fn is_time_based(self) -> bool {
        matches!(self, MediaKind::Video | MediaKind::Drone)
    }

    /// Label shown in the media badge
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "Showcase Video",
            MediaKind::Drone => "Drone Footage",
            MediaKind::Photo => "Gallery Photo",
            MediaKind::Panorama => "360° Interior",
        }
    }

    /// Parse the wire name used in manifests ("video", "drone", "photo", "360")
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "video" => Some(MediaKind::Video),
            "drone" => Some(MediaKind::Drone),
            "photo" | "image" => Some(MediaKind::Photo),
            "360" | "panorama" => Some(MediaKind::Panorama),
            _ => None,
        }
    }
}

/// A piece of media belonging to exactly one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaId,

    /// Owning vehicle
    pub vehicle_id: VehicleId,

    #[serde(rename = "type")]
    pub kind: MediaKind,

    /// Playable or displayable URL
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub thumbnail: String,

    /// Length in seconds, only meaningful for time-based kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    #[serde(default)]
    pub title: String,

    /// Position within the vehicle's media, lower first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl MediaItem {
    pub fn new(id: impl Into<MediaId>, vehicle_id: impl Into<VehicleId>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            vehicle_id: vehicle_id.into(),
            kind,
            url: String::new(),
            thumbnail: String::new(),
            duration: None,
            title: String::new(),
            order: None,
        }
    }

    /// Builder-style duration setter
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn is_time_based(&self) -> bool {
        self.kind.is_time_based()
    }

    /// Duration in seconds; photos and 360 views never report one
    pub fn duration(&self) -> Option<u32> {
        if self.kind.is_time_based() {
            self.duration
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        let item: MediaItem = serde_json::from_str(
            r#"{"id": "media3", "vehicleId": "clx1", "type": "360", "title": "Interior"}"#,
        )
        .unwrap();
        assert_eq!(item.kind, MediaKind::Panorama);
        assert_eq!(serde_json::to_value(MediaKind::Panorama).unwrap(), serde_json::json!("360"));
        assert_eq!(serde_json::to_value(MediaKind::Drone).unwrap(), serde_json::json!("drone"));
    }

    #[test]
    fn test_duration_ignored_for_stills() {
        let photo = MediaItem::new("p", "v", MediaKind::Photo).with_duration(30);
        assert_eq!(photo.duration(), None);
        assert!(!photo.is_time_based());

        let video = MediaItem::new("m", "v", MediaKind::Video).with_duration(30);
        assert_eq!(video.duration(), Some(30));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(MediaKind::parse(" Drone "), Some(MediaKind::Drone));
        assert_eq!(MediaKind::parse("360"), Some(MediaKind::Panorama));
        assert_eq!(MediaKind::parse("hologram"), None);
    }
}
