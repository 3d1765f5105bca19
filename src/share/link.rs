use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::{MediaId, Vehicle, VehicleId};

/// Query keys of a share link
pub const KEY_SHARED: &str = "shared";
pub const KEY_TYPE: &str = "type";
pub const KEY_TIMESTAMP: &str = "ts";
pub const KEY_VEHICLE: &str = "vehicleId";
pub const KEY_MEDIA: &str = "mediaIds";

/// What a share link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareKind {
    #[default]
    Vehicle,
    Media,
    Slideshow,
}

impl ShareKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShareKind::Vehicle => "vehicle",
            ShareKind::Media => "media",
            ShareKind::Slideshow => "slideshow",
        }
    }

    /// Unknown names decode to `Vehicle`
    pub fn parse(name: &str) -> Self {
        match name {
            "media" => ShareKind::Media,
            "slideshow" => ShareKind::Slideshow,
            _ => ShareKind::Vehicle,
        }
    }
}

/// Payload of a customer share link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareData {
    pub vehicle_id: Option<VehicleId>,
    pub media_ids: Option<Vec<MediaId>>,
    #[serde(rename = "type")]
    pub kind: ShareKind,
    pub timestamp: DateTime<Utc>,
}

impl ShareData {
    /// Share a vehicle, optionally narrowed to some of its media
    pub fn for_vehicle(vehicle: &Vehicle, selected_media: &[MediaId], now: DateTime<Utc>) -> Self {
        let media_ids = (!selected_media.is_empty()).then(|| selected_media.to_vec());
        Self {
            vehicle_id: Some(vehicle.id.clone()),
            kind: if media_ids.is_some() { ShareKind::Media } else { ShareKind::Vehicle },
            media_ids,
            timestamp: now,
        }
    }

    /// Encode as query-string parameters
    pub fn to_query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair(KEY_SHARED, "true");
        query.append_pair(KEY_TYPE, self.kind.as_str());
        query.append_pair(KEY_TIMESTAMP, &self.timestamp.timestamp_millis().to_string());

        if let Some(vehicle) = &self.vehicle_id {
            query.append_pair(KEY_VEHICLE, vehicle.as_str());
        }

        if let Some(media) = self.media_ids.as_ref().filter(|m| !m.is_empty()) {
            let joined = media.iter().map(MediaId::as_str).collect::<Vec<_>>().join(",");
            query.append_pair(KEY_MEDIA, &joined);
        }

        query.finish()
    }

    /// Share URL rooted at `base`; any existing query is replaced
    pub fn share_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(Some(&self.to_query()));
        url.set_fragment(None);
        url
    }

    /// Decode from a query string, with or without the leading '?'
    ///
    /// Returns `None` unless the query carries `shared=true`. A missing or
    /// malformed timestamp falls back to the current time.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut shared = false;
        let mut kind = ShareKind::Vehicle;
        let mut timestamp = None;
        let mut vehicle_id = None;
        let mut media_ids = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                KEY_SHARED => shared = value == "true",
                KEY_TYPE => kind = ShareKind::parse(&value),
                KEY_TIMESTAMP => {
                    timestamp = value
                        .parse::<i64>()
                        .ok()
                        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                }
                KEY_VEHICLE if !value.trim().is_empty() => {
                    vehicle_id = Some(VehicleId::new(value.trim()))
                }
                KEY_MEDIA => {
                    let ids: Vec<MediaId> = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(MediaId::new)
                        .collect();
                    media_ids = (!ids.is_empty()).then_some(ids);
                }
                _ => {}
            }
        }

        if !shared {
            return None;
        }

        Some(Self {
            vehicle_id,
            media_ids,
            kind,
            timestamp: timestamp.unwrap_or_else(Utc::now),
        })
    }

    pub fn from_url(url: &Url) -> Option<Self> {
        url.query().and_then(Self::from_query)
    }

    /// Decode either a full URL or a bare query string
    pub fn parse(input: &str) -> Option<Self> {
        match Url::parse(input) {
            Ok(url) => Self::from_url(&url),
            Err(_) => Self::from_query(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    #[test]
    fn test_for_vehicle_kind() {
        let v = Vehicle::new("clx1");
        assert_eq!(ShareData::for_vehicle(&v, &[], at(0)).kind, ShareKind::Vehicle);

        let data = ShareData::for_vehicle(&v, &[MediaId::new("media1")], at(0));
        assert_eq!(data.kind, ShareKind::Media);
        assert_eq!(data.media_ids, Some(vec![MediaId::new("media1")]));
    }

    #[test]
    fn test_to_query_keys() {
        let v = Vehicle::new("clx1");
        let data = ShareData::for_vehicle(
            &v,
            &[MediaId::new("media1"), MediaId::new("media3")],
            at(1_700_000_000_000),
        );
        assert_eq!(
            data.to_query(),
            "shared=true&type=media&ts=1700000000000&vehicleId=clx1&mediaIds=media1%2Cmedia3"
        );
    }

    #[test]
    fn test_share_url_replaces_query() {
        let base = Url::parse("https://showroom.example.com/customer?old=1#top").unwrap();
        let data = ShareData::for_vehicle(&Vehicle::new("7"), &[], at(5));
        let url = data.share_url(&base);
        assert_eq!(url.path(), "/customer");
        assert_eq!(url.query(), Some("shared=true&type=vehicle&ts=5&vehicleId=7"));
        assert_eq!(url.fragment(), None);
        assert_eq!(ShareData::from_url(&url), Some(data));
    }

    #[test]
    fn test_from_query_requires_shared_flag() {
        assert_eq!(ShareData::from_query("vehicleId=clx1"), None);
        assert_eq!(ShareData::from_query("shared=false&vehicleId=clx1"), None);
        assert_eq!(ShareData::from_query(""), None);
    }

    #[test]
    fn test_from_query_lenient_fields() {
        let data = ShareData::from_query("?shared=true&type=bogus&ts=later&mediaIds=a,,b,&vehicleId=")
            .unwrap();
        assert_eq!(data.kind, ShareKind::Vehicle);
        assert_eq!(data.vehicle_id, None);
        assert_eq!(data.media_ids, Some(vec![MediaId::new("a"), MediaId::new("b")]));
    }

    #[test]
    fn test_parse_accepts_url_or_query() {
        let from_url = ShareData::parse("https://x.example/?shared=true&type=slideshow&ts=10").unwrap();
        assert_eq!(from_url.kind, ShareKind::Slideshow);
        assert_eq!(from_url.timestamp, at(10));

        let from_query = ShareData::parse("shared=true&vehicleId=clx2").unwrap();
        assert_eq!(from_query.vehicle_id, Some(VehicleId::new("clx2")));
        assert!(ShareData::parse("https://x.example/").is_none());
    }
}
