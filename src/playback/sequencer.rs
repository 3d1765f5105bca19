use serde::Serialize;
use tracing::{debug, info, trace};

use crate::core::{MediaId, MediaItem, Vehicle, VehicleId};
use crate::playback::{MediaLookup, SequencerConfig};

/// Starting volume of a fresh sequencer, in percent
pub const DEFAULT_VOLUME: u8 = 75;

/// Highest volume, in percent
pub const MAX_VOLUME: u8 = 100;

/// Callback invoked with the new current vehicle
pub type VehicleObserver = Box<dyn FnMut(&Vehicle) + Send>;

/// What a command or tick changed
///
/// The timer layer reads this to decide which timers to acquire, restart or
/// release. A rejected command yields `Transition::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    /// Position was (re)set by navigation: indices moved, elapsed reset
    pub moved: bool,
    /// The resolved current vehicle is a different vehicle
    pub vehicle_changed: bool,
    /// The play flag flipped
    pub playback_changed: bool,
    /// The slideshow flag flipped
    pub slideshow_changed: bool,
    /// Elapsed time advanced
    pub progressed: bool,
    /// Volume level or mute flag changed
    pub volume_changed: bool,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    fn merge(self, other: Transition) -> Transition {
        Transition {
            moved: self.moved || other.moved,
            vehicle_changed: self.vehicle_changed || other.vehicle_changed,
            playback_changed: self.playback_changed || other.playback_changed,
            slideshow_changed: self.slideshow_changed || other.slideshow_changed,
            progressed: self.progressed || other.progressed,
            volume_changed: self.volume_changed || other.volume_changed,
        }
    }
}

/// Read-only view of the sequencer for display components
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub vehicle: Option<Vehicle>,
    pub media: Option<MediaItem>,
    pub vehicle_index: usize,
    pub vehicle_count: usize,
    pub media_index: usize,
    pub media_count: usize,
    pub elapsed: u32,
    pub duration: Option<u32>,
    pub progress: f64,
    pub is_playing: bool,
    pub is_slideshow_active: bool,
    pub volume: u8,
    pub is_muted: bool,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

impl Snapshot {
    /// (vehicle_index, media_index)
    pub fn position(&self) -> (usize, usize) {
        (self.vehicle_index, self.media_index)
    }

    pub fn is_time_based(&self) -> bool {
        self.media.as_ref().is_some_and(|m| m.is_time_based())
    }
}

/// Media playback and navigation sequencer
///
/// Walks a two-level position (vehicle, media item of that vehicle) over the
/// display set. Every command is total: when it cannot apply it leaves the
/// state untouched and returns an empty `Transition`.
pub struct PlaybackSequencer {
    display_set: Vec<Vehicle>,
    /// Filtered media sequence of each display-set vehicle, same indexing
    sequences: Vec<Vec<MediaItem>>,
    config: SequencerConfig,
    vehicle_index: usize,
    media_index: usize,
    elapsed: u32,
    playing: bool,
    slideshow: bool,
    volume: u8,
    muted: bool,
    observers: Vec<VehicleObserver>,
}

impl PlaybackSequencer {
    /// Create a sequencer positioned at the first media of the first vehicle
    ///
    /// Each vehicle's sequence is resolved once here; the inventory is
    /// read-only for the lifetime of the sequencer.
    pub fn new(display_set: Vec<Vehicle>, lookup: impl MediaLookup, config: SequencerConfig) -> Self {
        let sequences = display_set
            .iter()
            .map(|v| lookup.sequence_for(&v.id))
            .collect();

        Self {
            display_set,
            sequences,
            config,
            vehicle_index: 0,
            media_index: 0,
            elapsed: 0,
            playing: false,
            slideshow: false,
            volume: DEFAULT_VOLUME,
            muted: false,
            observers: Vec::new(),
        }
    }

    /// Register a callback fired once per change of the current vehicle
    pub fn on_vehicle_change(&mut self, observer: impl FnMut(&Vehicle) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Notify observers of the current vehicle without a change, so that
    /// freshly mounted consumers start populated
    pub fn announce(&mut self) {
        self.notify();
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn display_set(&self) -> &[Vehicle] {
        &self.display_set
    }

    pub fn vehicle_index(&self) -> usize {
        self.vehicle_index
    }

    pub fn media_index(&self) -> usize {
        self.media_index
    }

    /// (vehicle_index, media_index)
    pub fn position(&self) -> (usize, usize) {
        (self.vehicle_index, self.media_index)
    }

    /// Elapsed seconds of the current time-based media
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_slideshow_active(&self) -> bool {
        self.slideshow
    }

    /// Volume level in percent, kept across navigation and while muted
    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume actually applied to playback: 0 while muted
    pub fn effective_volume(&self) -> u8 {
        if self.muted {
            0
        } else {
            self.volume
        }
    }

    pub fn current_vehicle(&self) -> Option<&Vehicle> {
        self.display_set.get(self.vehicle_index)
    }

    pub fn current_media_sequence(&self) -> &[MediaItem] {
        self.sequences
            .get(self.vehicle_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn current_media(&self) -> Option<&MediaItem> {
        self.current_media_sequence().get(self.media_index)
    }

    pub fn is_time_based(&self) -> bool {
        self.current_media().is_some_and(|m| m.is_time_based())
    }

    /// Duration of the current media, if it is time-based
    pub fn current_duration(&self) -> Option<u32> {
        self.current_media().and_then(MediaItem::duration)
    }

    /// Fraction of the current media played, 0 for stills
    pub fn progress_fraction(&self) -> f64 {
        match self.current_duration() {
            Some(d) if d > 0 => f64::from(self.elapsed) / f64::from(d),
            _ => 0.0,
        }
    }

    pub fn is_at_sequence_start(&self) -> bool {
        !self.display_set.is_empty() && self.vehicle_index == 0 && self.media_index == 0
    }

    pub fn is_at_sequence_end(&self) -> bool {
        !self.display_set.is_empty()
            && self.vehicle_index == self.display_set.len() - 1
            && self.media_index == self.current_media_sequence().len().saturating_sub(1)
    }

    /// Whether the playback tick should be running
    pub fn playback_tick_active(&self) -> bool {
        self.playing && self.is_time_based() && self.current_duration().is_some()
    }

    /// Whether `previous()` would do anything
    pub fn can_go_previous(&self) -> bool {
        !self.display_set.is_empty()
            && (self.media_index > 0 || (self.config.allow_vehicle_advance && self.vehicle_index > 0))
    }

    /// Whether `next()` would do anything
    pub fn can_go_next(&self) -> bool {
        !self.display_set.is_empty()
            && (self.media_index + 1 < self.current_media_sequence().len()
                || (self.config.allow_vehicle_advance && self.vehicle_index + 1 < self.display_set.len())
                || self.slideshow)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            vehicle: self.current_vehicle().cloned(),
            media: self.current_media().cloned(),
            vehicle_index: self.vehicle_index,
            vehicle_count: self.display_set.len(),
            media_index: self.media_index,
            media_count: self.current_media_sequence().len(),
            elapsed: self.elapsed,
            duration: self.current_duration(),
            progress: self.progress_fraction(),
            is_playing: self.playing,
            is_slideshow_active: self.slideshow,
            volume: self.volume,
            is_muted: self.muted,
            can_go_previous: self.can_go_previous(),
            can_go_next: self.can_go_next(),
        }
    }

    /// Step back one media item, crossing into the previous vehicle's last
    /// item when vehicle advance is allowed
    pub fn previous(&mut self) -> Transition {
        if self.display_set.is_empty() {
            return Transition::default();
        }

        if self.media_index > 0 {
            self.go_to(self.vehicle_index, self.media_index - 1)
        } else if self.config.allow_vehicle_advance && self.vehicle_index > 0 {
            let prev = self.vehicle_index - 1;
            let last = self.sequences[prev].len().saturating_sub(1);
            self.go_to(prev, last)
        } else {
            Transition::default()
        }
    }

    /// Step forward one media item, crossing into the next vehicle when
    /// allowed, wrapping to the start while the slideshow runs
    ///
    /// With vehicle advance off the wrap goes to the current vehicle's first
    /// item, so a locked display never changes vehicle.
    pub fn next(&mut self) -> Transition {
        if self.display_set.is_empty() {
            return Transition::default();
        }

        if self.media_index + 1 < self.current_media_sequence().len() {
            self.go_to(self.vehicle_index, self.media_index + 1)
        } else if self.config.allow_vehicle_advance && self.vehicle_index + 1 < self.display_set.len() {
            self.go_to(self.vehicle_index + 1, 0)
        } else if self.slideshow {
            // Without vehicle advance the loop stays on the current vehicle
            let vehicle = if self.config.allow_vehicle_advance { 0 } else { self.vehicle_index };
            debug!("Slideshow wrapping to start");
            self.go_to(vehicle, 0)
        } else {
            Transition::default()
        }
    }

    /// Play or pause time-based media; ignored for photos, 360 views and
    /// videos without a known duration
    pub fn toggle_play_pause(&mut self) -> Transition {
        let Some(duration) = self.current_duration() else {
            return Transition::default();
        };

        // Replay a finished item from the top
        if !self.playing && self.elapsed >= duration {
            self.elapsed = 0;
        }

        self.playing = !self.playing;
        debug!("Playback {}", if self.playing { "started" } else { "paused" });
        Transition {
            playback_changed: true,
            ..Transition::default()
        }
    }

    /// Switch auto-advance on or off; does not touch playback
    pub fn toggle_slideshow(&mut self) -> Transition {
        self.slideshow = !self.slideshow;
        info!("Slideshow {}", if self.slideshow { "on" } else { "off" });
        Transition {
            slideshow_changed: true,
            ..Transition::default()
        }
    }

    /// Set the volume in percent, clamped to 0..=100
    ///
    /// A non-zero level unmutes.
    pub fn set_volume(&mut self, level: i64) -> Transition {
        let level = u8::try_from(level.clamp(0, i64::from(MAX_VOLUME))).unwrap_or(MAX_VOLUME);
        let unmute = self.muted && level > 0;
        if level == self.volume && !unmute {
            return Transition::default();
        }

        self.volume = level;
        if unmute {
            self.muted = false;
        }
        debug!("Volume {}%", self.volume);
        Transition {
            volume_changed: true,
            ..Transition::default()
        }
    }

    /// Raise or lower the volume by `delta` percent
    pub fn adjust_volume(&mut self, delta: i64) -> Transition {
        self.set_volume(i64::from(self.volume).saturating_add(delta))
    }

    pub fn toggle_mute(&mut self) -> Transition {
        self.muted = !self.muted;
        debug!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        Transition {
            volume_changed: true,
            ..Transition::default()
        }
    }

    /// Jump to the first media of a display-set vehicle
    pub fn select_vehicle(&mut self, id: &VehicleId) -> Transition {
        match self.display_set.iter().position(|v| &v.id == id) {
            Some(index) => self.go_to(index, 0),
            None => {
                debug!("Vehicle {} is not in the display set", id);
                Transition::default()
            }
        }
    }

    /// Jump to a media item of the current vehicle
    pub fn jump_to_media(&mut self, id: &MediaId) -> Transition {
        match self.current_media_sequence().iter().position(|m| &m.id == id) {
            Some(index) => self.go_to(self.vehicle_index, index),
            None => {
                debug!("Media {} is not in the current sequence", id);
                Transition::default()
            }
        }
    }

    /// One playback tick: add a second, stop at the end, and advance when
    /// the slideshow is running
    pub fn playback_tick(&mut self) -> Transition {
        let Some(duration) = self.current_duration().filter(|_| self.playback_tick_active()) else {
            return Transition::default();
        };

        self.elapsed = self.elapsed.saturating_add(1).min(duration);
        trace!("Playback at {}/{}s", self.elapsed, duration);

        let progressed = Transition {
            progressed: true,
            ..Transition::default()
        };
        if self.elapsed < duration {
            return progressed;
        }

        self.playing = false;
        let finished = progressed.merge(Transition {
            playback_changed: true,
            ..Transition::default()
        });
        if self.slideshow {
            finished.merge(self.next())
        } else {
            finished
        }
    }

    /// One slideshow tick: advance unconditionally, even mid-video
    pub fn slideshow_tick(&mut self) -> Transition {
        if !self.slideshow {
            return Transition::default();
        }
        self.next()
    }

    fn go_to(&mut self, vehicle_index: usize, media_index: usize) -> Transition {
        let before = self.current_vehicle().map(|v| v.id.clone());
        let was_playing = self.playing;

        self.vehicle_index = vehicle_index;
        self.media_index = media_index;
        self.elapsed = 0;
        self.playing = false;

        let vehicle_changed = before.as_ref() != self.current_vehicle().map(|v| &v.id);
        debug!("Moved to vehicle {} media {}", vehicle_index, media_index);
        if vehicle_changed {
            self.notify();
        }

        Transition {
            moved: true,
            vehicle_changed,
            playback_changed: was_playing,
            ..Transition::default()
        }
    }

    fn notify(&mut self) {
        if let Some(vehicle) = self.display_set.get(self.vehicle_index) {
            info!("Now showing {}", vehicle.title());
            for observer in self.observers.iter_mut() {
                observer(vehicle);
            }
        }
    }
}
