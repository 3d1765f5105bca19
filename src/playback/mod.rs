pub mod driver;
pub mod lookup;
pub mod selection;
pub mod sequencer;
pub mod timer;

pub use driver::{spawn, Command, DriverError, SequencerHandle};
pub use lookup::{AllMedia, AllowList, FilteredLookup, MediaFilter, MediaLookup};
pub use selection::VehicleSelection;
pub use sequencer::{PlaybackSequencer, Snapshot, Transition, DEFAULT_VOLUME, MAX_VOLUME};
pub use timer::{PeriodicTimer, SequencerTimers};

use std::time::Duration;

/// Period of the auto-advance timer in slideshow mode
pub const DEFAULT_SLIDESHOW_PERIOD: Duration = Duration::from_secs(8);

/// Period of the playback tick; each tick adds one second of elapsed time
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Longest accepted timer period; larger values are clamped
pub const MAX_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Sequencer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerConfig {
    /// Whether previous/next may cross vehicle boundaries. Off when a single
    /// vehicle was shared with a customer.
    pub allow_vehicle_advance: bool,
    pub slideshow_period: Duration,
    pub tick_period: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            allow_vehicle_advance: true,
            slideshow_period: DEFAULT_SLIDESHOW_PERIOD,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

impl SequencerConfig {
    /// Showroom floor display: free navigation across the whole display set
    pub fn showroom() -> Self {
        Self::default()
    }

    /// Customer link for one vehicle: navigation stays within its media
    pub fn shared_vehicle() -> Self {
        Self {
            allow_vehicle_advance: false,
            ..Self::default()
        }
    }

    pub fn with_slideshow_period(mut self, period: Duration) -> Self {
        // A zero period would spin the driver
        self.slideshow_period = period.clamp(Duration::from_millis(100), MAX_PERIOD);
        self
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period.clamp(Duration::from_millis(10), MAX_PERIOD);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_are_clamped() {
        let config = SequencerConfig::default()
            .with_slideshow_period(Duration::ZERO)
            .with_tick_period(Duration::MAX);
        assert_eq!(config.slideshow_period, Duration::from_millis(100));
        assert_eq!(config.tick_period, MAX_PERIOD);
    }
}
