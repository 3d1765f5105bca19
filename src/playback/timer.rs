use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::{trace, warn};

use crate::playback::{PlaybackSequencer, SequencerConfig, Transition, MAX_PERIOD};

/// A periodic timer held as an explicit deadline
///
/// The timer only exists while armed. Releasing it drops the deadline, so a
/// released timer can never fire late.
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    name: &'static str,
    period: Duration,
    deadline: Option<Instant>,
}

impl PeriodicTimer {
    /// Periods above `MAX_PERIOD` are clamped
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period: period.min(MAX_PERIOD),
            deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Arm the timer unless it is already running
    pub fn acquire(&mut self, now: Instant) {
        if self.deadline.is_none() {
            self.restart(now);
        }
    }

    /// Start a fresh countdown of one full period from `now`
    pub fn restart(&mut self, now: Instant) {
        trace!("{} timer armed for {:?}", self.name, self.period);
        self.deadline = self.after(now);
    }

    pub fn release(&mut self) {
        if self.deadline.take().is_some() {
            trace!("{} timer released", self.name);
        }
    }

    /// Schedule the next firing one period after the last deadline
    pub fn rearm(&mut self) {
        if let Some(deadline) = self.deadline {
            self.deadline = self.after(deadline);
        }
    }

    /// One period past `from`; a deadline beyond the clock's range leaves
    /// the timer released
    fn after(&self, from: Instant) -> Option<Instant> {
        let deadline = from.checked_add(self.period);
        if deadline.is_none() {
            warn!("{} timer period {:?} is out of range, timer released", self.name, self.period);
        }
        deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| d <= now)
    }

    /// Resolves at the deadline; never resolves while released
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}

/// The sequencer's two timers: the playback tick and the slideshow advance
#[derive(Debug, Clone)]
pub struct SequencerTimers {
    pub playback: PeriodicTimer,
    pub slideshow: PeriodicTimer,
}

impl SequencerTimers {
    pub fn new(config: &SequencerConfig) -> Self {
        Self {
            playback: PeriodicTimer::new("playback", config.tick_period),
            slideshow: PeriodicTimer::new("slideshow", config.slideshow_period),
        }
    }

    /// Bring both timers in line with the sequencer after `transition`
    ///
    /// Each timer is armed exactly while its activation condition holds. The
    /// playback tick restarts when the media or the play flag changed. The
    /// slideshow countdown restarts on every navigation and when the
    /// slideshow switches on, so a countdown started for a previous item
    /// never fires for the next one.
    pub fn sync(&mut self, sequencer: &PlaybackSequencer, transition: &Transition, now: Instant) {
        if sequencer.playback_tick_active() {
            if transition.moved || transition.playback_changed {
                self.playback.restart(now);
            } else {
                self.playback.acquire(now);
            }
        } else {
            self.playback.release();
        }

        if sequencer.is_slideshow_active() {
            if transition.moved || transition.slideshow_changed {
                self.slideshow.restart(now);
            } else {
                self.slideshow.acquire(now);
            }
        } else {
            self.slideshow.release();
        }
    }

    pub fn release_all(&mut self) {
        self.playback.release();
        self.slideshow.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Inventory, MediaItem, MediaKind, Vehicle};

    fn sequencer() -> PlaybackSequencer {
        let inv = Inventory::new(
            vec![Vehicle::new("A")],
            vec![
                MediaItem::new("v1", "A", MediaKind::Video).with_duration(20),
                MediaItem::new("p1", "A", MediaKind::Photo),
                MediaItem::new("p2", "A", MediaKind::Photo),
            ],
        );
        PlaybackSequencer::new(inv.vehicles.clone(), &inv, SequencerConfig::default())
    }

    #[test]
    fn test_timer_lifecycle() {
        let start = Instant::now();
        let mut timer = PeriodicTimer::new("test", Duration::from_secs(8));
        assert!(!timer.is_armed());

        timer.acquire(start);
        assert_eq!(timer.deadline(), Some(start + Duration::from_secs(8)));

        // acquire keeps a running countdown
        timer.acquire(start + Duration::from_secs(3));
        assert_eq!(timer.deadline(), Some(start + Duration::from_secs(8)));

        timer.restart(start + Duration::from_secs(3));
        assert_eq!(timer.deadline(), Some(start + Duration::from_secs(11)));
        assert!(!timer.is_due(start + Duration::from_secs(8)));
        assert!(timer.is_due(start + Duration::from_secs(11)));

        timer.rearm();
        assert_eq!(timer.deadline(), Some(start + Duration::from_secs(19)));

        timer.release();
        assert!(!timer.is_armed());
        timer.rearm();
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_manual_next_restarts_slideshow_countdown() {
        let start = Instant::now();
        let mut seq = sequencer();
        let mut timers = SequencerTimers::new(seq.config());

        let t = seq.toggle_slideshow();
        timers.sync(&seq, &t, start);
        assert_eq!(timers.slideshow.deadline(), Some(start + Duration::from_secs(8)));

        let t = seq.next();
        timers.sync(&seq, &t, start + Duration::from_secs(3));
        assert!(!timers.slideshow.is_due(start + Duration::from_secs(8)));
        assert_eq!(timers.slideshow.deadline(), Some(start + Duration::from_secs(11)));
    }

    #[test]
    fn test_playback_tick_follows_play_state() {
        let start = Instant::now();
        let mut seq = sequencer();
        let mut timers = SequencerTimers::new(seq.config());

        timers.sync(&seq, &Transition::default(), start);
        assert!(!timers.playback.is_armed());
        assert!(!timers.slideshow.is_armed());

        let t = seq.toggle_play_pause();
        timers.sync(&seq, &t, start);
        assert_eq!(timers.playback.deadline(), Some(start + Duration::from_secs(1)));

        // A progress tick keeps the fixed schedule
        timers.playback.rearm();
        let t = seq.playback_tick();
        timers.sync(&seq, &t, start + Duration::from_secs(1));
        assert_eq!(timers.playback.deadline(), Some(start + Duration::from_secs(2)));

        // Moving to a photo releases the tick
        let t = seq.next();
        timers.sync(&seq, &t, start + Duration::from_millis(1500));
        assert!(!timers.playback.is_armed());
    }

    #[test]
    fn test_huge_period_from_settings_does_not_overflow() {
        let start = Instant::now();
        let config = crate::settings::AppSettings {
            slideshow_period_secs: 1e19,
            ..Default::default()
        }
        .sequencer_config();
        assert_eq!(config.slideshow_period, MAX_PERIOD);

        let mut seq = PlaybackSequencer::new(Vec::new(), &Inventory::default(), config);
        let mut timers = SequencerTimers::new(seq.config());
        let t = seq.toggle_slideshow();
        timers.sync(&seq, &t, start);
        assert_eq!(timers.slideshow.deadline(), Some(start + MAX_PERIOD));

        let mut timer = PeriodicTimer::new("raw", Duration::MAX);
        assert_eq!(timer.period(), MAX_PERIOD);
        timer.restart(start);
        timer.rearm();
        assert_eq!(timer.deadline(), Some(start + MAX_PERIOD + MAX_PERIOD));
    }

    #[test]
    fn test_slideshow_off_releases_timer() {
        let start = Instant::now();
        let mut seq = sequencer();
        let mut timers = SequencerTimers::new(seq.config());

        let t = seq.toggle_slideshow();
        timers.sync(&seq, &t, start);
        assert!(timers.slideshow.is_armed());

        let t = seq.toggle_slideshow();
        timers.sync(&seq, &t, start + Duration::from_secs(1));
        assert!(!timers.slideshow.is_armed());
    }
}
