use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::core::{MediaId, VehicleId};
use crate::playback::{PlaybackSequencer, SequencerTimers, Snapshot, Transition};

/// Capacity of the command queue between handles and the driver task
const COMMAND_QUEUE: usize = 32;

/// User commands accepted by the sequencer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Previous,
    Next,
    TogglePlayPause,
    ToggleSlideshow,
    SelectVehicle(VehicleId),
    JumpToMedia(MediaId),
    /// Absolute level in percent; out-of-range values are clamped
    SetVolume(i64),
    AdjustVolume(i64),
    ToggleMute,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("sequencer driver has stopped")]
    Stopped,
}

enum Message {
    Command(Command, oneshot::Sender<Snapshot>),
    Shutdown(oneshot::Sender<PlaybackSequencer>),
}

enum Event {
    /// `None` once every handle is dropped
    Message(Option<Message>),
    PlaybackTick,
    SlideshowTick,
}

/// Handle to a running sequencer
///
/// The driver task owns the sequencer; handles only send commands and read
/// published snapshots.
#[derive(Clone)]
pub struct SequencerHandle {
    commands: mpsc::Sender<Message>,
    snapshots: watch::Receiver<Snapshot>,
}

/// Start the driver task for `sequencer`
///
/// Observers registered on the sequencer are notified of the initial vehicle
/// before this returns. Must be called from within a tokio runtime.
pub fn spawn(mut sequencer: PlaybackSequencer) -> SequencerHandle {
    sequencer.announce();

    let (commands, rx) = mpsc::channel(COMMAND_QUEUE);
    let (snapshot_tx, snapshots) = watch::channel(sequencer.snapshot());

    tokio::spawn(run(sequencer, rx, snapshot_tx));

    SequencerHandle { commands, snapshots }
}

async fn run(
    mut sequencer: PlaybackSequencer,
    mut rx: mpsc::Receiver<Message>,
    snapshots: watch::Sender<Snapshot>,
) {
    let mut timers = SequencerTimers::new(sequencer.config());
    timers.sync(&sequencer, &Transition::default(), Instant::now());
    info!(
        "Sequencer started with {} vehicles on display",
        sequencer.display_set().len()
    );

    loop {
        let event = tokio::select! {
            msg = rx.recv() => Event::Message(msg),
            _ = timers.playback.expired(), if timers.playback.is_armed() => Event::PlaybackTick,
            _ = timers.slideshow.expired(), if timers.slideshow.is_armed() => Event::SlideshowTick,
        };

        let (transition, reply) = match event {
            Event::Message(Some(Message::Command(command, reply))) => {
                debug!("Command {:?}", command);
                (apply(&mut sequencer, command), Some(reply))
            }
            Event::PlaybackTick => {
                timers.playback.rearm();
                (sequencer.playback_tick(), None)
            }
            Event::SlideshowTick => {
                timers.slideshow.rearm();
                (sequencer.slideshow_tick(), None)
            }
            Event::Message(Some(Message::Shutdown(reply))) => {
                timers.release_all();
                info!("Sequencer stopped");
                let _ = reply.send(sequencer);
                return;
            }
            Event::Message(None) => break,
        };

        timers.sync(&sequencer, &transition, Instant::now());

        let snapshot = sequencer.snapshot();
        snapshots.send_replace(snapshot.clone());
        if let Some(reply) = reply {
            let _ = reply.send(snapshot);
        }
    }

    timers.release_all();
    info!("All sequencer handles dropped, driver exiting");
}

fn apply(sequencer: &mut PlaybackSequencer, command: Command) -> Transition {
    match command {
        Command::Previous => sequencer.previous(),
        Command::Next => sequencer.next(),
        Command::TogglePlayPause => sequencer.toggle_play_pause(),
        Command::ToggleSlideshow => sequencer.toggle_slideshow(),
        Command::SelectVehicle(id) => sequencer.select_vehicle(&id),
        Command::JumpToMedia(id) => sequencer.jump_to_media(&id),
        Command::SetVolume(level) => sequencer.set_volume(level),
        Command::AdjustVolume(delta) => sequencer.adjust_volume(delta),
        Command::ToggleMute => sequencer.toggle_mute(),
    }
}

impl SequencerHandle {
    /// Issue a command and wait for the resulting state
    pub async fn send(&self, command: Command) -> Result<Snapshot, DriverError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Message::Command(command, reply))
            .await
            .map_err(|_| DriverError::Stopped)?;
        response.await.map_err(|_| DriverError::Stopped)
    }

    pub async fn previous(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::Previous).await
    }

    pub async fn next(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::Next).await
    }

    pub async fn toggle_play_pause(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::TogglePlayPause).await
    }

    pub async fn toggle_slideshow(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::ToggleSlideshow).await
    }

    pub async fn select_vehicle(&self, id: VehicleId) -> Result<Snapshot, DriverError> {
        self.send(Command::SelectVehicle(id)).await
    }

    pub async fn jump_to_media(&self, id: MediaId) -> Result<Snapshot, DriverError> {
        self.send(Command::JumpToMedia(id)).await
    }

    pub async fn set_volume(&self, level: i64) -> Result<Snapshot, DriverError> {
        self.send(Command::SetVolume(level)).await
    }

    pub async fn adjust_volume(&self, delta: i64) -> Result<Snapshot, DriverError> {
        self.send(Command::AdjustVolume(delta)).await
    }

    pub async fn toggle_mute(&self) -> Result<Snapshot, DriverError> {
        self.send(Command::ToggleMute).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published state change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stop the driver, release its timers and hand back the sequencer
    pub async fn shutdown(self) -> Result<PlaybackSequencer, DriverError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Message::Shutdown(reply))
            .await
            .map_err(|_| DriverError::Stopped)?;
        response.await.map_err(|_| DriverError::Stopped)
    }
}
