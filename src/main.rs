use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use showroom::core::{Inventory, MediaId, VehicleId};
use showroom::display::{Invocation, ShortcutAction, ShortcutMap, StatusLine, VehicleDetails};
use showroom::input::{FileInventory, InventorySource, MockInventory};
use showroom::playback::{self, PlaybackSequencer, SequencerConfig, SequencerHandle, VehicleSelection};
use showroom::settings::AppSettings;
use showroom::share::{DisplayScope, ShareData, ShareKind};

/// Volume change for one +/- keypress
const VOLUME_STEP: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Whole inventory, free navigation
    Plain,
    /// Operator-selected vehicles on the showroom floor
    Showroom,
    /// Display opened from a customer share link
    Customer,
}

/// Dealership showroom media player
#[derive(Parser, Debug)]
#[command(name = "showroom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Inventory file (JSON or CSV); the demo inventory is used otherwise
    #[arg(long, short = 'i')]
    inventory: Option<PathBuf>,

    #[arg(long, short = 'm', value_enum, default_value = "plain")]
    mode: Mode,

    /// Share link or query string (customer mode)
    #[arg(long)]
    share: Option<String>,

    /// Vehicle to put on display (showroom mode, repeatable)
    #[arg(long = "vehicle", short = 'v')]
    vehicles: Vec<String>,

    /// Start with the slideshow running
    #[arg(long, short = 's')]
    slideshow: bool,

    /// Seconds each item stays up in slideshow mode
    #[arg(long)]
    slideshow_period: Option<f64>,

    /// Show 360 items as an interactive view
    #[arg(long)]
    immersive: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// Persist the effective settings before starting
    #[arg(long)]
    save_settings: bool,
}

impl Cli {
    /// Command-line flags override persisted settings
    fn apply(&self, settings: &mut AppSettings) {
        if let Some(path) = &self.inventory {
            settings.inventory_path = Some(path.clone());
        }
        if let Some(period) = self.slideshow_period {
            settings.slideshow_period_secs = period;
        }
        if self.slideshow {
            settings.start_in_slideshow = true;
        }
        if self.immersive {
            settings.immersive_360 = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the player console
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("showroom={}", cli.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = AppSettings::load();
    cli.apply(&mut settings);
    if cli.save_settings {
        let path = settings.save().context("failed to save settings")?;
        info!("Settings saved to {}", path.display());
    }

    let inventory = load_inventory(&settings).await?;
    let base_url = Url::parse(&settings.share_base_url)
        .with_context(|| format!("invalid share base URL {}", settings.share_base_url))?;

    let (mut sequencer, shared_slideshow) = build_sequencer(&cli, &inventory, &settings.sequencer_config());
    sequencer.on_vehicle_change(|vehicle| println!("\n{}\n", VehicleDetails::new(Some(vehicle))));
    if sequencer.display_set().is_empty() {
        println!("\n{}\n", VehicleDetails::new(None));
    }

    let handle = playback::spawn(sequencer);
    if settings.start_in_slideshow || shared_slideshow {
        handle.toggle_slideshow().await?;
    }

    let immersive = Arc::new(AtomicBool::new(settings.immersive_360));
    spawn_status_printer(&handle, immersive.clone());

    let shortcuts = ShortcutMap::new();
    println!("{}", shortcuts.help());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read console input")? {
        let Some(invocation) = shortcuts.parse(&line) else {
            println!("Unknown command '{}', type ? for help", line.trim());
            continue;
        };

        if invocation.action == ShortcutAction::Quit {
            break;
        }
        run_action(&handle, &shortcuts, &invocation, &immersive, &base_url).await?;
    }

    let sequencer = handle.shutdown().await?;
    let (vehicle, media) = sequencer.position();
    info!("Player stopped at vehicle {} media {}", vehicle, media);
    Ok(())
}

async fn load_inventory(settings: &AppSettings) -> Result<Inventory> {
    let source: Box<dyn InventorySource> = match &settings.inventory_path {
        Some(path) => Box::new(FileInventory::new(path)),
        None => Box::new(MockInventory::new()),
    };

    let inventory = source
        .fetch()
        .await
        .with_context(|| format!("failed to load inventory from {}", source.name()))?;
    info!(
        "Loaded {} vehicles and {} media items from {}",
        inventory.vehicles.len(),
        inventory.media.len(),
        source.name()
    );
    Ok(inventory)
}

/// Sequencer for the selected display mode, plus whether a shared link asked
/// for the slideshow
fn build_sequencer(cli: &Cli, inventory: &Inventory, base: &SequencerConfig) -> (PlaybackSequencer, bool) {
    match cli.mode {
        Mode::Plain => (
            PlaybackSequencer::new(inventory.vehicles.clone(), inventory, base.clone()),
            false,
        ),
        Mode::Showroom => {
            let selection = VehicleSelection::from_ids(cli.vehicles.iter().map(VehicleId::new));
            info!("Showroom selection of {} vehicles", selection.len());
            (
                PlaybackSequencer::new(selection.display_set(inventory), inventory, base.clone()),
                false,
            )
        }
        Mode::Customer => {
            let share = cli.share.as_deref().and_then(|link| {
                let data = ShareData::parse(link);
                if data.is_none() {
                    warn!("Not a share link: {}", link);
                }
                data
            });
            if cli.share.is_none() {
                warn!("Customer mode without --share, showing full inventory");
            }

            let slideshow = share.as_ref().is_some_and(|s| s.kind == ShareKind::Slideshow);
            let scope = DisplayScope::resolve(inventory, share.as_ref());
            (scope.sequencer(inventory, base), slideshow)
        }
    }
}

fn spawn_status_printer(handle: &SequencerHandle, immersive: Arc<AtomicBool>) {
    let mut snapshots = handle.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let line = StatusLine::new(immersive.load(Ordering::Relaxed)).render(&snapshots.borrow_and_update());
            println!("{}", line);
        }
    });
}

async fn run_action(
    handle: &SequencerHandle,
    shortcuts: &ShortcutMap,
    invocation: &Invocation<'_>,
    immersive: &AtomicBool,
    base_url: &Url,
) -> Result<()> {
    match invocation.action {
        ShortcutAction::Next => {
            handle.next().await?;
        }
        ShortcutAction::Previous => {
            handle.previous().await?;
        }
        ShortcutAction::PlayPause => {
            handle.toggle_play_pause().await?;
        }
        ShortcutAction::Slideshow => {
            handle.toggle_slideshow().await?;
        }
        ShortcutAction::VolumeUp => {
            handle.adjust_volume(VOLUME_STEP).await?;
        }
        ShortcutAction::VolumeDown => {
            handle.adjust_volume(-VOLUME_STEP).await?;
        }
        ShortcutAction::SetVolume => match invocation.argument.parse::<i64>() {
            Ok(level) => {
                handle.set_volume(level).await?;
            }
            Err(_) => println!("Usage: vol <0-100>"),
        },
        ShortcutAction::Mute => {
            handle.toggle_mute().await?;
        }
        ShortcutAction::SelectVehicle if invocation.argument.is_empty() => println!("Usage: v <vehicle id>"),
        ShortcutAction::SelectVehicle => {
            handle.select_vehicle(VehicleId::new(invocation.argument)).await?;
        }
        ShortcutAction::JumpToMedia if invocation.argument.is_empty() => println!("Usage: m <media id>"),
        ShortcutAction::JumpToMedia => {
            handle.jump_to_media(MediaId::new(invocation.argument)).await?;
        }
        ShortcutAction::Share => {
            let snapshot = handle.snapshot();
            match &snapshot.vehicle {
                Some(vehicle) => {
                    let media: Vec<MediaId> = invocation
                        .argument
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|s| !s.is_empty())
                        .map(MediaId::new)
                        .collect();
                    let mut data = ShareData::for_vehicle(vehicle, &media, Utc::now());
                    if media.is_empty() && snapshot.is_slideshow_active {
                        data.kind = ShareKind::Slideshow;
                    }
                    println!("Share link: {}", data.share_url(base_url));
                }
                None => println!("Nothing on display to share"),
            }
        }
        ShortcutAction::Toggle360 => {
            let on = !immersive.fetch_xor(true, Ordering::Relaxed);
            println!("Immersive 360 view {}", if on { "on" } else { "off" });
            println!("{}", StatusLine::new(on).render(&handle.snapshot()));
        }
        ShortcutAction::Help => println!("{}", shortcuts.help()),
        ShortcutAction::Quit => {}
    }
    Ok(())
}
