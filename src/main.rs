use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use musicbox::audio::Mpg123Backend;
use musicbox::config::Config;
use musicbox::controller::{Command, Player};
use musicbox::display;
use musicbox::logging;
use musicbox::model::Playlist;
use musicbox::view::Compositor;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== musicbox starting ===");

    let config = Config::load()?;

    let tracks = Playlist::scan(&config.music_dir);
    if tracks.is_empty() {
        tracing::error!(dir = %config.music_dir.display(), "No tracks found");
        eprintln!("No MP3 files found in {}", config.music_dir.display());
        eprintln!("Make sure the drive is mounted, e.g.:");
        eprintln!("  sudo mount /dev/sda1 {}", config.music_dir.display());
        return Ok(());
    }
    tracing::info!(count = tracks.len(), dir = %config.music_dir.display(), "Playlist loaded");

    let driver = display::open_driver(&config);
    let mut compositor = Compositor::new(driver, config.display_width, config.display_height);
    compositor.render_splash();

    let backend = Mpg123Backend::new(config.mixer_control.clone());
    let playlist = Playlist::new(tracks);
    let player = Player::new(playlist, backend, compositor, config.default_volume);

    let (commands, command_rx) = mpsc::channel::<Command>(32);
    let player_task = tokio::spawn(player.run(command_rx));

    // Physical buttons and the encoder register here when the GPIO backend
    // is present; without it the appliance runs on console control alone.
    tracing::info!("No physical input backend attached, console control only");

    commands.send(Command::Play(0)).await?;

    let console = tokio::spawn(run_console(
        commands.clone(),
        config.console_volume_step,
    ));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received");
        }
        _ = console => {}
    }

    // Teardown order: decoder first, then input sources, display last.
    // run() blanks the panel after the channel closes.
    commands.send(Command::Shutdown).await.ok();
    drop(commands);
    player_task.await?;

    tracing::info!("musicbox shut down");
    Ok(())
}

/// Textual command source: single-letter commands on stdin.
async fn run_console(commands: mpsc::Sender<Command>, volume_step: u8) {
    println!("=== musicbox controls ===");
    println!("  <enter> - play/pause");
    println!("  n - next track");
    println!("  p - previous track");
    println!("  s - stop");
    println!("  + / - - volume");
    println!("  [1-9]... - play track by number");
    println!("  q - quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let cmd = match line.trim() {
            "" => Some(Command::TogglePlayPause),
            "n" => Some(Command::Next),
            "p" => Some(Command::Previous),
            "s" => Some(Command::Stop),
            "+" => Some(Command::AdjustVolume(i16::from(volume_step))),
            "-" => Some(Command::AdjustVolume(-i16::from(volume_step))),
            "q" => break,
            number => match number.parse::<usize>() {
                Ok(n) if n >= 1 => Some(Command::Play(n - 1)),
                _ => {
                    println!("Unknown command: {}", number);
                    None
                }
            },
        };
        if let Some(cmd) = cmd {
            if commands.send(cmd).await.is_err() {
                break;
            }
        }
    }
}
