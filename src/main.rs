/// Entry point and frame loop.

mod app;
mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use app::App;
use config::GameConfig;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, AudioSettings, SoundPlayer};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// WordLego: chain words against the clock in your terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Config file to use instead of searching for config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a debug log to wordlego.log
    #[arg(long)]
    debug: bool,

    /// Write the log to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Seed for the opponent, room codes and votes
    #[arg(long)]
    seed: Option<u64>,

    /// Start with sound muted
    #[arg(long)]
    mute: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::setup_logging(args.debug, args.log_file.as_deref()) {
        eprintln!("Logging setup failed: {e}");
        return ExitCode::FAILURE;
    }

    let mut config = GameConfig::load(args.config.as_deref());
    if args.seed.is_some() {
        config.general.rng_seed = args.seed;
    }
    if args.mute {
        config.audio.muted = true;
    }
    log::debug!("config: {config:?}");

    let mut audio = sound::open_player(AudioSettings::new(config.audio.volume, config.audio.muted));
    let mut app = App::new(config);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let result = game_loop(&mut app, &mut renderer, audio.as_mut());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
        return ExitCode::FAILURE;
    }

    println!();
    println!("Thanks for playing WordLego, {}!", app.username);
    ExitCode::SUCCESS
}

fn game_loop(
    app: &mut App,
    renderer: &mut Renderer,
    audio: &mut dyn SoundPlayer,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&app.config.gamepad);
    if gp.connected {
        log::info!("gamepad connected");
    }

    let frame = Duration::from_millis(app.config.general.frame_ms);
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        for cmd in kb.commands.drain(..).chain(gp.commands()) {
            app.handle(cmd, audio);
        }
        if app.quit {
            break;
        }

        let since = last_tick.elapsed();
        if since >= frame {
            let dt = since.as_millis() as u64;
            // Carry the sub-millisecond remainder into the next frame
            last_tick += Duration::from_millis(dt);
            app.update(dt, audio);
            renderer.render(app, audio)?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    log::info!("quit");
    Ok(())
}
