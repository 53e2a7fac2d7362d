use std::time::Duration;

use clap::{Parser, Subcommand};

use live_detect::api::{DetectClient, DEFAULT_SERVER_URL, DETECT_SERVER_ENV};
use live_detect::camera::{self, CameraFeed, CameraSettings, Resolution};
use live_detect::catalog::ClassCatalog;
use live_detect::config::Config;
use live_detect::event_loop::{self, SessionOptions};
use live_detect::terminal::Tui;

/// Parse and validate a resolution (WIDTHxHEIGHT format)
fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 1280x720)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in resolution", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in resolution", parts[1]))?;
    if width == 0 || height == 0 {
        return Err("Resolution width and height must be greater than 0".to_string());
    }
    Ok((width, height))
}

/// Parse and validate the prediction interval (100-60000 ms)
fn parse_interval_ms(s: &str) -> Result<u64, String> {
    let ms: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid interval", s))?;
    if !(100..=60_000).contains(&ms) {
        return Err(format!(
            "Interval must be between 100 and 60000 ms, got {}",
            ms
        ));
    }
    Ok(ms)
}

/// live-detect: live webcam object detection in the terminal
#[derive(Parser)]
#[command(name = "live-detect")]
#[command(version, about = "Live webcam object detection in the terminal")]
#[command(long_about = "Streams webcam frames to a remote detection server and renders \
    bounding-box overlays plus a per-class confidence panel in the terminal.")]
#[command(after_help = "EXAMPLES:
    # Start against the default local server
    live-detect run

    # Point at a remote detection server
    live-detect run --server http://10.0.0.5:5000

    # Pick a camera and slow the cycle down
    live-detect run --camera 1 --interval-ms 2000

    # List available cameras
    live-detect list-cameras

ENVIRONMENT:
    DETECT_SERVER_URL    Detection server base URL (overrides the config file).")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the capture and detection session
    #[command(after_help = "HOTKEYS (while running):
    q / Esc / Ctrl+C   Quit")]
    Run {
        /// Detection server base URL
        #[arg(long, short = 's')]
        server: Option<String>,

        /// Camera device index (see list-cameras)
        #[arg(long, short = 'c')]
        camera: Option<u32>,

        /// Milliseconds between prediction cycles (100-60000, default 1000)
        #[arg(long, value_parser = parse_interval_ms)]
        interval_ms: Option<u64>,

        /// Requested capture resolution (WIDTHxHEIGHT, default 1280x720)
        #[arg(long, short = 'r', value_parser = parse_resolution)]
        resolution: Option<(u32, u32)>,

        /// Mirror (horizontally flip) the camera feed
        #[arg(long)]
        mirror: bool,

        /// Hide the bottom status bar
        #[arg(long)]
        no_status_bar: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<String>,
    },

    /// List available camera devices
    ListCameras,
}

/// Load .env before anything else reads the environment.
///
/// Existing environment variables are never overridden.
fn load_env() {
    let _ = dotenv::dotenv();
}

fn run_list_cameras() -> Result<(), String> {
    let devices = camera::list_devices().map_err(|e| e.to_string())?;

    if devices.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:\n");
    for device in &devices {
        println!("  {}", device);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_session(
    server: Option<String>,
    camera_index: Option<u32>,
    interval_ms: Option<u64>,
    resolution: Option<(u32, u32)>,
    mirror: bool,
    no_status_bar: bool,
    config_path: Option<String>,
) -> Result<(), String> {
    // Explicit --config paths must exist; the default path falls back to
    // built-in defaults when missing.
    let cfg = match config_path {
        Some(path) => Config::load(Some(std::path::Path::new(&path))).map_err(|e| e.to_string())?,
        None => match Config::load(None) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Config::default()
            }
        },
    };

    // Merge settings: CLI args > environment > config file > defaults.
    let server = server
        .or_else(|| std::env::var(DETECT_SERVER_ENV).ok())
        .or(cfg.server.url)
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let device_index = camera_index.or(cfg.camera.device).unwrap_or(0);
    let mirror = mirror || cfg.camera.mirror.unwrap_or(false);

    let resolution = resolution
        .or_else(|| cfg.camera.width.zip(cfg.camera.height))
        .map(|(width, height)| Resolution { width, height })
        .unwrap_or(Resolution::PREFERRED);

    let interval = Duration::from_millis(interval_ms.or(cfg.detect.interval_ms).unwrap_or(1000));
    let show_status_bar = !no_status_bar && cfg.ui.status_bar.unwrap_or(true);

    // Camera failure is terminal for the session: no TUI, no retry.
    let settings = CameraSettings {
        device_index,
        resolution,
        fps: 30,
        mirror,
    };
    let mut camera = CameraFeed::open(settings).map_err(|e| format!("Camera unavailable: {}", e))?;
    camera
        .start()
        .map_err(|e| format!("Camera unavailable: {}", e))?;

    if let Some(actual) = camera.actual_resolution() {
        log::info!("camera ready at {}", actual);
    }

    let client = DetectClient::with_base_url(server).map_err(|e| e.to_string())?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    let result = rt.block_on(async {
        // A missing or empty catalog is loud but not fatal: the session
        // opens with the live camera view and an empty results state, and
        // the prediction loop never starts.
        let catalog = match ClassCatalog::fetch(&client).await {
            Ok(catalog) => {
                log::info!("loaded {} classes", catalog.len());
                Some(catalog)
            }
            Err(e) => {
                log::error!("failed to load class catalog: {}", e);
                None
            }
        };

        let options = SessionOptions {
            interval,
            show_status_bar,
        };

        let mut tui = Tui::new().map_err(|e| format!("Failed to set up terminal: {}", e))?;
        let session = event_loop::run(&mut tui, &camera, client, catalog, options).await;
        tui.restore()
            .map_err(|e| format!("Failed to restore terminal: {}", e))?;
        session.map_err(|e| e.to_string())
    });

    camera.stop();
    result
}

fn main() {
    load_env();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ListCameras) => {
            if let Err(e) = run_list_cameras() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Run {
            server,
            camera,
            interval_ms,
            resolution,
            mirror,
            no_status_bar,
            config,
        }) => {
            if let Err(e) = run_session(
                server,
                camera,
                interval_ms,
                resolution,
                mirror,
                no_status_bar,
                config,
            ) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            // Brief help when no command is provided.
            println!("live-detect {}", env!("CARGO_PKG_VERSION"));
            println!("Live webcam object detection in the terminal\n");
            println!("USAGE:");
            println!("    live-detect <COMMAND>\n");
            println!("COMMANDS:");
            println!("    run           Start the capture and detection session");
            println!("    list-cameras  List available camera devices");
            println!("    help          Print this message or the help of a subcommand\n");
            println!("Run 'live-detect --help' for more details and examples.");
        }
    }
}
