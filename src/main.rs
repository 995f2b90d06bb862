//! PackView command line

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use packview::{
    build_session, font_metrics, init_logging, placement_report, write_frame, BUILD_DATE, VERSION,
};
use packview_layout::list_font_families;
use packview_settings::Config;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "packview")]
#[command(about = "Render packed boxes with fitted face labels")]
#[command(version)]
struct Cli {
    /// Configuration file (.toml or .json); defaults to the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one frame, with every label resolved, to an SVG file
    Render {
        /// Output SVG file
        #[arg(short, long)]
        out: PathBuf,

        /// Output width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Output height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Camera yaw in degrees, measured from +X towards +Z
        #[arg(long, allow_hyphen_values = true)]
        yaw: Option<f32>,

        /// Camera pitch in degrees
        #[arg(long, allow_hyphen_values = true)]
        pitch: Option<f32>,

        /// Frame the whole scene instead of using the configured distance
        #[arg(long)]
        fit: bool,
    },

    /// Render an auto-rotating frame sequence
    Orbit {
        /// Directory for frame_NNNN.svg files
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Number of frames
        #[arg(short, long, default_value = "60")]
        frames: u32,

        /// Auto-rotate speed in turns per minute
        #[arg(short, long)]
        speed: Option<f32>,

        /// Frames per second of the sequence
        #[arg(long, default_value = "30")]
        fps: f32,
    },

    /// Print box placements and label fits
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration
    InitConfig {
        /// Target file; defaults to the user config location
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List system font families usable for labels
    Fonts,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match Config::default_path() {
            Ok(default) => Config::load_or_default(&default)
                .with_context(|| format!("Failed to load config {}", default.display())),
            Err(e) => {
                warn!("no config directory ({}); using defaults", e);
                Ok(Config::default())
            }
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;
    info!(version = VERSION, build_date = BUILD_DATE, "packview starting");

    match cli.command {
        Commands::Render {
            out,
            width,
            height,
            yaw,
            pitch,
            fit,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(w) = width {
                config.view.width = w;
            }
            if let Some(h) = height {
                config.view.height = h;
            }
            config.validate()?;

            let (mut vis, _) = build_session(&config, font_metrics(&config.labels));
            if fit {
                if let Some((min, max)) = vis.scene().bounds() {
                    vis.camera.fit_to_bounds(min, max);
                }
            }
            if yaw.is_some() || pitch.is_some() {
                let yaw = yaw.unwrap_or_else(|| vis.camera.yaw.to_degrees());
                let pitch = pitch.unwrap_or_else(|| vis.camera.pitch.to_degrees());
                vis.camera.set_view(yaw, pitch);
            }

            let attached = vis.attach_all_labels().await;
            write_frame(&vis, &out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(path = %out.display(), labels = attached, "frame written");
        }

        Commands::Orbit {
            out_dir,
            frames,
            speed,
            fps,
        } => {
            if !(fps > 0.0) {
                bail!("--fps must be > 0");
            }
            let config = load_config(cli.config.as_deref())?;
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;

            let (mut vis, _) = build_session(&config, font_metrics(&config.labels));
            vis.controls.auto_rotate = true;
            if let Some(speed) = speed {
                vis.controls.auto_rotate_speed = speed;
            }

            let dt = 1.0 / fps;
            for _ in 0..frames {
                let frame = vis.tick(dt);
                let path = out_dir.join(format!("frame_{:04}.svg", frame.frame));
                write_frame(&vis, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                // Let label tasks progress between frames
                tokio::task::yield_now().await;
            }
            info!(
                frames,
                dir = %out_dir.display(),
                labels = vis.scene().label_count(),
                pending = vis.pending_labels(),
                "frame sequence written"
            );
        }

        Commands::List { json } => {
            let config = load_config(cli.config.as_deref())?;
            let metrics = font_metrics(&config.labels);
            let report = placement_report(&config.scene, config.labels.enabled, &metrics).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for placement in &report {
                    match (&placement.center, &placement.error) {
                        (Some(c), _) => {
                            println!(
                                "{:<16} center ({:.3}, {:.3}, {:.3})",
                                placement.name, c[0], c[1], c[2]
                            );
                        }
                        (None, Some(e)) => println!("{:<16} skipped: {}", placement.name, e),
                        (None, None) => println!("{:<16} skipped", placement.name),
                    }
                    for fit in &placement.labels {
                        if let Some(e) = &fit.error {
                            println!("    {:<5} invalid: {}", fit.face, e);
                            continue;
                        }
                        let status = match fit.fits {
                            Some(true) => "fits",
                            Some(false) => "omitted",
                            None => "no font",
                        };
                        match fit.measured_width {
                            Some(w) => println!(
                                "    {:<5} {:<7} text {:.3} / face {:.3}",
                                fit.face, status, w, fit.face_extent
                            ),
                            None => println!(
                                "    {:<5} {:<7} face {:.3}",
                                fit.face, status, fit.face_extent
                            ),
                        }
                    }
                }
            }
        }

        Commands::InitConfig { path, force } => {
            let path = match path.or(cli.config) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            if path.exists() && !force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            Config::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", path.display());
        }

        Commands::Fonts => {
            for family in list_font_families() {
                println!("{}", family);
            }
        }
    }

    Ok(())
}
