#![deny(unsafe_code)]
//! CLI binary for the contour-field animation.
//!
//! Subcommands:
//! - `render`: play a scene headless for N frames, write the last one as PNG
//! - `trace`: print the chained isolines of one threshold as JSON
//! - `list`: print available scenes

mod error;

use clap::{ArgAction, Parser, Subcommand};
use contour_field_core::geometry::Path;
use contour_field_core::Scene;
use contour_field_scenes::headless::{play, Playback};
use contour_field_scenes::pixmap::Pixmap;
use contour_field_scenes::SceneKind;
use contour_field_topo::{TopoParams, TopoScene};
use error::CliError;
use log::info;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "contour-field", about = "Animated topographic contour field CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a scene offscreen and write the final frame as a PNG.
    Render {
        /// Scene name (see `list`).
        #[arg(long, default_value = "topo")]
        scene: String,

        /// Viewport width in logical pixels.
        #[arg(short = 'W', long, default_value_t = 400.0)]
        width: f64,

        /// Viewport height in logical pixels.
        #[arg(short = 'H', long, default_value_t = 300.0)]
        height: f64,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 120)]
        frames: u32,

        /// Simulated display refresh rate.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Pointer position held over the surface, as `X,Y`.
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f64, f64)>,

        /// Device pixel ratio of the output image.
        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f64,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// Print the chained isolines for one threshold as JSON.
    Trace {
        /// Viewport width in logical pixels.
        #[arg(short = 'W', long, default_value_t = 400.0)]
        width: f64,

        /// Viewport height in logical pixels.
        #[arg(short = 'H', long, default_value_t = 300.0)]
        height: f64,

        /// Simulated time in seconds.
        #[arg(long, default_value_t = 0.0)]
        time: f64,

        /// Contour threshold.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        threshold: f64,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available scenes.
    List,
}

/// Parses `"X,Y"` into a point.
fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid coordinate '{v}'"))
    };
    Ok((coord(x)?, coord(y)?))
}

fn parse_params(params: &str) -> Result<Value, CliError> {
    serde_json::from_str(params).map_err(CliError::Params)
}

/// JSON document for `trace`: each path as an array of `[x, y]` pairs.
fn trace_document(threshold: f64, time: f64, tolerance: f64, paths: &[Path]) -> Value {
    let paths: Vec<Value> = paths
        .iter()
        .map(|p| {
            json!({
                "closed": p.is_closed(tolerance),
                "points": p.points().iter().map(|q| [q.x, q.y]).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({
        "threshold": threshold,
        "time": time,
        "path_count": paths.len(),
        "paths": paths,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenes = SceneKind::list_scenes();
            if cli.json {
                let info = json!({
                    "scenes": scenes,
                    "parameters": TopoParams::schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenes:");
                for name in scenes {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            scene,
            width,
            height,
            frames,
            fps,
            pointer,
            pixel_ratio,
            params,
            output,
        } => {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(CliError::FrameRate(fps));
            }
            let params = parse_params(&params)?;
            let kind = SceneKind::from_name(&scene, width, height, &params)?;
            let pixmap = Pixmap::new(width, height, pixel_ratio)?;
            let playback = Playback {
                frames,
                fps,
                pointer,
            };

            let driver = play(kind, pixmap, &playback);
            let pixmap = driver.canvas().ok_or(CliError::NoSurface)?;
            contour_field_scenes::snapshot::write_png(pixmap, &output)
                .map_err(|e| CliError::write(&output, e))?;
            info!("wrote {}", output.display());

            if cli.json {
                let info = json!({
                    "scene": scene,
                    "width": width,
                    "height": height,
                    "frames": driver.frames(),
                    "fps": fps,
                    "pixel_ratio": pixel_ratio,
                    "params": driver.scene().params(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {scene} ({width}x{height}, {} frames @ {fps} fps) -> {}",
                    driver.frames(),
                    output.display()
                );
            }
        }
        Command::Trace {
            width,
            height,
            time,
            threshold,
            params,
        } => {
            let params = parse_params(&params)?;
            let mut topo = TopoScene::from_json(width, height, &params)?;
            topo.set_time(time);
            let paths = topo.trace(threshold);
            let doc = trace_document(threshold, topo.time(), topo.topo_params().tolerance, &paths);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
