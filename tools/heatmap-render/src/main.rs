// Heat map renderer CLI.
//
// Usage:
//   heatmap-render render <points> -o <output.png> [--width W] [--height H] ...
//   heatmap-render list

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use heatmap_raster::png_export::try_save_png;
use heatmap_raster::{Brightness, FadeMode, GradientTable, HeatMap, HeatMapConfig, OpacityProfile};
use heatmap_render::{brightness_by_name, gradient_by_name, parse_points, profile_by_name, PointRecord};

#[derive(Parser)]
#[command(author, version, about = "Render point events into a heat map PNG")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a point file (x,y[,radius] per line; '-' reads stdin).
    Render(RenderArgs),
    /// List available gradients, opacity profiles and brightness functions.
    List,
}

#[derive(Args)]
struct RenderArgs {
    /// Point file, or '-' for stdin.
    points: PathBuf,
    /// Output PNG path.
    #[arg(short, long)]
    output: PathBuf,
    #[arg(long, default_value_t = 400)]
    width: u32,
    #[arg(long, default_value_t = 400)]
    height: u32,
    /// Default event radius in pixels (at least 1).
    #[arg(long, default_value_t = 15.5)]
    radius: f64,
    #[arg(long, default_value = "LIME_YELLOW_RED")]
    gradient: String,
    #[arg(long, default_value = "CUSTOM")]
    profile: String,
    #[arg(long, default_value = "fast")]
    brightness: String,
    /// Render opaque colors instead of fading sparse regions out.
    #[arg(long)]
    no_fade: bool,
    /// Take the fade alpha from the buffer's alpha channel.
    #[arg(long)]
    buffer_alpha: bool,
    /// Overall opacity applied to the written image.
    #[arg(long, default_value_t = 1.0)]
    opacity: f64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Render(args) => cmd_render(&args),
        Command::List => {
            cmd_list();
            Ok(())
        }
    };
    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn cmd_list() {
    println!("Gradients:");
    for table in GradientTable::PRESETS {
        println!("  {} ({} stops)", table.name(), table.stops().len());
    }
    println!("Opacity profiles:");
    for profile in OpacityProfile::PRESETS {
        println!("  {}", profile.name());
    }
    println!("Brightness functions:");
    for b in Brightness::ALL {
        println!("  {}", b.name());
    }
}

fn cmd_render(args: &RenderArgs) -> Result<()> {
    let points = if args.points.as_os_str() == "-" {
        parse_points(io::stdin().lock())?
    } else {
        let file = File::open(&args.points)
            .with_context(|| format!("opening {}", args.points.display()))?;
        parse_points(BufReader::new(file))?
    };

    let fade_mode = if args.buffer_alpha {
        FadeMode::BufferAlpha
    } else {
        FadeMode::Brightness
    };
    let config = HeatMapConfig::new(args.width, args.height)
        .with_color_mapping(gradient_by_name(&args.gradient)?)
        .with_opacity_distribution(profile_by_name(&args.profile)?)
        .with_brightness(brightness_by_name(&args.brightness)?)
        .with_event_radius(args.radius)
        .with_fade_colors(!args.no_fade)
        .with_fade_mode(fade_mode)
        .with_heat_map_opacity(args.opacity);

    let mut map = HeatMap::new(config).context("creating heat map")?;
    let profile = map.opacity_distribution().clone();
    // White stamps accumulate as 1 - prod(1 - a), so batching the default
    // radius events ahead of the sized ones does not change the result.
    let (plain, sized): (Vec<&PointRecord>, Vec<&PointRecord>) = points.iter().partition(|p| p.radius.is_none());
    map.add_events(plain.iter().map(|p| (p.x, p.y)))?;
    for p in sized {
        map.add_event_with(p.x, p.y, p.radius.unwrap_or(args.radius), &profile)?;
    }
    log::info!(
        "rendered {} events at {}x{}",
        points.len(),
        map.width(),
        map.height()
    );

    try_save_png(map.image(), &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("saved {}", args.output.display());
    Ok(())
}
