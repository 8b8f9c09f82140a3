use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mandelbrot_engine::{
    ColourStrategyKind, DEFAULT_WORKERS, MandelbrotConfig, RenderBmpController,
};

#[derive(Parser)]
#[command(name = "mandelbrot")]
#[command(about = "Mandelbrot image generator")]
struct Args {
    /// Output file; ".bmp" is appended when missing
    #[arg(short, long, default_value = "mandelbrot.bmp")]
    filename: PathBuf,

    /// Center x coordinate on the plane
    #[arg(long = "cx", visible_alias = "center-x", default_value_t = -0.637011, allow_negative_numbers = true)]
    center_x: f64,

    /// Center y coordinate on the plane
    #[arg(long = "cy", visible_alias = "center-y", default_value_t = -0.0395159, allow_negative_numbers = true)]
    center_y: f64,

    /// Plane units per pixel
    #[arg(short, long, default_value_t = 0.00403897)]
    scale: f64,

    /// Width of the image in pixels
    #[arg(short = 'x', long, default_value_t = 1024, allow_negative_numbers = true)]
    width: i32,

    /// Height of the image in pixels
    #[arg(short = 'y', long, default_value_t = 768, allow_negative_numbers = true)]
    height: i32,

    /// Maximum number of iterations per pixel
    #[arg(short, long, default_value_t = 400)]
    iterations: u32,

    /// Colour strategy: smooth, iter or wave
    #[arg(short, long, default_value = "smooth")]
    colour: ColourStrategyKind,

    /// Colour intensity, smooth strategy only
    #[arg(long, default_value_t = -0.1275, allow_negative_numbers = true)]
    intensity: f64,

    /// Number of worker threads
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    threads: usize,
}

impl Args {
    fn config(&self) -> MandelbrotConfig {
        MandelbrotConfig {
            center: (self.center_x, self.center_y),
            scale: self.scale,
            width: self.width,
            height: self.height,
            max_iterations: self.iterations,
            colour_strategy_kind: self.colour,
            colour_intensity: self.intensity,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mandelbrot_engine=info,mandelbrot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();
    let controller = RenderBmpController::new(args.config(), &args.filename, args.threads);

    controller
        .run()
        .with_context(|| format!("failed to render {}", controller.path().display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let args = Args::parse_from(["mandelbrot"]);

        assert_eq!(args.config(), MandelbrotConfig::default());
        assert_eq!(args.filename, PathBuf::from("mandelbrot.bmp"));
        assert_eq!(args.threads, 4);
    }

    #[test]
    fn test_parses_short_flags_and_negative_values() {
        let args = Args::parse_from([
            "mandelbrot", "-f", "zoom", "--cx", "-1.25", "--cy", "0.1", "-s", "1e-5", "-x", "64",
            "-y", "48", "-i", "1000", "-c", "wave", "-t", "2",
        ]);
        let config = args.config();

        assert_eq!(config.center, (-1.25, 0.1));
        assert_eq!(config.scale, 1e-5);
        assert_eq!((config.width, config.height), (64, 48));
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.colour_strategy_kind, ColourStrategyKind::Wavelength);
        assert_eq!(args.threads, 2);
    }

    #[test]
    fn test_rejects_unknown_colour() {
        assert!(Args::try_parse_from(["mandelbrot", "-c", "plasma"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;

        Args::command().debug_assert();
    }
}
