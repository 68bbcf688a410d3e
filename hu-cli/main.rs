//! hulocate: find a reference shape inside a scene image.

use clap::{Parser, ValueEnum};
use flexi_logger::{Logger, LoggerHandle};
use hu_cli::{load_color, load_config, load_gray, present, ScalePolicy, ShapeLocator};
use hu_search::{SearchBuilder, SearchConfig};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Simple,
    MultiScale,
    Original,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Keep a scale only if the rounded window size equals the footprint
    Exact,
    /// Resample scaled windows to the footprint
    Resample,
}

impl From<PolicyArg> for ScalePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Exact => ScalePolicy::ExactFootprint,
            PolicyArg::Resample => ScalePolicy::Resample,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "hulocate")]
#[command(about = "Locate a reference shape in a scene using Hu moment descriptors")]
#[command(version)]
struct Cli {
    /// Reference image (the object to find)
    reference: PathBuf,

    /// Scene image to search
    scene: PathBuf,

    /// Start from a named preset
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Load search settings from a TOML or JSON file
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Distance in pixels between scan origins
    #[arg(long)]
    grid_step: Option<usize>,

    /// Comma-separated scale factors, e.g. 0.8,0.9,1.0,1.1,1.2
    #[arg(long, value_delimiter = ',')]
    scales: Option<Vec<f64>>,

    /// How scale factors map to scan windows
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Resize the reference by this factor before searching
    #[arg(long)]
    reference_scale: Option<f64>,

    /// Adaptive threshold neighbourhood (odd, >= 3)
    #[arg(long)]
    block_size: Option<usize>,

    /// Adaptive threshold bias
    #[arg(long, allow_hyphen_values = true)]
    bias: Option<f64>,

    /// Worker threads for the parallel scan
    #[arg(long)]
    threads: Option<usize>,

    /// Scan on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Write the annotated scene to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Shrink the annotated scene to fit WxH
    #[arg(long, value_parser = parse_size, default_value = "1366x768")]
    fit: (u32, u32),

    /// Keep the annotated scene at full size
    #[arg(long)]
    no_fit: bool,

    /// Write the binarized reference to this file
    #[arg(long)]
    dump_mask: Option<PathBuf>,

    /// Log level or filter string (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{}': {}", h, e))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got {}x{}", w, h));
    }
    Ok((w, h))
}

fn setup_logging(level: &str) -> CliResult<LoggerHandle> {
    Ok(Logger::try_with_env_or_str(level)?.start()?)
}

fn builder_from_args(cli: &Cli) -> CliResult<SearchBuilder> {
    let base = match (&cli.config, cli.preset) {
        (Some(path), _) => load_config(path)?,
        (None, Some(PresetArg::Simple)) => SearchConfig::simple_preset(),
        (None, Some(PresetArg::MultiScale)) => SearchConfig::multi_scale_preset(),
        (None, Some(PresetArg::Original)) => SearchConfig::original_preset(),
        (None, None) => SearchConfig::new(),
    };
    info!("{}", base.summary());

    let mut builder = base.to_builder();
    if let Some(step) = cli.grid_step {
        builder = builder.grid_step(step);
    }
    if let Some(scales) = &cli.scales {
        builder = builder.scales(scales);
    }
    if let Some(policy) = cli.policy {
        builder = builder.scale_policy(policy.into());
    }
    if let Some(factor) = cli.reference_scale {
        builder = builder.reference_scale(factor);
    }
    if let Some(size) = cli.block_size {
        builder = builder.block_size(size);
    }
    if let Some(bias) = cli.bias {
        builder = builder.bias(bias);
    }
    if let Some(n) = cli.threads {
        builder = builder.threads(n);
    }
    if cli.sequential {
        builder = builder.parallel(false);
    }
    Ok(builder)
}

fn run(cli: &Cli) -> CliResult<ExitCode> {
    let locator = ShapeLocator::from_builder(builder_from_args(cli)?)?;

    let reference = load_gray(&cli.reference)?;
    let scene = load_gray(&cli.scene)?;
    info!(
        "Reference {}x{}, scene {}x{}",
        reference.width(),
        reference.height(),
        scene.width(),
        scene.height()
    );

    if let Some(path) = &cli.dump_mask {
        locator.mask(&reference).save(path)?;
        info!("Reference mask written to {}", path.display());
    }

    let t0 = Instant::now();
    let result = locator.locate_images(&reference, &scene)?;
    info!(
        "Evaluated {} candidates in {:.2?}",
        result.candidates_evaluated,
        t0.elapsed()
    );

    let Some((cx, cy)) = result.center() else {
        eprintln!("No candidates: the reference does not fit inside the scene");
        return Ok(ExitCode::from(1));
    };

    println!("Best match: distance = {:.6}", result.best_distance);
    if let Some(scale) = result.best_scale {
        println!("Scale: {}", scale);
    }
    println!("Center: x={} y={}", cx, cy);

    if let Some(path) = &cli.output {
        let color = load_color(&cli.scene)?;
        let fit = if cli.no_fit { None } else { Some(cli.fit) };
        present::save_rendered(&color, &result, fit, path)?;
        info!("Annotated scene written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _logger = match setup_logging(&cli.log_level) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Logger initialization failed: {}", e);
            return ExitCode::from(2);
        }
    };

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1366x768"), Ok((1366, 768)));
        assert_eq!(parse_size("640X480"), Ok((640, 480)));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn test_cli_overrides_preset() {
        let cli = Cli::parse_from([
            "hulocate",
            "ref.png",
            "scene.png",
            "--preset",
            "original",
            "--grid-step",
            "4",
            "--scales",
            "0.9,1.0",
            "--policy",
            "resample",
            "--sequential",
        ]);
        let builder = builder_from_args(&cli).unwrap();
        let p = builder.params();
        assert_eq!(p.grid_step, 4);
        assert_eq!(p.scales, vec![0.9, 1.0]);
        assert_eq!(p.scale_policy, ScalePolicy::Resample);
        assert_eq!(p.reference_scale, 0.5);
        assert!(!p.parallel);
        assert_eq!(cli.fit, (1366, 768));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["hulocate", "ref.png", "scene.png"]);
        let p = builder_from_args(&cli).unwrap().params().clone();
        assert_eq!(p.grid_step, 1);
        assert_eq!(p.scales, vec![1.0]);
        assert!(p.parallel);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_config_conflicts_with_preset() {
        let parsed = Cli::try_parse_from([
            "hulocate", "a.png", "b.png", "--config", "c.toml", "--preset", "simple",
        ]);
        assert!(parsed.is_err());
    }
}
