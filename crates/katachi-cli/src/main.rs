//! katachi: classify the figure drawn in an image file.
//!
//! Reads an image (PNG, JPEG, BMP, WebP) or a `.txt` ASCII grid, runs the
//! classification pipeline and prints the figure type with its corner
//! count. Optional flags show the intermediate grids, save them as
//! images, or print per-stage diagnostics.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin katachi -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use katachi_pipeline::diagnostics::{
    AnalysisDiagnostics, Clock, analyze_with_diagnostics, process_with_diagnostics,
};
use katachi_pipeline::{
    AnalysisConfig, Classification, CornerMatch, Grid, Label, Palette, PipelineError,
    StagedAnalysis, render,
};
use serde::Serialize;

/// Classify the figure (ellipse, triangle, rectangle, line, polyline)
/// drawn in a black-and-white image.
#[derive(Parser)]
#[command(name = "katachi", version)]
struct Cli {
    /// Path to the input image, or a `.txt` file of ASCII grid rows.
    image_path: PathBuf,

    /// Canvas color as `#rrggbb` or `#rrggbbaa`.
    #[arg(long, value_parser = parse_hex_color)]
    background: Option<[u8; 4]>,

    /// Figure color as `#rrggbb` or `#rrggbbaa`.
    #[arg(long, value_parser = parse_hex_color)]
    foreground: Option<[u8; 4]>,

    /// Compare the alpha channel when matching colors.
    #[arg(long)]
    match_alpha: bool,

    /// Full analysis config as a JSON string.
    ///
    /// When provided, the color flags are ignored. The JSON must be a
    /// valid `AnalysisConfig` serialization; missing fields take their
    /// defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Print the input grid and the flood and erasure scratch grids.
    #[arg(long)]
    show_grids: bool,

    /// Write the flood and erasure scratch grids as PNGs into this
    /// directory.
    #[arg(long, value_name = "DIR")]
    save_grids: Option<PathBuf>,

    /// Print per-stage diagnostics.
    #[arg(long)]
    diagnostics: bool,

    /// Output the result as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Parse `#rrggbb` / `#rrggbbaa` (leading `#` optional). Alpha defaults
/// to opaque.
fn parse_hex_color(s: &str) -> Result<[u8; 4], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return Err(format!("expected #rrggbb or #rrggbbaa, got '{s}'"));
    }
    let mut rgba = [0, 0, 0, 255];
    for (i, channel) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
        let pair = &hex[i * 2..i * 2 + 2];
        *channel =
            u8::from_str_radix(pair, 16).map_err(|e| format!("invalid hex '{pair}': {e}"))?;
    }
    Ok(rgba)
}

/// Build an [`AnalysisConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual color flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<AnalysisConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    let defaults = Palette::default();
    Ok(AnalysisConfig {
        palette: Palette {
            background: cli.background.unwrap_or(defaults.background),
            foreground: cli.foreground.unwrap_or(defaults.foreground),
            match_alpha: cli.match_alpha,
            ..defaults
        },
    })
}

/// JSON shape of a run.
#[derive(Serialize)]
struct Output<'a> {
    classification: Classification,
    has_lines: bool,
    corners: &'a [CornerMatch],
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a AnalysisDiagnostics>,
}

fn run(
    cli: &Cli,
    config: &AnalysisConfig,
) -> Result<(Grid, StagedAnalysis, AnalysisDiagnostics), String> {
    config.validate().map_err(describe)?;

    let path = &cli.image_path;
    let is_text = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    if is_text {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        let grid = render::from_ascii(&text).map_err(describe)?;
        eprintln!("Grid: {} ({}x{})", path.display(), grid.width(), grid.height());
        let (staged, diagnostics) = analyze_with_diagnostics(&grid, &StdClock);
        return Ok((grid, staged, diagnostics));
    }

    let bytes =
        std::fs::read(path).map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    eprintln!("Image: {} ({} bytes)", path.display(), bytes.len());
    process_with_diagnostics(&bytes, config, &StdClock).map_err(describe)
}

fn describe(e: PipelineError) -> String {
    format!("Pipeline error: {e}")
}

fn print_grids(grid: &Grid, staged: &StagedAnalysis) {
    println!("Input:\n{}", render::to_ascii(grid));
    if let Some(ref flooded) = staged.flooded {
        println!("Flooded:\n{}", render::to_ascii(flooded));
    }
    if let Some(ref corners) = staged.corners {
        println!("Erased:\n{}", render::to_ascii(&corners.erased));
        for m in &corners.matches {
            println!("corner {:?} at row {}, col {}", m.kind, m.row, m.col);
        }
    }
}

fn save_grids(dir: &Path, staged: &StagedAnalysis, palette: &Palette) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("Error creating {}: {e}", dir.display()))?;
    let grids = [
        ("flooded.png", staged.flooded.as_ref()),
        ("erased.png", staged.corners.as_ref().map(|c| &c.erased)),
    ];
    for (name, grid) in grids {
        let Some(grid) = grid else {
            continue;
        };
        let path = dir.join(name);
        let image = grid
            .to_image(palette)
            .ok_or_else(|| format!("grid too large to save as {}", path.display()))?;
        image
            .save(&path)
            .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_result(classification: &Classification) {
    if classification.label == Label::Blank {
        println!("The image is BLANK");
        return;
    }
    println!("Figure type is {}", classification.label);
    println!("Corners: {}", classification.corner_count);
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let (grid, staged, diagnostics) = match run(&cli, &config) {
        Ok(out) => out,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    if cli.show_grids {
        print_grids(&grid, &staged);
    }

    if let Some(ref dir) = cli.save_grids
        && let Err(msg) = save_grids(dir, &staged, &config.palette)
    {
        eprintln!("{msg}");
        return ExitCode::FAILURE;
    }

    let classification = staged.classification();
    if cli.json {
        let output = Output {
            classification,
            has_lines: staged.has_lines,
            corners: staged
                .corners
                .as_ref()
                .map_or(&[][..], |c| c.matches.as_slice()),
            diagnostics: cli.diagnostics.then_some(&diagnostics),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        if cli.diagnostics {
            println!("{}\n", diagnostics.report());
        }
        print_result(&classification);
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_rgb() {
        assert_eq!(parse_hex_color("#ff8000").unwrap(), [255, 128, 0, 255]);
        assert_eq!(parse_hex_color("000000").unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn hex_color_rgba() {
        assert_eq!(parse_hex_color("#01020304").unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn hex_color_rejects_bad_input() {
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("#ffé000").is_err());
    }

    #[test]
    fn config_from_flags() {
        let cli = Cli::parse_from(["katachi", "in.png", "--foreground", "#0000ff"]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.palette.foreground, [0, 0, 255, 255]);
        assert_eq!(config.palette.background, Palette::DEFAULT_BACKGROUND);
        assert!(!config.palette.match_alpha);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::parse_from([
            "katachi",
            "in.png",
            "--foreground",
            "#0000ff",
            "--config-json",
            r#"{"palette":{"match_alpha":true}}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert!(config.palette.match_alpha);
        assert_eq!(config.palette.foreground, Palette::DEFAULT_FOREGROUND);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = Cli::parse_from(["katachi", "in.png", "--config-json", "{"]);
        assert!(config_from_cli(&cli).is_err());
    }

    #[test]
    fn invalid_palette_rejected_before_reading_input() {
        let cli = Cli::parse_from([
            "katachi",
            "missing-grid.txt",
            "--config-json",
            r#"{"palette":{"foreground":[255,255,255,255]}}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        let err = run(&cli, &config).err().unwrap();
        assert!(
            err.contains("invalid pipeline configuration"),
            "unexpected error {err}"
        );
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
