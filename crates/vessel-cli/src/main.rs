//! vessel-cli: run the showcase pipeline on an image file.
//!
//! Applies the same intake rules as the web page, generates both model
//! variants, composes the requested view, and writes every composed slot
//! plus both raw segmentation results as PNG files. Useful for checking
//! thresholds and overlay blending without a browser.
//!
//! # Usage
//!
//! ```text
//! cargo run --bin vessel-cli -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use vessel_pipeline::segment::marked_fraction;
use vessel_pipeline::{
    ContentMode, FileCandidate, Frame, Layout, ModelVariant, Opacity, PipelineConfig,
    SegmentationSource, ViewState, intake,
};

/// Run the vessel showcase pipeline on an image and write PNG previews.
#[derive(Parser)]
#[command(name = "vessel-cli", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP, GIF).
    image_path: PathBuf,

    /// Directory the PNGs are written to.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// What each composed slot shows.
    #[arg(long, value_enum, default_value_t = Content::Overlay)]
    content: Content,

    /// Compose both variants side by side instead of one.
    #[arg(long)]
    compare: bool,

    /// Variant composed when not comparing.
    #[arg(long, value_enum, default_value_t = Variant::BaseUnet)]
    variant: Variant,

    /// Overlay opacity in percent. Defaults to the config's opacity.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    opacity: Option<u8>,

    /// Full pipeline config as a JSON string.
    ///
    /// Missing fields take their defaults, e.g. `{"max_file_bytes": 1048576}`.
    #[arg(long)]
    config_json: Option<String>,

    /// Log pipeline details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

/// Content mode selection.
#[derive(Clone, Copy, ValueEnum)]
enum Content {
    /// The uploaded image, unmodified.
    Original,
    /// The variant's recolored raster.
    Segmented,
    /// The recolored raster blended over the original.
    Overlay,
}

impl From<Content> for ContentMode {
    fn from(content: Content) -> Self {
        match content {
            Content::Original => Self::Original,
            Content::Segmented => Self::Segmented,
            Content::Overlay => Self::Overlay,
        }
    }
}

/// Model variant selection.
#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    /// Threshold 100, painted red.
    BaseUnet,
    /// Threshold 90, painted blue.
    CbamNet,
}

impl From<Variant> for ModelVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::BaseUnet => Self::BaseUnet,
            Variant::CbamNet => Self::CbamNet,
        }
    }
}

/// Build the pipeline config from `--config-json`, or the defaults.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    cli.config_json.as_ref().map_or_else(
        || Ok(PipelineConfig::default()),
        |json| serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}")),
    )
}

fn view_from_cli(cli: &Cli, config: &PipelineConfig) -> ViewState {
    ViewState {
        content: cli.content.into(),
        layout: if cli.compare {
            Layout::Compare
        } else {
            Layout::Single
        },
        selected: cli.variant.into(),
        opacity: Opacity::new(cli.opacity.unwrap_or(config.default_opacity)),
    }
}

/// Media type to report for `path`, inferred from its extension the way a
/// browser would.
fn media_type_for_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(intake::media_type_for_name)
        .unwrap_or_default()
        .to_string()
}

/// File name stem used as the prefix for every output file.
fn output_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}

fn content_slug(content: ContentMode) -> &'static str {
    match content {
        ContentMode::Original => "original",
        ContentMode::Segmented => "segmented",
        ContentMode::Overlay => "overlay",
    }
}

fn variant_slug(variant: ModelVariant) -> &'static str {
    match variant {
        ModelVariant::BaseUnet => "base-unet",
        ModelVariant::CbamNet => "cbam-net",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli)?;
    if let SegmentationSource::Remote { endpoint } = &config.segmentation_source {
        tracing::warn!(%endpoint, "remote segmentation is browser-only; generating locally");
    }
    let view = view_from_cli(cli, &config);

    let bytes = std::fs::read(&cli.image_path)
        .map_err(|e| format!("Error reading {}: {e}", cli.image_path.display()))?;
    let name = cli
        .image_path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    let candidate = FileCandidate::new(name, media_type_for_path(&cli.image_path), bytes);

    eprintln!(
        "Input: {} ({})",
        candidate.meta.name,
        intake::format_file_size(candidate.meta.size)
    );

    let preview = vessel_pipeline::run(candidate, &config, &view).map_err(|e| e.to_string())?;
    let dims = preview.image.dimensions();
    eprintln!("Decoded: {}x{}", dims.width, dims.height);

    std::fs::create_dir_all(&cli.output_dir)
        .map_err(|e| format!("Error creating {}: {e}", cli.output_dir.display()))?;
    let stem = output_stem(&cli.image_path);

    for variant in ModelVariant::ALL {
        let Some(result) = preview.results.get(variant) else {
            continue;
        };
        eprintln!(
            "{variant}: {:.1}% of pixels marked",
            marked_fraction(result) * 100.0
        );
        let path = cli
            .output_dir
            .join(format!("{stem}-result-{}.png", variant_slug(variant)));
        save(result.pixels(), &path)?;
    }

    if !preview.composition.is_ready() {
        return Err("composition has pending slots".to_string());
    }
    for slot in &preview.composition.slots {
        let Frame::Ready(image) = &slot.frame else {
            continue;
        };
        let path = cli.output_dir.join(format!(
            "{stem}-{}-{}.png",
            content_slug(preview.composition.content),
            variant_slug(slot.variant)
        ));
        save(image, &path)?;
    }

    Ok(())
}

fn save(image: &vessel_pipeline::types::RgbaImage, path: &Path) -> Result<(), String> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vessel-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["fundus.png"]);
        let config = config_from_cli(&cli).unwrap();
        let view = view_from_cli(&cli, &config);
        assert_eq!(view.content, ContentMode::Overlay);
        assert_eq!(view.layout, Layout::Single);
        assert_eq!(view.selected, ModelVariant::BaseUnet);
        assert_eq!(view.opacity.percent(), 50);
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn flags_map_to_view() {
        let cli = parse(&[
            "fundus.png",
            "--content",
            "segmented",
            "--compare",
            "--variant",
            "cbam-net",
            "--opacity",
            "80",
        ]);
        let view = view_from_cli(&cli, &PipelineConfig::default());
        assert_eq!(view.content, ContentMode::Segmented);
        assert_eq!(view.layout, Layout::Compare);
        assert_eq!(view.selected, ModelVariant::CbamNet);
        assert_eq!(view.opacity.percent(), 80);
    }

    #[test]
    fn opacity_above_100_is_rejected() {
        let result =
            Cli::try_parse_from(["vessel-cli", "fundus.png", "--opacity", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_json_sets_default_opacity() {
        let cli = parse(&["fundus.png", "--config-json", r#"{"default_opacity": 20}"#]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(view_from_cli(&cli, &config).opacity.percent(), 20);
    }

    #[test]
    fn bad_config_json_is_an_error() {
        let cli = parse(&["fundus.png", "--config-json", "{not json"]);
        assert!(config_from_cli(&cli).unwrap_err().contains("--config-json"));
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_path(Path::new("a/b/scan.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("notes.txt")), "");
    }

    #[test]
    fn output_names() {
        assert_eq!(output_stem(Path::new("dir/fundus.png")), "fundus");
        assert_eq!(content_slug(ContentMode::Overlay), "overlay");
        assert_eq!(variant_slug(ModelVariant::CbamNet), "cbam-net");
    }
}
