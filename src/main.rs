use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use iconforge::utils::{encode_png_with_quality, validate_export_size};
use iconforge::{
    generate_previews, rasterize_svg, render_bundle, render_to_vector_document, AssetGate,
    CustomIconConfig, ExportFormat, FontBook, IconRenderer, PREVIEW_SIZES,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "iconforge")]
#[command(about = "Render gradient icons to PNG or SVG", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default icon configuration
    Init {
        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render an icon configuration at one or more sizes
    Render {
        /// Path to the icon configuration JSON
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Pixel sizes to export (defaults to the preview set)
        #[arg(short, long = "size", value_name = "SIZE", num_args = 1..)]
        sizes: Vec<u32>,

        #[arg(long, value_enum, default_value_t = Format::Png)]
        format: Format,

        /// File name prefix; files are written as <basename>-<size>px.<ext>
        #[arg(long, default_value = "icon")]
        basename: String,

        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// PNG compression quality, 0-100
        #[arg(long, default_value_t = 75, value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: u8,

        /// Extra font files to make available to the text layer
        #[arg(long = "font-file", value_name = "FILE")]
        font_files: Vec<PathBuf>,

        /// Rasterize through the SVG document instead of the direct renderer
        #[arg(long)]
        via_svg: bool,
    },

    /// Resize an existing PNG icon into several sizes
    Resize {
        #[arg(value_name = "PNG")]
        input: PathBuf,

        #[arg(short, long = "size", value_name = "SIZE", num_args = 1..)]
        sizes: Vec<u32>,

        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Seconds to wait for the image to decode
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Png,
    Svg,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => ExportFormat::Png,
            Format::Svg => ExportFormat::Svg,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Args::parse().command {
        Command::Init { output } => init(output.as_deref()),
        Command::Render {
            config,
            sizes,
            format,
            basename,
            out_dir,
            quality,
            font_files,
            via_svg,
        } => {
            let config = load_config(&config)?;
            let fonts = load_fonts(&font_files)?;
            let sizes = sizes_or_previews(sizes);
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create output directory: {out_dir:?}"))?;

            if via_svg {
                render_via_svg(&config, &fonts, &sizes, &basename, &out_dir, quality)
            } else {
                render(&config, fonts, &sizes, format.into(), &basename, &out_dir, quality)
            }
        }
        Command::Resize {
            input,
            sizes,
            out_dir,
            timeout,
        } => resize(&input, &sizes_or_previews(sizes), &out_dir, timeout),
    }
}

fn init(output: Option<&Path>) -> Result<()> {
    let json = CustomIconConfig::default()
        .to_json()
        .context("Failed to serialize default configuration")?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write configuration: {path:?}"))?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<CustomIconConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {path:?}"))?;
    let config = CustomIconConfig::from_json(&json).context("Failed to parse icon configuration")?;
    config.validate().context("Invalid icon configuration")?;
    Ok(config)
}

fn load_fonts(font_files: &[PathBuf]) -> Result<FontBook> {
    let mut fonts = FontBook::system();
    for path in font_files {
        fonts
            .load_font_file(path)
            .with_context(|| format!("Failed to load font file: {path:?}"))?;
    }
    tracing::debug!(faces = fonts.len(), "font book ready");
    Ok(fonts)
}

fn sizes_or_previews(sizes: Vec<u32>) -> Vec<u32> {
    if sizes.is_empty() {
        PREVIEW_SIZES.to_vec()
    } else {
        sizes
    }
}

fn render(
    config: &CustomIconConfig,
    fonts: FontBook,
    sizes: &[u32],
    format: ExportFormat,
    basename: &str,
    out_dir: &Path,
    quality: u8,
) -> Result<()> {
    let renderer = IconRenderer::new(fonts);
    let mut failures = 0;
    for (size, result) in sizes
        .iter()
        .zip(render_bundle(&renderer, config, sizes, format, quality))
    {
        match result.and_then(|icon| icon.write_to_dir(out_dir, basename)) {
            Ok(path) => println!("Wrote {}", path.display()),
            Err(err) => {
                eprintln!("Failed to export {size}px: {err}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} sizes failed to export", sizes.len());
    }
    Ok(())
}

fn render_via_svg(
    config: &CustomIconConfig,
    fonts: &FontBook,
    sizes: &[u32],
    basename: &str,
    out_dir: &Path,
    quality: u8,
) -> Result<()> {
    for &size in sizes {
        let size = validate_export_size(size)?;
        let svg = render_to_vector_document(config, size)
            .with_context(|| format!("Failed to build SVG at {size}px"))?;
        let pixmap = rasterize_svg(&svg, fonts)
            .with_context(|| format!("Failed to rasterize SVG at {size}px"))?;
        let png = encode_png_with_quality(&pixmap, quality)?;

        let path = out_dir.join(iconforge::export_file_name(basename, size, ExportFormat::Png));
        fs::write(&path, png).with_context(|| format!("Failed to write PNG file: {path:?}"))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn resize(input: &Path, sizes: &[u32], out_dir: &Path, timeout: u64) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read image: {input:?}"))?;
    let source = AssetGate::decode_png(bytes)
        .wait(std::time::Duration::from_secs(timeout))
        .with_context(|| format!("Failed to load image: {input:?}"))?;

    for &size in sizes {
        validate_export_size(size)?;
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {out_dir:?}"))?;

    let basename = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("icon");
    for (size, pixmap) in generate_previews(&source, sizes)? {
        let path = out_dir.join(iconforge::export_file_name(basename, size, ExportFormat::Png));
        let png = encode_png_with_quality(&pixmap, 100)?;
        fs::write(&path, png).with_context(|| format!("Failed to write PNG file: {path:?}"))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
