//! # insertprint CLI
//!
//! Command-line interface for designing and exporting package inserts.
//!
//! ## Usage
//!
//! ```bash
//! # List the supported styles
//! insertprint styles
//!
//! # Check a design for field errors
//! insertprint validate design.json
//!
//! # Dump the live preview tree as JSON
//! insertprint preview design.json --survey-url https://example.com/s/42
//!
//! # Write {name}-print.png and {name}-qr.png
//! insertprint render design.json --survey-url https://example.com/s/42 --out-dir out/
//!
//! # Run the HTTP API
//! insertprint serve --listen 0.0.0.0:8080
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use insertprint::{
    InsertError, PackageInsertDesign,
    design::{self, StyleSize},
    dimensions,
    preview::PreviewSession,
    render::{
        canvas::CanvasRenderer,
        config::DrawConfig,
        context::{RenderConfig, RenderContext},
        text::FontConfig,
    },
    server::{self, ServerConfig},
};

/// insertprint - Package insert preview and print export
#[derive(Parser, Debug)]
#[command(name = "insertprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    render: RenderArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that renders.
#[derive(Args, Debug)]
struct RenderArgs {
    /// Export scale factor over the base dimensions
    #[arg(long, global = true, env = "INSERTPRINT_SCALE", default_value = "1.5")]
    scale: f32,

    /// Timeout for each logo load, in seconds
    #[arg(long, global = true, env = "INSERTPRINT_IMAGE_TIMEOUT", default_value = "10")]
    image_timeout: u64,

    /// Extra font directory (repeatable)
    #[arg(long = "font-dir", global = true, env = "INSERTPRINT_FONT_DIRS", value_delimiter = ',')]
    font_dirs: Vec<PathBuf>,

    /// Do not scan the system font directories
    #[arg(long, global = true)]
    no_system_fonts: bool,
}

impl RenderArgs {
    fn to_config(&self) -> RenderConfig {
        RenderConfig {
            scale_factor: self.scale,
            image_timeout: Duration::from_secs(self.image_timeout),
            fonts: FontConfig {
                load_system_fonts: !self.no_system_fonts,
                font_dirs: self.font_dirs.clone(),
                font_files: Vec::new(),
            },
            ..RenderConfig::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List supported styles with preview and print sizes
    Styles,

    /// Validate a design JSON file
    Validate {
        /// Design JSON file
        design: PathBuf,
    },

    /// Print the preview tree for a design as JSON
    Preview {
        /// Design JSON file
        design: PathBuf,

        /// Survey URL encoded in the QR code
        #[arg(long, env = "INSERTPRINT_SURVEY_URL")]
        survey_url: Option<String>,

        /// Include print guides
        #[arg(long)]
        guides: bool,
    },

    /// Render the print image and QR code to PNG files
    Render {
        /// Design JSON file
        design: PathBuf,

        /// Survey URL encoded in the QR code
        #[arg(long, env = "INSERTPRINT_SURVEY_URL")]
        survey_url: Option<String>,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, env = "INSERTPRINT_LISTEN", default_value = "0.0.0.0:8080")]
        listen: String,
    },
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), InsertError> {
    let cli = Cli::parse();
    let render_config = cli.render.to_config();

    match cli.command {
        Commands::Styles => {
            println!("{:<24} {:>10} {:>10}", "Style", "Preview", "Print");
            for style in StyleSize::ALL {
                let dims = dimensions::for_style(style);
                let (w, h) = DrawConfig::with_scale(Some(style), render_config.scale_factor).pixel_size();
                println!(
                    "{:<24} {:>10} {:>10}",
                    style.label(),
                    format!("{}x{}", dims.width, dims.height),
                    format!("{}x{}", w, h)
                );
            }
            Ok(())
        }

        Commands::Validate { design: path } => {
            let design = read_design(&path)?;
            design::validate(&design)?;
            println!("{}: valid", path.display());
            Ok(())
        }

        Commands::Preview {
            design: path,
            survey_url,
            guides,
        } => {
            let design = read_design(&path)?;
            let ctx = RenderContext::from_config(&render_config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let container = runtime.block_on(
                PreviewSession::new()
                    .with_guides(guides)
                    .update(&ctx, &design, survey_url.as_deref()),
            );
            println!("{}", serde_json::to_string_pretty(&container)?);
            Ok(())
        }

        Commands::Render {
            design: path,
            survey_url,
            out_dir,
        } => {
            let design = read_design(&path)?;
            design::validate(&design)?;
            let ctx = RenderContext::from_config(&render_config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let output = runtime.block_on(
                CanvasRenderer::new(&ctx).render(&design, survey_url.as_deref()),
            )?;

            std::fs::create_dir_all(&out_dir)?;

            let print_path = out_dir.join(design::print_filename(&design));
            std::fs::write(&print_path, output.surface.to_png()?)?;

            let qr_path = out_dir.join(design::qr_filename(&design));
            output
                .qr
                .image
                .save(&qr_path)
                .map_err(|e| InsertError::Image(format!("Failed to write {}: {}", qr_path.display(), e)))?;

            println!(
                "Wrote {} ({}x{}) and {}",
                print_path.display(),
                output.surface.width(),
                output.surface.height(),
                qr_path.display()
            );
            Ok(())
        }

        Commands::Serve { listen } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(ServerConfig {
                listen_addr: listen,
                render: render_config,
            }))
        }
    }
}

fn read_design(path: &Path) -> Result<PackageInsertDesign, InsertError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
