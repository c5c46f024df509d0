use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter};
use photo_sheet::{
    CaptionSet, FontId, PaperType, Point, Product, Size, StudioOptions, UploadFile,
    ViewportEngine, cell_rects, layout_for,
};
use photo_sheet_runtime::AppLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photosheet", about = "Photo sheet composer tools", version)]
struct Cli {
    /// Studio options file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print debug log messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the grid of a sheet layout
    Layout {
        /// Sheet layout
        #[arg(long, default_value = "standard", value_enum)]
        paper: PaperArg,

        /// List the pixel bounds of every photo
        #[arg(long)]
        cells: bool,
    },

    /// Compute the crop region for a pan and zoom
    Crop {
        /// Print product (selects the crop frame)
        #[arg(long, default_value = "passport", value_enum)]
        product: ProductArg,

        /// Natural image width in pixels
        #[arg(long)]
        width: u32,

        /// Natural image height in pixels
        #[arg(long)]
        height: u32,

        /// Crop area width in display pixels
        #[arg(long, default_value = "600")]
        container_width: f64,

        /// Crop area height in display pixels
        #[arg(long, default_value = "500")]
        container_height: f64,

        /// Zoom factor (clamped to the product's range)
        #[arg(long, default_value = "1.0")]
        zoom: f64,

        /// Horizontal drag in display pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pan_x: f64,

        /// Vertical drag in display pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pan_y: f64,
    },

    /// Validate caption text for a caption sheet
    Caption {
        /// First caption
        text1: String,

        /// Second caption
        #[arg(default_value = "")]
        text2: String,

        /// Caption font
        #[arg(long, default_value = "default")]
        font: String,
    },

    /// List caption fonts
    Fonts,

    /// Check whether a file would be accepted for upload
    Check {
        /// Image file
        input: PathBuf,
    },

    /// Manage studio options
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default options to a file
    Init {
        /// Output JSON file
        output: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the options in effect
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    Standard,
    Custom,
    Polaroid,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProductArg {
    Passport,
    Polaroid,
}

impl From<PaperArg> for PaperType {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::Standard => Self::PassportStandard,
            PaperArg::Custom => Self::PassportCustom,
            PaperArg::Polaroid => Self::Polaroid,
        }
    }
}

impl From<ProductArg> for Product {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::Passport => Self::Passport,
            ProductArg::Polaroid => Self::Polaroid,
        }
    }
}

async fn load_options(path: Option<&PathBuf>) -> Result<StudioOptions> {
    match path {
        Some(path) => StudioOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options from {}", path.display())),
        None => Ok(StudioOptions::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = AppLogger::new(200).with_level(level).init()?;

    let result = run(cli).await;

    for entry in logger.entries_at_least(Level::Warn) {
        eprintln!("{}", entry);
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let options = load_options(cli.config.as_ref()).await?;

    match cli.command {
        Commands::Layout { paper, cells } => {
            let layout = layout_for(paper.into());
            let (width_in, height_in) = layout.sheet_size_inches();
            println!("Layout: {} ({})", layout.paper_type.label(), layout.layout_key());
            println!(
                "  Sheet: {}×{} in, {}×{} px at {} dpi",
                width_in, height_in, layout.sheet_width_px, layout.sheet_height_px, layout.dpi
            );
            println!(
                "  Grid: {} columns × {} rows = {} photos",
                layout.cols,
                layout.rows,
                layout.photo_count()
            );
            println!(
                "  Photo: {}×{} px, gap {} px, margin {} px",
                layout.cell_width_px, layout.cell_height_px, layout.gap_px, layout.margin_px
            );

            if cells {
                for (i, rect) in cell_rects(&layout).iter().enumerate() {
                    println!(
                        "  #{:<2} x={:<5} y={:<5} {}×{}",
                        i + 1,
                        rect.x,
                        rect.y,
                        rect.width,
                        rect.height
                    );
                }
            }
        }

        Commands::Crop {
            product,
            width,
            height,
            container_width,
            container_height,
            zoom,
            pan_x,
            pan_y,
        } => {
            let container = Size::new(container_width, container_height);
            if !container.is_valid() {
                bail!("Container must have a positive size");
            }
            let product: Product = product.into();
            let mut engine = ViewportEngine::new(options.frame_for(product), container)
                .with_zoom_step(options.zoom_step);
            engine.set_natural_size(width, height);

            // Replay the pan as a single drag from the container center.
            let start = container.center();
            engine.on_drag_start(start);
            engine.on_drag_move(Point::new(start.x + pan_x, start.y + pan_y));
            engine.on_drag_end();
            engine.on_zoom_change(zoom);

            let crop = engine.compute_crop_region()?;
            crop.validate()?;
            let (px, py, pw, ph) = crop.pixel_rect();
            println!("{}", serde_json::to_string_pretty(&crop)?);
            println!(
                "Pixels: x={:.1} y={:.1} {:.1}×{:.1} (aspect {:.4})",
                px,
                py,
                pw,
                ph,
                crop.pixel_aspect_ratio()
            );
        }

        Commands::Caption { text1, text2, font } => {
            let font: FontId = font.parse()?;
            let captions = CaptionSet::new(text1, text2, font);
            let errors = captions.field_errors();
            if !errors.is_empty() {
                bail!("Captions rejected: {}", errors);
            }
            println!("Captions OK ({} font)", font.display_name());
        }

        Commands::Fonts => {
            for font in FontId::ALL {
                println!("{:<16} {}", font.name(), font.display_name());
            }
        }

        Commands::Check { input } => {
            let file = UploadFile::load(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let format = file.validate(options.max_upload_bytes)?;
            println!(
                "{} accepted as {} ({} bytes)",
                input.display(),
                format.mime_type(),
                file.size_bytes()
            );
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { output, force } => {
                if output.exists() && !force {
                    bail!("{} already exists (use --force to replace it)", output.display());
                }
                options.save(&output).await?;
                println!("Wrote options → {}", output.display());
            }
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&options)?);
            }
        },
    }

    Ok(())
}
