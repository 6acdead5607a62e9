//! # labelsheet CLI
//!
//! Command-line interface for allocating codes and printing label sheets.
//!
//! ## Usage
//!
//! ```bash
//! # Reserve three new codes with prefix T
//! labelsheet allocate T 3
//!
//! # Render them, starting at label 12 of a partly used sheet
//! labelsheet sheet --start 12 --output labels.pdf T-000001 T-000002 T-000003
//!
//! # Allocate and render in one go
//! labelsheet allocate T 63 --sheet labels.pdf
//!
//! # Print the alignment grid for the default layout
//! labelsheet calibrate --output grid.pdf
//!
//! # Show the latest ledger entries
//! labelsheet ledger --limit 10
//!
//! # Run the HTTP API
//! labelsheet serve --listen 0.0.0.0:8080
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use labelsheet::{
    LabelError,
    allocator::{Allocator, AllocatorConfig, DEFAULT_MAX_BATCH},
    code::{self, CodeWidth},
    layout::SheetLayout,
    ledger::{Ledger, SqliteLedger},
    render::{self, EcLevel, qr},
    server::{self, ServerConfig},
};

/// labelsheet - Sequential asset codes and QR label sheets
#[derive(Parser, Debug)]
#[command(name = "labelsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Ledger location and numbering scheme, shared by every ledger command.
#[derive(Args, Debug, Clone)]
struct LedgerArgs {
    /// Path to the ledger database (delete it to restart numbering at 1)
    #[arg(long, env = "LABELSHEET_DB", default_value = "labels.db")]
    db: PathBuf,

    /// Digits in the numeric part of every code
    #[arg(long, env = "LABELSHEET_CODE_WIDTH", default_value_t = 6)]
    width: u8,

    /// Largest number of codes a single request may allocate
    #[arg(long, env = "LABELSHEET_MAX_BATCH", default_value_t = DEFAULT_MAX_BATCH)]
    max_batch: u32,
}

impl LedgerArgs {
    fn allocator_config(&self) -> Result<AllocatorConfig, LabelError> {
        Ok(AllocatorConfig {
            width: CodeWidth::new(self.width)?,
            max_batch: self.max_batch,
        })
    }

    fn open(&self) -> Result<Arc<SqliteLedger>, LabelError> {
        Ok(Arc::new(SqliteLedger::open(&self.db)?))
    }
}

/// Layout selection and per-run print adjustments.
#[derive(Args, Debug, Clone)]
struct LayoutArgs {
    /// Built-in layout name or path to a JSON layout profile
    #[arg(long, env = "LABELSHEET_LAYOUT", default_value = SheetLayout::DEFAULT_NAME)]
    layout: String,

    /// Shift every element right by this many points (negative = left)
    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<f32>,

    /// Shift every element up by this many points (negative = down)
    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<f32>,

    /// QR error correction level
    #[arg(long, value_enum)]
    ec: Option<EcLevel>,

    /// Leave the code text off the labels
    #[arg(long)]
    no_text: bool,
}

impl LayoutArgs {
    fn resolve(&self) -> Result<SheetLayout, LabelError> {
        let mut layout = SheetLayout::resolve(&self.layout)?;
        if let Some(dx) = self.offset_x {
            layout.style.offset_x = dx;
        }
        if let Some(dy) = self.offset_y {
            layout.style.offset_y = dy;
        }
        if let Some(ec) = self.ec {
            layout.style.error_correction = ec;
        }
        if self.no_text {
            layout.style.show_text = false;
        }
        layout.validate()?;
        Ok(layout)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Allocate new codes and print them, one per line
    Allocate {
        /// Code prefix (1-3 letters or digits)
        prefix: String,

        /// Number of codes to allocate
        count: u32,

        /// Also render the new codes to this PDF
        #[arg(long, value_name = "FILE")]
        sheet: Option<PathBuf>,

        /// First label position used by --sheet (1-based)
        #[arg(long, default_value_t = 1)]
        start: usize,

        #[command(flatten)]
        ledger: LedgerArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render already-allocated codes onto label sheets
    Sheet {
        /// Codes to render, in order
        codes: Vec<String>,

        /// Read additional codes from a file, one per line
        #[arg(long, value_name = "FILE")]
        from_file: Option<PathBuf>,

        /// First label position on the first sheet (1-based)
        #[arg(long, default_value_t = 1)]
        start: usize,

        /// Output PDF path
        #[arg(long, short, default_value = "labels.pdf")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render the calibration grid for a layout
    Calibrate {
        /// Output PDF path
        #[arg(long, short, default_value = "calibration.pdf")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show the most recently issued codes
    Ledger {
        /// Number of records to show
        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[command(flatten)]
        ledger: LedgerArgs,
    },

    /// Save a single QR code as PNG
    Qr {
        /// Text to encode
        text: String,

        /// Output PNG path
        #[arg(long, short, default_value = "qr.png")]
        output: PathBuf,

        /// QR error correction level
        #[arg(long, value_enum, default_value_t = EcLevel::M)]
        ec: EcLevel,

        /// Pixels per QR module
        #[arg(long, default_value_t = 8)]
        module_px: u32,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "LABELSHEET_LISTEN", default_value = "0.0.0.0:8080")]
        listen: String,

        #[command(flatten)]
        ledger: LedgerArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labelsheet=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Allocate {
            prefix,
            count,
            sheet,
            start,
            ledger,
            layout,
        } => {
            // Resolve the layout first so a bad profile cannot burn codes.
            let layout = sheet.as_ref().map(|_| layout.resolve()).transpose()?;

            let allocator = Allocator::new(ledger.open()?, ledger.allocator_config()?);
            let codes: Vec<String> = allocator
                .allocate(&prefix, count)?
                .iter()
                .map(ToString::to_string)
                .collect();

            for code in &codes {
                println!("{}", code);
            }

            if let (Some(path), Some(layout)) = (sheet, layout) {
                write_sheet(&codes, start, &layout, &path)?;
            }
        }

        Commands::Sheet {
            mut codes,
            from_file,
            start,
            output,
            layout,
        } => {
            if let Some(path) = from_file {
                codes.extend(read_codes(&path)?);
            }
            for text in code::unrecognized(&codes) {
                tracing::warn!(code = %text, "not a ledger code, printing as given");
            }
            write_sheet(&codes, start, &layout.resolve()?, &output)?;
        }

        Commands::Calibrate { output, layout } => {
            let layout = layout.resolve()?;
            let grid = render::render_grid(&layout)?;
            std::fs::write(&output, &grid.pdf)?;
            println!(
                "Saved {}-position calibration grid for '{}' to {}",
                grid.positions,
                layout.name,
                output.display()
            );
        }

        Commands::Ledger { limit, ledger } => {
            let ledger = ledger.open()?;
            let stats = ledger.stats()?;
            println!("{} codes issued", stats.total);
            for record in ledger.recent(limit)? {
                println!("{:>8}  {:<12}  {}", record.id, record.code, record.created_at);
            }
        }

        Commands::Qr {
            text,
            output,
            ec,
            module_px,
        } => {
            let png = qr::encode_png(&text, ec, module_px, true)?;
            std::fs::write(&output, png)?;
            println!("Saved to {}", output.display());
        }

        Commands::Serve {
            listen,
            ledger,
            layout,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                ledger_path: ledger.db.clone(),
                allocator: ledger.allocator_config()?,
                default_layout: layout.resolve()?,
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
    }

    Ok(())
}

/// Read codes from a text file, skipping blank lines and `#` comments.
fn read_codes(path: &Path) -> Result<Vec<String>, LabelError> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Render codes to a PDF file.
fn write_sheet(
    codes: &[String],
    start: usize,
    layout: &SheetLayout,
    path: &Path,
) -> Result<(), LabelError> {
    let sheet = render::render(codes, start, layout)?;
    std::fs::write(path, &sheet.pdf)?;
    eprintln!(
        "Saved {} labels on {} page(s) to {}",
        sheet.labels,
        sheet.pages,
        path.display()
    );
    Ok(())
}
