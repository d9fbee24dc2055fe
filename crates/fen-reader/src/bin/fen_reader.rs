//! fen-reader CLI: print the FEN piece placement of a chessboard image.

use std::path::PathBuf;

use clap::Parser;
use fen_reader::{detect, BoardReaderParams, ScanSession};
use log::LevelFilter;
use serde::Serialize;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "fen-reader")]
#[command(about = "Read the piece placement of a rendered chessboard image as FEN")]
#[command(version)]
struct Cli {
    /// Path to the board image (any format the `image` crate decodes).
    image: PathBuf,

    /// JSON file with board reader parameters; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON reference outlines replacing the built-in piece shapes.
    #[arg(long)]
    shapes: Option<PathBuf>,

    /// Number of ranks on the board.
    #[arg(long)]
    rows: Option<usize>,

    /// Number of files on the board.
    #[arg(long)]
    cols: Option<usize>,

    /// Square overscan in pixels.
    #[arg(long)]
    zoom: Option<usize>,

    /// Center-crop non-square images instead of anchoring at the top-left.
    #[arg(long)]
    inwards: bool,

    /// Print a JSON report with every square instead of the bare FEN.
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Serialize)]
struct Report<'a> {
    image: &'a std::path::Path,
    fen: &'a str,
    occupied: usize,
    average_attempts: f64,
    squares: &'a [fen_reader::SquareResult],
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;
    run(&cli)
}

fn init_logging(level: LevelFilter) -> CliResult<()> {
    #[cfg(feature = "tracing")]
    {
        let _ = level;
        fen_reader::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    fen_reader::core::init_with_level(level)?;
    Ok(())
}

fn resolve_params(cli: &Cli) -> CliResult<BoardReaderParams> {
    let mut params = match &cli.config {
        Some(path) => detect::load_params(path)?,
        None => BoardReaderParams::default(),
    };
    if let Some(rows) = cli.rows {
        params.board_size[0] = rows;
    }
    if let Some(cols) = cli.cols {
        params.board_size[1] = cols;
    }
    if let Some(zoom) = cli.zoom {
        params.square_zoom_px = zoom;
    }
    if cli.inwards {
        params.resize_board_inwards = true;
    }
    if let Some(path) = &cli.shapes {
        params.load_piece_shapes(&std::fs::read_to_string(path)?)?;
    }
    Ok(params)
}

fn run(cli: &Cli) -> CliResult<()> {
    let params = resolve_params(cli)?;
    let img = detect::load_image(&cli.image)?;
    let mut session = ScanSession::new();
    let scan = detect::read_fen(&img, &params, &mut session)?;

    if cli.json {
        let report = Report {
            image: &cli.image,
            fen: &scan.fen,
            occupied: scan.occupied_count(),
            average_attempts: scan.average_attempts(),
            squares: &scan.squares,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", scan.fen);
    }
    Ok(())
}
