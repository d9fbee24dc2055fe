//! Read every board image given on the command line with one shared session.
//!
//! ```text
//! cargo run -p fen-reader --example read_board -- board1.png board2.png
//! ```

use fen_reader::{detect, BoardReaderParams, ScanSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fen_reader::core::init_with_level(log::LevelFilter::Info)?;

    let params = BoardReaderParams::default();
    let mut session = ScanSession::new();
    for path in std::env::args().skip(1) {
        let img = detect::load_image(&path)?;
        let scan = detect::read_fen(&img, &params, &mut session)?;
        println!("{path}: {}", scan.fen);
        for square in scan.squares.iter().filter(|s| s.occupied()) {
            if let (Some(piece), Some(distance)) = (square.piece(), square.distance()) {
                println!(
                    "  ({}, {}) {} threshold={:?} dtw={distance:.3}",
                    square.row,
                    square.col,
                    piece.fen_char(),
                    square.threshold()
                );
            }
        }
    }
    println!(
        "{} boards, {:.2} average attempts per piece",
        session.boards_scanned(),
        session.average_attempts()
    );
    Ok(())
}
