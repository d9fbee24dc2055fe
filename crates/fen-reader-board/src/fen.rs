//! Per-square results and FEN piece-placement assembly.

use fen_reader_pieces::{Piece, PieceColor, PieceKind, SquareVerdict};
use serde::{Deserialize, Serialize};

/// Outcome for one board square.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SquareResult {
    pub row: usize,
    pub col: usize,
    pub verdict: SquareVerdict,
}

impl SquareResult {
    #[inline]
    pub fn occupied(&self) -> bool {
        self.verdict.is_occupied()
    }

    #[inline]
    pub fn piece(&self) -> Option<Piece> {
        self.verdict.piece()
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.piece().map(|p| p.kind)
    }

    pub fn color(&self) -> Option<PieceColor> {
        self.piece().map(|p| p.color)
    }

    /// Threshold probes spent on this square, occupied or not.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.verdict.attempts()
    }

    /// Edge threshold of an occupied square.
    pub fn threshold(&self) -> Option<u32> {
        match &self.verdict {
            SquareVerdict::Piece(r) => Some(r.threshold),
            SquareVerdict::Empty(_) => None,
        }
    }

    /// DTW distance of an occupied square's outline to its label.
    pub fn distance(&self) -> Option<f32> {
        match &self.verdict {
            SquareVerdict::Piece(r) => Some(r.distance),
            SquareVerdict::Empty(_) => None,
        }
    }
}

/// FEN piece placement from squares listed row-major, `cols` per rank.
///
/// Ranks are joined with `/`; consecutive empty squares within a rank
/// collapse into their count.
pub fn fen_placement<I>(squares: I, cols: usize) -> String
where
    I: IntoIterator<Item = Option<Piece>>,
{
    let mut fen = String::new();
    let mut empty_run = 0usize;
    for (i, square) in squares.into_iter().enumerate() {
        if i > 0 && cols > 0 && i % cols == 0 {
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
                empty_run = 0;
            }
            fen.push('/');
        }
        match square {
            Some(piece) => {
                if empty_run > 0 {
                    fen.push_str(&empty_run.to_string());
                    empty_run = 0;
                }
                fen.push(piece.fen_char());
            }
            None => empty_run += 1,
        }
    }
    if empty_run > 0 {
        fen.push_str(&empty_run.to_string());
    }
    fen
}
