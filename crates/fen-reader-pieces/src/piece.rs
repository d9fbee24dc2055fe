use serde::{Deserialize, Serialize};

/// Piece type, serialized as its lowercase FEN letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "p")]
    Pawn,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "n")]
    Knight,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "k")]
    King,
    #[serde(rename = "q")]
    Queen,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::King,
        PieceKind::Queen,
    ];

    /// Lowercase FEN letter.
    pub fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
        }
    }

    /// Parse a FEN letter, either case.
    pub fn from_fen_char(c: char) -> Option<Self> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.fen_char() == c.to_ascii_lowercase())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceColor {
    Light,
    Dark,
}

/// A recognized piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    pub fn new(kind: PieceKind, color: PieceColor) -> Self {
        Self { kind, color }
    }

    /// FEN letter: uppercase for light pieces, lowercase for dark ones.
    pub fn fen_char(self) -> char {
        let c = self.kind.fen_char();
        match self.color {
            PieceColor::Light => c.to_ascii_uppercase(),
            PieceColor::Dark => c,
        }
    }
}
