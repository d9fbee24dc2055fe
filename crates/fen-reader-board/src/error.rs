use fen_reader_core::ImageError;
use fen_reader_pieces::ShapeLibraryError;

/// Errors raised while setting up a board scan.
#[derive(thiserror::Error, Debug)]
pub enum BoardReadError {
    #[error("board must have at least one row and one column (got {rows}x{cols})")]
    InvalidBoardSize { rows: usize, cols: usize },

    #[error("board side of {side}px is too small for {rows}x{cols} squares")]
    BoardTooSmall { side: usize, rows: usize, cols: usize },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    ShapeLibrary(#[from] ShapeLibraryError),
}
