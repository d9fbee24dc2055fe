use fen_reader_pieces::{ShapeLibrary, ThresholdSearchParams};
use serde::{Deserialize, Serialize};

use crate::BoardReadError;

/// Board scan configuration.
///
/// The per-square search parameters are flattened into the same JSON object,
/// so a config file reads `{ "wanted_min_points": 700, "board_size": [8, 8] }`.
/// The camelCase option names of browser-side readers are accepted as
/// aliases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardReaderParams {
    #[serde(flatten)]
    pub search: ThresholdSearchParams,
    /// Overscan applied when sampling a square, in pixels.
    #[serde(alias = "squareZoomPx")]
    pub square_zoom_px: usize,
    /// `[rows, cols]`.
    #[serde(alias = "boardSize")]
    pub board_size: [usize; 2],
    /// Center-crop a non-square input instead of anchoring the crop at the
    /// top-left corner.
    #[serde(alias = "resizeBoardInwards")]
    pub resize_board_inwards: bool,
    /// Replacement reference outlines; the built-in library when `None`.
    #[serde(alias = "pieceShapes", skip_serializing_if = "Option::is_none")]
    pub piece_shapes: Option<ShapeLibrary>,
}

impl Default for BoardReaderParams {
    fn default() -> Self {
        Self {
            search: ThresholdSearchParams::default(),
            square_zoom_px: 11,
            board_size: [8, 8],
            resize_board_inwards: false,
            piece_shapes: None,
        }
    }
}

impl BoardReaderParams {
    #[inline]
    pub fn rows(&self) -> usize {
        self.board_size[0]
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.board_size[1]
    }

    /// The configured outlines, or the built-in ones.
    pub fn shape_library(&self) -> &ShapeLibrary {
        self.piece_shapes
            .as_ref()
            .unwrap_or_else(|| ShapeLibrary::builtin())
    }

    /// Replace the reference outlines with a JSON shape library
    /// (`[{ "label": "p", "outline": [[x, y], ...] }, ...]`).
    ///
    /// On error the current outlines are kept.
    pub fn load_piece_shapes(&mut self, json: &str) -> Result<(), BoardReadError> {
        self.piece_shapes = Some(ShapeLibrary::from_json_str(json)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fen_reader_pieces::{PieceKind, ShapeLibraryError};

    #[test]
    fn empty_json_is_default() {
        let params: BoardReaderParams = serde_json::from_str("{}").expect("parse");
        assert_eq!(params, BoardReaderParams::default());
        assert_eq!(params.shape_library().len(), 8);
    }

    #[test]
    fn camel_case_options_are_accepted() {
        let params: BoardReaderParams = serde_json::from_str(
            r#"{
                "wantedMinPoints": 600,
                "wantedMaxPoints": 800,
                "squareZoomPx": 7,
                "boardSize": [10, 10],
                "resizeBoardInwards": true
            }"#,
        )
        .expect("parse");
        assert_eq!(params.search.wanted_min_points, 600);
        assert_eq!(params.search.wanted_max_points, 800);
        assert_eq!(params.search.max_threshold, 1000);
        assert_eq!(params.square_zoom_px, 7);
        assert_eq!((params.rows(), params.cols()), (10, 10));
        assert!(params.resize_board_inwards);
    }

    #[test]
    fn custom_shapes_replace_builtin() {
        let params: BoardReaderParams = serde_json::from_str(
            r#"{ "piece_shapes": [{ "label": "q", "outline": [[0, 0], [1, 0], [0.5, 1]] }] }"#,
        )
        .expect("parse");
        let lib = params.shape_library();
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.shapes()[0].label, PieceKind::Queen);
    }

    #[test]
    fn invalid_custom_shapes_fail_to_parse() {
        let err = serde_json::from_str::<BoardReaderParams>(r#"{ "pieceShapes": [] }"#);
        assert!(err.is_err());
    }

    #[test]
    fn shape_library_file_replaces_outlines() {
        let mut params = BoardReaderParams::default();
        params
            .load_piece_shapes(r#"[{ "label": "n", "outline": [[0, 1], [1, 1], [0.5, 0]] }]"#)
            .expect("shapes");
        assert_eq!(params.shape_library().len(), 1);
        assert_eq!(params.shape_library().shapes()[0].label, PieceKind::Knight);

        let err = params.load_piece_shapes(r#"[{ "label": "n", "outline": [[0, 0], [1, 1]] }]"#);
        assert!(matches!(
            err,
            Err(BoardReadError::ShapeLibrary(ShapeLibraryError::TooFewPoints { count: 2, .. }))
        ));
        // A rejected file leaves the previous outlines in place.
        assert_eq!(params.shape_library().len(), 1);
    }
}
