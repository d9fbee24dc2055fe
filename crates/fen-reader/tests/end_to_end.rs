use fen_reader::{detect, BoardReaderParams, PieceColor, PieceKind, ScanSession, ShapeLibrary};
use image::{Rgba, RgbaImage};

const SQUARE: u32 = 100;
const LIGHT_SQUARE: Rgba<u8> = Rgba([238, 238, 210, 255]);
const DARK_SQUARE: Rgba<u8> = Rgba([118, 150, 86, 255]);
const LIGHT_PIECE: Rgba<u8> = Rgba([245, 245, 245, 255]);
const DARK_PIECE: Rgba<u8> = Rgba([30, 30, 30, 255]);

// Indices into the builtin shape library.
const PAWN: usize = 0;
const ROOK: usize = 1;
const KNIGHT: usize = 2;
const KING_CROSS: usize = 4;

fn inside(poly: &[(f64, f64)], px: f64, py: f64) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > py) != (yj > py) && px < xi + (py - yi) * (xj - xi) / (yj - yi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn render_board(pieces: &[(u32, u32, usize, Rgba<u8>)]) -> RgbaImage {
    let side = SQUARE * 8;
    let mut img = RgbaImage::from_fn(side, side, |x, y| {
        if (x / SQUARE + y / SQUARE) % 2 == 1 {
            DARK_SQUARE
        } else {
            LIGHT_SQUARE
        }
    });

    let s = SQUARE as f64;
    for &(row, col, shape_index, fill) in pieces {
        let shape = &ShapeLibrary::builtin().shapes()[shape_index];
        let poly: Vec<(f64, f64)> = shape
            .outline
            .iter()
            .map(|p| {
                (
                    col as f64 * s + 0.2 * s + p.x as f64 * 0.6 * s,
                    row as f64 * s + 0.12 * s + p.y as f64 * 0.76 * s,
                )
            })
            .collect();
        for y in row * SQUARE..(row + 1) * SQUARE {
            for x in col * SQUARE..(col + 1) * SQUARE {
                if inside(&poly, x as f64 + 0.5, y as f64 + 0.5) {
                    img.put_pixel(x, y, fill);
                }
            }
        }
    }
    img
}

#[test]
fn reads_mixed_position() {
    let img = render_board(&[
        (0, 0, ROOK, DARK_PIECE),
        (0, 1, PAWN, LIGHT_PIECE),
        (4, 3, KING_CROSS, DARK_PIECE),
        (7, 6, KNIGHT, LIGHT_PIECE),
    ]);
    let params = BoardReaderParams::default();
    let mut session = ScanSession::new();

    let scan = detect::read_fen(&img, &params, &mut session).expect("scan");
    assert_eq!(scan.fen, "rP6/8/8/8/3k4/8/8/6N1");
    assert_eq!(scan.occupied_count(), 4);

    let king = scan.square(4, 3).expect("king square");
    assert_eq!(king.kind(), Some(PieceKind::King));
    assert_eq!(king.color(), Some(PieceColor::Dark));

    let knight = scan.square(7, 6).expect("knight square");
    assert_eq!(knight.kind(), Some(PieceKind::Knight));
    assert_eq!(knight.color(), Some(PieceColor::Light));
}

#[test]
fn default_helper_returns_fen_only() {
    let img = render_board(&[(0, 1, PAWN, LIGHT_PIECE)]);
    let fen = detect::read_fen_default(&img).expect("fen");
    assert_eq!(fen, "1P6/8/8/8/8/8/8/8");
}

#[test]
fn raw_buffer_entry_point_matches_image_entry_point() {
    let img = render_board(&[(0, 1, PAWN, LIGHT_PIECE)]);
    let params = BoardReaderParams::default();

    let mut session = ScanSession::new();
    let scan = detect::read_fen_from_rgba_u8(
        img.width(),
        img.height(),
        img.as_raw(),
        &params,
        &mut session,
    )
    .expect("scan");
    assert_eq!(scan.fen, "1P6/8/8/8/8/8/8/8");
    assert_eq!(session.cache().most_recent(), Some(61));
}
