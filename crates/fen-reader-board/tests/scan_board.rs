use fen_reader_board::{
    BoardGeometry, BoardImageSampler, BoardReaderParams, BoardScanner, ScanSession,
};
use fen_reader_core::RgbaImage;
use fen_reader_pieces::{PieceColor, PieceKind, ShapeLibrary};

const SQUARE: usize = 100;
const LIGHT_SQUARE: [u8; 4] = [238, 238, 210, 255];
const DARK_SQUARE: [u8; 4] = [118, 150, 86, 255];
const LIGHT_PIECE: [u8; 4] = [245, 245, 245, 255];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

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

/// 8x8 board of 100px squares with filled reference silhouettes.
fn render_board(pieces: &[(usize, usize, usize, [u8; 4])]) -> RgbaImage {
    let side = SQUARE * 8;
    let mut img = RgbaImage::filled(side, side, LIGHT_SQUARE);
    for y in 0..side {
        for x in 0..side {
            if (x / SQUARE + y / SQUARE) % 2 == 1 {
                img.put_pixel(x, y, DARK_SQUARE);
            }
        }
    }

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
fn light_pawn_board_reads_as_white_pawn() {
    init_logger();
    let img = render_board(&[(0, 1, 0, LIGHT_PIECE)]);
    let params = BoardReaderParams::default();
    let scanner = BoardScanner::new(&params).expect("scanner");
    let mut session = ScanSession::new();

    let scan = scanner.scan_image(&img.view(), &mut session).expect("scan");
    assert_eq!(scan.fen, "1P6/8/8/8/8/8/8/8");

    let pawn = scan.square(0, 1).expect("square");
    assert_eq!(pawn.kind(), Some(PieceKind::Pawn));
    assert_eq!(pawn.color(), Some(PieceColor::Light));
    assert_eq!(pawn.threshold(), Some(61));
    assert_eq!(pawn.attempts(), 4);
    assert!(pawn.distance().is_some_and(|d| d < 1.0));

    assert_eq!(scan.average_attempts(), 4.0);
    assert_eq!(session.cache().most_recent(), Some(61));
    assert_eq!(session.cache().previous(), None);
}

#[test]
fn session_statistics_accumulate_across_boards() {
    init_logger();
    let img = render_board(&[(0, 1, 0, LIGHT_PIECE)]);
    let params = BoardReaderParams::default();
    let scanner = BoardScanner::new(&params).expect("scanner");
    let mut session = ScanSession::new();

    let first = scanner.scan_image(&img.view(), &mut session).expect("scan");
    let second = scanner.scan_image(&img.view(), &mut session).expect("scan");
    assert_eq!(first.fen, second.fen);
    assert_eq!(session.boards_scanned(), 2);
    assert_eq!(session.average_attempts(), 4.0);
    assert_eq!(session.cache().most_recent(), Some(61));
    assert_eq!(session.cache().previous(), Some(61));
}

#[test]
fn parallel_scan_matches_sequential_without_cache_hints() {
    init_logger();
    let img = render_board(&[(0, 1, 0, LIGHT_PIECE)]);
    let params = BoardReaderParams::default();
    let scanner = BoardScanner::new(&params).expect("scanner");
    let geometry = BoardGeometry::new(img.width, 8, 8, params.square_zoom_px).expect("geometry");
    let sampler = BoardImageSampler::new(img.view(), geometry);

    let sequential = scanner.scan(&sampler, &mut ScanSession::new());
    let mut session = ScanSession::new();
    let parallel = scanner.scan_parallel(&sampler, &mut session);

    assert_eq!(parallel, sequential);
    // Only rank 0 saw a piece; the last rank's cache is empty.
    assert!(session.cache().is_empty());
}
