//! Board-level scan: every square through the piece recognizer, then FEN.

use fen_reader_core::RgbaImageView;
use fen_reader_pieces::{recognize_square, ThresholdCache};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    crop_board, fen_placement, BoardGeometry, BoardImageSampler, BoardReadError,
    BoardReaderParams, SquareResult, SquareSampler,
};

/// Mutable state carried across squares and across boards.
///
/// Holds the threshold cache and running attempt statistics. A session is
/// usually kept for a whole stream of boards from one source, since those
/// share lighting and piece style.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanSession {
    cache: ThresholdCache,
    boards_scanned: usize,
    detected_squares: usize,
    detected_attempts: u64,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cache(&self) -> &ThresholdCache {
        &self.cache
    }

    #[inline]
    pub fn cache_mut(&mut self) -> &mut ThresholdCache {
        &mut self.cache
    }

    #[inline]
    pub fn boards_scanned(&self) -> usize {
        self.boards_scanned
    }

    /// Mean threshold probes per detected piece over every board scanned in
    /// this session; 0 when nothing was detected yet.
    pub fn average_attempts(&self) -> f64 {
        if self.detected_squares == 0 {
            0.0
        } else {
            self.detected_attempts as f64 / self.detected_squares as f64
        }
    }

    fn record_board(&mut self, scan: &BoardScan) {
        self.boards_scanned += 1;
        for square in scan.squares.iter().filter(|s| s.occupied()) {
            self.detected_squares += 1;
            self.detected_attempts += square.attempts() as u64;
        }
    }
}

/// Result of scanning one board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardScan {
    pub rows: usize,
    pub cols: usize,
    /// FEN piece placement.
    pub fen: String,
    /// Every square, row-major.
    pub squares: Vec<SquareResult>,
}

impl BoardScan {
    fn from_squares(rows: usize, cols: usize, squares: Vec<SquareResult>) -> Self {
        let fen = fen_placement(squares.iter().map(SquareResult::piece), cols);
        Self {
            rows,
            cols,
            fen,
            squares,
        }
    }

    pub fn square(&self, row: usize, col: usize) -> Option<&SquareResult> {
        if row < self.rows && col < self.cols {
            self.squares.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| s.occupied()).count()
    }

    /// Mean threshold probes per detected piece; 0 for an empty board.
    pub fn average_attempts(&self) -> f64 {
        let (count, total) = self
            .squares
            .iter()
            .filter(|s| s.occupied())
            .fold((0usize, 0u64), |(n, sum), s| (n + 1, sum + s.attempts() as u64));
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }
}

/// Scans boards with a fixed configuration.
#[derive(Clone, Copy, Debug)]
pub struct BoardScanner<'p> {
    params: &'p BoardReaderParams,
}

impl<'p> BoardScanner<'p> {
    pub fn new(params: &'p BoardReaderParams) -> Result<Self, BoardReadError> {
        let (rows, cols) = (params.rows(), params.cols());
        if rows == 0 || cols == 0 {
            return Err(BoardReadError::InvalidBoardSize { rows, cols });
        }
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &BoardReaderParams {
        self.params
    }

    fn scan_square<S: SquareSampler>(
        &self,
        sampler: &S,
        row: usize,
        col: usize,
        cache: &mut ThresholdCache,
    ) -> SquareResult {
        let square = sampler.sample_square(row, col);
        let verdict = recognize_square(
            &square.view(),
            &self.params.search,
            self.params.shape_library(),
            cache,
        );
        debug!("square ({row}, {col}): {:?} after {} probes", verdict.piece(), verdict.attempts());
        SquareResult { row, col, verdict }
    }

    fn scan_rank<S: SquareSampler>(
        &self,
        sampler: &S,
        row: usize,
        cache: &mut ThresholdCache,
    ) -> Vec<SquareResult> {
        (0..self.params.cols())
            .map(|col| self.scan_square(sampler, row, col, cache))
            .collect()
    }

    /// Scan every square in row-major order with the session's cache.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, sampler, session), fields(rows = self.params.rows(), cols = self.params.cols()))
    )]
    pub fn scan<S: SquareSampler>(&self, sampler: &S, session: &mut ScanSession) -> BoardScan {
        let mut squares = Vec::with_capacity(self.params.rows() * self.params.cols());
        for row in 0..self.params.rows() {
            squares.extend(self.scan_rank(sampler, row, &mut session.cache));
        }
        self.finish(squares, session)
    }

    /// Scan ranks independently, each starting from a copy of the session's
    /// cache.
    ///
    /// Ranks run concurrently with the `rayon` feature. Results are still
    /// reported row-major, and afterwards the session keeps the last rank's
    /// cache. Output may differ from [`BoardScanner::scan`] only where a
    /// square's result depends on its first, cache-seeded probe.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, sampler, session), fields(rows = self.params.rows(), cols = self.params.cols()))
    )]
    pub fn scan_parallel<S>(&self, sampler: &S, session: &mut ScanSession) -> BoardScan
    where
        S: SquareSampler + Sync,
    {
        let seed = session.cache;
        let run_rank = |row: usize| {
            let mut cache = seed;
            let squares = self.scan_rank(sampler, row, &mut cache);
            (squares, cache)
        };

        #[cfg(feature = "rayon")]
        let ranks: Vec<_> = (0..self.params.rows()).into_par_iter().map(run_rank).collect();

        #[cfg(not(feature = "rayon"))]
        let ranks: Vec<_> = (0..self.params.rows()).map(run_rank).collect();

        let mut squares = Vec::with_capacity(self.params.rows() * self.params.cols());
        for (rank, cache) in ranks {
            squares.extend(rank);
            session.cache = cache;
        }
        self.finish(squares, session)
    }

    fn finish(&self, squares: Vec<SquareResult>, session: &mut ScanSession) -> BoardScan {
        let scan = BoardScan::from_squares(self.params.rows(), self.params.cols(), squares);
        session.record_board(&scan);
        info!(
            "board scanned: {} pieces, {:.1} average attempts, fen {}",
            scan.occupied_count(),
            scan.average_attempts(),
            scan.fen
        );
        scan
    }

    /// Crop `image` to the board, lay out the squares and scan them.
    pub fn scan_image(
        &self,
        image: &RgbaImageView<'_>,
        session: &mut ScanSession,
    ) -> Result<BoardScan, BoardReadError> {
        let board = crop_board(image, self.params.resize_board_inwards);
        let geometry = BoardGeometry::new(
            board.width,
            self.params.rows(),
            self.params.cols(),
            self.params.square_zoom_px,
        )?;
        debug!(
            "board {}px, square {}px, drift {:.3}px per square",
            geometry.side, geometry.square_size, geometry.cut_offset
        );
        let sampler = BoardImageSampler::new(board.view(), geometry);
        Ok(self.scan(&sampler, session))
    }

    /// [`BoardScanner::scan_image`] over a raw row-major RGBA buffer.
    pub fn scan_rgba(
        &self,
        width: usize,
        height: usize,
        data: &[u8],
        session: &mut ScanSession,
    ) -> Result<BoardScan, BoardReadError> {
        let image = RgbaImageView::from_raw(width, height, data)?;
        self.scan_image(&image, session)
    }
}
