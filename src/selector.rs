use crate::board::Board;
use crate::model::InferenceError;
use crate::rules::is_legal;
use crate::types::{Coord, Move, NUM_SQUARES, Side};

/// Per-square desirability produced by a scoring model, aligned with
/// `Coord::from_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scores([f32; NUM_SQUARES]);

impl Scores {
    /// Accepts exactly 64 finite values.
    pub fn new(values: Vec<f32>) -> Result<Self, InferenceError> {
        let values: [f32; NUM_SQUARES] = values
            .try_into()
            .map_err(|values: Vec<f32>| InferenceError::ScoreCount { len: values.len() })?;

        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFinite { index, value });
        }

        Ok(Self(values))
    }

    pub fn uniform() -> Self {
        Self([0.0; NUM_SQUARES])
    }

    pub fn get(&self, coord: Coord) -> f32 {
        self.0[coord.index()]
    }

    /// Square indices by descending score; equal scores keep index order.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..NUM_SQUARES).collect();
        // sort_by is stable.
        order.sort_by(|&left, &right| self.0[right].total_cmp(&self.0[left]));
        order
    }
}

/// Picks the highest-scoring legal square for `side`, or `Move::Pass` when
/// `side` has no legal placement at all.
pub fn select_move(board: &Board, scores: &Scores, side: Side) -> Move {
    scores
        .ranking()
        .into_iter()
        .filter_map(Coord::from_index)
        .find(|&coord| is_legal(board, coord, side))
        .map_or(Move::Pass, Move::Place)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::legal_moves;
    use crate::types::BOARD_SIZE;

    const FULL_BOARD: u64 = u64::MAX;

    fn at(x: u8, y: u8) -> Coord {
        Coord { x, y }
    }

    fn scores_with(entries: &[(Coord, f32)]) -> Scores {
        let mut values = vec![0.0f32; NUM_SQUARES];
        for &(coord, value) in entries {
            values[coord.index()] = value;
        }
        Scores::new(values).expect("valid scores")
    }

    fn descending_scores() -> Scores {
        Scores::new((0..NUM_SQUARES).map(|i| (NUM_SQUARES - i) as f32).collect())
            .expect("valid scores")
    }

    #[test]
    fn scores_reject_wrong_length() {
        assert_eq!(
            Scores::new(vec![0.0; 63]),
            Err(InferenceError::ScoreCount { len: 63 })
        );
        assert_eq!(
            Scores::new(vec![0.0; 65]),
            Err(InferenceError::ScoreCount { len: 65 })
        );
    }

    #[test]
    fn scores_reject_non_finite_values() {
        let mut values = vec![0.0f32; NUM_SQUARES];
        values[17] = f32::INFINITY;
        assert!(matches!(
            Scores::new(values),
            Err(InferenceError::NonFinite { index: 17, .. })
        ));

        let mut values = vec![0.0f32; NUM_SQUARES];
        values[3] = f32::NAN;
        assert!(matches!(
            Scores::new(values),
            Err(InferenceError::NonFinite { index: 3, .. })
        ));
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let scores = scores_with(&[(at(5, 0), 2.0), (at(1, 0), 2.0), (at(0, 7), 9.0)]);

        let ranking = scores.ranking();

        assert_eq!(&ranking[..4], &[56, 1, 5, 0]);
        assert_eq!(ranking.len(), NUM_SQUARES);
    }

    #[test]
    fn uniform_scores_pick_lowest_index_legal_square() {
        let board = Board::new();

        assert_eq!(
            select_move(&board, &Scores::uniform(), Side::White),
            Move::Place(at(4, 2))
        );
        assert_eq!(
            select_move(&board, &Scores::uniform(), Side::Black),
            Move::Place(at(3, 2))
        );
    }

    #[test]
    fn highest_scoring_legal_square_wins() {
        let board = Board::new();
        let scores = scores_with(&[(at(3, 5), 0.9), (at(2, 4), 0.5), (at(5, 3), 0.7)]);

        assert_eq!(select_move(&board, &scores, Side::White), Move::Place(at(3, 5)));
    }

    #[test]
    fn illegal_top_scores_are_skipped() {
        let board = Board::new();
        // Occupied and unreachable squares outrank every legal one.
        let scores = scores_with(&[
            (at(3, 3), 10.0),
            (at(0, 0), 9.0),
            (at(7, 7), 8.0),
            (at(5, 3), 1.0),
            (at(2, 4), 2.0),
        ]);

        assert_eq!(select_move(&board, &scores, Side::White), Move::Place(at(2, 4)));
    }

    #[test]
    fn full_board_passes_whatever_the_scores() {
        let board = Board::from_bitboards(0x0F0F_0F0F_0F0F_0F0F, FULL_BOARD);

        assert_eq!(select_move(&board, &descending_scores(), Side::White), Move::Pass);
        assert_eq!(select_move(&board, &Scores::uniform(), Side::Black), Move::Pass);
    }

    #[test]
    fn side_without_legal_move_passes_even_with_empty_squares() {
        // Only black stones on the board: white cannot capture anything.
        let board = Board::from_bitboards(0xFF, 0);

        assert!(legal_moves(&board, Side::White).is_empty());
        assert_eq!(select_move(&board, &descending_scores(), Side::White), Move::Pass);
    }

    #[test]
    fn selected_square_is_empty_and_legal() {
        let boards = [
            Board::new(),
            Board::new().with_placement(at(3, 2), Side::Black, 1 << 27),
            Board::from_bitboards(0x0000_0010_1800_0000, 0x0000_0008_0000_0000),
        ];
        let score_sets = [Scores::uniform(), descending_scores()];

        for board in boards {
            for scores in &score_sets {
                for side in [Side::Black, Side::White] {
                    match select_move(&board, scores, side) {
                        Move::Place(coord) => {
                            assert!(board.is_empty_at(coord));
                            assert!(is_legal(&board, coord, side));
                            assert!(!legal_moves(&board, side).is_empty());
                        }
                        Move::Pass => assert!(legal_moves(&board, side).is_empty()),
                    }
                }
            }
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let board = Board::new();
        let scores = scores_with(&[(at(2, 4), 1.0), (at(3, 5), 1.0)]);

        let first = select_move(&board, &scores, Side::White);
        let second = select_move(&board, &scores, Side::White);

        assert_eq!(first, second);
        assert_eq!(first, Move::Place(at(2, 4)));
    }

    #[test]
    fn selection_decodes_indices_as_column_then_row() {
        // Black bracket on row 0 only; the transposed column is empty.
        let mut rows = vec![vec![0; BOARD_SIZE]; BOARD_SIZE];
        rows[0][1] = -1;
        rows[0][2] = 1;
        let board = Board::parse(&rows).expect("valid board");
        // Index 8 is (0,1), index 0 is (0,0).
        let scores = scores_with(&[(at(0, 1), 5.0), (at(0, 0), 1.0)]);

        assert_eq!(select_move(&board, &scores, Side::Black), Move::Place(at(0, 0)));
    }
}
