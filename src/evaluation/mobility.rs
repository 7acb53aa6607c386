use crate::prelude::*;

/// Legal moves of `side`, each weighted by the type of the moving piece.
/// The board is only read, the side to move is left alone.
pub fn side_mobility(board: &Board, side: Side, params: &EvalParams) -> f64 {
    let mut buffer = Vec::with_capacity(MAX_MOVES);
    move_gen::generate_legal_moves_for(board, side, &mut buffer);

    buffer
        .iter()
        .filter_map(|m| board.get_piece_at(m.from_sq()))
        .map(|(piece, _)| params.mobility_move_weights[piece.index()])
        .sum()
}

/// White mobility minus Black mobility.
pub fn eval_mobility(board: &Board, params: &EvalParams) -> f64 {
    side_mobility(board, Side::White, params) - side_mobility(board, Side::Black, params)
}
