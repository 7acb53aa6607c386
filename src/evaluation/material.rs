use crate::prelude::*;

/// Sum of non-king piece values of `side`.
pub fn non_king_material(board: &Board, side: Side, params: &EvalParams) -> f64 {
    Piece::all_pieces()
        .filter(|&piece| piece != Piece::King)
        .map(|piece| board.positions.count(side, piece) as f64 * params.piece_value(piece))
        .sum()
}

pub fn game_phase(board: &Board, params: &EvalParams) -> Phase {
    let threshold = params.endgame_material_threshold;
    if Side::SIDES
        .iter()
        .any(|&side| non_king_material(board, side, params) < threshold)
    {
        Phase::Endgame
    } else {
        Phase::Middlegame
    }
}

/// +bonus for every side that still holds two bishops, White positive.
pub fn eval_bishop_pair(board: &Board, params: &EvalParams) -> f64 {
    Side::SIDES
        .iter()
        .filter(|&&side| board.positions.count(side, Piece::Bishop) >= 2)
        .map(|side| side.sign() * params.bishop_pair_bonus)
        .sum()
}

/// Material, piece-square tables and a small bonus per attacked square for
/// the minor and major pieces, plus the bishop pair. White positive.
pub fn eval_material(board: &Board, params: &EvalParams, phase: Phase) -> f64 {
    let endgame = phase == Phase::Endgame;
    let mut score = 0.0;

    for (piece, side) in Piece::all() {
        for sq in board.positions.get_piece_bb(side, piece).iter_bits() {
            let Some(square) = Square::new(sq) else {
                continue;
            };
            let mut piece_score =
                params.piece_value(piece) + params.pst_value(piece, side, square, endgame);

            if !matches!(piece, Piece::Pawn | Piece::King) {
                piece_score +=
                    board.attacks_from(square).pop_count() as f64 * params.attack_square_bonus;
            }

            score += side.sign() * piece_score;
        }
    }

    score + eval_bishop_pair(board, params)
}
