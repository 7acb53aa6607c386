//! Legal Move Generation
//!
//! Moves are generated directly as legal moves: pins, check masks and the
//! opponent attack map from [`calculate_attack_data`] decide legality
//! without making/unmaking moves on a board copy.

use crate::{
    moves::attack_data::{AttackData, calculate_attack_data},
    prelude::*,
};

/// Legal moves for the side to move.
pub fn generate_legal_moves(board: &Board, moves: &mut Vec<Move>) {
    generate_legal_moves_for(board, board.stm, moves);
}

/// Legal moves for `side` as if it were that side's turn. The board is not
/// touched. En passant is only available to the side actually on move.
pub fn generate_legal_moves_for(board: &Board, side: Side, moves: &mut Vec<Move>) {
    let attack_data = calculate_attack_data(board, side);

    gen_king_moves(board, side, &attack_data, moves);
    if attack_data.double_check {
        return;
    }

    gen_pawn_moves(board, side, &attack_data, moves);
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        gen_piece_moves(board, side, piece, &attack_data, moves);
    }
}

/// Squares a piece on `from` may move to without exposing its king.
#[inline(always)]
fn pin_mask(attack_data: &AttackData, from: usize) -> BitBoard {
    if !attack_data.pin_ray_mask.contains_square(from) {
        return BitBoard::FULL;
    }
    match Direction::between(attack_data.king_sq, from) {
        Some(dir) => MOVE_TABLES.get_ray(attack_data.king_sq, dir),
        None => BitBoard::EMPTY,
    }
}

fn push_targets(from: usize, mut targets: BitBoard, enemy: BitBoard, moves: &mut Vec<Move>) {
    while let Some(to) = targets.pop_lsb() {
        let flag = if enemy.contains_square(to as usize) {
            Move::CAPTURE
        } else {
            Move::QUIET
        };
        moves.push(Move::new(from as u8, to as u8, flag));
    }
}

fn gen_king_moves(board: &Board, side: Side, attack_data: &AttackData, moves: &mut Vec<Move>) {
    let from_sq = attack_data.king_sq;
    if !board.positions.get_piece_bb(side, Piece::King).contains_square(from_sq) {
        return;
    }
    let friendly = *board.positions.get_side_bb(side);
    let enemy = *board.positions.get_side_bb(side.flip());

    let targets = MOVE_TABLES.king_moves[from_sq] & !friendly & !attack_data.opp_attack_map;
    push_targets(from_sq, targets, enemy, moves);

    if attack_data.in_check {
        return;
    }

    let occupied = board.positions.get_occupied_bb();
    let rooks = board.positions.get_piece_bb(side, Piece::Rook);
    let back_rank = if side == Side::White { 0 } else { 56 };
    if from_sq != back_rank + 4 {
        return;
    }

    // (kingside, king target, rook square, squares that must be empty, squares the king crosses)
    let options = [
        (true, back_rank + 6, back_rank + 7, [5, 6, 6], [5, 6]),
        (false, back_rank + 2, back_rank, [1, 2, 3], [3, 2]),
    ];
    for (kingside, to, rook_sq, empty, crossed) in options {
        if !board.castling_rights.can_castle(side, kingside) || !rooks.contains_square(rook_sq) {
            continue;
        }
        let path_clear = empty
            .iter()
            .all(|&f| !occupied.contains_square(back_rank + f));
        let path_safe = crossed
            .iter()
            .all(|&f| !attack_data.opp_attack_map.contains_square(back_rank + f));
        if path_clear && path_safe {
            let flag = if kingside {
                Move::KING_CASTLE
            } else {
                Move::QUEEN_CASTLE
            };
            moves.push(Move::new(from_sq as u8, to as u8, flag));
        }
    }
}

fn gen_piece_moves(
    board: &Board,
    side: Side,
    piece: Piece,
    attack_data: &AttackData,
    moves: &mut Vec<Move>,
) {
    let friendly = *board.positions.get_side_bb(side);
    let enemy = *board.positions.get_side_bb(side.flip());
    let occupied = friendly | enemy;

    for from_sq in board.positions.get_piece_bb(side, piece).iter_bits() {
        let attacks = MOVE_TABLES.attacks_of(piece, side, from_sq, occupied);
        let targets = attacks & !friendly & attack_data.check_ray_mask & pin_mask(attack_data, from_sq);
        push_targets(from_sq, targets, enemy, moves);
    }
}

fn gen_pawn_moves(board: &Board, side: Side, attack_data: &AttackData, moves: &mut Vec<Move>) {
    let enemy = *board.positions.get_side_bb(side.flip());
    let occupied = board.positions.get_occupied_bb();

    let (push, start_rank, promo_rank) = match side {
        Side::White => (8i32, 1, 7),
        Side::Black => (-8i32, 6, 0),
    };

    for from in board.positions.get_piece_bb(side, Piece::Pawn).iter_bits() {
        let allowed = attack_data.check_ray_mask & pin_mask(attack_data, from);

        // Pushes
        let one_step = (from as i32 + push) as usize;
        if !occupied.contains_square(one_step) {
            if allowed.contains_square(one_step) {
                if one_step / 8 == promo_rank {
                    add_promo_moves(from as u8, one_step as u8, false, moves);
                } else {
                    moves.push(Move::new(from as u8, one_step as u8, Move::QUIET));
                }
            }
            let two_steps = (from as i32 + 2 * push) as usize;
            if from / 8 == start_rank
                && !occupied.contains_square(two_steps)
                && allowed.contains_square(two_steps)
            {
                moves.push(Move::new(from as u8, two_steps as u8, Move::DOUBLE_PAWN));
            }
        }

        // Captures
        let attacks = MOVE_TABLES.get_pawn_attacks(from, side);
        for to in (attacks & enemy & allowed).iter_bits() {
            if to / 8 == promo_rank {
                add_promo_moves(from as u8, to as u8, true, moves);
            } else {
                moves.push(Move::new(from as u8, to as u8, Move::CAPTURE));
            }
        }

        // En Passant
        if side == board.stm
            && let Some(ep_sq) = board.enpassant_square
            && attacks.contains_square(ep_sq.index())
            && is_legal_en_passant(board, side, attack_data, from, ep_sq.index())
        {
            moves.push(Move::new(from as u8, ep_sq.index() as u8, Move::EN_PASSANT));
        }
    }
}

/// En passant removes two pawns from their squares at once, which can open a
/// rank or diagonal onto the king. Replays the occupancy and checks sliders.
fn is_legal_en_passant(
    board: &Board,
    side: Side,
    attack_data: &AttackData,
    from: usize,
    ep_sq: usize,
) -> bool {
    let captured_sq = if side == Side::White {
        ep_sq - 8
    } else {
        ep_sq + 8
    };
    if !attack_data.check_ray_mask.contains_square(ep_sq)
        && !attack_data.check_ray_mask.contains_square(captured_sq)
    {
        return false;
    }

    let occupied_after = (board.positions.get_occupied_bb()
        & !BitBoard::from_square(from)
        & !BitBoard::from_square(captured_sq))
        | BitBoard::from_square(ep_sq);
    let king_sq = attack_data.king_sq;
    let opponent = side.flip();
    let captured = BitBoard::from_square(captured_sq);

    let rook_hits = MOVE_TABLES.get_rook_attacks(king_sq, occupied_after)
        & board.positions.get_ortho_sliders_bb(opponent);
    let bishop_hits = MOVE_TABLES.get_bishop_attacks(king_sq, occupied_after)
        & board.positions.get_diag_sliders_bb(opponent)
        & !captured;

    rook_hits.is_empty() && bishop_hits.is_empty()
}

fn add_promo_moves(from: u8, to: u8, is_capture: bool, moves: &mut Vec<Move>) {
    let flags = if is_capture {
        [Move::PROMO_QC, Move::PROMO_RC, Move::PROMO_BC, Move::PROMO_NC]
    } else {
        [Move::PROMO_Q, Move::PROMO_R, Move::PROMO_B, Move::PROMO_N]
    };
    for flag in flags {
        moves.push(Move::new(from, to, flag));
    }
}
