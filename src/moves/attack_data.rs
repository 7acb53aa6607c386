use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct AttackData {
    /// If one piece attacks king
    pub in_check: bool,
    /// If more than one piece attacks king
    pub double_check: bool,
    /// Bits set for pinned pieces (pieces that cannot move off their pin-ray)
    pub pin_ray_mask: BitBoard,
    /// Squares that block a check or capture the checking piece.
    /// Empty in double check, all squares when not in check.
    pub check_ray_mask: BitBoard,
    /// Bits set for the checking pieces themselves.
    pub checker_mask: BitBoard,
    /// All squares attacked by the opponent, computed with the friendly
    /// king removed so that it cannot step back along a slider's ray.
    pub opp_attack_map: BitBoard,
    /// The square of the friendly king
    pub king_sq: usize,
}

impl AttackData {
    fn add_checker(&mut self, checkers: BitBoard, block_mask: BitBoard) {
        if self.in_check {
            self.double_check = true;
        }
        self.in_check = true;
        self.checker_mask |= checkers;
        self.check_ray_mask &= block_mask;
    }
}

pub fn calculate_attack_data(board: &Board, side: Side) -> AttackData {
    let mut attack_data = AttackData {
        check_ray_mask: BitBoard::FULL,
        ..Default::default()
    };

    let Some(king_sq) = board.positions.get_piece_bb(side, Piece::King).lsb() else {
        // No king on board, no legality check
        return attack_data;
    };
    let king_sq = king_sq as usize;
    attack_data.king_sq = king_sq;

    let opponent = side.flip();
    let all_pieces = board.positions.get_occupied_bb();
    let friendly_pieces = *board.positions.get_side_bb(side);
    let opp_ortho = board.positions.get_ortho_sliders_bb(opponent);
    let opp_diag = board.positions.get_diag_sliders_bb(opponent);

    // Slider checks and pins
    for dir in Direction::ALL {
        let ray = MOVE_TABLES.get_ray(king_sq, dir);
        let blockers_on_ray = ray & all_pieces;
        let Some(first) = blockers_on_ray.get_closest_bit(dir.is_positive()) else {
            continue;
        };
        let first = first as usize;
        let sliders = if dir.is_orthogonal() {
            opp_ortho
        } else {
            opp_diag
        };

        if friendly_pieces.contains_square(first) {
            // A friendly piece is pinned if the next blocker is an enemy slider
            let behind = blockers_on_ray & !BitBoard::from_square(first);
            if let Some(pinner) = behind.get_closest_bit(dir.is_positive())
                && sliders.contains_square(pinner as usize)
            {
                attack_data.pin_ray_mask.set(first);
            }
        } else if sliders.contains_square(first) {
            let checker = BitBoard::from_square(first);
            let block_mask = MOVE_TABLES.between(king_sq, first) | checker;
            attack_data.add_checker(checker, block_mask);
        }
    }

    // Knight and pawn checks can only be answered by capturing the checker
    let knight_checkers =
        MOVE_TABLES.knight_moves[king_sq] & *board.positions.get_piece_bb(opponent, Piece::Knight);
    if knight_checkers.any() {
        attack_data.add_checker(knight_checkers, knight_checkers);
    }

    let pawn_checkers = MOVE_TABLES.get_pawn_attacks(king_sq, side)
        & *board.positions.get_piece_bb(opponent, Piece::Pawn);
    if pawn_checkers.any() {
        attack_data.add_checker(pawn_checkers, pawn_checkers);
    }

    let occupied_no_king = all_pieces & !BitBoard::from_square(king_sq);
    attack_data.opp_attack_map = side_attack_map(board, opponent, occupied_no_king);

    attack_data
}

/// Union of every square attacked by `side`, sliders seeing through nothing
/// but `occupied`.
pub fn side_attack_map(board: &Board, side: Side, occupied: BitBoard) -> BitBoard {
    let mut map = BitBoard::EMPTY;
    for piece in Piece::all_pieces() {
        for sq in board.positions.get_piece_bb(side, piece).iter_bits() {
            map |= MOVE_TABLES.attacks_of(piece, side, sq, occupied);
        }
    }
    map
}
