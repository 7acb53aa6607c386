use crate::prelude::*;

pub mod params;
pub mod score;

pub mod king_safety;
pub mod material;
pub mod mobility;
pub mod pawn_structure;
pub mod position;

use king_safety::{eval_king_attack, eval_king_centralization, eval_king_safety};
use material::{eval_material, game_phase};
use mobility::eval_mobility;
use pawn_structure::{eval_passed_pawns, eval_pawn_structure};
use position::{eval_center_control, eval_piece_activity, eval_piece_coordination};

/// Static evaluator. Holds no state besides its parameters, so a single
/// instance can score any number of positions.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    params: EvalParams,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: EvalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EvalParams {
        &self.params
    }

    /// Score from the point of view of the side to move.
    ///
    /// Checkmate is `-Score::MATE` (the mover is the one mated). Every drawn
    /// status, stalemate and repetition included, is exactly zero.
    pub fn evaluate(&self, board: &Board) -> Score {
        let mut moves = Vec::with_capacity(MAX_MOVES);
        board.generate_legal_moves(&mut moves);

        match board.status_with_moves(&moves) {
            GameStatus::Checkmate(_) => -Score::MATE,
            status if status.is_draw() => Score::ZERO,
            _ => self.breakdown(board).perspective(),
        }
    }

    /// Every weighted term on its own, White positive. Terms that do not
    /// apply to the detected phase are left at zero. Terminal positions are
    /// not special-cased here.
    pub fn breakdown(&self, board: &Board) -> EvalBreakdown {
        let params = &self.params;
        let phase = game_phase(board, params);

        let mut breakdown = EvalBreakdown {
            phase,
            stm: board.stm,
            material: eval_material(board, params, phase),
            ..Default::default()
        };

        match phase {
            Phase::Endgame => {
                breakdown.king_centralization =
                    eval_king_centralization(board) * params.king_centralization_weight;
                breakdown.passed_pawns = eval_passed_pawns(board, params) * params.passed_pawn_weight;
                breakdown.mobility = eval_mobility(board, params) * params.endgame_mobility_weight;
            }
            Phase::Middlegame => {
                breakdown.king_safety = eval_king_safety(board, params) * params.king_safety_weight;
                breakdown.mobility = eval_mobility(board, params) * params.mobility_weight;
                breakdown.pawn_structure =
                    eval_pawn_structure(board, params) * params.pawn_structure_weight;
                breakdown.center_control =
                    eval_center_control(board, params) * params.center_control_weight;
                breakdown.piece_activity =
                    eval_piece_activity(board, params, phase) * params.piece_activity_weight;
                breakdown.king_attack = eval_king_attack(board, params) * params.king_attack_weight;
                breakdown.piece_coordination =
                    eval_piece_coordination(board, params) * params.piece_coordination_weight;
            }
        }

        for side in Side::SIDES {
            if board.castling_rights.has_rights(side) {
                breakdown.castling += side.sign() * params.castling_rights_bonus;
            }
        }

        breakdown
    }
}

/// Weighted evaluation terms of one position, White positive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalBreakdown {
    pub phase: Phase,
    pub stm: Side,
    pub material: f64,
    pub king_safety: f64,
    pub mobility: f64,
    pub pawn_structure: f64,
    pub center_control: f64,
    pub piece_activity: f64,
    pub king_attack: f64,
    pub piece_coordination: f64,
    pub king_centralization: f64,
    pub passed_pawns: f64,
    pub castling: f64,
}

impl EvalBreakdown {
    fn terms(&self) -> [(&'static str, f64); 11] {
        [
            ("Material", self.material),
            ("King safety", self.king_safety),
            ("Mobility", self.mobility),
            ("Pawn structure", self.pawn_structure),
            ("Center control", self.center_control),
            ("Piece activity", self.piece_activity),
            ("King attack", self.king_attack),
            ("Coordination", self.piece_coordination),
            ("King centralization", self.king_centralization),
            ("Passed pawns", self.passed_pawns),
            ("Castling", self.castling),
        ]
    }

    /// Sum of all terms, White positive.
    pub fn total(&self) -> Score {
        Score(self.terms().iter().map(|(_, v)| v).sum())
    }

    /// [`EvalBreakdown::total`] seen from the side to move.
    pub fn perspective(&self) -> Score {
        match self.stm {
            Side::White => self.total(),
            Side::Black => -self.total(),
        }
    }
}

impl Display for EvalBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Phase: {}", self.phase)?;
        writeln!(f, "{:<22}{:>12}", "Term", "White")?;
        writeln!(f, "{}", "-".repeat(34))?;
        for (name, value) in self.terms() {
            writeln!(f, "{name:<22}{value:>12.2}")?;
        }
        writeln!(f, "{}", "-".repeat(34))?;
        writeln!(f, "{:<22}{:>12.2}", "Total", self.total().value())?;
        write!(f, "{:<22}{:>12.2}", format!("For {}", self.stm), self.perspective().value())
    }
}
