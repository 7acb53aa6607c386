use std::{fs, path::Path};

use crate::prelude::{NUM_PIECES, NUM_SQUARES, Piece, Side, Square};
use miette::{Context, IntoDiagnostic};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

/// Every constant the evaluator uses. Defaults reproduce the reference
/// behaviour; a TOML file can override any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    /// Pawn, Knight, Bishop, Rook, Queen, King
    pub piece_values: [f64; NUM_PIECES],
    /// Either side below this much non-king material means endgame
    pub endgame_material_threshold: f64,

    // Piece-square tables, written rank 8 first
    #[serde(with = "BigArray")]
    pub pawn_table: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub knight_table: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub bishop_table: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub rook_table: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub queen_table: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub king_middlegame_table: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub king_endgame_table: [i32; NUM_SQUARES],

    // Material term
    pub attack_square_bonus: f64,
    pub bishop_pair_bonus: f64,
    pub castling_rights_bonus: f64,

    // Middlegame weights
    pub king_safety_weight: f64,
    pub mobility_weight: f64,
    pub pawn_structure_weight: f64,
    pub center_control_weight: f64,
    pub piece_activity_weight: f64,
    pub king_attack_weight: f64,
    pub piece_coordination_weight: f64,

    // Endgame weights
    pub king_centralization_weight: f64,
    pub passed_pawn_weight: f64,
    pub endgame_mobility_weight: f64,

    // King safety
    pub pawn_shield_bonus: f64,
    pub pawn_shield_front_bonus: f64,
    pub king_attacker_scale: f64,
    pub half_open_file_penalty: f64,
    pub open_file_extra_penalty: f64,

    /// Per moved piece: Pawn, Knight, Bishop, Rook, Queen, King
    pub mobility_move_weights: [f64; NUM_PIECES],

    // Center control
    pub center_attack_bonus: f64,
    pub center_pawn_bonus: f64,
    pub center_piece_bonus: f64,
    pub extended_center_attack_bonus: f64,
    pub extended_center_pawn_bonus: f64,
    pub extended_center_piece_bonus: f64,

    // Piece activity
    pub development_bonus: f64,
    pub attack_count_bonus: f64,
    pub center_reach_bonus: f64,

    /// King zone attack weight per piece: Pawn, Knight, Bishop, Rook, Queen, King
    pub king_attack_piece_weights: [f64; NUM_PIECES],
    pub king_attack_multiplier: f64,

    // Coordination
    pub rook_same_rank_bonus: f64,
    pub rook_open_file_bonus: f64,
    pub protection_bonus: f64,

    // Pawns
    pub passed_pawn_base: f64,
    pub passed_pawn_rank_bonus: f64,
    pub pawn_chain_bonus: f64,
    pub isolated_pawn_penalty: f64,
    pub doubled_pawn_penalty: f64,
}

impl Default for EvalParams {
    fn default() -> Self {
        #[rustfmt::skip]
        let pawn_table = [
             0,  0,  0,  0,  0,  0,  0,  0,
            50, 50, 50, 50, 50, 50, 50, 50,
            10, 10, 20, 30, 30, 20, 10, 10,
             5,  5, 10, 25, 25, 10,  5,  5,
             0,  0,  0, 20, 20,  0,  0,  0,
             5, -5,-10,  0,  0,-10, -5,  5,
             5, 10, 10,-20,-20, 10, 10,  5,
             0,  0,  0,  0,  0,  0,  0,  0,
        ];

        #[rustfmt::skip]
        let knight_table = [
            -50,-40,-30,-30,-30,-30,-40,-50,
            -40,-20,  0,  0,  0,  0,-20,-40,
            -30,  0, 10, 15, 15, 10,  0,-30,
            -30,  5, 15, 20, 20, 15,  5,-30,
            -30,  0, 15, 20, 20, 15,  0,-30,
            -30,  5, 10, 15, 15, 10,  5,-30,
            -40,-20,  0,  5,  5,  0,-20,-40,
            -50,-40,-30,-30,-30,-30,-40,-50,
        ];

        #[rustfmt::skip]
        let bishop_table = [
            -20,-10,-10,-10,-10,-10,-10,-20,
            -10,  0,  0,  0,  0,  0,  0,-10,
            -10,  0,  5, 10, 10,  5,  0,-10,
            -10,  5,  5, 10, 10,  5,  5,-10,
            -10,  0, 10, 10, 10, 10,  0,-10,
            -10, 10, 10, 10, 10, 10, 10,-10,
            -10,  5,  0,  0,  0,  0,  5,-10,
            -20,-10,-10,-10,-10,-10,-10,-20,
        ];

        #[rustfmt::skip]
        let rook_table = [
             0,  0,  0,  5,  5,  0,  0,  0,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
            -5,  0,  0,  0,  0,  0,  0, -5,
             5, 10, 10, 10, 10, 10, 10,  5,
             0,  0,  0,  0,  0,  0,  0,  0,
        ];

        #[rustfmt::skip]
        let queen_table = [
            -20,-10,-10, -5, -5,-10,-10,-20,
            -10,  0,  0,  0,  0,  0,  0,-10,
            -10,  0,  5,  5,  5,  5,  0,-10,
             -5,  0,  5,  5,  5,  5,  0, -5,
              0,  0,  5,  5,  5,  5,  0, -5,
            -10,  5,  5,  5,  5,  5,  0,-10,
            -10,  0,  5,  0,  0,  0,  0,-10,
            -20,-10,-10, -5, -5,-10,-10,-20,
        ];

        #[rustfmt::skip]
        let king_middlegame_table = [
            -30,-40,-40,-50,-50,-40,-40,-30,
            -30,-40,-40,-50,-50,-40,-40,-30,
            -30,-40,-40,-50,-50,-40,-40,-30,
            -30,-40,-40,-50,-50,-40,-40,-30,
            -20,-30,-30,-40,-40,-30,-30,-20,
            -10,-20,-20,-20,-20,-20,-20,-10,
             20, 20,  0,  0,  0,  0, 20, 20,
             20, 30, 10,  0,  0, 10, 30, 20,
        ];

        #[rustfmt::skip]
        let king_endgame_table = [
            -50,-40,-30,-20,-20,-30,-40,-50,
            -30,-20,-10,  0,  0,-10,-20,-30,
            -30,-10, 20, 30, 30, 20,-10,-30,
            -30,-10, 30, 40, 40, 30,-10,-30,
            -30,-10, 30, 40, 40, 30,-10,-30,
            -30,-10, 20, 30, 30, 20,-10,-30,
            -30,-30,  0,  0,  0,  0,-30,-30,
            -50,-30,-30,-30,-30,-30,-30,-50,
        ];

        Self {
            piece_values: [100.0, 320.0, 330.0, 500.0, 900.0, 20000.0],
            endgame_material_threshold: 1300.0,

            pawn_table,
            knight_table,
            bishop_table,
            rook_table,
            queen_table,
            king_middlegame_table,
            king_endgame_table,

            attack_square_bonus: 5.0,
            bishop_pair_bonus: 50.0,
            castling_rights_bonus: 30.0,

            king_safety_weight: 60.0,
            mobility_weight: 0.2,
            pawn_structure_weight: 30.0,
            center_control_weight: 40.0,
            piece_activity_weight: 25.0,
            king_attack_weight: 50.0,
            piece_coordination_weight: 15.0,

            king_centralization_weight: 50.0,
            passed_pawn_weight: 40.0,
            endgame_mobility_weight: 0.3,

            pawn_shield_bonus: 10.0,
            pawn_shield_front_bonus: 5.0,
            king_attacker_scale: 0.1,
            half_open_file_penalty: 20.0,
            open_file_extra_penalty: 10.0,

            mobility_move_weights: [1.0, 2.0, 2.0, 3.0, 4.0, 0.0],

            center_attack_bonus: 10.0,
            center_pawn_bonus: 15.0,
            center_piece_bonus: 10.0,
            extended_center_attack_bonus: 5.0,
            extended_center_pawn_bonus: 7.0,
            extended_center_piece_bonus: 5.0,

            development_bonus: 10.0,
            attack_count_bonus: 2.0,
            center_reach_bonus: 5.0,

            king_attack_piece_weights: [1.0, 3.0, 3.0, 5.0, 9.0, 0.0],
            king_attack_multiplier: 1.5,

            rook_same_rank_bonus: 20.0,
            rook_open_file_bonus: 15.0,
            protection_bonus: 5.0,

            passed_pawn_base: 50.0,
            passed_pawn_rank_bonus: 10.0,
            pawn_chain_bonus: 10.0,
            isolated_pawn_penalty: 20.0,
            doubled_pawn_penalty: 15.0,
        }
    }
}

impl EvalParams {
    #[inline(always)]
    pub fn piece_value(&self, piece: Piece) -> f64 {
        self.piece_values[piece.index()]
    }

    /// Piece-square value. White reads the table at `square`, Black at the
    /// rank-mirrored square.
    pub fn pst_value(&self, piece: Piece, side: Side, square: Square, endgame: bool) -> f64 {
        let table = match piece {
            Piece::Pawn => &self.pawn_table,
            Piece::Knight => &self.knight_table,
            Piece::Bishop => &self.bishop_table,
            Piece::Rook => &self.rook_table,
            Piece::Queen => &self.queen_table,
            Piece::King if endgame => &self.king_endgame_table,
            Piece::King => &self.king_middlegame_table,
        };
        let index = match side {
            Side::White => square.index(),
            Side::Black => square.flip_rank().index(),
        };
        table[index] as f64
    }

    /// Save to a TOML File
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> miette::Result<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(self).into_diagnostic()?;
        fs::write(path, toml_string)
            .into_diagnostic()
            .with_context(|| format!("Writing eval params to {}", path.display()))?;
        Ok(())
    }

    /// Load from a TOML File. Missing keys keep their default values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> miette::Result<Self> {
        let path = path.as_ref();
        let file_content = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("Reading eval params from {}", path.display()))?;
        let params: Self = toml::from_str(&file_content)
            .into_diagnostic()
            .with_context(|| format!("Parsing eval params in {}", path.display()))?;
        Ok(params)
    }
}
