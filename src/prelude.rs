pub use crate::board::fen;
pub use crate::board::{
    self, Board,
    components::{
        BitBoard, BitBoardIterator, BoardState, CastlingRights, Piece, PieceInfo, Side, Square,
    },
    status::GameStatus,
    zobrist::ZOBRIST,
};
pub use crate::consts::*;
pub use crate::evaluation::{
    self, EvalBreakdown, Evaluator,
    params::EvalParams,
    score::{Phase, Score},
};
pub use crate::moves::{
    self, Direction,
    move_info::{Move, MoveInfo},
};
pub use crate::precomputed::move_tables::MOVE_TABLES;
pub use crate::search::{
    self, SearchEngine, SearchResult,
    common::{SearchParams, SearchStats},
    history::{PositionFingerprint, PositionHistory},
    move_ordering::MoveOrderer,
};
pub use crate::utils::{self, log::*, perft::*};
pub use miette::{self, Context, IntoDiagnostic, Result};
pub use moves::move_gen;
pub use std::fmt::Display;
pub use std::str::FromStr;
pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
