pub mod move_tables;
pub mod pawn_tables;
