use crate::prelude::*;

#[derive(Debug)]
pub struct PawnTables {
    /// For isolated pawn check: combines FILE_MASKS for adjacent files
    ///
    /// *Index: \[file\] -> BitBoard ( file-1 | file+1 )*
    pub adjacent_files_masks: [BitBoard; 8],

    /// For passed pawn check: own and adjacent files, every rank ahead of 'sq'
    ///
    /// *Index: \[Side\]\[square\] -> BitBoard*
    pub passed_pawn_masks: [[BitBoard; 64]; 2],

    /// For king shield: the two ranks in front of the king, files -1..=+1
    ///
    /// *Index: \[Side\]\[king_square\] -> BitBoard*
    pub king_shield_masks: [[BitBoard; 64]; 2],

    /// For pawn chains: the two squares diagonally behind a pawn
    ///
    /// *Index: \[Side\]\[pawn_square\] -> BitBoard*
    pub pawn_support_masks: [[BitBoard; 64]; 2],
}

pub const PAWN_TABLES: PawnTables = PawnTables::new();

impl Default for PawnTables {
    fn default() -> Self {
        Self::new()
    }
}

impl PawnTables {
    pub const fn new() -> Self {
        let mut tables = Self {
            adjacent_files_masks: [BitBoard(0); 8],
            passed_pawn_masks: [[BitBoard(0); 64]; 2],
            king_shield_masks: [[BitBoard(0); 64]; 2],
            pawn_support_masks: [[BitBoard(0); 64]; 2],
        };
        tables.init_adjacent_file_masks();
        tables.init_per_sq_masks();
        tables
    }

    const fn init_adjacent_file_masks(&mut self) {
        let mut file = 0;
        while file < 8 {
            let mut mask = BitBoard(0);
            if file > 0 {
                mask.0 |= FILE_MASKS[file - 1];
            }
            if file < 7 {
                mask.0 |= FILE_MASKS[file + 1];
            }
            self.adjacent_files_masks[file] = mask;
            file += 1;
        }
    }

    /// Squares on files `file-1..=file+1` for every rank `rank + step*k`,
    /// `k` in `1..=max_steps`, clipped to the board.
    const fn forward_band(rank: usize, file: usize, step: i8, max_steps: i8) -> BitBoard {
        let mut mask = BitBoard(0);
        let mut k = 1;
        while k <= max_steps {
            let r = rank as i8 + step * k;
            if r < 0 || r >= 8 {
                break;
            }
            let mut df = -1;
            while df <= 1 {
                let f = file as i8 + df;
                if f >= 0 && f < 8 {
                    mask.set(r as usize * 8 + f as usize);
                }
                df += 1;
            }
            k += 1;
        }
        mask
    }

    const fn init_per_sq_masks(&mut self) {
        let white = Side::White.index();
        let black = Side::Black.index();

        let mut sq = 0;
        while sq < 64 {
            let rank = sq / 8;
            let file = sq % 8;

            self.passed_pawn_masks[white][sq] = Self::forward_band(rank, file, 1, 7);
            self.passed_pawn_masks[black][sq] = Self::forward_band(rank, file, -1, 7);

            self.king_shield_masks[white][sq] = Self::forward_band(rank, file, 1, 2);
            self.king_shield_masks[black][sq] = Self::forward_band(rank, file, -1, 2);

            // Diagonally behind is where the opposite colour's pawn would attack from
            self.pawn_support_masks[white][sq] = MOVE_TABLES.black_pawn_attacks[sq];
            self.pawn_support_masks[black][sq] = MOVE_TABLES.white_pawn_attacks[sq];

            sq += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> usize {
        Square::from_str(s).unwrap().index()
    }

    #[test]
    fn test_passed_pawn_mask() {
        let mask = PAWN_TABLES.passed_pawn_masks[Side::White.index()][sq("e5")];
        assert_eq!(mask.pop_count(), 9);
        assert!(mask.contains_square(sq("d6")));
        assert!(mask.contains_square(sq("f8")));
        assert!(!mask.contains_square(sq("e5")));
        assert!(!mask.contains_square(sq("d4")));

        let mask = PAWN_TABLES.passed_pawn_masks[Side::Black.index()][sq("a3")];
        assert_eq!(mask.pop_count(), 4);
    }

    #[test]
    fn test_king_shield_mask() {
        let mask = PAWN_TABLES.king_shield_masks[Side::White.index()][sq("g1")];
        assert_eq!(mask.pop_count(), 6);
        assert!(mask.contains_square(sq("h3")));
        let mask = PAWN_TABLES.king_shield_masks[Side::Black.index()][sq("a8")];
        assert_eq!(mask.pop_count(), 4);
        assert!(PAWN_TABLES.king_shield_masks[Side::White.index()][sq("e8")].is_empty());
    }

    #[test]
    fn test_support_mask() {
        let mask = PAWN_TABLES.pawn_support_masks[Side::White.index()][sq("d4")];
        assert!(mask.contains_square(sq("c3")));
        assert!(mask.contains_square(sq("e3")));
        assert_eq!(mask.pop_count(), 2);
    }
}
