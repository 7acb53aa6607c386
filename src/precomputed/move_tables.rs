use crate::prelude::*;

#[derive(Debug)]
pub struct MoveTables {
    // Basic movement patterns
    pub knight_moves: [BitBoard; 64],
    pub king_moves: [BitBoard; 64],
    pub white_pawn_attacks: [BitBoard; 64],
    pub black_pawn_attacks: [BitBoard; 64],

    // Empty-board rays, excluding the origin square
    pub north_rays: [BitBoard; 64],
    pub south_rays: [BitBoard; 64],
    pub east_rays: [BitBoard; 64],
    pub west_rays: [BitBoard; 64],
    pub northeast_rays: [BitBoard; 64],
    pub northwest_rays: [BitBoard; 64],
    pub southeast_rays: [BitBoard; 64],
    pub southwest_rays: [BitBoard; 64],

    /// The 3x3 block centred on each square (the square itself included)
    pub king_zones: [BitBoard; 64],
}

pub const MOVE_TABLES: MoveTables = MoveTables::new();

impl Default for MoveTables {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveTables {
    pub const fn new() -> Self {
        let mut tables = Self {
            knight_moves: [BitBoard(0); 64],
            king_moves: [BitBoard(0); 64],
            white_pawn_attacks: [BitBoard(0); 64],
            black_pawn_attacks: [BitBoard(0); 64],
            north_rays: [BitBoard(0); 64],
            south_rays: [BitBoard(0); 64],
            east_rays: [BitBoard(0); 64],
            west_rays: [BitBoard(0); 64],
            northeast_rays: [BitBoard(0); 64],
            northwest_rays: [BitBoard(0); 64],
            southeast_rays: [BitBoard(0); 64],
            southwest_rays: [BitBoard(0); 64],
            king_zones: [BitBoard(0); 64],
        };

        tables.init_leaper_moves();
        tables.init_pawn_attacks();
        tables.init_ray_attacks();

        tables
    }

    const fn leaper_targets(index: usize, offsets: &[(i8, i8); 8]) -> BitBoard {
        let rank = (index / 8) as i8;
        let file = (index % 8) as i8;
        let mut targets = BitBoard(0);

        let mut i = 0;
        while i < 8 {
            let (dr, df) = offsets[i];
            let (r, f) = (rank + dr, file + df);
            if r >= 0 && r < 8 && f >= 0 && f < 8 {
                targets.set((r * 8 + f) as usize);
            }
            i += 1;
        }
        targets
    }

    const fn init_leaper_moves(&mut self) {
        let knight_offsets: [(i8, i8); 8] = [
            (2, 1),
            (2, -1),
            (-2, 1),
            (-2, -1),
            (1, 2),
            (1, -2),
            (-1, 2),
            (-1, -2),
        ];
        let king_offsets: [(i8, i8); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];

        let mut index = 0;
        while index < 64 {
            self.knight_moves[index] = Self::leaper_targets(index, &knight_offsets);
            self.king_moves[index] = Self::leaper_targets(index, &king_offsets);
            let mut zone = self.king_moves[index];
            zone.set(index);
            self.king_zones[index] = zone;
            index += 1;
        }
    }

    const fn init_pawn_attacks(&mut self) {
        let mut index = 0;
        while index < 64 {
            let rank = index / 8;
            let file = index % 8;

            let mut white_attacks = BitBoard(0);
            if rank < 7 {
                if file > 0 {
                    white_attacks.set((rank + 1) * 8 + file - 1);
                }
                if file < 7 {
                    white_attacks.set((rank + 1) * 8 + file + 1);
                }
            }
            self.white_pawn_attacks[index] = white_attacks;

            let mut black_attacks = BitBoard(0);
            if rank > 0 {
                if file > 0 {
                    black_attacks.set((rank - 1) * 8 + file - 1);
                }
                if file < 7 {
                    black_attacks.set((rank - 1) * 8 + file + 1);
                }
            }
            self.black_pawn_attacks[index] = black_attacks;

            index += 1;
        }
    }

    const fn generate_ray(start_rank: usize, start_file: usize, direction: Direction) -> BitBoard {
        let mut ray = BitBoard(0);
        let (dr, df) = direction.deltas();
        let mut rank = start_rank as i8;
        let mut file = start_file as i8;

        loop {
            rank += dr;
            file += df;
            if rank < 0 || rank >= 8 || file < 0 || file >= 8 {
                break;
            }
            ray.set((rank as usize) * 8 + (file as usize));
        }

        ray
    }

    const fn init_ray_attacks(&mut self) {
        let mut index = 0;
        while index < 64 {
            let rank = index / 8;
            let file = index % 8;

            self.north_rays[index] = Self::generate_ray(rank, file, Direction::NORTH);
            self.south_rays[index] = Self::generate_ray(rank, file, Direction::SOUTH);
            self.east_rays[index] = Self::generate_ray(rank, file, Direction::EAST);
            self.west_rays[index] = Self::generate_ray(rank, file, Direction::WEST);
            self.northeast_rays[index] = Self::generate_ray(rank, file, Direction::NORTHEAST);
            self.northwest_rays[index] = Self::generate_ray(rank, file, Direction::NORTHWEST);
            self.southeast_rays[index] = Self::generate_ray(rank, file, Direction::SOUTHEAST);
            self.southwest_rays[index] = Self::generate_ray(rank, file, Direction::SOUTHWEST);

            index += 1
        }
    }

    #[inline(always)]
    pub fn get_pawn_attacks(&self, from: usize, side: Side) -> BitBoard {
        match side {
            Side::White => self.white_pawn_attacks[from],
            Side::Black => self.black_pawn_attacks[from],
        }
    }

    pub fn rays_in(&self, dir: Direction) -> &[BitBoard; 64] {
        match dir {
            Direction::NORTH => &self.north_rays,
            Direction::SOUTH => &self.south_rays,
            Direction::EAST => &self.east_rays,
            Direction::WEST => &self.west_rays,
            Direction::NORTHEAST => &self.northeast_rays,
            Direction::NORTHWEST => &self.northwest_rays,
            Direction::SOUTHEAST => &self.southeast_rays,
            _ => &self.southwest_rays,
        }
    }

    #[inline(always)]
    pub fn get_ray(&self, from: usize, dir: Direction) -> BitBoard {
        self.rays_in(dir)[from]
    }

    // Slider attacks stop at (and include) the first occupied square of each
    // ray; whose piece it is does not matter here.
    fn get_attacks_in_dir(&self, from: usize, occupied: BitBoard, dir: Direction) -> BitBoard {
        let rays = self.rays_in(dir);
        let ray = rays[from];
        match (ray & occupied).get_closest_bit(dir.is_positive()) {
            Some(blocker) => ray & !rays[blocker as usize],
            None => ray,
        }
    }

    pub fn get_bishop_attacks(&self, from: usize, occupied: BitBoard) -> BitBoard {
        self.get_attacks_in_dir(from, occupied, Direction::NORTHEAST)
            | self.get_attacks_in_dir(from, occupied, Direction::NORTHWEST)
            | self.get_attacks_in_dir(from, occupied, Direction::SOUTHEAST)
            | self.get_attacks_in_dir(from, occupied, Direction::SOUTHWEST)
    }

    pub fn get_rook_attacks(&self, from: usize, occupied: BitBoard) -> BitBoard {
        self.get_attacks_in_dir(from, occupied, Direction::NORTH)
            | self.get_attacks_in_dir(from, occupied, Direction::SOUTH)
            | self.get_attacks_in_dir(from, occupied, Direction::EAST)
            | self.get_attacks_in_dir(from, occupied, Direction::WEST)
    }

    #[inline(always)]
    pub fn get_queen_attacks(&self, from: usize, occupied: BitBoard) -> BitBoard {
        self.get_bishop_attacks(from, occupied) | self.get_rook_attacks(from, occupied)
    }

    /// Attack set of `piece` of `side` standing on `from`, given `occupied`.
    pub fn attacks_of(&self, piece: Piece, side: Side, from: usize, occupied: BitBoard) -> BitBoard {
        match piece {
            Piece::Pawn => self.get_pawn_attacks(from, side),
            Piece::Knight => self.knight_moves[from],
            Piece::Bishop => self.get_bishop_attacks(from, occupied),
            Piece::Rook => self.get_rook_attacks(from, occupied),
            Piece::Queen => self.get_queen_attacks(from, occupied),
            Piece::King => self.king_moves[from],
        }
    }

    /// Squares strictly between `a` and `b` if they share a line, else empty.
    pub fn between(&self, a: usize, b: usize) -> BitBoard {
        match Direction::between(a, b) {
            Some(dir) => self.get_ray(a, dir) & self.get_ray(b, -dir),
            None => BitBoard(0),
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
    fn test_knight_corner() {
        let moves = MOVE_TABLES.knight_moves[sq("a1")];
        assert_eq!(moves.pop_count(), 2);
        assert!(moves.contains_square(sq("b3")));
        assert!(moves.contains_square(sq("c2")));
    }

    #[test]
    fn test_king_zone() {
        assert_eq!(MOVE_TABLES.king_zones[sq("e4")].pop_count(), 9);
        assert_eq!(MOVE_TABLES.king_zones[sq("h8")].pop_count(), 4);
    }

    #[test]
    fn test_rook_attacks_stop_at_blockers() {
        let mut occupied = BitBoard(0);
        occupied.set(sq("d6"));
        occupied.set(sq("f4"));
        let attacks = MOVE_TABLES.get_rook_attacks(sq("d4"), occupied);
        assert!(attacks.contains_square(sq("d6")));
        assert!(!attacks.contains_square(sq("d7")));
        assert!(attacks.contains_square(sq("f4")));
        assert!(!attacks.contains_square(sq("g4")));
        assert!(attacks.contains_square(sq("a4")));
        assert!(attacks.contains_square(sq("d1")));
        assert_eq!(attacks.pop_count(), 2 + 2 + 3 + 3);
    }

    #[test]
    fn test_bishop_attacks_stop_at_blockers() {
        let mut occupied = BitBoard(0);
        occupied.set(sq("b2"));
        let attacks = MOVE_TABLES.get_bishop_attacks(sq("d4"), occupied);
        assert!(attacks.contains_square(sq("c3")));
        assert!(attacks.contains_square(sq("b2")));
        assert!(!attacks.contains_square(sq("a1")));
        assert!(attacks.contains_square(sq("h8")));
        assert!(attacks.contains_square(sq("a7")));
        assert!(attacks.contains_square(sq("g1")));
    }

    #[test]
    fn test_between() {
        let between = MOVE_TABLES.between(sq("e1"), sq("e8"));
        assert_eq!(between.pop_count(), 6);
        assert!(MOVE_TABLES.between(sq("e1"), sq("f3")).is_empty());
        assert!(MOVE_TABLES.between(sq("e1"), sq("e2")).is_empty());
    }
}
