use std::ops::Neg;

pub mod attack_data;
pub mod move_gen;
pub mod move_info;


/// Ray direction as a square-index offset.
/// First 4 are orthogonal, rest are diagonal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction(i8);

impl Direction {
    pub const NORTH: Self = Self(8);
    pub const SOUTH: Self = Self(-8);
    pub const EAST: Self = Self(1);
    pub const WEST: Self = Self(-1);
    pub const NORTHEAST: Self = Self(9);
    pub const NORTHWEST: Self = Self(7);
    pub const SOUTHEAST: Self = Self(-7);
    pub const SOUTHWEST: Self = Self(-9);

    pub const ALL: [Self; 8] = [
        Self::NORTH,
        Self::SOUTH,
        Self::EAST,
        Self::WEST,
        Self::NORTHEAST,
        Self::NORTHWEST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
    ];

    #[inline(always)]
    pub const fn value(&self) -> i8 {
        self.0
    }

    /// (rank delta, file delta)
    pub const fn deltas(&self) -> (i8, i8) {
        match self.0 {
            8 => (1, 0),
            -8 => (-1, 0),
            1 => (0, 1),
            -1 => (0, -1),
            9 => (1, 1),
            7 => (1, -1),
            -7 => (-1, 1),
            -9 => (-1, -1),
            _ => (0, 0),
        }
    }

    #[inline(always)]
    pub const fn is_orthogonal(&self) -> bool {
        matches!(self.0, 8 | -8 | 1 | -1)
    }

    /// Walking a ray in this direction visits increasing square indices.
    #[inline(always)]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Direction of the line from `from` to `to`, if both share a rank,
    /// file or diagonal.
    pub const fn between(from: usize, to: usize) -> Option<Self> {
        let dr = (to / 8) as i8 - (from / 8) as i8;
        let df = (to % 8) as i8 - (from % 8) as i8;
        if dr == 0 && df == 0 {
            return None;
        }
        if dr != 0 && df != 0 && dr.abs() != df.abs() {
            return None;
        }
        Some(Self(dr.signum() * 8 + df.signum()))
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
