use serde::{Deserialize, Serialize};

use crate::prelude::*;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Game phase, decided by the non-king material left on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Phase {
    #[default]
    Middlegame,
    Endgame,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Middlegame => write!(f, "Middlegame"),
            Phase::Endgame => write!(f, "Endgame"),
        }
    }
}

/// Evaluation in centipawns.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(pub f64);

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_mate() {
            let sign = if self.0 > 0.0 { "+" } else { "-" };
            return write!(f, "{sign}MATE");
        }
        write!(f, "{:.2}", self.0)
    }
}

impl Score {
    pub const ZERO: Self = Self(0.0);
    /// Side to move delivers (positive) or suffers (negative) checkmate
    pub const MATE: Self = Self(1_000_000.0);
    /// Anything at least this large in magnitude is a mate score
    pub const MATE_THRESHOLD: Self = Self(500_000.0);

    #[inline(always)]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub const fn value(&self) -> f64 {
        self.0
    }

    #[inline(always)]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    #[inline(always)]
    pub fn is_mate(&self) -> bool {
        self.0.abs() >= Self::MATE_THRESHOLD.0
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Score {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Score {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Score {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<f64> for Score {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
