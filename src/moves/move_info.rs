use crate::prelude::*;

/// A move packed into 16 bits:
/// ```text
/// 15..12  flags
/// 11..6   to square
///  5..0   from square
/// ```
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Move(u16);

impl Move {
    pub const QUIET: u16 = 0b0000;
    pub const DOUBLE_PAWN: u16 = 0b0001;
    pub const KING_CASTLE: u16 = 0b0010;
    pub const QUEEN_CASTLE: u16 = 0b0011;
    pub const CAPTURE: u16 = 0b0100;
    pub const EN_PASSANT: u16 = 0b0101;
    pub const PROMO_N: u16 = 0b1000;
    pub const PROMO_B: u16 = 0b1001;
    pub const PROMO_R: u16 = 0b1010;
    pub const PROMO_Q: u16 = 0b1011;
    pub const PROMO_NC: u16 = 0b1100;
    pub const PROMO_BC: u16 = 0b1101;
    pub const PROMO_RC: u16 = 0b1110;
    pub const PROMO_QC: u16 = 0b1111;

    const SQ_MASK: u16 = 0b11_1111;
    const CAPTURE_BIT: u16 = 0b0100;
    const PROMO_BIT: u16 = 0b1000;

    #[inline(always)]
    pub const fn new(from: u8, to: u8, flags: u16) -> Self {
        Self((from as u16 & Self::SQ_MASK) | ((to as u16 & Self::SQ_MASK) << 6) | (flags << 12))
    }

    #[inline(always)]
    pub const fn from_idx(&self) -> u8 {
        (self.0 & Self::SQ_MASK) as u8
    }

    #[inline(always)]
    pub const fn to_idx(&self) -> u8 {
        ((self.0 >> 6) & Self::SQ_MASK) as u8
    }

    #[inline(always)]
    pub fn from_sq(&self) -> Square {
        Square::new(self.from_idx() as usize).unwrap_or_default()
    }

    #[inline(always)]
    pub fn to_sq(&self) -> Square {
        Square::new(self.to_idx() as usize).unwrap_or_default()
    }

    #[inline(always)]
    pub const fn flags(&self) -> u16 {
        self.0 >> 12
    }

    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.flags() & Self::CAPTURE_BIT != 0
    }

    #[inline(always)]
    pub const fn is_enpassant(&self) -> bool {
        self.flags() == Self::EN_PASSANT
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        matches!(self.flags(), Self::KING_CASTLE | Self::QUEEN_CASTLE)
    }

    #[inline(always)]
    pub const fn is_double_push(&self) -> bool {
        self.flags() == Self::DOUBLE_PAWN
    }

    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.flags() & Self::PROMO_BIT != 0
    }

    pub const fn promotion(&self) -> Option<Piece> {
        if !self.is_promotion() {
            return None;
        }
        Some(match self.flags() & 0b0011 {
            0 => Piece::Knight,
            1 => Piece::Bishop,
            2 => Piece::Rook,
            _ => Piece::Queen,
        })
    }

    pub fn uci(&self) -> String {
        let mut out = format!("{}{}", self.from_sq(), self.to_sq()).to_ascii_lowercase();
        if let Some(piece) = self.promotion() {
            out.push(piece.to_char(Side::Black));
        }
        out
    }

    /// Resolves a coordinate string such as `e2e4` or `e7e8q` against the
    /// legal moves of `board`.
    pub fn from_uci(board: &Board, uci: &str) -> miette::Result<Self> {
        let uci = uci.trim();
        miette::ensure!(
            uci.is_ascii() && (uci.len() == 4 || uci.len() == 5),
            "'{uci}' is not a coordinate move (expected e.g. e2e4 or e7e8q)"
        );
        let from = Square::from_str(&uci[0..2])?;
        let to = Square::from_str(&uci[2..4])?;
        let promotion = match uci.chars().nth(4) {
            Some(c) => match Piece::from_char(c) {
                Some((piece, _)) if !matches!(piece, Piece::Pawn | Piece::King) => Some(piece),
                _ => miette::bail!("Invalid promotion piece '{c}' in '{uci}'"),
            },
            None => None,
        };

        let mut legal = Vec::with_capacity(MAX_MOVES);
        board.generate_legal_moves(&mut legal);
        legal
            .into_iter()
            .find(|mv| mv.from_sq() == from && mv.to_sq() == to && mv.promotion() == promotion)
            .with_context(|| format!("{uci} is not a legal move in {}", board.to_fen()))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uci())
    }
}

/// Everything `unmake_move` needs to restore the position before `mv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveInfo {
    pub mv: Move,
    pub piece_moved: Piece,
    pub captured: Option<(Piece, Square)>,
    pub castling_rights: CastlingRights,
    pub enpassant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_counter: u16,
    pub hash: u64,
}
