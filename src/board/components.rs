use std::{
    fmt::{Display, Write},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not},
    str::FromStr,
};

use miette::Context;

use crate::prelude::*;

#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
#[repr(transparent)]
pub struct BitBoard(pub u64);

impl BitAndAssign for BitBoard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl BitOrAssign for BitBoard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitOr for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitXor for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for BitBoard {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl BitAnd for &BitBoard {
    type Output = BitBoard;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        BitBoard(self.0 & rhs.0)
    }
}

impl BitBoard {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(!0);

    #[inline(always)]
    pub const fn from_square(index: usize) -> Self {
        Self(1 << index)
    }

    #[inline(always)]
    pub const fn set(&mut self, pos: usize) {
        self.0 |= 1 << pos;
    }

    #[inline(always)]
    pub const fn capture(&mut self, index: usize) {
        self.0 &= !(1 << index);
    }

    #[inline(always)]
    pub const fn pop_count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Renders rank 8 first, files a..h left to right.
    pub fn print_bitboard(&self) -> String {
        let mut out = String::with_capacity(8 * 8 * 2);
        for rank in (0..8).rev() {
            let row: Vec<&str> = (0..8)
                .map(|file| {
                    if self.contains_square(rank * 8 + file) {
                        "1"
                    } else {
                        "0"
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", row.join(" "));
        }
        out
    }

    #[inline(always)]
    pub const fn lsb(&self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        Some(self.0.trailing_zeros() as u64)
    }

    #[inline(always)]
    pub const fn msb(&self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        Some(63 - self.0.leading_zeros() as u64)
    }

    /// Clears and returns the lowest set bit.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<u64> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as u64;
        self.0 &= self.0 - 1;
        Some(idx)
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn any(&self) -> bool {
        self.0 != 0
    }

    #[inline(always)]
    pub const fn iter_bits(&self) -> BitBoardIterator {
        BitBoardIterator { remaining: self.0 }
    }

    #[inline(always)]
    pub const fn or(self, rhs: Self) -> Self {
        BitBoard(self.0 | rhs.0)
    }

    #[inline(always)]
    pub const fn and(self, rhs: Self) -> Self {
        BitBoard(self.0 & rhs.0)
    }

    #[inline(always)]
    pub const fn contains_square(&self, index: usize) -> bool {
        (self.0 & (1 << index)) != 0
    }

    /// Nearest set bit when walking a ray. Positive directions grow the
    /// square index, so the nearest blocker is the lsb; otherwise the msb.
    #[inline(always)]
    pub const fn get_closest_bit(&self, forward: bool) -> Option<u64> {
        if forward { self.lsb() } else { self.msb() }
    }
}

/// Iterator that yields each set bit position in a BitBoard
pub struct BitBoardIterator {
    remaining: u64,
}

impl Iterator for BitBoardIterator {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.remaining.count_ones() as usize;
        (exact, Some(exact))
    }
}

impl ExactSizeIterator for BitBoardIterator {}

#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Self::Output {
        self.flip()
    }
}

impl FromStr for Side {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Side::White),
            "b" | "black" => Ok(Side::Black),
            other => miette::bail!("Unknown side '{other}', expected white or black"),
        }
    }
}

impl Side {
    pub const SIDES: [Side; 2] = [Side::White, Side::Black];

    pub const fn flip(&self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    /// +1 for White, -1 for Black. Used to fold per-side terms into a
    /// White-positive total.
    #[inline(always)]
    pub const fn sign(&self) -> f64 {
        match self {
            Side::White => 1.0,
            Side::Black => -1.0,
        }
    }
}

#[derive(Default, PartialEq, Eq, Debug, PartialOrd, Clone, Copy, Hash)]
pub enum Piece {
    #[default]
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Piece::Pawn => write!(f, "Pawn"),
            Piece::Knight => write!(f, "Knight"),
            Piece::Bishop => write!(f, "Bishop"),
            Piece::Rook => write!(f, "Rook"),
            Piece::Queen => write!(f, "Queen"),
            Piece::King => write!(f, "King"),
        }
    }
}

impl Piece {
    pub const PIECES: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    pub const PIECE_CHARS: [[char; 6]; 2] = [
        ['P', 'N', 'B', 'R', 'Q', 'K'], // White
        ['p', 'n', 'b', 'r', 'q', 'k'], // Black
    ];

    pub fn all() -> impl Iterator<Item = (Piece, Side)> {
        Side::SIDES
            .iter()
            .flat_map(move |&side| Self::PIECES.iter().map(move |&piece| (piece, side)))
    }

    pub fn all_pieces() -> impl Iterator<Item = Piece> {
        Self::PIECES.iter().copied()
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    pub const fn to_char(&self, side: Side) -> char {
        Self::PIECE_CHARS[side.index()][self.index()]
    }

    pub fn from_char(c: char) -> Option<(Piece, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some((piece, side))
    }

    pub fn icon(&self, side: Side) -> char {
        let icons = match side {
            Side::White => ['♟', '♞', '♝', '♜', '♛', '♚'],
            Side::Black => ['♙', '♘', '♗', '♖', '♕', '♔'],
        };
        icons[self.index()]
    }
}

/// Compact struct to hold piece and side
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Clone, Copy)]
pub struct PieceInfo {
    pub piece: Piece,
    pub side: Side,
}

impl PieceInfo {
    pub const fn new(piece: Piece, side: Side) -> Self {
        Self { piece, side }
    }

    /// 1..=12, used for placement fingerprints. 0 is reserved for "empty".
    #[inline(always)]
    pub const fn code(&self) -> u64 {
        (self.side.index() * 6 + self.piece.index() + 1) as u64
    }
}

/// Piece placement of a position.
/// Twelve bitboards (one per side and piece) plus a mailbox for lookups
/// by square. All three views are kept in sync by the mutators below.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct BoardState {
    /// Boards for all pieces of white and black sides
    all_sides: [BitBoard; 2],
    /// [Pawn, Knight, Bishop, Rook, Queen, King] per side
    all_pieces: [[BitBoard; 6]; 2],
    /// Maps square to piece info
    mailbox: [Option<PieceInfo>; 64],
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            all_sides: [BitBoard::default(); 2],
            all_pieces: [[BitBoard::default(); 6]; 2],
            mailbox: [None; 64],
        }
    }
}

impl BoardState {
    pub fn to_fen_pieces(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                match self.mailbox[rank * 8 + file] {
                    Some(info) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(info.piece.to_char(info.side));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen
    }

    #[inline(always)]
    pub const fn mailbox(&self) -> &[Option<PieceInfo>; 64] {
        &self.mailbox
    }

    #[inline(always)]
    pub const fn get_piece_bb(&self, side: Side, piece: Piece) -> &BitBoard {
        &self.all_pieces[side.index()][piece.index()]
    }

    #[inline(always)]
    pub const fn get_side_bb(&self, side: Side) -> &BitBoard {
        &self.all_sides[side.index()]
    }

    #[inline(always)]
    pub const fn get_ortho_sliders_bb(&self, side: Side) -> BitBoard {
        self.all_pieces[side.index()][Piece::Rook.index()]
            .or(self.all_pieces[side.index()][Piece::Queen.index()])
    }

    #[inline(always)]
    pub const fn get_diag_sliders_bb(&self, side: Side) -> BitBoard {
        self.all_pieces[side.index()][Piece::Bishop.index()]
            .or(self.all_pieces[side.index()][Piece::Queen.index()])
    }

    #[inline(always)]
    pub const fn is_occupied(&self, square: usize) -> bool {
        self.all_sides[Side::White.index()].contains_square(square)
            || self.all_sides[Side::Black.index()].contains_square(square)
    }

    #[inline(always)]
    pub fn get_occupied_bb(&self) -> BitBoard {
        self.all_sides[Side::White.index()] | self.all_sides[Side::Black.index()]
    }

    #[inline(always)]
    pub fn get_piece_at(&self, square: Square) -> Option<(Piece, Side)> {
        self.mailbox[square.index()].map(|info| (info.piece, info.side))
    }

    /// Count of `piece` for `side`
    #[inline(always)]
    pub const fn count(&self, side: Side, piece: Piece) -> u32 {
        self.all_pieces[side.index()][piece.index()].pop_count()
    }

    pub fn set(&mut self, side: Side, piece: Piece, square: Square) -> miette::Result<()> {
        miette::ensure!(
            self.mailbox[square.index()].is_none(),
            "[set] A piece already exists on {square}"
        );
        self.all_pieces[side.index()][piece.index()].set(square.index());
        self.all_sides[side.index()].set(square.index());
        self.mailbox[square.index()] = Some(PieceInfo::new(piece, side));
        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> miette::Result<PieceInfo> {
        let info = self.mailbox[square.index()]
            .with_context(|| format!("[remove_piece] No piece on {square}"))?;
        self.all_pieces[info.side.index()][info.piece.index()].capture(square.index());
        self.all_sides[info.side.index()].capture(square.index());
        self.mailbox[square.index()] = None;
        Ok(info)
    }

    /// Moves whatever stands on `from` to the empty square `to`.
    /// Captures must be removed first.
    pub fn move_piece(&mut self, from: Square, to: Square) -> miette::Result<()> {
        let info = self.mailbox[from.index()]
            .with_context(|| format!("[move_piece] No piece on {from}"))?;

        miette::ensure!(
            self.mailbox[to.index()].is_none(),
            "[move_piece] Destination square {to} is not empty. Found: {:?}",
            self.mailbox[to.index()]
        );

        let (side, piece) = (info.side.index(), info.piece.index());
        self.all_pieces[side][piece].capture(from.index());
        self.all_pieces[side][piece].set(to.index());
        self.all_sides[side].capture(from.index());
        self.all_sides[side].set(to.index());

        self.mailbox[from.index()] = None;
        self.mailbox[to.index()] = Some(info);

        Ok(())
    }
}

/// Castling rights are stored in the low nibble of a [`u8`]:
/// ```text
/// Bit: 3 2 1 0
///      q k Q K
/// ```
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Clone, Copy, Default)]
#[repr(transparent)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NO_CASTLING: u8 = 0;
    /// White King side castling
    pub const WHITE_00: u8 = 0b0001;
    /// White Queen side castling
    pub const WHITE_000: u8 = 0b0010;
    /// Black King side castling
    pub const BLACK_00: u8 = 0b0100;
    /// Black Queen side castling
    pub const BLACK_000: u8 = 0b1000;

    pub const WHITE_CASTLING: Self = Self(Self::WHITE_00 | Self::WHITE_000);
    pub const BLACK_CASTLING: Self = Self(Self::BLACK_00 | Self::BLACK_000);
    pub const ANY_CASTLING: Self = Self(Self::WHITE_CASTLING.0 | Self::BLACK_CASTLING.0);

    #[inline(always)]
    pub const fn all() -> Self {
        Self::ANY_CASTLING
    }

    #[inline(always)]
    pub const fn empty() -> Self {
        Self(Self::NO_CASTLING)
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == Self::NO_CASTLING
    }

    #[inline(always)]
    pub const fn allows(&self, rights: u8) -> bool {
        self.0 & rights != Self::NO_CASTLING
    }

    #[inline(always)]
    pub const fn can_castle(&self, side: Side, kingside: bool) -> bool {
        match (side, kingside) {
            (Side::White, true) => self.allows(Self::WHITE_00),
            (Side::White, false) => self.allows(Self::WHITE_000),
            (Side::Black, true) => self.allows(Self::BLACK_00),
            (Side::Black, false) => self.allows(Self::BLACK_000),
        }
    }

    /// Whether `side` keeps at least one castling right
    #[inline(always)]
    pub const fn has_rights(&self, side: Side) -> bool {
        match side {
            Side::White => self.allows(Self::WHITE_CASTLING.0),
            Side::Black => self.allows(Self::BLACK_CASTLING.0),
        }
    }

    #[inline(always)]
    pub const fn remove_right(&mut self, rights: u8) {
        self.0 &= !rights
    }

    /// Rights lost when a piece leaves or lands on `square`.
    #[inline(always)]
    pub const fn rights_touched_by(square: usize) -> u8 {
        match square {
            0 => Self::WHITE_000,
            4 => Self::WHITE_CASTLING.0,
            7 => Self::WHITE_00,
            56 => Self::BLACK_000,
            60 => Self::BLACK_CASTLING.0,
            63 => Self::BLACK_00,
            _ => Self::NO_CASTLING,
        }
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (flag, c) in [
            (Self::WHITE_00, 'K'),
            (Self::WHITE_000, 'Q'),
            (Self::BLACK_00, 'k'),
            (Self::BLACK_000, 'q'),
        ] {
            if self.allows(flag) {
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

/// Represents a single square on the board.
/// # Representation
/// ```text
///  A8, B8, C8, D8, E8, F8, G8, H8,  <- bits 56..63
///  ...
///  A1, B1, C1, D1, E1, F1, G1, H1,  <- bits 0..7
///```
#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct Square(usize);

impl Square {
    /// Returns a Square from a given index. Will return None if index is out of bounds
    #[inline(always)]
    pub const fn new(index: usize) -> Option<Self> {
        if index < 64 {
            return Some(Self(index));
        }
        None
    }

    /// Returns a Square from a 0-based file and rank.
    #[inline(always)]
    pub const fn from_coords(file: usize, rank: usize) -> Option<Self> {
        if file < 8 && rank < 8 {
            return Some(Square(rank * 8 + file));
        }
        None
    }

    /// 0-based rank
    #[inline(always)]
    pub const fn row(&self) -> usize {
        self.0 / 8
    }

    /// 0-based file
    #[inline(always)]
    pub const fn col(&self) -> usize {
        self.0 % 8
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Same square seen from the other side of the board (a1 <-> a8).
    #[inline(always)]
    pub const fn flip_rank(&self) -> Self {
        Self(self.0 ^ 56)
    }

    #[inline(always)]
    pub const fn is_light(&self) -> bool {
        LIGHT_SQUARES & (1 << self.0) != 0
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value.0
    }
}

impl TryFrom<usize> for Square {
    type Error = miette::Report;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Square::new(value).with_context(|| format!("Square index {value} is off the board"))
    }
}

impl FromStr for Square {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        miette::ensure!(
            bytes.len() == 2,
            "Square needs 1 Letter and 1 Number to construct, got '{s}'"
        );
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        miette::ensure!(
            (b'a'..=b'h').contains(&file),
            "Invalid file '{}' in square '{s}'",
            file as char
        );
        miette::ensure!(
            (b'1'..=b'8').contains(&rank),
            "Invalid rank '{}' in square '{s}'",
            rank as char
        );
        Ok(Self(((rank - b'1') * 8 + (file - b'a')) as usize))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (self.0 % 8) as u8 + b'A';
        let rank = (self.0 / 8) as u8 + b'1';
        write!(f, "{}{}", file as char, rank as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_bitboard() {
        let out = "0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 1 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0
";
        // e4
        let b = BitBoard(268_435_456);
        assert_eq!(out, b.print_bitboard())
    }

    #[test]
    fn test_display_square() {
        assert_eq!(format!("{}", Square(0)), "A1");
        assert_eq!(format!("{}", Square(7)), "H1");
        assert_eq!(format!("{}", Square(11)), "D2");
        assert_eq!(format!("{}", Square(28)), "E4");
        assert_eq!(format!("{}", Square(56)), "A8");
        assert_eq!(format!("{}", Square(63)), "H8");
    }

    #[test]
    fn test_square_from_str() {
        assert_eq!(Square::from_str("e4").unwrap(), Square(28));
        assert_eq!(Square::from_str("H8").unwrap(), Square(63));
        assert!(Square::from_str("i1").is_err());
        assert!(Square::from_str("a9").is_err());
        assert!(Square::from_str("e").is_err());
    }

    #[test]
    fn test_square_colours() {
        assert!(!Square::from_str("a1").unwrap().is_light());
        assert!(Square::from_str("h1").unwrap().is_light());
        assert!(Square::from_str("d1").unwrap().is_light());
        assert!(!Square::from_str("d8").unwrap().is_light());
    }

    #[test]
    fn test_bitboard_iter_and_pop() {
        let mut bb = BitBoard(0b1010_0001);
        assert_eq!(bb.iter_bits().collect::<Vec<_>>(), vec![0, 5, 7]);
        assert_eq!(bb.pop_lsb(), Some(0));
        assert_eq!(bb.msb(), Some(7));
        assert_eq!(bb.pop_count(), 2);
    }

    #[test]
    fn test_board_state_set_and_move() {
        let mut state = BoardState::default();
        let e2 = Square::from_str("e2").unwrap();
        let e4 = Square::from_str("e4").unwrap();
        state.set(Side::White, Piece::Pawn, e2).unwrap();
        assert!(state.set(Side::Black, Piece::Pawn, e2).is_err());

        state.move_piece(e2, e4).unwrap();
        assert_eq!(state.get_piece_at(e4), Some((Piece::Pawn, Side::White)));
        assert!(state.get_piece_at(e2).is_none());
        assert!(state.get_side_bb(Side::White).contains_square(e4.index()));

        let removed = state.remove_piece(e4).unwrap();
        assert_eq!(removed, PieceInfo::new(Piece::Pawn, Side::White));
        assert!(state.get_occupied_bb().is_empty());
    }

    #[test]
    fn test_castling_rights_display() {
        assert_eq!(CastlingRights::all().to_string(), "KQkq");
        assert_eq!(CastlingRights::empty().to_string(), "-");
        let mut rights = CastlingRights::all();
        rights.remove_right(CastlingRights::rights_touched_by(4));
        assert_eq!(rights.to_string(), "kq");
        assert!(!rights.has_rights(Side::White));
        assert!(rights.has_rights(Side::Black));
    }
}
