use crate::prelude::*;

/// Builds a [`Board`] from a FEN string. Every field is validated and both
/// sides must have exactly one king.
pub fn parse_fen(fen: &str) -> miette::Result<Board> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    miette::ensure!(
        parts.len() == 6,
        "FEN needs 6 fields, found {} in '{fen}'",
        parts.len()
    );

    let mut board = Board::empty();
    place_pieces(&mut board.positions, parts[0])
        .with_context(|| format!("Placing pieces from '{}'", parts[0]))?;
    board.stm = parse_stm(parts[1])?;
    board.castling_rights = parse_castle(parts[2])?;
    board.enpassant_square = parse_enpassant(parts[3])?;
    board.halfmove_clock = parts[4]
        .parse::<u16>()
        .into_diagnostic()
        .with_context(|| format!("Parsing halfmove clock '{}'", parts[4]))?;
    board.fullmove_counter = parts[5]
        .parse::<u16>()
        .into_diagnostic()
        .with_context(|| format!("Parsing fullmove counter '{}'", parts[5]))?;

    for side in Side::SIDES {
        let kings = board.positions.count(side, Piece::King);
        miette::ensure!(kings == 1, "{side} has {kings} kings, expected exactly one");
    }

    board.recompute_hash();
    Ok(board)
}

fn place_pieces(state: &mut BoardState, placement: &str) -> miette::Result<()> {
    let ranks: Vec<&str> = placement.split('/').collect();
    miette::ensure!(ranks.len() == 8, "Expected 8 ranks, found {}", ranks.len());

    // FEN lists rank 8 first
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                miette::ensure!((1..=8).contains(&skip), "Invalid empty-square count '{c}'");
                file += skip as usize;
                continue;
            }
            let (piece, side) =
                Piece::from_char(c).with_context(|| format!("Invalid piece character '{c}'"))?;
            let square = Square::from_coords(file, rank)
                .with_context(|| format!("Rank {} overflows the board", rank + 1))?;
            state.set(side, piece, square)?;
            file += 1;
        }
        miette::ensure!(
            file == 8,
            "Rank {} describes {file} files instead of 8",
            rank + 1
        );
    }
    Ok(())
}

fn parse_stm(stm: &str) -> miette::Result<Side> {
    match stm {
        "w" => Ok(Side::White),
        "b" => Ok(Side::Black),
        _ => miette::bail!("Invalid side to move '{stm}', expected 'w' or 'b'"),
    }
}

fn parse_castle(castle: &str) -> miette::Result<CastlingRights> {
    if castle == "-" {
        return Ok(CastlingRights::empty());
    }
    let mut res = CastlingRights::NO_CASTLING;
    for c in castle.chars() {
        res |= match c {
            'K' => CastlingRights::WHITE_00,
            'Q' => CastlingRights::WHITE_000,
            'k' => CastlingRights::BLACK_00,
            'q' => CastlingRights::BLACK_000,
            _ => miette::bail!("Unexpected character '{c}' in castling rights '{castle}'"),
        };
    }
    Ok(CastlingRights(res))
}

fn parse_enpassant(enpassant: &str) -> miette::Result<Option<Square>> {
    if enpassant == "-" {
        return Ok(None);
    }
    let square = Square::from_str(enpassant)?;
    miette::ensure!(
        matches!(square.row(), 2 | 5),
        "En passant square {square} must be on rank 3 or 6"
    );
    Ok(Some(square))
}

pub fn to_fen(board: &Board) -> String {
    let stm = match board.stm {
        Side::White => 'w',
        Side::Black => 'b',
    };
    let ep = board
        .enpassant_square
        .map(|sq| sq.to_string().to_ascii_lowercase())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {stm} {} {ep} {} {}",
        board.positions.to_fen_pieces(),
        board.castling_rights,
        board.halfmove_clock,
        board.fullmove_counter
    )
}
