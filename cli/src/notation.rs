use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chess4::{PieceKind, Position, Promotion};
use winnow::Parser;
use winnow::Result as WinnowResult;
use winnow::ascii::digit1;
use winnow::combinator::{opt, preceded, separated_pair};
use winnow::token::one_of;

/// A move as typed by a player: `row,col-row,col`, with `=q`, `=r`, `=b` or
/// `=n` appended when a pawn promotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveNotation {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<Promotion>,
}

impl fmt::Display for MoveNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            let ch: char = PieceKind::from(promotion).into();
            write!(f, "={}", ch.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for MoveNotation {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let ((from_row, from_col), (to_row, to_col), promotion) = parse_move
            .parse(input)
            .map_err(|_| anyhow!("cannot parse move: [{}]", input))?;
        Ok(MoveNotation {
            from: Position::new(from_row, from_col)?,
            to: Position::new(to_row, to_col)?,
            promotion,
        })
    }
}

type RawSquare = (i8, i8);

fn parse_move(input: &mut &str) -> WinnowResult<(RawSquare, RawSquare, Option<Promotion>)> {
    (
        parse_square,
        preceded('-', parse_square),
        opt(preceded('=', parse_promotion)),
    )
        .parse_next(input)
}

fn parse_square(input: &mut &str) -> WinnowResult<RawSquare> {
    separated_pair(
        digit1.try_map(i8::from_str),
        ',',
        digit1.try_map(i8::from_str),
    )
    .parse_next(input)
}

fn parse_promotion(input: &mut &str) -> WinnowResult<Promotion> {
    one_of(['q', 'r', 'b', 'n', 'Q', 'R', 'B', 'N'])
        .verify_map(|ch: char| Promotion::try_from(ch).ok())
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case("13,7-11,7", (13, 7), (11, 7), None ; "double step")]
    #[test_case("2,6-1,6=n", (2, 6), (1, 6), Some(Promotion::Knight) ; "promotion")]
    #[test_case("8,1-10,1", (8, 1), (10, 1), None ; "castle")]
    fn test_parse(input: &str, from: (i8, i8), to: (i8, i8), promotion: Option<Promotion>) -> TestResult {
        let notation = MoveNotation::from_str(input)?;
        assert_eq!(notation.from, Position::new(from.0, from.1)?);
        assert_eq!(notation.to, Position::new(to.0, to.1)?);
        assert_eq!(notation.promotion, promotion);
        assert_eq!(notation.to_string(), input);
        Ok(())
    }

    #[test_case("13,7" ; "missing destination")]
    #[test_case("13,7-11,7=k" ; "king promotion")]
    #[test_case("1,1-2,4" ; "cutout square")]
    #[test_case("a,7-11,7" ; "not a number")]
    fn test_parse_error(input: &str) {
        assert!(MoveNotation::from_str(input).is_err());
    }
}
