//! Seed token codec.
//!
//! A board layout is packed as a decimal digit string: each mine position as
//! two fixed-width 2-digit fields (`XXYY`), then width (2 digits), height
//! (2 digits) and mine count (4 digits). The whole string is read as one
//! base-10 integer and re-emitted in lowercase base-16, which yields the
//! opaque token. The fixed field widths are what make the round trip safe:
//! leading zeros dropped by the integer conversion are recovered on decode
//! by left-padding back to `4 * mine_count` position digits.

use alloc::collections::BTreeSet;
use alloc::string::String;
use core::fmt::Write;

use num_bigint::BigUint;

use crate::error::{GameError, Result};
use crate::types::{CellCount, Coord, Coord2};

/// Digits taken by the trailing `width / height / mine count` fields.
const TRAILER_DIGITS: usize = 8;

/// Digits taken by one packed mine position.
const POSITION_DIGITS: usize = 4;

pub fn encode(
    mines: &BTreeSet<Coord2>,
    width: Coord,
    height: Coord,
    mine_count: CellCount,
) -> String {
    let mut digits = String::with_capacity(POSITION_DIGITS * mines.len() + TRAILER_DIGITS);
    for &(x, y) in mines {
        write!(digits, "{x:02}{y:02}").expect("writing to a String cannot fail");
    }
    write!(digits, "{width:02}{height:02}{mine_count:04}")
        .expect("writing to a String cannot fail");

    BigUint::parse_bytes(digits.as_bytes(), 10)
        .expect("packed digit string is always valid decimal")
        .to_str_radix(16)
}

pub fn decode(token: &str) -> Result<(BTreeSet<Coord2>, Coord, Coord, CellCount)> {
    let value = BigUint::parse_bytes(token.as_bytes(), 16).ok_or(GameError::InvalidSeed)?;
    let digits = value.to_str_radix(10);

    if digits.len() < TRAILER_DIGITS {
        return Err(GameError::InvalidSeed);
    }
    let (head, trailer) = digits.split_at(digits.len() - TRAILER_DIGITS);

    let width: Coord = parse_field(&trailer[0..2])?;
    let height: Coord = parse_field(&trailer[2..4])?;
    let mine_count: CellCount = parse_field(&trailer[4..8])?;

    let budget = POSITION_DIGITS * usize::from(mine_count);
    if head.len() > budget {
        return Err(GameError::InvalidSeed);
    }

    // Recover the leading zeros the integer round trip dropped.
    let mut padded = String::with_capacity(budget);
    for _ in head.len()..budget {
        padded.push('0');
    }
    padded.push_str(head);

    let mut mines = BTreeSet::new();
    for group in 0..usize::from(mine_count) {
        let chunk = &padded[group * POSITION_DIGITS..(group + 1) * POSITION_DIGITS];
        let x: Coord = parse_field(&chunk[0..2])?;
        let y: Coord = parse_field(&chunk[2..4])?;
        if x >= width || y >= height {
            return Err(GameError::InvalidSeed);
        }
        mines.insert((x, y));
    }

    Ok((mines, width, height, mine_count))
}

fn parse_field<T: core::str::FromStr>(digits: &str) -> Result<T> {
    digits.parse().map_err(|_| GameError::InvalidSeed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn mine_set(coords: &[Coord2]) -> BTreeSet<Coord2> {
        coords.iter().copied().collect()
    }

    #[test]
    fn encode_matches_known_token() {
        // "000009090010" as a base-10 integer is 0x8ab3da.
        let token = encode(&mine_set(&[(0, 0)]), 9, 9, 10);

        assert_eq!(token, "8ab3da");
    }

    #[test]
    fn decode_handles_a_full_size_token() {
        let token = "583e2e3a1230d7fa3415920384ac1395a69aa60944b8344832b18873a8a33f5\
                     1287aeda9beea4e27b7f7b567ea16d041030df76088257ea6db2be8516ee87f\
                     b3d65700ccd28";

        let (mines, width, height, mine_count) = decode(token).unwrap();

        assert_eq!((width, height, mine_count), (16, 16, 40));
        assert_eq!(mines.len(), 40);
        assert!(mines.iter().all(|&(x, y)| x < 16 && y < 16));
    }

    #[test]
    fn round_trip_preserves_layout() {
        let mines = mine_set(&[(0, 3), (12, 5), (29, 17), (7, 0)]);

        let token = encode(&mines, 30, 18, 4);
        let (decoded, width, height, mine_count) = decode(&token).unwrap();

        assert_eq!(decoded, mines);
        assert_eq!((width, height, mine_count), (30, 18, 4));
    }

    #[test]
    fn round_trip_recovers_leading_zero_positions() {
        // (0, 0) sorts first, so the packed digits start with zeros that the
        // integer conversion drops.
        let mines = mine_set(&[(0, 0), (0, 1), (8, 8)]);

        let token = encode(&mines, 9, 9, 3);
        let (decoded, ..) = decode(&token).unwrap();

        assert_eq!(decoded, mines);
    }

    #[test]
    fn decode_rejects_non_hex_tokens() {
        assert_eq!(decode("not-a-seed"), Err(GameError::InvalidSeed));
        assert_eq!(decode(""), Err(GameError::InvalidSeed));
    }

    #[test]
    fn decode_rejects_tokens_with_too_few_digits() {
        // 0x1 -> "1", shorter than the trailer alone.
        assert_eq!(decode("1"), Err(GameError::InvalidSeed));
    }

    #[test]
    fn decode_rejects_out_of_range_positions() {
        let token = encode(&mine_set(&[(20, 20)]), 9, 9, 1);

        assert_eq!(decode(&token), Err(GameError::InvalidSeed));
    }

    #[test]
    fn decode_rejects_overflowing_digit_budget() {
        // Two packed positions but a declared mine count of one.
        let digits = "01020304".to_string() + "0909" + "0001";
        let token = BigUint::parse_bytes(digits.as_bytes(), 10)
            .unwrap()
            .to_str_radix(16);

        assert_eq!(decode(&token), Err(GameError::InvalidSeed));
    }
}
