//! Text formats a grid travels in.
//!
//! * judge text: `"H W\n"` followed by `H` rows of `W` characters, the way
//!   competitive programming judges present grid input;
//! * compact encoding: the row-major cells base64-encoded with the URL-safe
//!   substitutions `+` → `-` and `/` → `_`;
//! * share query: `h=<H>&w=<W>&data=<compact>`, the query string of a
//!   shareable link.

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{GridError, ParseError, Result};
use crate::grid::{check_dimensions, parse_dimensions, Grid};

lazy_static! {
    static ref HEADER_REGEX: Regex = Regex::new(r"^([0-9]+) +([0-9]+)$").unwrap();
}

// Decoding accepts data with or without `=` padding.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub fn to_judge_text(grid: &Grid) -> String {
    let mut text = format!("{} {}\n", grid.height(), grid.width());
    for line in grid.lines() {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

pub fn from_judge_text(text: &str) -> Result<Grid> {
    let trimmed = text.trim();
    let mut lines = trimmed.lines();
    let Some(header) = lines.next().filter(|_| !trimmed.is_empty()) else {
        return Err(ParseError::Empty.into());
    };
    let (height, width) = parse_header(header.trim_end())?;

    let rows: Vec<&str> = lines.filter(|line| !line.is_empty()).collect();
    if rows.len() != height {
        return Err(ParseError::RowCountMismatch {
            expected: height,
            found: rows.len(),
        }
        .into());
    }

    let mut cells = Vec::with_capacity(height);
    for (i, row) in rows.iter().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        if chars.len() != width {
            return Err(ParseError::RowWidthMismatch {
                row: i + 1,
                expected: width,
                found: chars.len(),
            }
            .into());
        }
        cells.push(chars);
    }
    Grid::from_rows(cells)
}

fn parse_header(line: &str) -> std::result::Result<(usize, usize), ParseError> {
    let invalid = || ParseError::InvalidHeader(line.to_string());
    let captures = HEADER_REGEX.captures(line).ok_or_else(invalid)?;
    let height = captures[1].parse::<i32>().map_err(|_| invalid())?;
    let width = captures[2].parse::<i32>().map_err(|_| invalid())?;
    check_dimensions(height, width).map_err(|_| invalid())
}

pub fn encode_compact(grid: &Grid) -> String {
    STANDARD
        .encode(grid.flatten().as_bytes())
        .replace('+', "-")
        .replace('/', "_")
}

/// Decodes `encoded` into a `height` x `width` grid. Characters beyond
/// `height * width` are ignored; fewer is an error.
pub fn decode_compact(height: i32, width: i32, encoded: &str) -> Result<Grid> {
    let (h, w) = check_dimensions(height, width)?;
    let chars = decode_flat(encoded)?;
    let needed = cell_count(h, w)?;
    if chars.len() < needed {
        return Err(GridError::Decode(format!(
            "a {}x{} grid needs {} characters but the data holds only {}",
            h,
            w,
            needed,
            chars.len()
        )));
    }
    slice_rows(&chars[..needed], w)
}

fn decode_flat(encoded: &str) -> Result<Vec<char>> {
    let standard: String = encoded
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = LENIENT_STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| GridError::Decode(format!("invalid base64 data: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| GridError::Decode(format!("decoded data is not valid UTF-8: {}", e)))?;
    Ok(text.chars().collect())
}

fn cell_count(height: usize, width: usize) -> Result<usize> {
    height
        .checked_mul(width)
        .ok_or_else(|| GridError::InvalidDimension(format!("{} x {} is too large", height, width)))
}

fn slice_rows(chars: &[char], width: usize) -> Result<Grid> {
    Grid::from_rows(chars.chunks(width).map(<[char]>::to_vec).collect())
}

pub fn to_share_query(grid: &Grid) -> String {
    format!(
        "h={}&w={}&data={}",
        grid.height(),
        grid.width(),
        urlencoding::encode(&encode_compact(grid))
    )
}

/// Reads a share query (`h`, `w` and `data` parameters, leading `?`
/// optional). Unlike [`decode_compact`], the data must hold exactly
/// `h * w` characters.
pub fn from_share_query(query: &str) -> Result<Grid> {
    let (mut height, mut width, mut data) = (None, None, None);
    for pair in query.trim().trim_start_matches('?').split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(value)
            .map_err(|e| GridError::Decode(format!("parameter `{}` is not valid UTF-8: {}", key, e)))?
            .into_owned();
        match key {
            "h" => height = Some(value),
            "w" => width = Some(value),
            "data" => data = Some(value),
            _ => {}
        }
    }

    let (Some(height), Some(width), Some(data)) = (height, width, data) else {
        return Err(GridError::Decode(
            "share link needs `h`, `w` and `data` parameters".to_string(),
        ));
    };
    let (height, width) = parse_dimensions(&height, &width)?;
    let (h, w) = check_dimensions(height, width)?;
    let chars = decode_flat(&data)?;
    let needed = cell_count(h, w)?;
    if chars.len() != needed {
        return Err(GridError::Decode(format!(
            "a {}x{} grid needs exactly {} characters but the data holds {}",
            h,
            w,
            needed,
            chars.len()
        )));
    }
    slice_rows(&chars, w)
}
