//! Low-level nom parser functions for cell annotation values.
//!
//! This module provides composable parser functions for the values carried by
//! `CWITH` annotations: lengths, borders, alignments, spans and indices.

use crate::align::{HAlign, VAlign};
use crate::border::{BorderSpec, LineKind};
use crate::length::{Length, Unit};
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, digit1, space0};
use nom::combinator::{all_consuming, map, map_res, opt, recognize, value};
use nom::sequence::{delimited, pair};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Helper Parsers ---

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(space0, inner, space0)
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize((digit1, opt((char('.'), digit1)))),
                recognize((char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

// --- Unit & Length Parsers ---

fn parse_unit(input: &str) -> IResult<&str, Unit> {
    alt((
        value(Unit::Pt, tag_no_case("pt")),
        value(Unit::Px, tag_no_case("px")),
        value(Unit::In, tag_no_case("in")),
        value(Unit::Cm, tag_no_case("cm")),
        value(Unit::Mm, tag_no_case("mm")),
        value(Unit::Ln, tag_no_case("ln")),
        value(Unit::Em, tag_no_case("em")),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "1ln", "0.5pt", "2mm").
/// A bare number is taken as points.
pub fn parse_length(input: &str) -> IResult<&str, Length> {
    map((parse_f32, opt(parse_unit)), |(value, unit)| {
        Length::new(value, unit.unwrap_or(Unit::Pt))
    })
    .parse(input)
}

// --- Border Parsers ---

/// Parses a line kind keyword.
pub fn parse_line_kind(input: &str) -> IResult<&str, LineKind> {
    alt((
        value(LineKind::Solid, tag_no_case("solid")),
        value(LineKind::Dashed, tag_no_case("dashed")),
        value(LineKind::Dotted, tag_no_case("dotted")),
        value(LineKind::None, tag_no_case("none")),
    ))
    .parse(input)
}

/// Parses a border value: `none`, or a width optionally followed by a line kind
/// (e.g., "1ln", "0.5pt dashed").
pub fn parse_border(input: &str) -> IResult<&str, BorderSpec> {
    alt((
        map(ws(tag_no_case("none")), |_| BorderSpec::none()),
        map(
            (ws(parse_length), opt(parse_line_kind)),
            |(width, kind)| {
                let kind = if width.value == 0.0 {
                    LineKind::None
                } else {
                    kind.unwrap_or(LineKind::Solid)
                };
                BorderSpec { width, kind }
            },
        ),
    ))
    .parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Parser<&'a str, Output = T, Error = nom::error::Error<&'a str>>,
{
    match all_consuming(ws(parser)).parse(input) {
        Ok((_, result)) => Ok(result),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

// --- High-level Parse Functions ---

/// Parses a horizontal alignment, accepting both the short (`l`, `c`, `r`) and
/// long spellings.
pub fn parse_halign(s: &str) -> Result<HAlign, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "l" | "left" => Ok(HAlign::Left),
        "c" | "center" => Ok(HAlign::Center),
        "r" | "right" => Ok(HAlign::Right),
        _ => Err(StyleParseError::InvalidValue {
            property: "cell-halign".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parses a vertical alignment (`t`, `c`, `b` or the long spellings).
pub fn parse_valign(s: &str) -> Result<VAlign, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "t" | "top" => Ok(VAlign::Top),
        "c" | "center" => Ok(VAlign::Center),
        "b" | "bottom" => Ok(VAlign::Bottom),
        _ => Err(StyleParseError::InvalidValue {
            property: "cell-valign".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parses a positive span count.
pub fn parse_span(property: &str, s: &str) -> Result<usize, StyleParseError> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(StyleParseError::InvalidValue {
            property: property.to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parses a 1-based annotation index. Negative values count from the end,
/// `-1` being the last row or column. Zero is rejected.
pub fn parse_index(s: &str) -> Result<i64, StyleParseError> {
    match s.trim().parse::<i64>() {
        Ok(0) | Err(_) => Err(StyleParseError::InvalidValue {
            property: "index".to_string(),
            value: s.to_string(),
        }),
        Ok(n) => Ok(n),
    }
}
