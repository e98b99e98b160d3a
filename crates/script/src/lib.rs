//! The drawing-script language: one instruction per line, in the form
//!
//! ```text
//! <x> <y> lineto      draw a line to the absolute point (x, y)
//! <dx> <dy> rlineto   draw a line displaced by (dx, dy) from here
//! <phi> <r> rlinerot  turn to heading phi (whole degrees) and draw r units
//! ```
//!
//! Parsing is strict and sequential: the first bad line aborts the whole
//! parse, and the caller gets only the error. A script that fails to parse
//! is never partially executed.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

/// One drawing instruction, as written in a script line.
///
/// Arguments are whole numbers in paper units (degrees for the
/// `rlinerot` angle). `RelLineRot`'s angle names an absolute heading,
/// not an increment; see `scrib-geom` for how headings are tracked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    LineTo { x: i32, y: i32 },
    RelLineTo { dx: i32, dy: i32 },
    RelLineRot { angle_deg: i32, dist: i32 },
}

/// A rejected script. Line numbers are 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The line didn't have exactly three whitespace-separated fields.
    MalformedLine { line: usize },
    /// The third field wasn't one of the known instruction names.
    UnknownCommand { line: usize },
    /// One of the first two fields wasn't an integer.
    InvalidNumber { line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedLine { line }
            | ParseError::UnknownCommand { line }
            | ParseError::InvalidNumber { line } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedLine { line } => {
                write!(f, "wrong number of fields on line {line}")
            }
            ParseError::UnknownCommand { line } => {
                write!(f, "unknown command on line {line}")
            }
            ParseError::InvalidNumber { line } => {
                write!(f, "invalid numeric value on line {line}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Parses a whole script.
///
/// Every line must carry an instruction; blank lines (including a trailing
/// newline at the end of the file) are malformed, not skipped.
pub fn parse(text: &str) -> Result<Vec<Command>, ParseError> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| parse_line(line, i + 1))
        .collect()
}

fn parse_line(text: &str, line: usize) -> Result<Command, ParseError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let &[a, b, name] = fields.as_slice() else {
        return Err(ParseError::MalformedLine { line });
    };

    // The instruction name is checked before the numbers, so a line that is
    // wrong in both ways reports the unknown command.
    let number = |s: &str| s.parse::<i32>().map_err(|_| ParseError::InvalidNumber { line });
    match name {
        "lineto" => Ok(Command::LineTo {
            x: number(a)?,
            y: number(b)?,
        }),
        "rlineto" => Ok(Command::RelLineTo {
            dx: number(a)?,
            dy: number(b)?,
        }),
        "rlinerot" => Ok(Command::RelLineRot {
            angle_deg: number(a)?,
            dist: number(b)?,
        }),
        _ => Err(ParseError::UnknownCommand { line }),
    }
}
