//! Syntax errors and the list type used to collect them.

use std::error::Error;
use std::fmt::Display;

use colored::Colorize;

use crate::token::Location;

/// A single scan or parse diagnostic, anchored to a resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub location: Location,
    pub message: String,
}

impl SyntaxError {
    pub fn new(location: Location, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            location,
            message: message.into(),
        }
    }

    /// Render a colored source window around the error, for terminal output.
    ///
    /// `src` must be the source text of the file the error points into.
    pub fn render(&self, src: &str) -> String {
        let line = self.location.line;
        if line == 0 {
            return self.to_string();
        }

        let lines = src.lines().collect::<Vec<_>>();
        let line_str = lines.get(line - 1).copied().unwrap_or("");
        let prev_line = if line > 1 {
            lines.get(line - 2).copied().unwrap_or("")
        } else {
            ""
        };

        let margin = format!("{line}").len();
        let margin_fill = " ".repeat(margin);

        let column = self.location.column.min(line_str.len() + 1);
        let (left, right) = line_str.split_at(column - 1);
        let marked = format!("{left}{}", right.red());

        let caret_fill = " ".repeat(column.saturating_sub(1));
        format!(
            "{margin_fill} |\n{margin_fill} |{prev_line}\n{line} |{marked}\n{margin_fill} |{caret_fill}^--- {}\n{margin_fill} |",
            self.message
        )
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_valid() {
            write!(f, "{}: {}", self.location, self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl Error for SyntaxError {}

/// All diagnostics collected over one translation, in the order reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList {
    errors: Vec<SyntaxError>,
}

impl ErrorList {
    pub fn new() -> ErrorList {
        ErrorList::default()
    }

    pub fn add(&mut self, location: Location, message: impl Into<String>) {
        self.errors.push(SyntaxError::new(location, message));
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxError> {
        self.errors.iter()
    }

    /// Sort by (filename, line, column), keeping insertion order for ties.
    pub fn sort(&mut self) {
        self.errors.sort_by(|a, b| {
            (&a.location.filename, a.location.line, a.location.column).cmp(&(
                &b.location.filename,
                b.location.line,
                b.location.column,
            ))
        });
    }

    /// Keep only the first error per line. Assumes the list is sorted.
    pub fn remove_multiples(&mut self) {
        self.errors
            .dedup_by(|b, a| a.location.filename == b.location.filename && a.location.line == b.location.line);
    }
}

impl IntoIterator for ErrorList {
    type Item = SyntaxError;
    type IntoIter = std::vec::IntoIter<SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a SyntaxError;
    type IntoIter = std::slice::Iter<'a, SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl Display for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.len() {
            0 => f.write_str("no errors"),
            1 => write!(f, "{}", self.errors[0]),
            n => write!(f, "{} (and {} more errors)", self.errors[0], n - 1),
        }
    }
}

impl Error for ErrorList {}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: usize, column: usize) -> Location {
        Location {
            filename: "t.igo".into(),
            line,
            column,
            offset: 0,
        }
    }

    #[test]
    fn sorted_by_position() {
        let mut list = ErrorList::new();
        list.add(loc(3, 1), "third");
        list.add(loc(1, 9), "second");
        list.add(loc(1, 2), "first");
        list.sort();

        let messages = list.iter().map(|e| e.message.as_str()).collect::<Vec<_>>();
        assert_eq!(messages, ["first", "second", "third"]);
    }

    #[test]
    fn one_error_per_line() {
        let mut list = ErrorList::new();
        list.add(loc(1, 2), "keep");
        list.add(loc(1, 7), "drop");
        list.add(loc(2, 1), "keep too");
        list.sort();
        list.remove_multiples();

        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().next().unwrap().message, "keep");
    }

    #[test]
    fn display_counts_remaining() {
        let mut list = ErrorList::new();
        list.add(loc(1, 1), "boom");
        list.add(loc(2, 1), "bang");
        assert_eq!(list.to_string(), "t.igo:1:1: boom (and 1 more errors)");
    }
}
