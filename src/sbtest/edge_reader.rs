use std::io::{BufRead, ErrorKind, Lines};

use super::graph::*;

pub type Result<T> = std::io::Result<T>;

/// Iterates over the edges of an `sbtest` input file. Blank lines are skipped;
/// every other line must hold exactly two non-negative integers.
pub struct EdgeReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> EdgeReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for EdgeReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_edge_line().transpose()
    }
}

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr, $line : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line {} when parsing {}.", $line, $name)
        );

        match next.unwrap_or_default().parse() {
            Ok(x) => x,
            Err(_) => {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Invalid value in line {}. Cannot parse {}.", $line, $name),
                ))
            }
        }
    }};
}

impl<R: BufRead> EdgeReader<R> {
    fn next_non_empty_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            self.line_number += 1;
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_edge_line(&mut self) -> Result<Option<Edge>> {
        let Some(line) = self.next_non_empty_line()? else {
            return Ok(None);
        };

        let mut parts = line.split_whitespace();

        let a = parse_next_value!(parts, "A-side node", self.line_number);
        let b = parse_next_value!(parts, "B-side node", self.line_number);

        raise_error_unless!(
            parts.next().is_none(),
            ErrorKind::InvalidData,
            format!("Expected end of line {} after two nodes", self.line_number)
        );

        Ok(Some(Edge(a, b)))
    }
}
