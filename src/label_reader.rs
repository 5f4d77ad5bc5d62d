//! Readers for edge lists of string labels, as accepted by the `bicliques` binary.

use std::io::{BufRead, Read};

use serde_json::Value;

use crate::error::{Error, Result};

pub type LabelEdge = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputFormat {
    /// One edge per line: two whitespace separated labels; lines starting with
    /// `#` or a lone `c` token are comments
    Text,
    /// An array of two-element arrays of strings or numbers
    Json,
}

pub fn read_label_edges<R: BufRead>(reader: R, format: InputFormat) -> Result<Vec<LabelEdge>> {
    match format {
        InputFormat::Text => read_text(reader),
        InputFormat::Json => read_json(reader),
    }
}

fn read_text<R: BufRead>(reader: R) -> Result<Vec<LabelEdge>> {
    let mut edges = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::InvalidInput(format!("line {}: {e}", i + 1)))?;
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) => edges.push((a.to_string(), b.to_string())),
            _ => {
                return Err(Error::InvalidInput(format!(
                    "line {}: expected exactly two labels, got '{line}'",
                    i + 1
                )))
            }
        }
    }

    Ok(edges)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.split_whitespace().next() == Some("c")
}

fn read_json<R: Read>(reader: R) -> Result<Vec<LabelEdge>> {
    let records: Vec<Value> = serde_json::from_reader(reader)
        .map_err(|e| Error::InvalidInput(format!("Expected a JSON array of edges: {e}")))?;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| -> Result<LabelEdge> {
            match record.as_array().map(Vec::as_slice) {
                Some([a, b]) => Ok((json_label(a, i)?, json_label(b, i)?)),
                _ => Err(Error::InvalidInput(format!(
                    "record {i} is not a pair: {record}"
                ))),
            }
        })
        .collect()
}

fn json_label(value: &Value, record: usize) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::InvalidInput(format!(
            "record {record}: label must be a string or a number, got {value}"
        ))),
    }
}
