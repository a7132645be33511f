//! Persisted list formats shared by the build and analysis steps.
//!
//! # Formats
//!
//! - `node.list`: one reaction id per line.
//! - `edge.list`: one directed edge per line, `source<TAB>target`.
//! - measure lists (`indegree.list`, …): a `REACTION<TAB><MEASURE>` header
//!   followed by `id<TAB>value` rows.
//!
//! Ids are opaque: blank lines are ignored on read but there is no comment
//! syntax, so `#R1` is an ordinary id. A trailing `\r` is stripped so files
//! edited on Windows still load.

use std::fmt::Display;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ListError;

pub const NODE_LIST: &str = "node.list";
pub const EDGE_LIST: &str = "edge.list";
pub const STATS_FILE: &str = "stats.txt";

/// Column header for the node id in every measure file.
pub const ID_HEADER: &str = "REACTION";

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ListError + '_ {
    move |source| ListError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn content_lines(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Read a node list, preserving file order.
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be read.
pub fn read_node_list(path: &Path) -> Result<Vec<String>, ListError> {
    let raw = fs::read_to_string(path).map_err(io_err(path))?;
    Ok(content_lines(&raw)
        .map(|(_, line)| line.trim().to_string())
        .collect())
}

/// Read a tab-delimited edge list, preserving file order.
///
/// # Errors
///
/// Returns [`ListError::Io`] on read failure and [`ListError::MalformedEdge`]
/// for any line that is not exactly two non-empty tab-separated fields.
pub fn read_edge_list(path: &Path) -> Result<Vec<(String, String)>, ListError> {
    let raw = fs::read_to_string(path).map_err(io_err(path))?;
    let mut edges = Vec::new();

    for (line_no, line) in content_lines(&raw) {
        let mut fields = line.split('\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(source), Some(target), None)
                if !source.trim().is_empty() && !target.trim().is_empty() =>
            {
                edges.push((source.trim().to_string(), target.trim().to_string()));
            }
            _ => {
                return Err(ListError::MalformedEdge {
                    path: path.to_path_buf(),
                    line: line_no,
                    content: line.to_string(),
                });
            }
        }
    }

    Ok(edges)
}

/// Write one id per line.
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be written.
pub fn write_node_list<'a, I>(path: &Path, nodes: I) -> Result<(), ListError>
where
    I: IntoIterator<Item = &'a str>,
{
    let file = fs::File::create(path).map_err(io_err(path))?;
    let mut w = BufWriter::new(file);
    for node in nodes {
        writeln!(w, "{node}").map_err(io_err(path))?;
    }
    w.flush().map_err(io_err(path))
}

/// Write `source<TAB>target` lines.
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be written.
pub fn write_edge_list<'a, I>(path: &Path, edges: I) -> Result<(), ListError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let file = fs::File::create(path).map_err(io_err(path))?;
    let mut w = BufWriter::new(file);
    for (source, target) in edges {
        writeln!(w, "{source}\t{target}").map_err(io_err(path))?;
    }
    w.flush().map_err(io_err(path))
}

/// Write a two-column table with a header row.
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be written.
pub fn write_table<I, K, V>(path: &Path, header: (&str, &str), rows: I) -> Result<(), ListError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    let file = fs::File::create(path).map_err(io_err(path))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "{}\t{}", header.0, header.1).map_err(io_err(path))?;
    for (key, value) in rows {
        writeln!(w, "{key}\t{value}").map_err(io_err(path))?;
    }
    w.flush().map_err(io_err(path))
}

/// Write a measure file: `REACTION<TAB><measure>` header plus one row per node.
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be written.
pub fn write_measure<I, K, V>(path: &Path, measure: &str, rows: I) -> Result<(), ListError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    write_table(path, (ID_HEADER, measure), rows)
}

/// Write free-form text (reports).
///
/// # Errors
///
/// Returns [`ListError::Io`] if the file cannot be written.
pub fn write_text(path: &Path, text: &str) -> Result<(), ListError> {
    fs::write(path, text).map_err(io_err(path))
}
