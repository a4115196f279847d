//! Temporal edge sources: edge-list parsing and the normalization steps that
//! run before a [`crate::StreamGraph`] is built.
//!
//! - [`read_edge_list`]: delimited text into labeled records
//! - [`reindex_nodes`]: dense node ids in `[0, |V|)`
//! - [`force_undirected`]: add the mirrored `(v, u, t)` of every edge
//! - [`train_test_split`]: chronological split at a time quantile

use crate::edge::{TemporalEdge, Timestamp};
use crate::error::{Error, Result};
use crate::numeric::quantile_position;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;
use tracing::debug;

/// Field separator of an edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Spaces; runs of spaces count as one separator.
    #[default]
    Whitespace,
    /// A single ASCII byte such as `,` or `\t`.
    Char(char),
}

impl Delimiter {
    fn as_byte(self) -> Result<u8> {
        match self {
            Delimiter::Whitespace => Ok(b' '),
            Delimiter::Char(c) if c.is_ascii() => Ok(c as u8),
            Delimiter::Char(c) => Err(Error::InvalidDelimiter(c)),
        }
    }
}

/// Position of the time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnOrder {
    /// `src dst t` (network-repository `.edges` files).
    #[default]
    SourceDestinationTime,
    /// `t src dst` (SocioPatterns `tij` files).
    TimeSourceDestination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeListFormat {
    pub delimiter: Delimiter,
    pub columns: ColumnOrder,
}

/// An edge before reindexing, with node labels as they appear in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledEdge<T> {
    pub source: String,
    pub destination: String,
    pub time: T,
}

/// Parse a headerless edge list.
///
/// Blank lines and lines starting with `#` or `%` are skipped; columns past the
/// third are ignored.
pub fn read_edge_list<R, T>(reader: R, format: EdgeListFormat) -> Result<Vec<LabeledEdge<T>>>
where
    R: Read,
    T: Timestamp + FromStr,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(format.delimiter.as_byte()?)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut edges = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line() as usize);

        let fields: Vec<&str> = match format.delimiter {
            Delimiter::Whitespace => record.iter().filter(|f| !f.is_empty()).collect(),
            Delimiter::Char(_) => record.iter().collect(),
        };
        if fields.is_empty() || fields[0].starts_with('%') {
            continue;
        }
        if fields.len() < 3 {
            return Err(Error::Parse {
                line,
                message: format!("expected 3 fields, found {}", fields.len()),
            });
        }

        let (src, dst, t) = match format.columns {
            ColumnOrder::SourceDestinationTime => (fields[0], fields[1], fields[2]),
            ColumnOrder::TimeSourceDestination => (fields[1], fields[2], fields[0]),
        };
        if src.is_empty() || dst.is_empty() {
            return Err(Error::Parse { line, message: "empty node label".to_string() });
        }
        let time = t.parse::<T>().map_err(|_| Error::Parse {
            line,
            message: format!("invalid time {t:?}"),
        })?;

        edges.push(LabeledEdge { source: src.to_string(), destination: dst.to_string(), time });
    }
    debug!(edges = edges.len(), "read edge list");
    Ok(edges)
}

fn csv_error(err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        _ => Error::Parse { line, message },
    }
}

/// Map node labels to dense ids in order of first appearance (source before
/// destination). Returns the edges and the id -> label table.
pub fn reindex_nodes<T: Timestamp>(raw: &[LabeledEdge<T>]) -> (Vec<TemporalEdge<T>>, Vec<String>) {
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();
    let edges = raw
        .iter()
        .map(|e| {
            let u = intern(&mut ids, &mut labels, &e.source);
            let v = intern(&mut ids, &mut labels, &e.destination);
            TemporalEdge::new(u, v, e.time)
        })
        .collect();
    (edges, labels)
}

fn intern<'a>(ids: &mut HashMap<&'a str, usize>, labels: &mut Vec<String>, label: &'a str) -> usize {
    if let Some(&id) = ids.get(label) {
        return id;
    }
    let id = labels.len();
    labels.push(label.to_string());
    ids.insert(label, id);
    id
}

/// Append the mirrored edge of every edge, then sort by `(time, source,
/// destination)`.
pub fn force_undirected<T: Timestamp>(mut edges: Vec<TemporalEdge<T>>) -> Vec<TemporalEdge<T>> {
    let mirrored: Vec<TemporalEdge<T>> = edges.iter().map(TemporalEdge::reversed).collect();
    edges.extend(mirrored);
    edges.sort_by(|a, b| {
        a.time
            .partial_cmp(&b.time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.destination.cmp(&b.destination))
    });
    edges
}

/// Split chronologically: the cutoff is the `1 - test_fraction` quantile of the
/// distinct edge times; edges at or before it train, later edges test.
pub fn train_test_split<T: Timestamp>(
    edges: &[TemporalEdge<T>],
    test_fraction: f64,
) -> Result<(Vec<TemporalEdge<T>>, Vec<TemporalEdge<T>>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidTestFraction(test_fraction));
    }

    let mut times: Vec<T> = edges.iter().map(|e| e.time).collect();
    times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    times.dedup();
    let Some((lo, _)) = quantile_position(times.len(), 1.0 - test_fraction) else {
        return Ok((Vec::new(), Vec::new()));
    };
    // The interpolated cutoff lies in [times[lo], times[lo + 1]) and no distinct
    // time falls strictly inside, so comparing against times[lo] is exact.
    let cutoff = times[lo];

    let (train, test): (Vec<_>, Vec<_>) = edges.iter().copied().partition(|e| e.time <= cutoff);
    debug!(cutoff = %cutoff, train = train.len(), test = test.len(), "split temporal edges");
    Ok((train, test))
}
