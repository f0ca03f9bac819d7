//! Two-column dataset ingest.
//!
//! This module turns delimited text (CSV, TSV, a pasted spreadsheet range)
//! into a `Dataset`:
//!
//! - **Strict shape**: every row must have exactly two columns, x then y
//! - **Optional header**: a first row whose cells are not both numbers is
//!   taken as column names
//! - **Row order preserved**: points keep the order of the input rows
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;

use crate::domain::{Dataset, DatasetStats, Point};
use crate::error::{AppError, EXIT_INPUT, EXIT_VALIDATION};

/// Ingest output: points in row order, optional column names and stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub header: Option<(String, String)>,
    pub stats: DatasetStats,
}

/// Load a dataset from `path`, or from stdin when `path` is `None` or `-`.
pub fn load_dataset(path: Option<&Path>, delimiter: u8) -> Result<IngestedData, AppError> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open input '{}': {e}", p.display())))?;
            debug!("reading dataset from {}", p.display());
            parse_dataset(file, delimiter)
        }
        _ => {
            debug!("reading dataset from stdin");
            parse_dataset(std::io::stdin().lock(), delimiter)
        }
    }
}

/// Parse delimited two-column text.
///
/// Lines starting with `#` are comments. Blank lines are skipped.
pub fn parse_dataset<R: Read>(reader: R, delimiter: u8) -> Result<IngestedData, AppError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .delimiter(delimiter)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut header = None;

    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read input: {e}")))?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 1);

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != 2 {
            return Err(AppError::new(
                EXIT_INPUT,
                format!(
                    "Error: line {line}: expected two columns (x and y values), found {}.",
                    record.len()
                ),
            ));
        }

        match parse_point(&record) {
            Some(p) => points.push(p),
            None if points.is_empty() && header.is_none() => {
                header = Some((record[0].to_string(), record[1].to_string()));
            }
            None => {
                return Err(AppError::new(
                    EXIT_INPUT,
                    format!(
                        "Error: line {line}: '{}', '{}' is not a pair of numbers.",
                        &record[0], &record[1]
                    ),
                ));
            }
        }
    }

    if points.len() < 2 {
        return Err(AppError::new(
            EXIT_VALIDATION,
            "Error: at least two rows containing coordinates for points are required.",
        ));
    }

    let dataset = Dataset::new(points);
    let stats = dataset
        .stats()
        .ok_or_else(|| AppError::new(EXIT_VALIDATION, "Error: input contains non-finite values."))?;

    Ok(IngestedData {
        dataset,
        header,
        stats,
    })
}

fn parse_point(record: &StringRecord) -> Option<Point> {
    let x = record.get(0)?.parse::<f64>().ok()?;
    let y = record.get(1)?.parse::<f64>().ok()?;
    Some(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order_with_header() {
        let input = "x,y\n3,9\n1, 1\n# comment\n2,4\n";
        let data = parse_dataset(input.as_bytes(), b',').unwrap();
        assert_eq!(data.header, Some(("x".to_string(), "y".to_string())));
        assert_eq!(
            data.dataset.points(),
            &[Point::new(3.0, 9.0), Point::new(1.0, 1.0), Point::new(2.0, 4.0)]
        );
        assert_eq!(data.stats.n_points, 3);
        assert_eq!((data.stats.x_min, data.stats.x_max), (1.0, 3.0));
    }

    #[test]
    fn tab_separated_without_header() {
        let input = "0\t1.5\n1\t-2e3\n";
        let data = parse_dataset(input.as_bytes(), b'\t').unwrap();
        assert!(data.header.is_none());
        assert_eq!(data.dataset.points()[1], Point::new(1.0, -2000.0));
    }

    #[test]
    fn wrong_column_count_names_the_line() {
        let err = parse_dataset("1,2\n3,4,5\n".as_bytes(), b',').unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.to_string().contains("line 2"), "{err}");
        assert!(err.to_string().contains("found 3"), "{err}");
    }

    #[test]
    fn non_numeric_row_after_data_is_an_error() {
        let err = parse_dataset("1,2\nthree,4\n".as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("not a pair of numbers"), "{err}");
    }

    #[test]
    fn fewer_than_two_points_is_rejected() {
        let err = parse_dataset("x,y\n1,2\n".as_bytes(), b',').unwrap_err();
        assert_eq!(err.exit_code(), EXIT_VALIDATION);
    }
}
