use crate::error::ChartError;
use crate::ir::{DataPoint, Dataset, Side};
use csv::StringRecord;
use std::io::Read;

const REQUIRED_COLUMNS: [&str; 4] = ["year", "miles", "gas", "side"];

struct ColumnIndex {
    year: usize,
    miles: usize,
    gas: usize,
    side: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, ChartError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &'static str| -> Result<usize, ChartError> {
            lowered
                .iter()
                .position(|h| h == name)
                .ok_or(ChartError::MissingColumn(name))
        };
        for name in REQUIRED_COLUMNS {
            find(name)?;
        }
        Ok(Self {
            year: find("year")?,
            miles: find("miles")?,
            gas: find("gas")?,
            side: find("side")?,
        })
    }
}

pub fn parse_csv(input: &str) -> Result<Dataset, ChartError> {
    parse_csv_reader(input.as_bytes())
}

pub fn parse_csv_reader<R: Read>(reader: R) -> Result<Dataset, ChartError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(rdr.headers().map_err(read_error)?)?;
    let mut points = Vec::new();

    for record in rdr.records() {
        let record = record.map_err(read_error)?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let year = record.get(columns.year).unwrap_or("").to_string();
        let miles = parse_number(&record, columns.miles, "miles", line)?;
        let gas = parse_number(&record, columns.gas, "gas", line)?;
        let raw_side = record.get(columns.side).unwrap_or("");
        let side = raw_side
            .parse::<Side>()
            .map_err(|_| ChartError::InvalidSide {
                line,
                value: raw_side.to_string(),
            })?;
        points.push(DataPoint {
            year,
            miles,
            gas,
            side,
        });
    }

    if points.is_empty() {
        return Err(ChartError::Empty);
    }
    tracing::debug!(rows = points.len(), "loaded dataset");
    Ok(Dataset::new(points))
}

fn read_error(err: csv::Error) -> ChartError {
    if err.is_io_error() {
        ChartError::Io(err.into())
    } else {
        ChartError::Csv(err)
    }
}

fn parse_number(
    record: &StringRecord,
    index: usize,
    column: &'static str,
    line: u64,
) -> Result<f64, ChartError> {
    let raw = record.get(index).unwrap_or("");
    let value: f64 = raw.parse().map_err(|_| ChartError::InvalidNumber {
        line,
        column,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ChartError::NonFinite { line, column });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreadable;

    impl Read for Unreadable {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn reader_failures_surface_as_io_errors() {
        let err = parse_csv_reader(Unreadable).unwrap_err();
        assert!(matches!(err, ChartError::Io(_)), "got {err:?}");
        assert!(err.to_string().contains("device unplugged"));
    }

    #[test]
    fn parses_rows_in_file_order() {
        let input = "side,year,miles,gas\nleft,1956,3675,2.38\nright,1957,3706,2.40\n";
        let data = parse_csv(input).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.points[0].year, "1956");
        assert_eq!(data.points[0].side, Side::Left);
        assert_eq!(data.points[1].miles, 3706.0);
        assert_eq!(data.points[1].gas, 2.40);
    }

    #[test]
    fn ignores_extra_columns_and_header_case() {
        let input = "Year,Note,Miles,Gas,Side\n2000, x ,1,2,TOP\n";
        let data = parse_csv(input).unwrap();
        assert_eq!(data.points[0].side, Side::Top);
    }

    #[test]
    fn rejects_missing_column() {
        let err = parse_csv("year,miles,gas\n2000,1,2\n").unwrap_err();
        assert!(matches!(err, ChartError::MissingColumn("side")));
    }

    #[test]
    fn rejects_unknown_side() {
        let err = parse_csv("year,miles,gas,side\n2000,1,2,center\n").unwrap_err();
        match err {
            ChartError::InvalidSide { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "center");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = parse_csv("year,miles,gas,side\n2000,lots,2,top\n").unwrap_err();
        assert!(matches!(err, ChartError::InvalidNumber { column: "miles", .. }));
        let err = parse_csv("year,miles,gas,side\n2000,1,NaN,top\n").unwrap_err();
        assert!(matches!(err, ChartError::NonFinite { column: "gas", .. }));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            parse_csv("year,miles,gas,side\n").unwrap_err(),
            ChartError::Empty
        ));
    }
}
