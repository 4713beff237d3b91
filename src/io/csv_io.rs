use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use polars::io::csv::read::NullValues;
use polars::prelude::*;

use crate::error::DashboardError;
use crate::models::{Table, NULL_MARKERS};

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Make header names unique: blanks become `Unnamed: i`, repeats get `.1`, `.2`, ...
fn unique_headers(headers: &csv::StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());

    for (i, raw) in headers.iter().enumerate() {
        let base = if raw.is_empty() {
            format!("Unnamed: {i}")
        } else {
            raw.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}

/// Validate the record structure and rewrite it as clean CSV.
///
/// Cells are trimmed, headers made unique and short rows padded. Rows with
/// more fields than the header and a quoted field left open at end of input
/// are rejected.
fn normalize(data: &[u8]) -> Result<Vec<u8>, DashboardError> {
    let mut rdr = reader_builder().from_reader(data);
    let header_record = rdr.headers()?.clone();
    let headers = unique_headers(&header_record);
    if headers.is_empty() {
        return Err(DashboardError::ParseError(
            "No columns to parse from file".to_string(),
        ));
    }

    let width = headers.len();
    let mut wtr = csv::Writer::from_writer(Vec::with_capacity(data.len()));
    wtr.write_record(&headers)?;

    let mut last = header_record.position().map(|p| (p.byte(), p.line()));
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() > width {
            return Err(DashboardError::ParseError(format!(
                "Expected {width} fields in line {line}, saw {}",
                record.len()
            )));
        }
        last = record.position().map(|p| (p.byte(), p.line()));
        wtr.write_record((0..width).map(|i| record.get(i).unwrap_or("")))?;
    }

    // Quotes in the final record only balance when its last quoted field was closed.
    if let Some((start, line)) = last {
        let tail = data.get(start as usize..).unwrap_or_default();
        if tail.iter().filter(|&&b| b == b'"').count() % 2 == 1 {
            return Err(DashboardError::ParseError(format!(
                "EOF inside quoted field starting at line {line}"
            )));
        }
    }

    wtr.into_inner()
        .map_err(|e| DashboardError::Io(e.into_error()))
}

fn null_values() -> NullValues {
    NullValues::AllColumns(NULL_MARKERS.iter().map(|m| PlSmallStr::from(*m)).collect())
}

/// Parse normalized CSV into a frame. Every row takes part in type
/// inference and date-like text is left as text.
fn parse_frame(csv: Vec<u8>) -> Result<DataFrame, DashboardError> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| {
            opts.with_null_values(Some(null_values()))
                .with_try_parse_dates(false)
        })
        .into_reader_with_file_handle(Cursor::new(csv))
        .finish()?;
    Ok(frame)
}

/// Read a table from a CSV file, named after the file stem.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table, DashboardError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    read_csv_from_bytes(&data, &name)
}

/// Read a table from uploaded CSV bytes.
pub fn read_csv_from_bytes(data: &[u8], name: &str) -> Result<Table, DashboardError> {
    let frame = parse_frame(normalize(data)?)?;
    let table = Table::new(name, frame);
    tracing::info!(
        table = table.name(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "loaded table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnType, Value};

    #[test]
    fn test_read_bytes_basic() {
        let data = b"Traffic,Delivery_Time\nLow,10\nHigh,20\nLow,30\n";
        let table = read_csv_from_bytes(data, "orders").unwrap();
        assert_eq!(table.name(), "orders");
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column_names(), vec!["Traffic", "Delivery_Time"]);
        assert_eq!(table.dtype("Delivery_Time"), Some(ColumnType::Integer));
        assert_eq!(table.dtype("Traffic"), Some(ColumnType::Text));
    }

    #[test]
    fn test_float_and_null_markers() {
        let data = b"Agent_Rating,Delivery_Time\n4.5,10\nNaN,N/A\n4.9,\n";
        let table = read_csv_from_bytes(data, "ratings").unwrap();
        assert_eq!(table.dtype("Agent_Rating"), Some(ColumnType::Float));
        assert_eq!(table.dtype("Delivery_Time"), Some(ColumnType::Integer));
        assert_eq!(table.row(1).unwrap(), vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_mixed_column_is_text() {
        let data = b"Delivery_Time\n10\nslow\n";
        let table = read_csv_from_bytes(data, "mixed").unwrap();
        assert_eq!(table.dtype("Delivery_Time"), Some(ColumnType::Text));
    }

    #[test]
    fn test_date_like_text_is_not_parsed() {
        let data = b"Category\n2022-03-19\n19-03-2022\n";
        let table = read_csv_from_bytes(data, "dates").unwrap();
        assert_eq!(table.dtype("Category"), Some(ColumnType::Text));
        assert_eq!(table.row(0).unwrap(), vec![Value::Text("2022-03-19".into())]);
        assert_eq!(table.row(1).unwrap(), vec![Value::Text("19-03-2022".into())]);
    }

    #[test]
    fn test_header_only() {
        let table = read_csv_from_bytes(b"Area,Vehicle\n", "empty").unwrap();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 2);
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = read_csv_from_bytes(b"", "nothing").unwrap_err();
        assert!(err.to_string().contains("No columns to parse"));
    }

    #[test]
    fn test_too_many_fields_is_error() {
        let data = b"a,b\n1,2\n3,4,5\n";
        let err = read_csv_from_bytes(data, "bad").unwrap_err();
        assert!(matches!(err, DashboardError::ParseError(_)));
        assert!(err.to_string().contains("Expected 2 fields"));
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let data = b"Traffic,Delivery_Time\n\"Low,10\nHigh,20\n";
        let err = read_csv_from_bytes(data, "open-quote").unwrap_err();
        assert!(matches!(err, DashboardError::ParseError(_)));
        assert!(err.to_string().contains("EOF inside quoted field"));
    }

    #[test]
    fn test_escaped_quotes_are_accepted() {
        let data = b"Category,Delivery_Time\n\"Home, \"\"Kitchen\"\"\",10\nToys,20\n";
        let table = read_csv_from_bytes(data, "quoted").unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.row(0).unwrap()[0],
            Value::Text("Home, \"Kitchen\"".into())
        );
    }

    #[test]
    fn test_short_rows_are_padded_with_nulls() {
        let data = b"a,b\n1,2\n3\n";
        let table = read_csv_from_bytes(data, "short").unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.row(1).unwrap()[1], Value::Null);
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let data = b"a,b\n\xff\xfe,2\n";
        assert!(read_csv_from_bytes(data, "binary").is_err());
    }

    #[test]
    fn test_duplicate_and_blank_headers_renamed() {
        let data = b"Area,Area,,Area\nx,y,z,w\n";
        let table = read_csv_from_bytes(data, "dups").unwrap();
        assert_eq!(
            table.column_names(),
            vec!["Area", "Area.1", "Unnamed: 2", "Area.2"]
        );
    }

    #[test]
    fn test_cells_are_trimmed_before_typing() {
        let data = b"Traffic , Delivery_Time\n Low , 10 \n";
        let table = read_csv_from_bytes(data, "trim").unwrap();
        assert!(table.has_column("Traffic"));
        assert_eq!(table.dtype("Delivery_Time"), Some(ColumnType::Integer));
        assert_eq!(
            table.row(0).unwrap(),
            vec![Value::Text("Low".into()), Value::Integer(10)]
        );
    }

    #[test]
    fn test_read_csv_from_path_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deliveries.csv");
        std::fs::write(&path, "Vehicle\nmotorcycle\nscooter\n").unwrap();
        let table = read_csv(&path).unwrap();
        assert_eq!(table.name(), "deliveries");
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_csv("/definitely/not/here.csv");
        assert!(matches!(result, Err(DashboardError::Io(_))));
    }
}
