use mineral_forecast::data::{DataLoader, ObservationSeries, YearRange};
use mineral_forecast::ForecastError;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

#[test]
fn test_data_loader_from_path() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1,234").unwrap();
    writeln!(file, "5678").unwrap();
    writeln!(file, "  90  ").unwrap();

    let series = DataLoader::from_path(file.path(), 1900).unwrap();

    assert_eq!(series.values(), &[1234.0, 5678.0, 90.0]);
    assert_eq!(series.base_year(), 1900);
    assert_eq!(series.last_year(), 1902);
}

#[test]
fn test_blank_lines_are_skipped() {
    let input = Cursor::new("10\n\n   \n20\n");
    let series = DataLoader::from_reader(input, 2010).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.years().collect::<Vec<_>>(), vec![2010, 2011]);
}

#[test]
fn test_non_numeric_line_reports_position() {
    let input = Cursor::new("10\n20\nn/a\n40\n");
    let err = DataLoader::from_reader(input, 2010).unwrap_err();

    match err {
        ForecastError::ParseError { line, text } => {
            assert_eq!(line, 3);
            assert_eq!(text, "n/a");
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DataLoader::from_path(dir.path().join("data_missing.txt"), 1900).unwrap_err();
    assert!(matches!(err, ForecastError::IoError(_)));
}

#[test]
fn test_empty_and_negative_series_rejected() {
    let empty = DataLoader::from_reader(Cursor::new("\n\n"), 1900);
    assert!(matches!(empty, Err(ForecastError::DataError(_))));

    let negative = ObservationSeries::new(1900, vec![1.0, -2.0]);
    assert!(matches!(negative, Err(ForecastError::DataError(_))));
}

#[test]
fn test_year_range_offsets() {
    let range = YearRange::new(2021, 2058).unwrap();
    assert_eq!(range.len(), 38);
    assert_eq!(range.offsets(1900).unwrap(), (121, 158));

    assert!(YearRange::new(2030, 2020).is_err());
    assert!(range.offsets(2022).is_err());
}
