//! Annual observation series and the text file loader

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Quantities observed once per calendar year, contiguous from a base year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSeries {
    /// Year of the first observation
    base_year: i32,
    /// Quantities in metric tons
    values: Vec<f64>,
}

/// Loader for newline-delimited numeric files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a series from a file with one number per line
    pub fn from_path<P: AsRef<Path>>(path: P, base_year: i32) -> Result<ObservationSeries> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), base_year)
    }

    /// Load a series from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R, base_year: i32) -> Result<ObservationSeries> {
        let values = Self::parse_values(reader)?;
        ObservationSeries::new(base_year, values)
    }

    /// Parse one number per line, ignoring surrounding whitespace, `,`
    /// thousands separators and blank lines
    pub fn parse_values<R: BufRead>(reader: R) -> Result<Vec<f64>> {
        let mut values = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let cleaned = line.trim().replace(',', "");
            if cleaned.is_empty() {
                continue;
            }

            let value = cleaned
                .parse::<f64>()
                .map_err(|_| ForecastError::ParseError {
                    line: index + 1,
                    text: line.trim().to_string(),
                })?;
            values.push(value);
        }

        Ok(values)
    }
}

/// January 1 of `year`, the date each annual value is plotted at
pub fn year_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| ForecastError::DataError(format!("Year {} is out of range", year)))
}

impl ObservationSeries {
    /// Create a new series, validating quantities
    pub fn new(base_year: i32, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }
        if let Some(offset) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(ForecastError::DataError(format!(
                "Quantity for {} must be a non-negative number, got {}",
                base_year + offset as i32,
                values[offset]
            )));
        }

        Ok(Self { base_year, values })
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Year of the final observation
    pub fn last_year(&self) -> i32 {
        self.base_year + self.values.len() as i32 - 1
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Calendar years, one per value
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.values.len()).map(move |i| self.base_year + i as i32)
    }

    /// `(year, value)` pairs in order
    pub fn points(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years().zip(self.values.iter().copied())
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Inclusive range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Create a new range, `start <= end`
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidRange(format!(
                "Start year {} is after end year {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of years covered
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Always false; a range holds at least one year
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    /// Offsets of the two ends from `base_year`
    pub fn offsets(&self, base_year: i32) -> Result<(usize, usize)> {
        if self.start < base_year {
            return Err(ForecastError::InvalidRange(format!(
                "Start year {} is before the base year {}",
                self.start, base_year
            )));
        }
        Ok((
            (self.start - base_year) as usize,
            (self.end - base_year) as usize,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_strips_separators_and_whitespace() {
        let input = "1,234\n5678\n  90  \n";
        let values = DataLoader::parse_values(Cursor::new(input)).unwrap();
        assert_eq!(values, vec![1234.0, 5678.0, 90.0]);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let input = "12\n\nabc\n";
        match DataLoader::parse_values(Cursor::new(input)) {
            Err(ForecastError::ParseError { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "abc");
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_year_range_offsets() {
        let range = YearRange::new(2021, 2058).unwrap();
        assert_eq!(range.len(), 38);
        assert_eq!(range.offsets(1900).unwrap(), (121, 158));
        assert!(range.offsets(2022).is_err());
        assert!(YearRange::new(2030, 2029).is_err());
    }

    #[test]
    fn test_year_start() {
        let date = year_start(2058).unwrap();
        assert_eq!(date.to_string(), "2058-01-01");
    }
}
