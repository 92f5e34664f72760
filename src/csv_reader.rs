use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::io::{self, Read};

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

/// A column prepared for mapping onto an aesthetic.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    /// Text values replaced by the index of their level. Levels are kept in
    /// order of first appearance.
    Categorical { levels: Vec<String>, codes: Vec<f64> },
}

impl Column {
    pub fn values(&self) -> &[f64] {
        match self {
            Column::Numeric(v) => v,
            Column::Categorical { codes, .. } => codes,
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Column::Categorical { .. })
    }
}

pub fn read_csv(input: impl Read) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(CsvData { headers, rows })
}

pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin())
}

pub fn parse_column_selector(input: &str) -> ColumnSelector {
    match input.parse::<usize>() {
        Ok(index) => ColumnSelector::Index(index),
        Err(_) => ColumnSelector::Name(input.to_string()),
    }
}

fn resolve(data: &CsvData, selector: &ColumnSelector) -> Result<(usize, String)> {
    match selector {
        ColumnSelector::Index(idx) => {
            if *idx >= data.headers.len() {
                return Err(anyhow!(
                    "Column index {} out of bounds (available columns: {})",
                    idx,
                    data.headers.len()
                ));
            }
            Ok((*idx, data.headers[*idx].clone()))
        }
        ColumnSelector::Name(name) => {
            let idx = data
                .headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    anyhow!(
                        "Column '{}' not found. Available columns: {}",
                        name,
                        data.headers.join(", ")
                    )
                })?;
            Ok((idx, data.headers[idx].clone()))
        }
    }
}

pub fn extract_column_as_string(
    data: &CsvData,
    selector: ColumnSelector,
) -> Result<(String, Vec<String>)> {
    let (column_index, column_name) = resolve(data, &selector)?;

    let mut values = Vec::new();
    for (row_idx, row) in data.rows.iter().enumerate() {
        if column_index >= row.len() {
            return Err(anyhow!(
                "Row {} has only {} columns, expected at least {}",
                row_idx + 1,
                row.len(),
                column_index + 1
            ));
        }
        values.push(row[column_index].clone());
    }

    Ok((column_name, values))
}

pub fn extract_column(data: &CsvData, selector: ColumnSelector) -> Result<(String, Vec<f64>)> {
    let (column_name, raw) = extract_column_as_string(data, selector)?;

    let mut values = Vec::with_capacity(raw.len());
    for (row_idx, value_str) in raw.iter().enumerate() {
        let value = value_str.trim().parse::<f64>().with_context(|| {
            format!(
                "Failed to parse value '{}' as number in column '{}' at row {}",
                value_str,
                column_name,
                row_idx + 1
            )
        })?;
        values.push(value);
    }

    Ok((column_name, values))
}

/// Levels in order of first appearance and the level index of every value.
pub fn levels(values: &[String]) -> (Vec<String>, Vec<usize>) {
    let mut levels: Vec<String> = Vec::new();
    let codes = values
        .iter()
        .map(|v| match levels.iter().position(|l| l == v) {
            Some(i) => i,
            None => {
                levels.push(v.clone());
                levels.len() - 1
            }
        })
        .collect();
    (levels, codes)
}

/// Extracts a column as numbers if every value parses, as ordinal codes of
/// its levels otherwise.
pub fn extract_mapped_column(data: &CsvData, selector: ColumnSelector) -> Result<(String, Column)> {
    let (name, raw) = extract_column_as_string(data, selector)?;
    let numeric: Option<Vec<f64>> = raw.iter().map(|s| s.trim().parse::<f64>().ok()).collect();
    let column = match numeric {
        Some(values) => Column::Numeric(values),
        None => {
            let (levels, codes) = levels(&raw);
            Column::Categorical {
                levels,
                codes: codes.into_iter().map(|c| c as f64).collect(),
            }
        }
    };
    Ok((name, column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn csv_from_string(content: &str) -> Result<CsvData> {
        read_csv(Cursor::new(content))
    }

    #[test]
    fn test_parse_column_selector() {
        assert_eq!(parse_column_selector("0"), ColumnSelector::Index(0));
        assert_eq!(parse_column_selector("42"), ColumnSelector::Index(42));
        assert_eq!(
            parse_column_selector("species"),
            ColumnSelector::Name("species".to_string())
        );
    }

    #[test]
    fn test_extract_column_by_name() {
        let csv = csv_from_string("x,y,z\n1,10,100\n2,20,200\n3,30,300").unwrap();
        let (name, values) = extract_column(&csv, ColumnSelector::Name("y".to_string())).unwrap();
        assert_eq!(name, "y");
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_extract_column_by_index() {
        let csv = csv_from_string("x,y,z\n1,10,100\n2,20,200").unwrap();
        let (name, values) = extract_column(&csv, ColumnSelector::Index(2)).unwrap();
        assert_eq!(name, "z");
        assert_eq!(values, vec![100.0, 200.0]);
    }

    #[test]
    fn test_extract_column_case_insensitive() {
        let csv = csv_from_string("Weight,Height\n20.5,60\n22.0,55").unwrap();
        let (name, values) =
            extract_column(&csv, ColumnSelector::Name("weight".to_string())).unwrap();
        assert_eq!(name, "Weight");
        assert_eq!(values, vec![20.5, 22.0]);
    }

    #[test]
    fn test_extract_column_not_found() {
        let csv = csv_from_string("x,y\n1,10").unwrap();
        let err = extract_column(&csv, ColumnSelector::Name("nonexistent".to_string())).unwrap_err();
        assert!(err.to_string().contains("not found"));

        let err = extract_column(&csv, ColumnSelector::Index(99)).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_extract_column_non_numeric() {
        let csv = csv_from_string("x,y\n1,10\nnot_a_number,20\n3,30").unwrap();
        let err = extract_column(&csv, ColumnSelector::Name("x".to_string())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_short_row_fails_while_reading() {
        let err = csv_from_string("x,y,z\n1,10,100\n2,20").unwrap_err();
        assert!(err.to_string().contains("record"));
    }

    #[test]
    fn test_read_csv_empty_data() {
        let err = csv_from_string("x,y\n").unwrap_err();
        assert!(err.to_string().contains("at least one data row"));
    }

    #[test]
    fn test_read_csv_unicode() {
        let csv = csv_from_string("x,température\n1,20.5\n2,22.0").unwrap();
        assert_eq!(csv.headers, vec!["x", "température"]);
        assert_eq!(csv.rows.len(), 2);
    }

    #[test]
    fn test_levels_in_order_of_appearance() {
        let values: Vec<String> = ["b", "a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let (levels, codes) = levels(&values);
        assert_eq!(levels, vec!["b", "a", "c"]);
        assert_eq!(codes, vec![0, 1, 0, 2]);
    }

    #[test]
    fn test_extract_mapped_column() {
        let csv = csv_from_string("x,species,w\n1,setosa,2.5\n2,virginica,3\n3,setosa,4").unwrap();

        let (_, species) =
            extract_mapped_column(&csv, ColumnSelector::Name("species".to_string())).unwrap();
        assert_eq!(
            species,
            Column::Categorical {
                levels: vec!["setosa".to_string(), "virginica".to_string()],
                codes: vec![0.0, 1.0, 0.0],
            }
        );
        assert!(species.is_categorical());

        let (_, w) = extract_mapped_column(&csv, ColumnSelector::Index(2)).unwrap();
        assert_eq!(w, Column::Numeric(vec![2.5, 3.0, 4.0]));
        assert_eq!(w.values(), &[2.5, 3.0, 4.0]);
    }
}
