use std::collections::HashSet;
use std::io::Read;

/// Columns only known after the call ends; they never reach the pre-call pipeline.
pub const LEAKAGE_COLUMNS: [&str; 2] = ["duration", "campaign"];

const TARGET_COLUMN: &str = "y";
const EMP_VAR_RATE_COLUMN: &str = "emp.var.rate";
const NR_EMPLOYED_COLUMN: &str = "nr.employed";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("invalid historical dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("historical dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: target '{value}' is neither 'yes' nor 'no'")]
    InvalidTarget { row: usize, value: String },
    #[error("row {row}: column '{column}' value '{value}' is not numeric")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// The slice of the historical campaign data needed to recompute the economic medians.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDataset {
    pub labels: Vec<u8>,
    pub emp_var_rate: Vec<f64>,
    pub nr_employed: Vec<f64>,
    pub duplicates_dropped: usize,
}

impl HistoricalDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Parse the semicolon-delimited export, dropping exact duplicate rows (first occurrence kept,
/// compared across every column including the leakage columns) before anything else.
pub fn read_dataset<R: Read>(reader: R) -> Result<HistoricalDataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let position = |name: &'static str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or(DatasetError::MissingColumn(name))
    };
    let target = position(TARGET_COLUMN)?;
    let emp_var_rate = position(EMP_VAR_RATE_COLUMN)?;
    let nr_employed = position(NR_EMPLOYED_COLUMN)?;

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut dataset = HistoricalDataset {
        labels: Vec::new(),
        emp_var_rate: Vec::new(),
        nr_employed: Vec::new(),
        duplicates_dropped: 0,
    };

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 2;
        let key: Vec<String> = record.iter().map(str::to_string).collect();
        if !seen.insert(key) {
            dataset.duplicates_dropped += 1;
            continue;
        }

        let label = match record.get(target).unwrap_or_default() {
            "yes" => 1,
            "no" => 0,
            other => {
                return Err(DatasetError::InvalidTarget {
                    row,
                    value: other.to_string(),
                })
            }
        };

        dataset.labels.push(label);
        dataset.emp_var_rate.push(parse_number(
            &record,
            emp_var_rate,
            EMP_VAR_RATE_COLUMN,
            row,
        )?);
        dataset.nr_employed.push(parse_number(
            &record,
            nr_employed,
            NR_EMPLOYED_COLUMN,
            row,
        )?);
    }

    Ok(dataset)
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    column: &'static str,
    row: usize,
) -> Result<f64, DatasetError> {
    let raw = record.get(index).unwrap_or_default();
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DatasetError::InvalidNumber {
            row,
            column,
            value: raw.to_string(),
        })
}

/// Median with the even-length midpoint convention; `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\"age\";\"job\";\"duration\";\"campaign\";\"emp.var.rate\";\"nr.employed\";\"y\"\n";

    #[test]
    fn reads_quoted_semicolon_export_and_drops_duplicates() {
        let csv = format!(
            "{HEADER}56;\"housemaid\";261;1;1.1;5191.0;\"no\"\n\
             56;\"housemaid\";261;1;1.1;5191.0;\"no\"\n\
             41;\"admin.\";151;2;-1.8;5099.1;\"yes\"\n\
             56;\"housemaid\";300;1;1.1;5191.0;\"no\"\n"
        );

        let dataset = read_dataset(csv.as_bytes()).expect("dataset parses");

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.duplicates_dropped, 1);
        assert_eq!(dataset.labels, vec![0, 1, 0]);
        assert_eq!(dataset.emp_var_rate, vec![1.1, -1.8, 1.1]);
        assert_eq!(dataset.nr_employed, vec![5191.0, 5099.1, 5191.0]);
    }

    #[test]
    fn rejects_unknown_target_values() {
        let csv = format!("{HEADER}30;\"student\";10;1;1.1;5191.0;\"maybe\"\n");
        match read_dataset(csv.as_bytes()) {
            Err(DatasetError::InvalidTarget { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "maybe");
            }
            other => panic!("expected invalid target, got {other:?}"),
        }
    }

    #[test]
    fn reports_missing_economic_column() {
        let csv = "\"age\";\"emp.var.rate\";\"y\"\n30;1.1;\"no\"\n";
        assert!(matches!(
            read_dataset(csv.as_bytes()),
            Err(DatasetError::MissingColumn("nr.employed"))
        ));
    }

    #[test]
    fn median_uses_midpoint_for_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
