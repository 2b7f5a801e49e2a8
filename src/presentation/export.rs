//! CSV export of the monthly series of a dataset.

use crate::types::dataset::Dataset;
use thiserror::Error;

pub const CSV_HEADER: [&str; 5] = ["station", "year", "month", "tmean_c", "precip_mm"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV record")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV writer")]
    Flush(#[source] std::io::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A ready-to-download CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

fn csv_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}

/// One row per month record, in file order. Missing numbers become empty fields.
///
/// Rows are separated by `\n` and the last row has no terminator.
pub fn export_csv(dataset: &Dataset) -> Result<CsvExport, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    let year = dataset.year.to_string();
    for record in &dataset.months {
        writer.write_record([
            dataset.station.as_str(),
            year.as_str(),
            record.m.to_string().as_str(),
            csv_number(record.tmean).as_str(),
            csv_number(record.p).as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Flush(e.into_error()))?;
    let mut content = String::from_utf8(bytes)?;
    if content.ends_with('\n') {
        content.pop();
    }

    Ok(CsvExport {
        filename: format!("climograma_{}_{}.csv", dataset.station, dataset.year),
        content,
    })
}
