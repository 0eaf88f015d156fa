use crate::domain::ScoredLead;

/// Export column order, fixed by contract.
pub const EXPORT_COLUMNS: [&str; 10] = [
    "name",
    "role",
    "company",
    "industry",
    "location",
    "intent",
    "score",
    "rule_score",
    "ai_points",
    "reasoning",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No results to export. Run POST /score first.")]
    NoResults,
    #[error("failed to render results CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush results CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("results CSV was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Serializes the result batch as JSON values, one flat record per lead.
/// The record field order is the `ScoredLead` declaration order.
pub fn to_records(batch: &[ScoredLead]) -> Result<Vec<serde_json::Value>, serde_json::Error> {
    batch.iter().map(serde_json::to_value).collect()
}

/// Renders the result batch as CSV text with a header row and the
/// contractual column order.
pub fn to_csv(batch: &[ScoredLead]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        for record in batch {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buffer)?)
}
