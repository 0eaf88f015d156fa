use crate::domain::Lead;
use std::io::Read;

/// Header alias the original exports use: `linkedin bio` with a space.
const LINKEDIN_BIO_ALIAS: &str = "linkedin bio";

#[derive(Debug, thiserror::Error)]
pub enum LeadImportError {
    #[error("CSV file is required under field name \"file\"")]
    MissingFile,
    #[error("Uploaded file does not appear to be CSV")]
    NotCsv,
    #[error("failed to read upload: {0}")]
    Upload(String),
    #[error("failed to parse leads CSV: {0}")]
    Parse(#[from] csv::Error),
}

/// Cheap sanity check before parsing: the first 1 KB of a CSV upload should
/// contain at least one comma or newline.
pub fn looks_like_csv(bytes: &[u8]) -> bool {
    let sample_len = bytes.len().min(1000);
    let sample = String::from_utf8_lossy(&bytes[..sample_len]);
    sample.contains(',') || sample.contains('\n')
}

/// Parses a CSV stream into normalized leads.
///
/// Header keys are trimmed and lower-cased, cell values trimmed, and the
/// `linkedin bio` header is accepted as an alias for `linkedin_bio`.
/// Unrecognized columns are dropped and missing cells default to empty.
pub fn parse_leads<R: Read>(reader: R) -> Result<Vec<Lead>, LeadImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    let mut leads = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let field = |key: &str| -> String {
            headers
                .iter()
                .position(|header| header == key)
                .and_then(|index| record.get(index))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let mut linkedin_bio = field("linkedin_bio");
        if linkedin_bio.is_empty() {
            linkedin_bio = field(LINKEDIN_BIO_ALIAS);
        }

        leads.push(Lead {
            name: field("name"),
            role: field("role"),
            company: field("company"),
            industry: field("industry"),
            location: field("location"),
            linkedin_bio,
        });
    }

    Ok(leads)
}
