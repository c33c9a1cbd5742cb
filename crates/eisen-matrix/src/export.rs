use chrono::NaiveDate;

/// A JSON document ready to be handed to a
/// download or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
  pub name:     String,
  pub contents: String
}

/// `eisen-07-Jan-2025.json`
pub fn export_file_name(
  date: NaiveDate
) -> String {
  format!(
    "eisen-{}.json",
    date.format("%d-%b-%Y")
  )
}
