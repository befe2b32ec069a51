// ============================================================
// CSV EXPORTER
// ============================================================
// One header row plus one fully quoted data row, UTF-8 with BOM.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::export_record::{ExportRecord, EXPORT_HEADERS};

/// Lets spreadsheet applications detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const FILE_NAME_PREFIX: &str = "추출_결과_";
pub const FALLBACK_FILE_STEM: &str = "data";

/// A rendered CSV download.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Serializes an [`ExportRecord`] for download.
#[derive(Debug, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, record: &ExportRecord) -> Result<CsvExport> {
        let text = self.render(record)?;

        let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
        bytes.extend_from_slice(UTF8_BOM);
        bytes.extend_from_slice(text.as_bytes());

        Ok(CsvExport {
            file_name: Self::file_name(record),
            bytes,
        })
    }

    /// Header and data row joined by a single `\n`, without BOM or trailing newline.
    pub fn render(&self, record: &ExportRecord) -> Result<String> {
        let header = EXPORT_HEADERS.join(",");
        let data = Self::quoted_row(record)?;
        Ok(format!("{}\n{}", header, data))
    }

    /// `추출_결과_<warrant number>.csv`, or `추출_결과_data.csv` when there is none.
    pub fn file_name(record: &ExportRecord) -> String {
        let stem = if record.warrant_number.is_empty() {
            FALLBACK_FILE_STEM
        } else {
            record.warrant_number.as_str()
        };
        format!("{}{}.csv", FILE_NAME_PREFIX, stem)
    }

    fn quoted_row(record: &ExportRecord) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(record.values())
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;

        let buffer = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV row: {}", e)))?;

        let mut row = String::from_utf8(buffer)
            .map_err(|e| AppError::Internal(format!("CSV row is not UTF-8: {}", e)))?;
        if row.ends_with('\n') {
            row.pop();
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export_record::map_to_export_record;
    use crate::domain::extraction::RawExtraction;
    use csv::ReaderBuilder;

    fn record_with(warrant: &str, items: &str) -> ExportRecord {
        map_to_export_record(&RawExtraction {
            requesting_org: "서울강남경찰서 민원과".to_string(),
            requestor_name: "홍길동".to_string(),
            warrant_number: warrant.to_string(),
            email: "a@police.go.kr".to_string(),
            items_to_seize: items.to_string(),
        })
    }

    #[test]
    fn test_export_starts_with_bom() {
        let export = CsvExporter::new().export(&record_with("2025-1", "노트북")).unwrap();
        assert!(export.bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&export.bytes[UTF8_BOM.len()..]).unwrap();
        assert!(text.starts_with("요청 기관,"));
    }

    #[test]
    fn test_exactly_two_lines_and_header_order() {
        let text = CsvExporter::new().render(&record_with("2025-1", "노트북")).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 2);

        let header: Vec<&str> = lines[0].split(',').collect();
        assert_eq!(header, EXPORT_HEADERS.to_vec());
    }

    #[test]
    fn test_every_value_is_quoted() {
        let text = CsvExporter::new().render(&record_with("", "")).unwrap();
        let data = text.split('\n').nth(1).unwrap();
        assert!(data.starts_with("\"서울강남경찰서\",\"홍길동\",\"\",\"\",\"X\","));
        assert!(data.ends_with(",\"O\",\"a@police.go.kr\",\"\""));
    }

    #[test]
    fn test_round_trip_with_quotes_and_commas() {
        let record = record_with("2025-\"7\"", "휴대폰 2대, \"아이폰\" 포함");
        let text = CsvExporter::new().render(&record).unwrap();
        assert!(text.contains("\"휴대폰 2대, \"\"아이폰\"\" 포함\""));

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, EXPORT_HEADERS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let values: Vec<&str> = rows[0].iter().collect();
        assert_eq!(values, record.values().to_vec());
    }

    #[test]
    fn test_file_name_uses_warrant_number() {
        assert_eq!(
            CsvExporter::file_name(&record_with("2025-32274", "")),
            "추출_결과_2025-32274.csv"
        );
    }

    #[test]
    fn test_file_name_falls_back_without_warrant_number() {
        assert_eq!(CsvExporter::file_name(&record_with("", "")), "추출_결과_data.csv");
    }
}
