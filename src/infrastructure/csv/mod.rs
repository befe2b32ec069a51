// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV serialization for the spreadsheet export

mod csv_exporter;

pub use csv_exporter::{CsvExport, CsvExporter, UTF8_BOM};
