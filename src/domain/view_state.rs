// ============================================================
// VIEW STATE
// ============================================================
// Lifecycle of the single-document page:
//   Idle -> Loading -> Success(record) | Error(message)
// Selecting a new file returns to Idle.

use std::sync::Arc;

use super::export_record::ExportRecord;
use super::upload::LoadedFile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtractionPhase {
    #[default]
    Idle,
    Loading,
    Success(ExportRecord),
    Error(String),
}

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRejection {
    NoFile,
    AlreadyRunning,
}

#[derive(Debug, Default)]
pub struct ViewState {
    file: Option<Arc<LoadedFile>>,
    phase: ExtractionPhase,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&LoadedFile> {
        self.file.as_deref()
    }

    pub fn phase(&self) -> &ExtractionPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase(), ExtractionPhase::Loading)
    }

    pub fn can_extract(&self) -> bool {
        self.file.is_some() && !self.is_loading()
    }

    pub fn record(&self) -> Option<&ExportRecord> {
        match &self.phase {
            ExtractionPhase::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ExtractionPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Replace the current file and drop any previous result or error.
    /// The file is pinned while an extraction is in flight.
    pub fn select_file(&mut self, file: LoadedFile) -> Result<(), ExtractionRejection> {
        if self.is_loading() {
            return Err(ExtractionRejection::AlreadyRunning);
        }
        self.file = Some(Arc::new(file));
        self.phase = ExtractionPhase::Idle;
        Ok(())
    }

    /// Record a failure that happened before a file could be selected.
    pub fn fail_selection(&mut self, message: String) -> Result<(), ExtractionRejection> {
        if self.is_loading() {
            return Err(ExtractionRejection::AlreadyRunning);
        }
        self.file = None;
        self.phase = ExtractionPhase::Error(message);
        Ok(())
    }

    /// Move to `Loading` and hand out the file to extract from.
    pub fn begin_extraction(&mut self) -> Result<Arc<LoadedFile>, ExtractionRejection> {
        if self.is_loading() {
            return Err(ExtractionRejection::AlreadyRunning);
        }
        let file = self.file.clone().ok_or(ExtractionRejection::NoFile)?;
        self.phase = ExtractionPhase::Loading;
        Ok(file)
    }

    pub fn finish_extraction(&mut self, outcome: Result<ExportRecord, String>) {
        self.phase = match outcome {
            Ok(record) => ExtractionPhase::Success(record),
            Err(message) => ExtractionPhase::Error(message),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export_record::map_to_export_record;
    use crate::domain::extraction::RawExtraction;

    fn loaded(name: &str) -> LoadedFile {
        LoadedFile {
            file_name: name.to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 3,
            preview: Some("data:image/png;base64,AAAA".to_string()),
            base64_payload: "AAAA".to_string(),
        }
    }

    #[test]
    fn test_cannot_extract_without_file() {
        let mut state = ViewState::new();
        assert!(!state.can_extract());
        assert_eq!(
            state.begin_extraction().unwrap_err(),
            ExtractionRejection::NoFile
        );
        assert_eq!(state.phase(), &ExtractionPhase::Idle);
    }

    #[test]
    fn test_second_extraction_rejected_while_loading() {
        let mut state = ViewState::new();
        state.select_file(loaded("scan.png")).unwrap();
        let _file = state.begin_extraction().unwrap();
        assert!(state.is_loading());
        assert!(!state.can_extract());
        assert_eq!(
            state.begin_extraction().unwrap_err(),
            ExtractionRejection::AlreadyRunning
        );
    }

    #[test]
    fn test_success_then_error_lifecycle() {
        let mut state = ViewState::new();
        state.select_file(loaded("scan.png")).unwrap();

        state.begin_extraction().unwrap();
        let record = map_to_export_record(&RawExtraction::default());
        state.finish_extraction(Ok(record.clone()));
        assert_eq!(state.record(), Some(&record));

        state.begin_extraction().unwrap();
        assert!(state.record().is_none());
        state.finish_extraction(Err("failed".to_string()));
        assert_eq!(state.error(), Some("failed"));
        assert!(state.record().is_none());
        assert!(state.can_extract());
    }

    #[test]
    fn test_new_file_clears_previous_result() {
        let mut state = ViewState::new();
        state.select_file(loaded("first.png")).unwrap();
        state.begin_extraction().unwrap();
        state.finish_extraction(Ok(map_to_export_record(&RawExtraction::default())));

        state.select_file(loaded("second.png")).unwrap();
        assert_eq!(state.phase(), &ExtractionPhase::Idle);
        assert!(state.record().is_none());
        assert_eq!(state.file().unwrap().file_name, "second.png");
    }

    #[test]
    fn test_file_is_pinned_while_loading() {
        let mut state = ViewState::new();
        state.select_file(loaded("a.png")).unwrap();
        let in_flight = state.begin_extraction().unwrap();

        assert_eq!(
            state.select_file(loaded("b.png")).unwrap_err(),
            ExtractionRejection::AlreadyRunning
        );
        assert_eq!(
            state.fail_selection("read failed".to_string()).unwrap_err(),
            ExtractionRejection::AlreadyRunning
        );
        assert!(state.is_loading());
        assert_eq!(state.file().unwrap().file_name, "a.png");
        assert_eq!(in_flight.file_name, "a.png");
        assert_eq!(
            state.begin_extraction().unwrap_err(),
            ExtractionRejection::AlreadyRunning
        );
    }

    #[test]
    fn test_failed_selection_clears_file() {
        let mut state = ViewState::new();
        state.select_file(loaded("scan.png")).unwrap();
        state.fail_selection("read failed".to_string()).unwrap();
        assert!(state.file().is_none());
        assert_eq!(state.error(), Some("read failed"));
    }
}
