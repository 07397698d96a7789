//! Batch analysis of flight-duty reports.
//!
//! [`MissionAnalyzer`] drives a batch from documents to an
//! [`AnalysisResult`]: page text, duty-page filtering, reporting period,
//! segment extraction and rotation building per document, then pricing and
//! report assembly for the whole batch. Problems with one document become
//! warnings; the rest of the batch goes on.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{assemble_report, build_rotations, calculate_indemnity};
use crate::config::{ConfigLoader, PerDiemSchedule};
use crate::error::{EngineError, EngineResult};
use crate::extraction::{
    AutoPageSource, PageTextSource, SourceDocument, extract_segments, infer_reporting_period,
    is_duty_report_page,
};
use crate::models::{
    AnalysisResult, AnalysisWarning, FlightSegment, Rotation, WarningCode, sort_segments,
};

/// Everything read from the documents of one batch, before pricing.
#[derive(Debug, Default)]
struct BatchAccumulator {
    rotations: Vec<Rotation>,
    segments: Vec<FlightSegment>,
    warnings: Vec<AnalysisWarning>,
}

/// Analyses batches of flight-duty reports against one configuration.
///
/// Per-diem schedules are loaded the first time a reporting year yields a
/// rotation and
/// kept for the life of the analyzer, including the fact that a year has no
/// usable file.
///
/// # Example
///
/// ```no_run
/// use crew_per_diem::config::ConfigLoader;
/// use crew_per_diem::engine::MissionAnalyzer;
/// use crew_per_diem::extraction::AutoPageSource;
///
/// let config = ConfigLoader::load("./config").unwrap();
/// let mut analyzer = MissionAnalyzer::new(&config, AutoPageSource);
/// let result = analyzer.analyse_files(&["ep5_062024.pdf"]);
/// println!("Total: {} EUR", result.total_indemnity);
/// ```
#[derive(Debug)]
pub struct MissionAnalyzer<'a, S: PageTextSource> {
    config: &'a ConfigLoader,
    pages: S,
    per_diem: BTreeMap<i32, Option<PerDiemSchedule>>,
}

impl<'a, S: PageTextSource> MissionAnalyzer<'a, S> {
    /// Creates an analyzer reading page text through `pages`.
    pub fn new(config: &'a ConfigLoader, pages: S) -> Self {
        Self {
            config,
            pages,
            per_diem: BTreeMap::new(),
        }
    }

    /// Analyses documents already held in memory.
    pub fn analyse(&mut self, documents: &[SourceDocument]) -> AnalysisResult {
        self.run(documents.iter().map(Ok))
    }

    /// Reads and analyses documents from disk.
    ///
    /// A file that cannot be read is reported as a warning like any other
    /// unreadable document.
    pub fn analyse_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> AnalysisResult {
        self.run(paths.iter().map(SourceDocument::from_path))
    }

    /// The schedule loaded for a year, if one was found.
    pub fn per_diem_schedule(&self, year: i32) -> Option<&PerDiemSchedule> {
        self.per_diem.get(&year).and_then(Option::as_ref)
    }

    fn run<D, I>(&mut self, documents: I) -> AnalysisResult
    where
        D: Borrow<SourceDocument>,
        I: IntoIterator<Item = EngineResult<D>>,
    {
        let analysis_id = Uuid::new_v4();
        let start_time = Instant::now();
        info!(analysis_id = %analysis_id, "Starting analysis");

        let mut batch = BatchAccumulator::default();
        let mut document_count = 0usize;

        for document in documents {
            document_count += 1;
            let outcome = document.and_then(|document| {
                let document = document.borrow();
                self.analyse_document(document, &mut batch)
                    .map_err(|e| with_document_name(e, &document.name))
            });

            if let Err(error) = outcome {
                warn!(
                    analysis_id = %analysis_id,
                    error = %error,
                    "Document skipped"
                );
                batch.warnings.push(document_warning(&error));
            }
        }

        let config = self.config;
        let home_bases = &config.settings().home_bases;
        let per_diem = &self.per_diem;

        let result = assemble_report(
            analysis_id,
            batch.rotations,
            &batch.segments,
            batch.warnings,
            |rotation| {
                let schedule = per_diem
                    .get(&rotation.reporting_year)
                    .and_then(Option::as_ref);
                calculate_indemnity(rotation, config.airports(), schedule, home_bases)
            },
        );

        let duration = start_time.elapsed();
        info!(
            analysis_id = %analysis_id,
            documents = document_count,
            rotations = result.rotations.len(),
            predominant_year = ?result.predominant_year,
            total_indemnity = %result.total_indemnity,
            warnings = result.warnings.len(),
            duration_us = duration.as_micros(),
            "Analysis completed"
        );

        result
    }

    fn analyse_document(
        &mut self,
        document: &SourceDocument,
        batch: &mut BatchAccumulator,
    ) -> EngineResult<()> {
        let config = self.config;
        let marker = &config.settings().document_marker;
        let pages = self.pages.page_texts(document)?;
        let duty_pages: Vec<&str> = pages
            .iter()
            .map(String::as_str)
            .filter(|page| is_duty_report_page(page, marker))
            .collect();

        if duty_pages.is_empty() {
            debug!(document = %document.name, pages = pages.len(), "No duty report page");
            return Ok(());
        }

        let period = infer_reporting_period(&document.name, &duty_pages).ok_or_else(|| {
            EngineError::UnrecognizedPeriod {
                name: document.name.clone(),
            }
        })?;

        let mut segments: Vec<FlightSegment> = duty_pages
            .iter()
            .flat_map(|page| extract_segments(page, period, &document.name))
            .collect();
        sort_segments(&mut segments);

        let rotations = build_rotations(&segments, &config.settings().home_bases, period.year);
        if !rotations.is_empty() {
            self.ensure_per_diem(period.year, &mut batch.warnings);
        }

        debug!(
            document = %document.name,
            period = %period,
            duty_pages = duty_pages.len(),
            segments = segments.len(),
            rotations = rotations.len(),
            "Document analysed"
        );

        batch.segments.extend(segments);
        batch.rotations.extend(rotations);
        Ok(())
    }

    /// Loads the per-diem schedule of a year once, warning when it is unusable.
    fn ensure_per_diem(&mut self, year: i32, warnings: &mut Vec<AnalysisWarning>) {
        if self.per_diem.contains_key(&year) {
            return;
        }

        let schedule = match self.config.load_per_diem(year) {
            Ok(schedule) => Some(schedule),
            Err(error) => {
                warn!(year, error = %error, "Per-diem schedule unavailable");
                let message = match &error {
                    EngineError::ReferenceNotFound { path } => format!(
                        "No per-diem file for {} ({}); indemnities for that year are zero",
                        year, path
                    ),
                    other => format!(
                        "Per-diem file for {} is unusable ({}); indemnities for that year are zero",
                        year, other
                    ),
                };
                warnings.push(AnalysisWarning::general(
                    WarningCode::MissingReferenceData,
                    message,
                ));
                None
            }
        };

        self.per_diem.insert(year, schedule);
    }
}

/// Analyses in-memory documents with the default page source.
///
/// PDF files go through `pdf-extract`; `.txt` files are read as text with
/// pages separated by form feeds.
pub fn analyse_missions(config: &ConfigLoader, documents: &[SourceDocument]) -> AnalysisResult {
    MissionAnalyzer::new(config, AutoPageSource).analyse(documents)
}

/// Reports any other per-document error as an unreadable document.
fn with_document_name(error: EngineError, name: &str) -> EngineError {
    match error {
        EngineError::UnreadableDocument { .. } | EngineError::UnrecognizedPeriod { .. } => error,
        other => EngineError::UnreadableDocument {
            name: name.to_string(),
            message: other.to_string(),
        },
    }
}

fn document_warning(error: &EngineError) -> AnalysisWarning {
    match error {
        EngineError::UnrecognizedPeriod { name } => AnalysisWarning::for_document(
            WarningCode::UnrecognizedPeriod,
            name.clone(),
            "Could not determine the reporting month from the file name or its content",
        ),
        EngineError::UnreadableDocument { name, message } => AnalysisWarning::for_document(
            WarningCode::UnreadableDocument,
            name.clone(),
            format!("Unreadable document: {}", message),
        ),
        other => AnalysisWarning::general(WarningCode::UnreadableDocument, other.to_string()),
    }
}
