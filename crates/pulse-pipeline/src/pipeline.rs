use std::sync::Arc;

use chrono::Utc;
use pulse_core::{PulseReport, Review, ReviewWindow, Taxonomy};
use pulse_llm::LlmClient;
use pulse_sources::{aggregate, collect_reviews, SourceAdapter};
use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::error::PipelineError;
use crate::export::Exporter;
use crate::progress::{
    ChannelObserver, NoopObserver, ProgressEvent, ProgressObserver, ProgressStep, Reporter,
};

/// Knobs of a run that come from configuration and the app profile.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub app_name: String,
    pub taxonomy: Taxonomy,
    pub window_days: u32,
    pub review_limit: usize,
    pub batch_size: usize,
}

/// Result of a run that found reviews to analyze.
#[derive(Debug, Clone)]
pub struct PulseRun {
    pub report: PulseReport,
    pub reviews: Vec<Review>,
    pub reviews_count: usize,
    pub assignments_count: usize,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Every source came back empty (or failed) for the window.
    NoReviews,
    Completed(Box<PulseRun>),
}

/// The fetch → aggregate → classify → synthesize sequence.
///
/// Holds no per-run state, so one instance behind an `Arc` can serve any
/// number of concurrent runs.
pub struct Pipeline {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    llm: Arc<dyn LlmClient>,
    settings: PipelineSettings,
    exporter: Option<Exporter>,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        llm: Arc<dyn LlmClient>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            adapters,
            llm,
            settings,
            exporter: None,
        }
    }

    /// Write `reviews.csv` and `pulse.md` after each completed run.
    #[must_use]
    pub fn with_exporter(mut self, exporter: Exporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.settings.app_name
    }

    /// Run without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run`].
    pub async fn run_blocking(&self) -> Result<PipelineOutcome, PipelineError> {
        self.run(&NoopObserver).await
    }

    /// Start a run in the background and return its progress feed.
    ///
    /// The feed ends after a `complete` or `error` event. Dropping the
    /// receiver does not cancel the run.
    #[must_use]
    pub fn stream(self: Arc<Self>) -> UnboundedReceiver<ProgressEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let observer = ChannelObserver::new(tx);
            if let Err(e) = self.run(&observer).await {
                tracing::error!(error = %e, "streamed pulse run failed");
            }
        });
        rx
    }

    /// Execute one run, reporting progress to `observer`.
    ///
    /// An empty review set is reported as an `error` event and returned as
    /// [`PipelineOutcome::NoReviews`]. Export failures are logged and do not
    /// fail the run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Synthesis`] if the pulse cannot be generated;
    /// an `error` event is emitted first.
    pub async fn run(
        &self,
        observer: &dyn ProgressObserver,
    ) -> Result<PipelineOutcome, PipelineError> {
        let mut reporter = Reporter::new(observer);
        let result = self.run_stages(&mut reporter).await;
        if let Err(e) = &result {
            reporter.emit(ProgressEvent::new(
                ProgressStep::Error,
                format!("Analysis failed: {e}"),
            ));
        }
        result
    }

    async fn run_stages(
        &self,
        reporter: &mut Reporter<'_>,
    ) -> Result<PipelineOutcome, PipelineError> {
        let settings = &self.settings;

        reporter.emit(ProgressEvent::new(
            ProgressStep::Fetching,
            "Fetching reviews from App Store and marketplace...",
        ));
        let window = ReviewWindow::trailing_days(Utc::now(), settings.window_days);
        let per_source = collect_reviews(&self.adapters, &window).await;
        let reviews = aggregate(per_source, &window, settings.review_limit);

        if reviews.is_empty() {
            tracing::info!(window_days = settings.window_days, "no reviews in window");
            reporter.emit(ProgressEvent::new(ProgressStep::Error, "No reviews found"));
            return Ok(PipelineOutcome::NoReviews);
        }

        let reviews_count = reviews.len();
        tracing::info!(reviews = reviews_count, "reviews aggregated");
        reporter.emit(
            ProgressEvent::new(
                ProgressStep::Fetched,
                format!("Found {reviews_count} reviews"),
            )
            .with_data(json!({ "count": reviews_count, "reviews": reviews })),
        );

        reporter.emit(ProgressEvent::new(
            ProgressStep::Grouping,
            "Grouping reviews into themes using AI...",
        ));
        let assignments = pulse_llm::classify(
            self.llm.as_ref(),
            &reviews,
            &settings.taxonomy,
            settings.batch_size,
        )
        .await;
        let assignments_count = assignments.len();
        tracing::info!(assignments = assignments_count, "reviews classified");
        reporter.emit(
            ProgressEvent::new(
                ProgressStep::Grouped,
                format!("Grouped {assignments_count} reviews"),
            )
            .with_data(json!({ "count": assignments_count })),
        );

        reporter.emit(ProgressEvent::new(
            ProgressStep::Generating,
            "Generating weekly pulse report...",
        ));
        let report = pulse_llm::synthesize(
            self.llm.as_ref(),
            &settings.app_name,
            &reviews,
            &assignments,
            &settings.taxonomy,
        )
        .await?;

        if let Some(exporter) = &self.exporter {
            if let Err(e) = exporter.export(&reviews, &report).await {
                tracing::warn!(error = %e, "artifact export failed");
            }
        }

        reporter.emit(
            ProgressEvent::new(ProgressStep::Complete, "Analysis complete!").with_data(json!({
                "pulse": report,
                "reviews": reviews,
                "reviewsCount": reviews_count,
                "groupedReviewsCount": assignments_count,
            })),
        );

        Ok(PipelineOutcome::Completed(Box::new(PulseRun {
            report,
            reviews,
            reviews_count,
            assignments_count,
        })))
    }
}
