//! The desk — one interactive what-if session.
//!
//! TRIGGERS:
//!   generate(params)     new dataset, signals aggregated, analysis cleared
//!   analyze(sensitivity) score the current dataset, keep the result
//!
//! RULES:
//!   - The desk owns all session state; nothing lives in globals.
//!   - Each generate call draws from its own stream of the RngBank.
//!   - Every trigger is recorded in the event log.
//!   - A rejected trigger leaves the session exactly as it was.

use crate::{
    config::{DeskConfig, GeneratorParams},
    dataset::Dataset,
    error::{DeskError, DeskResult},
    event::{DeskEvent, EventLogEntry},
    generator::GraphGenerator,
    rng::RngBank,
    scoring::{Analysis, RiskScorer},
    signals,
    types::{Generation, RunId},
    view::DeskView,
};

pub struct Desk {
    pub run_id: RunId,
    config:     DeskConfig,
    rng_bank:   RngBank,
    generation: Generation,
    dataset:    Option<Dataset>,
    analysis:   Analysis,
    log:        Vec<EventLogEntry>,
}

impl Desk {
    pub fn new(run_id: RunId, config: DeskConfig) -> DeskResult<Self> {
        config.validate()?;
        let mut desk = Self {
            rng_bank: RngBank::new(config.seed),
            config,
            generation: 0,
            dataset: None,
            analysis: Analysis::empty(),
            log: Vec::new(),
            run_id,
        };
        desk.record(DeskEvent::RunInitialized {
            run_id: desk.run_id.clone(),
            seed: desk.config.seed,
        })?;
        Ok(desk)
    }

    /// Build a desk and run the configured generate + analyze once.
    pub fn bootstrap(run_id: RunId, config: DeskConfig) -> DeskResult<Self> {
        let mut desk = Self::new(run_id, config)?;
        desk.generate(desk.config.generator)?;
        desk.analyze(desk.config.sensitivity)?;
        Ok(desk)
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn event_log(&self) -> &[EventLogEntry] {
        &self.log
    }

    /// Replace the dataset and clear the previous analysis.
    pub fn generate(&mut self, params: GeneratorParams) -> DeskResult<&Dataset> {
        let generator = GraphGenerator::new(params)?;

        let generation = self.generation + 1;
        let mut rng = self.rng_bank.for_generation(generation);
        let graph = generator.generate(&mut rng);
        let mut dataset = graph.dataset;
        let stats = signals::aggregate(&mut dataset)?;

        self.generation = generation;
        self.analysis = Analysis::empty();

        self.record(DeskEvent::DatasetGenerated {
            generation,
            account_count: dataset.accounts.len(),
            transaction_count: dataset.transactions.len(),
            ring_transactions: graph.ring_transactions,
        })?;
        self.record(DeskEvent::SignalsAggregated {
            generation,
            distinct_edges: stats.distinct_edges,
            reciprocal_edges: stats.reciprocal_edges,
        })?;
        self.record(DeskEvent::AnalysisReset { generation })?;

        log::info!(
            "[{}] generation {generation}: {} accounts, {} transactions",
            self.run_id,
            params.account_count,
            params.transaction_count
        );

        Ok(&*self.dataset.insert(dataset))
    }

    /// Score the current dataset. Repeated calls with the same sensitivity
    /// give identical results.
    pub fn analyze(&mut self, sensitivity: f64) -> DeskResult<&Analysis> {
        let dataset = self.dataset.as_ref().ok_or(DeskError::NoDataset)?;
        let analysis = RiskScorer::analyze(&dataset.accounts, sensitivity)?;

        self.record(DeskEvent::AnalysisCompleted {
            generation: self.generation,
            sensitivity,
            flagged_count: analysis.flagged.len(),
            ring_count: analysis.ring_count,
            suspicious_volume: analysis.suspicious_volume,
        })?;

        log::info!(
            "[{}] analysis at {sensitivity:.1}: {} flagged, {} rings",
            self.run_id,
            analysis.flagged.len(),
            analysis.ring_count
        );

        self.analysis = analysis;
        Ok(&self.analysis)
    }

    pub fn view(&self) -> DeskResult<DeskView> {
        let dataset = self.dataset.as_ref().ok_or(DeskError::NoDataset)?;
        Ok(DeskView::build(dataset, &self.analysis))
    }

    fn record(&mut self, event: DeskEvent) -> DeskResult<()> {
        let entry = EventLogEntry {
            sequence:   self.log.len() as u64,
            run_id:     self.run_id.clone(),
            generation: self.generation,
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(&event)?,
        };
        self.log.push(entry);
        Ok(())
    }
}
