use futures::future::AbortHandle;

use crate::domain::{
    chart::{ChartPalette, ChartState, ChartStateMerger, LiveUpdate, Snapshot},
    errors::ChartError,
    logging::{LogComponent, get_logger},
    market_data::ChartKey,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ChartStatus {
    Uninitialized,
    Loaded,
    Updating,
    Error(ChartError),
}

impl ChartStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChartStatus::Uninitialized => "uninitialized",
            ChartStatus::Loaded => "loaded",
            ChartStatus::Updating => "updating",
            ChartStatus::Error(_) => "error",
        }
    }
}

/// Proof that an update was started. Only a ticket from the current
/// generation may change the session.
#[derive(Debug)]
pub struct UpdateTicket {
    generation: u64,
    key: ChartKey,
}

impl UpdateTicket {
    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// State changed and should be drawn.
    Applied { replace: bool },
    NoData(String),
    Failed(ChartError),
    /// Result belonged to a chart the user has since switched away from.
    Discarded,
    /// Another update for this chart was still in flight.
    Skipped,
}

impl UpdateOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            UpdateOutcome::Applied { .. } => "applied",
            UpdateOutcome::NoData(_) => "no_data",
            UpdateOutcome::Failed(_) => "failed",
            UpdateOutcome::Discarded => "discarded",
            UpdateOutcome::Skipped => "skipped",
        }
    }
}

/// One chart on the dashboard: its key, status, rendered state and the
/// cancellation generation for in-flight work.
pub struct ChartSession {
    key: ChartKey,
    status: ChartStatus,
    state: Option<ChartState>,
    merger: ChartStateMerger,
    generation: u64,
    poll_handle: Option<AbortHandle>,
    redraw_pending: bool,
}

impl ChartSession {
    pub fn new(key: ChartKey, palette: ChartPalette) -> Self {
        Self {
            key,
            status: ChartStatus::Uninitialized,
            state: None,
            merger: ChartStateMerger::new(palette),
            generation: 0,
            poll_handle: None,
            redraw_pending: false,
        }
    }

    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    pub fn status(&self) -> &ChartStatus {
        &self.status
    }

    pub fn state(&self) -> Option<&ChartState> {
        self.state.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_updating(&self) -> bool {
        self.status == ChartStatus::Updating
    }

    /// The last draw failed, so the plot has to be created from scratch.
    pub fn needs_redraw(&self) -> bool {
        self.redraw_pending
    }

    pub fn render_succeeded(&mut self) {
        self.redraw_pending = false;
    }

    /// The merged state is kept; only the drawing is marked as broken. An
    /// in-flight fetch keeps its `Updating` status.
    pub fn render_failed(&mut self, error: ChartError) {
        self.redraw_pending = true;
        if !self.is_updating() {
            self.status = ChartStatus::Error(error);
        }
    }

    /// Returns `None` while another update is in flight.
    pub fn begin_update(&mut self) -> Option<UpdateTicket> {
        if self.is_updating() {
            get_logger().debug(
                LogComponent::Application("ChartSession"),
                &format!("Update for {} already in flight, skipping", self.key),
            );
            return None;
        }
        self.status = ChartStatus::Updating;
        Some(UpdateTicket { generation: self.generation, key: self.key.clone() })
    }

    pub fn complete_update(
        &mut self,
        ticket: UpdateTicket,
        result: Result<Snapshot, ChartError>,
        replace: bool,
    ) -> UpdateOutcome {
        if ticket.generation != self.generation {
            get_logger().debug(
                LogComponent::Application("ChartSession"),
                &format!("Dropping stale result for {}", ticket.key),
            );
            return UpdateOutcome::Discarded;
        }

        let applied = result.and_then(|snapshot| {
            self.merger.apply_snapshot(&mut self.state, snapshot, replace).map(|_| ())
        });

        match applied {
            Ok(()) => {
                self.status = ChartStatus::Loaded;
                UpdateOutcome::Applied { replace }
            }
            Err(ChartError::NoDataAvailable(reason)) => {
                get_logger().info(
                    LogComponent::Application("ChartSession"),
                    &format!("No data for {}: {}", self.key, reason),
                );
                self.status = self.settled_status();
                UpdateOutcome::NoData(reason)
            }
            Err(error) => {
                get_logger().error(
                    LogComponent::Application("ChartSession"),
                    &format!("Update for {} failed: {}", self.key, error),
                );
                self.status = ChartStatus::Error(error.clone());
                UpdateOutcome::Failed(error)
            }
        }
    }

    /// Merges a pushed delta. Deltas for other charts, or arriving before
    /// the first full snapshot, are ignored.
    pub fn apply_live_update(&mut self, update: LiveUpdate) -> UpdateOutcome {
        if update.key != self.key || self.state.is_none() {
            return UpdateOutcome::Discarded;
        }
        match self.merger.apply_snapshot(&mut self.state, Snapshot::Data(update.snapshot), false) {
            Ok(_) => {
                if !self.is_updating() {
                    self.status = ChartStatus::Loaded;
                }
                UpdateOutcome::Applied { replace: false }
            }
            Err(error) => {
                get_logger().warn(
                    LogComponent::Application("ChartSession"),
                    &format!("Rejected live update for {}: {}", self.key, error),
                );
                UpdateOutcome::Failed(error)
            }
        }
    }

    /// Full reset for a new exchange, symbol or time frame.
    pub fn switch_to(&mut self, key: ChartKey) {
        get_logger().info(
            LogComponent::Application("ChartSession"),
            &format!("Switching chart {} -> {}", self.key, key),
        );
        self.cancel_pending();
        self.key = key;
        self.state = None;
        self.redraw_pending = false;
        self.status = ChartStatus::Uninitialized;
    }

    /// Stops polling and invalidates in-flight work, keeping the drawn state.
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.status = self.settled_status();
    }

    /// Replaces (and aborts) the previous poll task handle.
    pub fn set_poll_handle(&mut self, handle: AbortHandle) {
        if let Some(previous) = self.poll_handle.replace(handle) {
            previous.abort();
        }
    }

    fn cancel_pending(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.poll_handle.take() {
            handle.abort();
        }
    }

    fn settled_status(&self) -> ChartStatus {
        if self.state.is_some() { ChartStatus::Loaded } else { ChartStatus::Uninitialized }
    }
}
