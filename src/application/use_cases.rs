use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::{
    config::{ChartConfig, RetryPolicy},
    session::{ChartSession, UpdateOutcome},
};
use crate::domain::{
    chart::{ChartMeta, ChartState, LiveUpdate, Snapshot, SnapshotSource},
    errors::ChartError,
    logging::{LogComponent, LogLevel, get_logger},
    market_data::ChartKey,
};

/// Async delay, backed by browser timers in production.
#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// Pushes a reconciled chart into whatever draws it.
pub trait ChartRenderer {
    fn render(&self, state: &ChartState, meta: &ChartMeta, replace: bool) -> Result<(), ChartError>;
    /// Inline message in place of the chart.
    fn show_error(&self, error: &ChartError);
    /// Hide the chart and reveal the default view, if any.
    fn show_no_data(&self, reason: &str);
}

/// Fetches a snapshot, retrying transport failures only.
pub async fn fetch_with_retry<S, T>(
    source: &S,
    key: &ChartKey,
    policy: &RetryPolicy,
    timer: &T,
) -> Result<Snapshot, ChartError>
where
    S: SnapshotSource,
    T: Timer,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match source.fetch_snapshot(key).await {
            Err(error) if error.is_retryable() && attempt < max_attempts => {
                get_logger().warn(
                    LogComponent::Application("FetchWithRetry"),
                    &format!(
                        "Attempt {}/{} for {} failed: {}. Retrying in {}ms",
                        attempt, max_attempts, key, error, policy.delay_ms
                    ),
                );
                timer.sleep(policy.delay()).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Drives fetch -> merge -> render for chart sessions.
pub struct ChartRefresher<S, R, T> {
    source: S,
    renderer: R,
    timer: T,
    config: ChartConfig,
}

impl<S, R, T> ChartRefresher<S, R, T>
where
    S: SnapshotSource,
    R: ChartRenderer,
    T: Timer,
{
    pub fn new(source: S, renderer: R, timer: T, config: ChartConfig) -> Self {
        Self { source, renderer, timer, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// One update cycle. The session is never borrowed across an await, so
    /// overlapping calls see the `Updating` status and are skipped.
    pub async fn refresh(&self, session: &Rc<RefCell<ChartSession>>, replace: bool) -> UpdateOutcome {
        let Some(ticket) = session.borrow_mut().begin_update() else {
            return UpdateOutcome::Skipped;
        };

        let result = fetch_with_retry(&self.source, ticket.key(), &self.config.retry, &self.timer).await;
        let outcome = session.borrow_mut().complete_update(ticket, result, replace);
        self.present(session, outcome)
    }

    /// Applies a pushed delta and draws it incrementally.
    pub fn apply_live(&self, session: &Rc<RefCell<ChartSession>>, update: LiveUpdate) -> UpdateOutcome {
        let outcome = session.borrow_mut().apply_live_update(update);
        match outcome {
            UpdateOutcome::Applied { .. } => self.present(session, outcome),
            other => other,
        }
    }

    /// Polls until the session is switched or stopped. The next fetch is
    /// scheduled only once the previous one has completed.
    pub async fn poll(&self, session: &Rc<RefCell<ChartSession>>) {
        let generation = session.borrow().generation();
        get_logger().info(
            LogComponent::Application("ChartRefresher"),
            &format!(
                "Polling {} every {}ms",
                session.borrow().key(),
                self.config.poll_interval_ms
            ),
        );

        loop {
            let replace = session.borrow().state().is_none();
            let outcome = self.refresh(session, replace).await;
            if outcome == UpdateOutcome::Discarded || session.borrow().generation() != generation {
                break;
            }
            self.timer.sleep(self.config.poll_interval()).await;
            if session.borrow().generation() != generation {
                break;
            }
        }

        get_logger().debug(LogComponent::Application("ChartRefresher"), "Polling stopped");
    }

    /// Hands the outcome to the renderer. A failed draw turns the outcome
    /// into `Failed` and forces the next draw to rebuild the plot.
    fn present(&self, session: &Rc<RefCell<ChartSession>>, outcome: UpdateOutcome) -> UpdateOutcome {
        match outcome {
            UpdateOutcome::Applied { replace } => {
                let drawn = {
                    let session = session.borrow();
                    session.state().map(|state| {
                        let replace = replace || session.needs_redraw();
                        let meta = ChartMeta::for_key(session.key(), self.config.y_axis);
                        self.renderer.render(state, &meta, replace).map(|()| replace)
                    })
                };
                match drawn {
                    Some(Ok(replace)) => {
                        session.borrow_mut().render_succeeded();
                        UpdateOutcome::Applied { replace }
                    }
                    Some(Err(error)) => {
                        get_logger().log_with_metadata(
                            LogLevel::Error,
                            LogComponent::Application("ChartRefresher"),
                            &format!("Failed to render {}", session.borrow().key()),
                            &format!("kind={} error={}", error.kind(), error),
                        );
                        session.borrow_mut().render_failed(error.clone());
                        self.renderer.show_error(&error);
                        UpdateOutcome::Failed(error)
                    }
                    None => UpdateOutcome::Applied { replace },
                }
            }
            UpdateOutcome::NoData(reason) => {
                self.renderer.show_no_data(&reason);
                UpdateOutcome::NoData(reason)
            }
            UpdateOutcome::Failed(error) => {
                self.renderer.show_error(&error);
                UpdateOutcome::Failed(error)
            }
            other => other,
        }
    }
}
