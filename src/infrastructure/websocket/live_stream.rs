use futures::StreamExt;
use gloo_net::websocket::{Message, futures::WebSocket};
use gloo_timers::future::sleep;
use std::time::Duration;

use crate::domain::{
    chart::LiveUpdate,
    errors::ChartError,
    logging::{LogComponent, get_logger},
};
use crate::infrastructure::dto::parse_live_update;

const MAX_BACKOFF_SECS: u64 = 32;

/// Doubles the reconnect delay up to a cap.
pub fn next_backoff(delay_secs: u64) -> u64 {
    (delay_secs.max(1) * 2).min(MAX_BACKOFF_SECS)
}

/// Reconnect schedule. Opening a socket succeeds before the handshake, so
/// only a connection that delivered a frame counts as healthy and resets
/// the delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectBackoff {
    delay_secs: u64,
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self { delay_secs: 1 }
    }
}

impl ReconnectBackoff {
    /// Delay before the next attempt, given whether the connection that
    /// just ended received anything.
    pub fn after_disconnect(&mut self, received_frames: bool) -> Duration {
        if received_frames {
            self.delay_secs = 1;
        }
        let delay = self.delay_secs;
        self.delay_secs = next_backoff(delay);
        Duration::from_secs(delay)
    }
}

/// WebSocket client for chart deltas; reconnects forever with backoff.
/// Run it inside an abortable task to stop it.
pub struct LiveUpdateStream {
    url: String,
}

impl LiveUpdateStream {
    pub fn new(url: &str) -> Self {
        Self { url: url.to_string() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn connect(&self) -> Result<WebSocket, ChartError> {
        get_logger().info(
            LogComponent::Infrastructure("LiveStream"),
            &format!("Connecting to {}", self.url),
        );
        WebSocket::open(&self.url)
            .map_err(|e| ChartError::Transport(format!("failed to open WebSocket: {e:?}")))
    }

    pub fn parse_message(&self, frame: &str) -> Result<LiveUpdate, ChartError> {
        parse_live_update(frame)
    }

    pub async fn run<F, R>(&self, mut handler: F, mut on_reconnect: R)
    where
        F: FnMut(LiveUpdate),
        R: FnMut(),
    {
        let mut backoff = ReconnectBackoff::default();
        loop {
            let received_frames = match self.connect() {
                Ok(socket) => self.pump(socket, &mut handler).await,
                Err(e) => {
                    get_logger().error(LogComponent::Infrastructure("LiveStream"), &e.to_string());
                    false
                }
            };

            let delay = backoff.after_disconnect(received_frames);
            get_logger().warn(
                LogComponent::Infrastructure("LiveStream"),
                &format!("Reconnecting in {}s", delay.as_secs()),
            );
            on_reconnect();
            sleep(delay).await;
        }
    }

    /// Reads frames until the socket closes. Returns whether any arrived.
    async fn pump<F>(&self, mut socket: WebSocket, handler: &mut F) -> bool
    where
        F: FnMut(LiveUpdate),
    {
        let mut received = false;
        while let Some(message) = socket.next().await {
            match message {
                Ok(Message::Text(frame)) => {
                    received = true;
                    match self.parse_message(&frame) {
                        Ok(update) => handler(update),
                        Err(e) => get_logger().warn(
                            LogComponent::Infrastructure("LiveStream"),
                            &format!("Ignoring frame: {e}"),
                        ),
                    }
                }
                Ok(Message::Bytes(_)) => received = true,
                Err(e) => {
                    get_logger().error(
                        LogComponent::Infrastructure("LiveStream"),
                        &format!("WebSocket error: {e:?}"),
                    );
                    break;
                }
            }
        }
        received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let mut delay = 1;
        let mut seen = Vec::new();
        for _ in 0..7 {
            delay = next_backoff(delay);
            seen.push(delay);
        }
        assert_eq!(seen, vec![2, 4, 8, 16, 32, 32, 32]);
        assert_eq!(next_backoff(0), 2);
    }

    #[test]
    fn silent_connections_keep_backing_off() {
        let mut backoff = ReconnectBackoff::default();
        let delays: Vec<u64> = (0..7).map(|_| backoff.after_disconnect(false).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 32, 32]);
    }

    #[test]
    fn a_received_frame_resets_the_delay() {
        let mut backoff = ReconnectBackoff::default();
        for _ in 0..4 {
            backoff.after_disconnect(false);
        }
        assert_eq!(backoff.after_disconnect(true), Duration::from_secs(1));
        assert_eq!(backoff.after_disconnect(false), Duration::from_secs(2));
    }
}
