//! Change notifications from `/mediainfo/ws`.
//!
//! Messages carry no payload we care about; each one only means "metadata may
//! have changed". The socket is wrapped in a stream of [`Notification`]s that
//! survives disconnects according to a [`ReconnectPolicy`].

use futures_util::stream::Stream;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

/// Why the metadata should be fetched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Fired once when the view mounts, before any socket traffic.
    Initial,
    /// The server pushed a message.
    Changed,
    /// The socket came back after a disconnect; changes may have been missed.
    Reconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl ReconnectPolicy {
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self {
            enabled: config.reconnect,
            initial_delay: Duration::from_millis(u64::from(config.reconnect_initial_ms)),
            max_delay: Duration::from_millis(u64::from(config.reconnect_max_ms)),
        }
    }

    /// Delay before reconnect attempt `attempt` (1-based), doubling each time up
    /// to `max_delay`. `None` when reconnecting is disabled.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.initial_delay.saturating_mul(1u32 << exponent);
        Some(delay.min(self.max_delay))
    }
}

/// A connected-or-connecting socket whose items are raw messages.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub trait LiveSocket: Stream + Unpin {
    /// Whether the handshake has completed. Opening a socket object says
    /// nothing about whether the server is reachable.
    fn is_open(&self) -> bool;
}

#[cfg(target_arch = "wasm32")]
impl LiveSocket for gloo_net::websocket::futures::WebSocket {
    fn is_open(&self) -> bool {
        matches!(self.state(), gloo_net::websocket::State::Open)
    }
}

/// How often a pending handshake is checked.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const OPEN_POLL: Duration = Duration::from_millis(100);

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct SocketState<C, S, F> {
    url: String,
    policy: ReconnectPolicy,
    connect: C,
    on_status: F,
    socket: Option<S>,
    opened: bool,
    failed_attempts: u32,
    ever_connected: bool,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl<C, S, F> SocketState<C, S, F>
where
    F: FnMut(ConnectionStatus),
{
    /// The current socket completed its handshake. Returns `true` when this
    /// is a reconnect rather than the first connection.
    fn mark_open(&mut self) -> bool {
        tracing::info!("notification socket open: {}", self.url);
        self.opened = true;
        self.failed_attempts = 0;
        (self.on_status)(ConnectionStatus::Connected);
        std::mem::replace(&mut self.ever_connected, true)
    }

    fn mark_lost(&mut self, reason: &str) {
        if self.opened {
            tracing::warn!("notification socket closed: {reason}");
            self.failed_attempts = 1;
        } else {
            tracing::warn!("notification socket never opened: {reason}");
            self.failed_attempts = self.failed_attempts.saturating_add(1);
        }
        self.socket = None;
        self.opened = false;
        (self.on_status)(ConnectionStatus::Disconnected);
    }
}

/// Turn a socket factory into a stream of [`Notification`]s that reconnects
/// according to `policy`.
///
/// Failures before a socket ever opens keep counting up, so the delay grows;
/// the count resets only after a completed handshake. A connection that comes
/// back after a drop yields [`Notification::Reconnected`].
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub fn reconnecting_notifications<C, S, M, E, CE, F>(
    url: String,
    policy: ReconnectPolicy,
    connect: C,
    on_status: F,
) -> impl Stream<Item = Notification>
where
    C: FnMut(&str) -> Result<S, CE>,
    CE: std::fmt::Display,
    S: LiveSocket<Item = Result<M, E>>,
    E: std::fmt::Display,
    F: FnMut(ConnectionStatus),
{
    use futures_util::future::{select, Either};
    use futures_util::StreamExt;
    use std::pin::pin;

    let state: SocketState<_, S, _> = SocketState {
        url,
        policy,
        connect,
        on_status,
        socket: None,
        opened: false,
        failed_attempts: 0,
        ever_connected: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(socket) = state.socket.as_mut() {
                if state.opened {
                    match socket.next().await {
                        Some(Ok(_)) => {
                            tracing::debug!("mediainfo notification received");
                            return Some((Notification::Changed, state));
                        }
                        Some(Err(err)) => state.mark_lost(&err.to_string()),
                        None => state.mark_lost("stream ended"),
                    }
                } else if socket.is_open() {
                    if state.mark_open() {
                        return Some((Notification::Reconnected, state));
                    }
                    continue;
                } else {
                    let waited = {
                        let timer = pin!(crate::utils::sleep(OPEN_POLL));
                        match select(socket.next(), timer).await {
                            Either::Left((item, _)) => Some(item),
                            Either::Right(_) => None,
                        }
                    };
                    match waited {
                        None => {}
                        Some(Some(Ok(_))) => {
                            // A message proves the handshake finished.
                            let notification = if state.mark_open() {
                                Notification::Reconnected
                            } else {
                                Notification::Changed
                            };
                            return Some((notification, state));
                        }
                        Some(Some(Err(err))) => state.mark_lost(&err.to_string()),
                        Some(None) => state.mark_lost("stream ended"),
                    }
                }
                if state.socket.is_some() {
                    continue;
                }
            }

            if state.failed_attempts > 0 {
                let Some(delay) = state.policy.delay_for(state.failed_attempts) else {
                    tracing::info!("reconnect disabled; no further notifications");
                    return None;
                };
                tracing::info!(
                    "reconnecting to {} in {}ms (attempt {})",
                    state.url,
                    delay.as_millis(),
                    state.failed_attempts
                );
                crate::utils::sleep(delay).await;
            }

            (state.on_status)(ConnectionStatus::Connecting);
            match (state.connect)(&state.url) {
                Ok(socket) => {
                    state.socket = Some(socket);
                    state.opened = false;
                }
                Err(err) => {
                    let reason = format!("could not open {}: {err}", state.url);
                    state.mark_lost(&reason);
                }
            }
        }
    })
}

#[cfg(target_arch = "wasm32")]
pub fn notification_stream<F>(
    url: String,
    policy: ReconnectPolicy,
    on_status: F,
) -> impl Stream<Item = Notification>
where
    F: FnMut(ConnectionStatus) + 'static,
{
    use gloo_net::websocket::futures::WebSocket;

    reconnecting_notifications(url, policy, |url: &str| WebSocket::open(url), on_status)
}

/// Native builds have no browser socket: report the disconnect and end at once.
#[cfg(not(target_arch = "wasm32"))]
pub fn notification_stream<F>(
    url: String,
    _policy: ReconnectPolicy,
    mut on_status: F,
) -> impl Stream<Item = Notification>
where
    F: FnMut(ConnectionStatus) + 'static,
{
    tracing::warn!("live notifications from {url} need a browser; showing a single snapshot");
    on_status(ConnectionStatus::Disconnected);
    futures_util::stream::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::with_timeout;
    use futures_util::stream::{self, LocalBoxStream, StreamExt};
    use std::cell::{Cell, RefCell};
    use std::pin::{pin, Pin};
    use std::rc::Rc;
    use std::task::{Context, Poll};
    use tokio::time::Instant;

    fn policy(enabled: bool) -> ReconnectPolicy {
        ReconnectPolicy {
            enabled,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
        }
    }

    #[test]
    fn backoff_doubles_up_to_ceiling() {
        let policy = policy(true);
        let delays: Vec<u128> = (1..=7)
            .map(|attempt| policy.delay_for(attempt).unwrap().as_millis())
            .collect();
        assert_eq!(delays, [1000, 2000, 4000, 8000, 16000, 30000, 30000]);
        assert_eq!(policy.delay_for(u32::MAX), Some(Duration::from_millis(30_000)));
    }

    #[test]
    fn disabled_policy_never_reconnects() {
        assert_eq!(policy(false).delay_for(1), None);
    }

    #[test]
    fn policy_reads_config() {
        let config = crate::config::AppConfig {
            reconnect: false,
            reconnect_initial_ms: 250,
            reconnect_max_ms: 4000,
            ..Default::default()
        };
        let policy = ReconnectPolicy::from_config(&config);
        assert!(!policy.enabled);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_millis(4000));
    }

    struct FakeSocket {
        open: bool,
        events: LocalBoxStream<'static, Result<(), String>>,
    }

    impl FakeSocket {
        /// Handshake never completes; the first read reports the failure.
        fn refused() -> Self {
            Self {
                open: false,
                events: stream::iter([Err("connection refused".to_string())]).boxed_local(),
            }
        }

        /// Open socket that delivers `messages` and then closes.
        fn open_then_close(messages: usize) -> Self {
            Self {
                open: true,
                events: stream::iter(std::iter::repeat(Ok(())).take(messages)).boxed_local(),
            }
        }

        fn open_forever() -> Self {
            Self {
                open: true,
                events: stream::pending().boxed_local(),
            }
        }
    }

    impl Stream for FakeSocket {
        type Item = Result<(), String>;

        fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            self.events.poll_next_unpin(cx)
        }
    }

    impl LiveSocket for FakeSocket {
        fn is_open(&self) -> bool {
            self.open
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<ConnectionStatus>>>, impl FnMut(ConnectionStatus)) {
        let statuses = Rc::new(RefCell::new(Vec::new()));
        let sink = statuses.clone();
        (statuses, move |status| sink.borrow_mut().push(status))
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_server_backs_off_exponentially() {
        let attempts = RefCell::new(Vec::new());
        let (statuses, on_status) = recorder();
        let notifications = reconnecting_notifications(
            "ws://radio.test/mediainfo/ws".to_string(),
            policy(true),
            |_: &str| {
                attempts.borrow_mut().push(Instant::now());
                Ok::<_, String>(FakeSocket::refused())
            },
            on_status,
        );
        let mut notifications = pin!(notifications);

        let first = with_timeout(Duration::from_millis(7_500), notifications.next()).await;
        assert_eq!(first, None);

        let attempts = attempts.borrow();
        let gaps: Vec<u64> = attempts
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).as_secs_f64().round() as u64)
            .collect();
        assert_eq!(gaps, [1, 2, 4]);
        assert!(!statuses.borrow().contains(&ConnectionStatus::Connected));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_after_open_reconnects_once() {
        let calls = Cell::new(0);
        let (statuses, on_status) = recorder();
        let notifications = reconnecting_notifications(
            "ws://radio.test/mediainfo/ws".to_string(),
            policy(true),
            |_: &str| {
                calls.set(calls.get() + 1);
                Ok::<_, String>(if calls.get() == 1 {
                    FakeSocket::open_then_close(1)
                } else {
                    FakeSocket::open_forever()
                })
            },
            on_status,
        );
        let mut notifications = pin!(notifications);

        assert_eq!(notifications.next().await, Some(Notification::Changed));
        assert_eq!(notifications.next().await, Some(Notification::Reconnected));
        assert_eq!(
            with_timeout(Duration::from_secs(60), notifications.next()).await,
            None
        );

        assert_eq!(calls.get(), 2);
        assert_eq!(
            *statuses.borrow(),
            [
                ConnectionStatus::Connecting,
                ConnectionStatus::Connected,
                ConnectionStatus::Disconnected,
                ConnectionStatus::Connecting,
                ConnectionStatus::Connected,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_reconnect_ends_after_first_close() {
        let calls = Cell::new(0);
        let (statuses, on_status) = recorder();
        let notifications = reconnecting_notifications(
            "ws://radio.test/mediainfo/ws".to_string(),
            policy(false),
            |_: &str| {
                calls.set(calls.get() + 1);
                Ok::<_, String>(FakeSocket::open_then_close(1))
            },
            on_status,
        );

        let received: Vec<Notification> = notifications.collect().await;
        assert_eq!(received, [Notification::Changed]);
        assert_eq!(calls.get(), 1);
        assert_eq!(statuses.borrow().last(), Some(&ConnectionStatus::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_open_counts_toward_backoff() {
        let attempts = RefCell::new(Vec::new());
        let (_, on_status) = recorder();
        let notifications = reconnecting_notifications(
            "ws://radio.test/mediainfo/ws".to_string(),
            policy(true),
            |_: &str| {
                attempts.borrow_mut().push(Instant::now());
                Err::<FakeSocket, _>("bad url".to_string())
            },
            on_status,
        );
        let mut notifications = pin!(notifications);

        assert_eq!(
            with_timeout(Duration::from_millis(3_500), notifications.next()).await,
            None
        );
        assert_eq!(attempts.borrow().len(), 3);
    }
}
