//! Timer helpers shared by the fetch and socket layers.

use futures_util::future::{select, Either};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

/// Wait for `duration` on whichever timer the platform provides.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Run `future` for at most `duration`. Returns `None` when time runs out; the
/// future is dropped at that point.
pub async fn with_timeout<F: Future>(duration: Duration, future: F) -> Option<F::Output> {
    let future = pin!(future);
    let timer = pin!(sleep(duration));
    match select(future, timer).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}

/// Millisecond timestamp used to defeat the browser's image cache.
pub fn cache_bust_token() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn gives_up_on_a_hung_future() {
        let result = with_timeout(Duration::from_secs(5), std::future::pending::<u8>()).await;
        assert_eq!(result, None);
    }

    #[tokio::test(start_paused = true)]
    async fn passes_through_a_fast_future() {
        let result = with_timeout(Duration::from_secs(5), async {
            sleep(Duration::from_millis(10)).await;
            7u8
        })
        .await;
        assert_eq!(result, Some(7));
    }
}
