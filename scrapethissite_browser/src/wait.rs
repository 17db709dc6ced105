//! Bounded polling waits and the navigation helpers built on them.
//!
//! Every wait checks its condition immediately, then again every `interval`
//! until `timeout` has elapsed. Transient failures (no match yet, stale
//! handles) count as "not yet"; anything else aborts the wait.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::{Driver, Element, Error, Locator};

/// Default bound for page-load waits.
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(10);
/// Interval between `document.readyState` checks.
pub const READY_STATE_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout and poll interval for a polling wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            interval: Duration::from_millis(250),
        }
    }
}

impl WaitOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Polls `probe` until it yields `Some`, or fails with [`Error::Timeout`].
pub async fn poll_until<T, F, Fut>(what: &str, options: WaitOptions, mut probe: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, Error>>,
{
    let started = Instant::now();
    let mut last_error: Option<String> = None;
    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) if e.is_transient() => {
                tracing::debug!("Still waiting for {}: {}", what, e);
                last_error = Some(e.to_string());
            }
            Err(e) => return Err(e),
        }

        let elapsed = started.elapsed();
        if elapsed >= options.timeout {
            tracing::warn!("Gave up waiting for {} after {:?}", what, elapsed);
            return Err(Error::Timeout {
                what: what.to_string(),
                waited: elapsed,
                last_error,
            });
        }
        sleep(options.interval.min(options.timeout - elapsed)).await;
    }
}

/// Waits until `document.readyState` is `complete`.
pub async fn wait_for_ready_state<D: Driver>(driver: &D, timeout: Duration) -> Result<(), Error> {
    let options = WaitOptions::new(timeout, READY_STATE_INTERVAL);
    poll_until("document ready state", options, || async move {
        let state = driver.ready_state().await?;
        Ok((state == "complete").then_some(()))
    })
    .await
}

/// Loads `url` and waits for the page to finish loading.
pub async fn navigate<D: Driver>(driver: &D, url: &str, timeout: Duration) -> Result<(), Error> {
    tracing::info!("Navigate to '{}' and wait for the page to load completely", url);
    driver.goto(url).await?;
    wait_for_ready_state(driver, timeout).await
}

/// Waits until the first element matching `locator` is displayed and returns it.
pub async fn wait_for_visible<D: Driver>(
    driver: &D,
    locator: &Locator,
    options: WaitOptions,
) -> Result<D::Element, Error> {
    let what = format!("{} to be visible", locator);
    poll_until(&what, options, || async move {
        let Some(first) = driver.find_all(locator).await?.into_iter().next() else {
            return Ok(None);
        };
        let displayed = first.is_displayed().await?;
        Ok(displayed.then_some(first))
    })
    .await
}

/// Waits until the element is visible, then clicks it.
pub async fn click_when_visible<D: Driver>(
    driver: &D,
    locator: &Locator,
    options: WaitOptions,
) -> Result<(), Error> {
    tracing::info!("Clicking {}", locator);
    let element = wait_for_visible(driver, locator, options).await?;
    element.click().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(timeout_ms: u64, interval_ms: u64) -> WaitOptions {
        WaitOptions::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(interval_ms),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn poll_returns_as_soon_as_condition_holds() {
        let mut calls = 0;
        let started = Instant::now();
        let value = poll_until("third call", options(10_000, 250), || {
            calls += 1;
            let n = calls;
            async move { Ok((n >= 3).then_some(n)) }
        })
        .await
        .unwrap();
        assert_eq!(value, 3);
        assert_eq!(started.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn poll_times_out_after_bound() {
        let mut calls = 0;
        let err = poll_until("never", options(1_000, 250), || {
            calls += 1;
            async { Ok::<Option<()>, Error>(None) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls, 5);
        match err {
            Error::Timeout { what, waited, .. } => {
                assert_eq!(what, "never");
                assert_eq!(waited, Duration::from_secs(1));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn poll_keeps_last_transient_error() {
        let err = poll_until("table", options(500, 250), || async {
            Err::<Option<()>, Error>(Error::NotFound {
                locator: "css `table`".into(),
            })
        })
        .await
        .unwrap_err();

        match err {
            Error::Timeout { last_error, .. } => {
                assert!(last_error.unwrap().contains("css `table`"));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn poll_aborts_on_fatal_error() {
        let mut calls = 0;
        let err = poll_until("session", options(5_000, 250), || {
            calls += 1;
            async { Err::<Option<()>, Error>(Error::Session("gone".into())) }
        })
        .await
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, Error::Session(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn final_sleep_is_clamped_to_the_timeout() {
        let started = Instant::now();
        let _ = poll_until("clamped", options(600, 250), || async {
            Ok::<Option<()>, Error>(None)
        })
        .await;
        assert_eq!(started.elapsed(), Duration::from_millis(600));
    }
}
