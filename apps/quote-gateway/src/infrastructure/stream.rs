//! Simulated Tick Stream
//!
//! Synthetic price tick source for the SSE endpoint. Emits one random tick
//! per interval, starting immediately, and ends on its own once the
//! configured duration cap elapses. The unbounded and time-capped variants
//! are the same loop with `max_duration` set to `None` or `Some`.
//!
//! The stream is pull-driven: when the SSE connection drops, the stream is
//! dropped with it and emission stops. Nothing here touches real market
//! data.

use std::time::Duration;

use futures::Stream;
use tokio::time::{Instant, Interval};

use crate::domain::market_data::StreamTick;
use crate::infrastructure::config::StreamSettings;

/// Build the synthetic tick stream.
///
/// The first tick is emitted immediately; each subsequent tick follows one
/// `interval` later. With `max_duration` set, the stream closes server-side
/// once the cap has elapsed instead of emitting a final tick.
pub fn tick_stream(
    interval: Duration,
    max_duration: Option<Duration>,
) -> impl Stream<Item = StreamTick> + use<> {
    let deadline = max_duration.map(|max| Instant::now() + max);
    let ticker = tokio::time::interval(interval);

    futures::stream::unfold(ticker, move |mut ticker: Interval| async move {
        ticker.tick().await;

        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            return None;
        }

        Some((StreamTick::sample(), ticker))
    })
}

/// Build the tick stream from settings.
///
/// The returned stream captures nothing from `settings`, so it can outlive
/// the handler that built it.
pub fn tick_stream_from_settings(
    settings: &StreamSettings,
) -> impl Stream<Item = StreamTick> + use<> {
    tick_stream(settings.tick_interval, settings.max_duration)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{TICK_PRICE_MAX, TICK_PRICE_MIN};
    use futures::StreamExt;

    #[tokio::test(start_paused = true)]
    async fn emits_one_tick_per_interval() {
        let mut stream = Box::pin(tick_stream(Duration::from_secs(1), None));

        // First tick arrives immediately, before any time has passed.
        let first = stream.next().await.unwrap();
        assert!(first.price >= TICK_PRICE_MIN && first.price < TICK_PRICE_MAX);

        // Four more ticks complete a 5-second observation window, each one
        // interval of virtual time apart.
        for _ in 0..4 {
            let before = tokio::time::Instant::now();
            let tick = stream.next().await.unwrap();
            assert!(tick.price >= TICK_PRICE_MIN && tick.price < TICK_PRICE_MAX);
            assert_eq!(before.elapsed(), Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_stream_closes_at_the_cap() {
        let stream = tick_stream(Duration::from_secs(1), Some(Duration::from_secs(5)));
        let ticks: Vec<StreamTick> = stream.collect().await;

        // Ticks at t = 0s..4s; the t = 5s wakeup hits the deadline and
        // closes the stream instead of emitting.
        assert_eq!(ticks.len(), 5);
        assert!(
            ticks
                .iter()
                .all(|t| t.price >= TICK_PRICE_MIN && t.price < TICK_PRICE_MAX)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_stream_keeps_emitting() {
        let stream = tick_stream(Duration::from_secs(1), None);
        let ticks: Vec<StreamTick> = stream.take(120).collect().await;
        assert_eq!(ticks.len(), 120);
    }

    #[tokio::test(start_paused = true)]
    async fn stream_outlives_the_settings_it_was_built_from() {
        // The SSE handler drops its state before the connection finishes
        // consuming the stream; the stream must not borrow the settings.
        let stream = {
            let settings = StreamSettings {
                tick_interval: Duration::from_secs(1),
                max_duration: Some(Duration::from_secs(2)),
            };
            tick_stream_from_settings(&settings)
        };

        let ticks: Vec<StreamTick> = stream.collect().await;
        assert_eq!(ticks.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_variant_matches_direct_construction() {
        let settings = StreamSettings {
            tick_interval: Duration::from_millis(250),
            max_duration: Some(Duration::from_secs(1)),
        };

        let ticks: Vec<StreamTick> = tick_stream_from_settings(&settings).collect().await;
        // t = 0, 250, 500, 750 ms; the 1000 ms wakeup closes the stream.
        assert_eq!(ticks.len(), 4);
    }
}
