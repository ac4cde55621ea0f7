use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tracing::info;

/// Bounded-concurrency runner with a fixed pause between groups.
///
/// Items are split into consecutive groups of `concurrency`. Members of a
/// group run concurrently; once the whole group has finished the runner
/// sleeps for `delay` before starting the next one (never after the last).
/// The pause is static: it does not react to errors or latency.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    concurrency: usize,
    delay: Duration,
}

impl BatchRunner {
    pub fn new(concurrency: usize, delay: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            delay,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn group_count(&self, items: usize) -> usize {
        items.div_ceil(self.concurrency)
    }

    /// Run `f` over every item. `f` receives the item's index in `items`.
    /// Results come back in input order.
    pub async fn run<'a, T, R, F, Fut>(&self, items: &'a [T], mut f: F) -> Vec<R>
    where
        F: FnMut(usize, &'a T) -> Fut,
        Fut: Future<Output = R>,
    {
        let groups = self.group_count(items.len());
        let mut results = Vec::with_capacity(items.len());

        for (g, chunk) in items.chunks(self.concurrency).enumerate() {
            info!("Processing batch {}/{} ({} items)", g + 1, groups, chunk.len());
            let base = g * self.concurrency;
            let futures: Vec<Fut> = chunk
                .iter()
                .enumerate()
                .map(|(i, item)| f(base + i, item))
                .collect();
            results.extend(join_all(futures).await);

            if g + 1 < groups && !self.delay.is_zero() {
                info!("Waiting {:.1}s before next batch...", self.delay.as_secs_f64());
                tokio::time::sleep(self.delay).await;
            }
        }

        results
    }
}
