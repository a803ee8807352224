// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Background request dispatch.
//!
//! Runs one forecast request per click on a tokio runtime and hands the
//! outcomes back to the UI thread through a channel. Requests are never
//! cancelled individually; completions are delivered in arrival order.

use std::sync::Arc;

use log::debug;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::handler::{Completion, ForecastTicket, MapClickHandler, Notifier};
use crate::http::ForecastApi;
use crate::protocol::{ForecastError, ForecastResult};

/// Outcome of one dispatched request.
#[derive(Debug, Clone)]
pub struct ForecastCompletion {
    pub ticket: ForecastTicket,
    pub outcome: Result<ForecastResult, ForecastError>,
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Spawns forecast requests and collects their completions.
pub struct Dispatcher<A> {
    api: Arc<A>,
    runtime: Handle,
    completion_tx: mpsc::UnboundedSender<ForecastCompletion>,
    completion_rx: mpsc::UnboundedReceiver<ForecastCompletion>,
    cancel_token: CancellationToken,
    waker: Waker,
}

impl<A> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl<A: ForecastApi + 'static> Dispatcher<A> {
    /// Create a dispatcher that spawns requests on `runtime`.
    pub fn new(api: A, runtime: Handle) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            api: Arc::new(api),
            runtime,
            completion_tx,
            completion_rx,
            cancel_token: CancellationToken::new(),
            waker: Arc::new(|| {}),
        }
    }

    /// Call `waker` after each completion is queued (e.g. to request a repaint).
    #[must_use]
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Arc::new(waker);
        self
    }

    /// Start the request for `ticket` in the background.
    pub fn dispatch(&self, ticket: ForecastTicket) {
        let api = Arc::clone(&self.api);
        let completion_tx = self.completion_tx.clone();
        let cancel_token = self.cancel_token.clone();
        let waker = Arc::clone(&self.waker);

        self.runtime.spawn(async move {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    debug!("Dropped request #{} on shutdown", ticket.generation);
                }
                outcome = api.fetch(ticket.coordinate) => {
                    if completion_tx.send(ForecastCompletion { ticket, outcome }).is_ok() {
                        waker();
                    }
                }
            }
        });
    }

    /// Next queued completion, without waiting.
    pub fn try_next(&mut self) -> Option<ForecastCompletion> {
        self.completion_rx.try_recv().ok()
    }

    /// Wait for the next completion.
    ///
    /// The dispatcher holds a sender itself, so this only returns `None`
    /// if the channel is closed, which does not happen while it is alive.
    pub async fn next(&mut self) -> Option<ForecastCompletion> {
        self.completion_rx.recv().await
    }

    /// Apply every queued completion to `handler`, in arrival order.
    pub fn drain_into<N: Notifier>(&mut self, handler: &mut MapClickHandler<N>) -> Vec<Completion> {
        let mut applied = Vec::new();
        while let Some(completion) = self.try_next() {
            applied.push(handler.complete(completion.ticket, completion.outcome));
        }
        applied
    }

    /// Abandon all outstanding requests.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl<A> Drop for Dispatcher<A> {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;
    use crate::handler::{HandlerOptions, LogNotifier};
    use crate::protocol::{Forecast, Location};
    use std::time::Duration;

    /// Answers after a delay that depends on the latitude, echoing it as the temperature.
    struct DelayedApi;

    impl ForecastApi for DelayedApi {
        async fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResult, ForecastError> {
            let delay = if coordinate.latitude() > 52.0 { 10 } else { 150 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(ForecastResult {
                forecast: Forecast {
                    temperature_max_c: coordinate.latitude(),
                    rain_sum_mm: 0.0,
                    wind_speed_kmh: 5.0,
                    date: None,
                    description: None,
                },
                location: Location {
                    elevation: 10.0,
                    lat: None,
                    long: None,
                },
            })
        }
    }

    async fn wait_for(dispatcher: &mut Dispatcher<DelayedApi>) -> ForecastCompletion {
        tokio::time::timeout(Duration::from_secs(5), dispatcher.next())
            .await
            .expect("completion timed out")
            .expect("channel closed")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_completions_arrive_in_completion_order() {
        let mut dispatcher = Dispatcher::new(DelayedApi, Handle::current());
        let mut handler = MapClickHandler::new(LogNotifier);

        let slow = handler.click(51.0, 0.0);
        dispatcher.dispatch(slow);
        let fast = handler.click(53.0, 0.0);
        dispatcher.dispatch(fast);

        let first = wait_for(&mut dispatcher).await;
        let second = wait_for(&mut dispatcher).await;
        assert_eq!(first.ticket, fast);
        assert_eq!(second.ticket, slow);

        handler.complete(first.ticket, first.outcome);
        handler.complete(second.ticket, second.outcome);

        // the slower, older request arrived last and wins
        assert_eq!(handler.display().unwrap().temp, "51");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_drain_with_stale_guard() {
        let mut dispatcher = Dispatcher::new(DelayedApi, Handle::current());
        let options = HandlerOptions {
            discard_stale_responses: true,
            ..Default::default()
        };
        let mut handler = MapClickHandler::with_options(LogNotifier, options);

        dispatcher.dispatch(handler.click(51.0, 0.0));
        dispatcher.dispatch(handler.click(53.0, 0.0));

        tokio::time::sleep(Duration::from_millis(400)).await;
        let applied = dispatcher.drain_into(&mut handler);

        assert_eq!(applied, vec![Completion::Rendered, Completion::Discarded]);
        assert_eq!(handler.display().unwrap().temp, "53");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_waker_called_per_completion() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let mut dispatcher = Dispatcher::new(DelayedApi, Handle::current())
            .with_waker(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let mut handler = MapClickHandler::new(LogNotifier);

        dispatcher.dispatch(handler.click(53.0, 0.0));
        wait_for(&mut dispatcher).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_drops_outstanding_requests() {
        let mut dispatcher = Dispatcher::new(DelayedApi, Handle::current());
        let mut handler = MapClickHandler::new(LogNotifier);

        dispatcher.dispatch(handler.click(51.0, 0.0));
        dispatcher.shutdown();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(dispatcher.try_next().is_none());
    }
}
