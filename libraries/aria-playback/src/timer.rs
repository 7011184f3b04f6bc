//! Wall-clock timer source
//!
//! Serves [`Topic::Tick`] subscriptions with one background thread each,
//! driven by `crossbeam_channel::tick`. Dropping the stop sender ends the
//! thread on its next wake-up.

use crate::signal::{ObserverToken, Signal, SignalSink, SignalSource, Topic};
use crossbeam_channel::{bounded, select, tick, Sender};
use std::collections::HashMap;
use std::thread;
use tracing::{debug, error, warn};

/// Default timer: a ticker thread per subscription
#[derive(Debug, Default)]
pub struct ThreadTimer {
    running: HashMap<ObserverToken, Sender<()>>,
}

impl ThreadTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live ticker threads
    pub fn active(&self) -> usize {
        self.running.len()
    }
}

impl SignalSource for ThreadTimer {
    fn subscribe(&mut self, topic: Topic, sink: SignalSink) {
        let Topic::Tick { interval } = topic else {
            warn!(target: "aria::lifecycle", ?topic, "timer only serves tick topics");
            return;
        };

        let token = sink.token();
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let ticker = tick(interval);

        let spawned = thread::Builder::new()
            .name(format!("aria-timer-{}", token.id()))
            .spawn(move || loop {
                select! {
                    recv(ticker) -> _ => {
                        if !sink.emit(Signal::Tick) {
                            break;
                        }
                    }
                    recv(stop_rx) -> _ => break,
                }
            });

        match spawned {
            Ok(_) => {
                debug!(target: "aria::lifecycle", %token, ?interval, "timer started");
                self.running.insert(token, stop_tx);
            }
            Err(e) => error!(
                target: "aria::lifecycle",
                %token,
                "failed to spawn timer thread: {}",
                e
            ),
        }
    }

    fn unsubscribe(&mut self, token: ObserverToken) {
        if self.running.remove(&token).is_some() {
            debug!(target: "aria::lifecycle", %token, "timer stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Envelope;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn ticks_until_unsubscribed() {
        let (tx, rx) = unbounded();
        let token = ObserverToken::new(1);
        let mut timer = ThreadTimer::new();

        timer.subscribe(
            Topic::Tick {
                interval: Duration::from_millis(5),
            },
            SignalSink::new(token, tx),
        );
        assert_eq!(timer.active(), 1);

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(
            first,
            Envelope::Signal {
                signal: Signal::Tick,
                ..
            }
        ));

        timer.unsubscribe(token);
        assert_eq!(timer.active(), 0);

        // Drain anything emitted before the thread noticed the stop.
        thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ignores_non_tick_topics() {
        let (tx, _rx) = unbounded();
        let mut timer = ThreadTimer::new();
        timer.subscribe(Topic::BufferStatus, SignalSink::new(ObserverToken::new(2), tx));
        assert_eq!(timer.active(), 0);
    }
}
