//! Session timer engine
//!
//! Wraps [`TimerCore`] behind a single mutex. Every operation, the tick loop
//! and the presence controller go through [`SessionTimer::with_lock`], so
//! transitions never interleave and snapshots are never torn. Events queued by
//! the core are broadcast before the lock is released, which keeps observers
//! in transition order.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::{sync::broadcast, task::JoinHandle, time::Instant};
use tracing::{debug, info, trace};

use crate::{error::TimerError, tasks::tick_loop};

use super::{
    SessionType, TickOutcome, TimerCore, TimerEvent, TimerPhase, TimerSettings, TimerSnapshot,
};

/// Wall-clock length of one tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug)]
struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
struct EngineState {
    core: TimerCore,
    ticker: Option<Ticker>,
    generation: u64,
}

/// Shared handle to the one timer instance. Cloning is cheap and every clone
/// drives the same state.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    inner: Arc<Mutex<EngineState>>,
    events_tx: broadcast::Sender<TimerEvent>,
    tick_period: Duration,
}

impl SessionTimer {
    pub fn new(settings: TimerSettings) -> Self {
        Self::with_tick_period(settings, TICK_PERIOD)
    }

    pub fn with_tick_period(settings: TimerSettings, tick_period: Duration) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Mutex::new(EngineState {
                core: TimerCore::new(&settings),
                ticker: None,
                generation: 0,
            })),
            events_tx,
            tick_period,
        }
    }

    /// Receive every event emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Run `f` with exclusive access to the timer's public operations.
    /// Events produced inside are published before the lock is released.
    pub fn with_lock<T, F>(&self, f: F) -> Result<T, TimerError>
    where
        F: FnOnce(&mut LockedTimer<'_>) -> T,
    {
        let mut guard = self.lock()?;
        let output = {
            let mut locked = LockedTimer {
                state: &mut *guard,
                timer: self,
            };
            f(&mut locked)
        };
        let events = guard.core.drain_events();
        self.publish(events);
        Ok(output)
    }

    pub fn start(&self) -> Result<TimerSnapshot, TimerError> {
        self.with_lock(|timer| timer.start())?
    }

    pub fn pause(&self, manual: bool) -> Result<TimerSnapshot, TimerError> {
        self.with_lock(|timer| timer.pause(manual))
    }

    pub fn resume(&self, manual: bool) -> Result<TimerSnapshot, TimerError> {
        self.with_lock(|timer| timer.resume(manual))?
    }

    pub fn reset(&self) -> Result<TimerSnapshot, TimerError> {
        self.with_lock(|timer| timer.reset())
    }

    pub fn switch_session(&self, session_type: SessionType) -> Result<TimerSnapshot, TimerError> {
        self.with_lock(|timer| timer.switch_session(session_type))?
    }

    pub fn set_auto_pause(&self, enabled: bool) -> Result<TimerSnapshot, TimerError> {
        self.with_lock(|timer| timer.set_auto_pause(enabled))
    }

    pub fn get_state(&self) -> Result<TimerSnapshot, TimerError> {
        Ok(self.lock()?.core.snapshot())
    }

    /// Stop the tick loop for good, leaving the state untouched
    pub fn shutdown(&self) -> Result<(), TimerError> {
        self.with_lock(|timer| timer.cancel_ticker())?;
        info!("Session timer shut down");
        Ok(())
    }

    /// Apply one tick on behalf of the loop with the given generation.
    /// `None` means that loop has been cancelled or replaced.
    pub(crate) fn tick(&self, generation: u64) -> Result<Option<TickOutcome>, TimerError> {
        self.with_lock(|timer| timer.tick(generation))
    }

    fn lock(&self) -> Result<MutexGuard<'_, EngineState>, TimerError> {
        self.inner
            .lock()
            .map_err(|e| TimerError::StatePoisoned(e.to_string()))
    }

    fn publish(&self, events: Vec<TimerEvent>) {
        for event in events {
            let kind = event.kind();
            if self.events_tx.send(event).is_err() {
                trace!("No subscribers for {} event", kind);
            }
        }
    }
}

/// Exclusive view of the timer handed out by [`SessionTimer::with_lock`]
pub struct LockedTimer<'a> {
    state: &'a mut EngineState,
    timer: &'a SessionTimer,
}

impl LockedTimer<'_> {
    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.core.snapshot()
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.core.phase()
    }

    pub fn person_present(&self) -> bool {
        self.state.core.person_present()
    }

    pub fn auto_pause_enabled(&self) -> bool {
        self.state.core.auto_pause_enabled()
    }

    /// Store the latest presence sample, returning the previous one
    pub fn record_presence(&mut self, present: bool) -> bool {
        self.state.core.record_presence(present)
    }

    pub fn start(&mut self) -> Result<TimerSnapshot, TimerError> {
        let snapshot = self.state.core.start()?;
        self.ensure_ticker();
        Ok(snapshot)
    }

    /// Pausing stops the tick loop so the next run starts a fresh second
    pub fn pause(&mut self, manual: bool) -> TimerSnapshot {
        let was_running = self.phase() == TimerPhase::Running;
        let snapshot = self.state.core.pause(manual);
        if was_running && snapshot.state.is_paused() {
            self.cancel_ticker();
        }
        snapshot
    }

    pub fn resume(&mut self, manual: bool) -> Result<TimerSnapshot, TimerError> {
        let snapshot = self.state.core.resume(manual)?;
        if snapshot.state == TimerPhase::Running {
            self.ensure_ticker();
        }
        Ok(snapshot)
    }

    /// Cancel the tick loop first, then restore the full period
    pub fn reset(&mut self) -> TimerSnapshot {
        self.cancel_ticker();
        self.state.core.reset()
    }

    pub fn switch_session(&mut self, session_type: SessionType) -> Result<TimerSnapshot, TimerError> {
        let was_running = self.phase() == TimerPhase::Running;
        self.reset();
        let snapshot = self.state.core.select_session(session_type);
        if was_running {
            self.start()
        } else {
            Ok(snapshot)
        }
    }

    pub fn set_auto_pause(&mut self, enabled: bool) -> TimerSnapshot {
        self.state.core.set_auto_pause(enabled)
    }

    fn tick(&mut self, generation: u64) -> Option<TickOutcome> {
        match &self.state.ticker {
            Some(ticker) if ticker.generation == generation => {}
            _ => return None,
        }

        let outcome = self.state.core.tick();
        match outcome {
            TickOutcome::Completed => {
                // The loop exits on its own after a completion
                self.state.ticker = None;
            }
            TickOutcome::Ticked => {
                trace!("Tick: {}s left", self.state.core.snapshot().time_left_seconds);
            }
            TickOutcome::Idle => {}
        }
        Some(outcome)
    }

    fn ensure_ticker(&mut self) {
        if let Some(ticker) = &self.state.ticker {
            if !ticker.handle.is_finished() {
                return;
            }
        }

        self.state.generation += 1;
        let generation = self.state.generation;
        let period = self.timer.tick_period;
        let handle = tokio::spawn(tick_loop(
            self.timer.clone(),
            generation,
            Instant::now() + period,
            period,
        ));
        self.state.ticker = Some(Ticker { generation, handle });
        debug!("Spawned tick loop #{}", generation);
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.state.ticker.take() {
            ticker.handle.abort();
            debug!("Cancelled tick loop #{}", ticker.generation);
        }
    }
}
