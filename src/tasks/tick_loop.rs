//! Countdown tick background task

use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{SessionTimer, TickOutcome};

/// Drive the timer once per `period` until the period completes or this loop
/// is cancelled. A loop only acts while its `generation` is the timer's
/// current one, so a replaced loop can never apply a late tick.
pub async fn tick_loop(timer: SessionTimer, generation: u64, first_tick: Instant, period: Duration) {
    debug!("Tick loop #{} running", generation);

    let mut interval = interval_at(first_tick, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match timer.tick(generation) {
            Ok(Some(TickOutcome::Completed)) => {
                info!("Tick loop #{} finished with the session", generation);
                break;
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!("Tick loop #{} superseded, exiting", generation);
                break;
            }
            Err(e) => {
                error!("Tick loop #{} stopped: {}", generation, e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{TimerPhase, TimerSettings};
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn stale_loop_exits_without_touching_state() {
        let timer = SessionTimer::new(TimerSettings::default());
        timer.start().unwrap();

        // A loop with a generation the timer never issued
        let stray = tokio::spawn(tick_loop(
            timer.clone(),
            u64::MAX,
            Instant::now() + Duration::from_secs(1),
            Duration::from_secs(1),
        ));
        sleep(Duration::from_millis(1500)).await;

        assert!(stray.is_finished());
        let snapshot = timer.get_state().unwrap();
        assert_eq!(snapshot.state, TimerPhase::Running);
        assert_eq!(snapshot.time_left_seconds, 1499);
    }
}
