//! Background fader.
//!
//! Holds only a weak reference to the engine state, so the thread winds down
//! on its own once the last engine handle is dropped.

use std::sync::{Mutex, PoisonError, Weak};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error};

use super::engine::EngineState;

pub(super) fn spawn(state: Weak<Mutex<EngineState>>, tick: Duration) {
    let tick = tick.max(Duration::from_millis(1));
    let spawned = thread::Builder::new()
        .name("ambimix-fader".to_string())
        .spawn(move || run(state, tick));
    if let Err(err) = spawned {
        error!("failed to spawn fader thread: {}", err);
    }
}

fn run(state: Weak<Mutex<EngineState>>, tick: Duration) {
    debug!("fader running every {:?}", tick);
    let mut last_tick = Instant::now();

    loop {
        thread::sleep(tick);

        // Ramp by elapsed time, not by tick count.
        let now = Instant::now();
        let dt = now.duration_since(last_tick);
        last_tick = now;

        let Some(shared) = state.upgrade() else {
            break;
        };
        shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .advance(dt);
    }

    debug!("fader stopped");
}
