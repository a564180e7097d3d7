use std::time::Duration;

use tracing::{debug, info};

use crate::catalog::{MusicTrack, Speaker};
use crate::store::SessionStore;
use crate::timer::{Scheduler, TimerHandle, TimerId};

pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// Countdown for the running session.
///
/// Reads the store once when attached; later store changes do not affect
/// the countdown. The one-second timer lives exactly as long as this view
/// (or until it reaches zero).
#[derive(Debug)]
pub struct SessionView {
    speaker: Option<Speaker>,
    music: Option<MusicTrack>,
    initial_secs: u64,
    remaining_secs: u64,
    timer: Option<TimerHandle>,
}

impl SessionView {
    pub fn attach(store: &SessionStore, scheduler: &mut Scheduler) -> Self {
        let opts = store.options();
        let initial_secs = countdown_secs(opts.duration_minutes);
        let timer = (initial_secs > 0).then(|| scheduler.every(COUNTDOWN_INTERVAL));
        debug!(initial_secs, "session view attached");

        Self {
            speaker: opts.speaker,
            music: opts.music,
            initial_secs,
            remaining_secs: initial_secs,
            timer,
        }
    }

    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer.as_ref().map(TimerHandle::id)
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// One countdown step; stops the timer once zero is reached
    pub fn on_tick(&mut self) {
        if self.timer.is_none() {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.timer = None;
            info!(secs = self.initial_secs, "countdown complete");
        }
    }

    /// Ends the session; the caller drops this view once the store reports
    /// `started == false`
    pub fn end(&mut self, store: &mut SessionStore) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        store.end_session();
    }

    pub fn speaker(&self) -> Option<Speaker> {
        self.speaker
    }

    pub fn music(&self) -> Option<MusicTrack> {
        self.music
    }

    pub fn initial_secs(&self) -> u64 {
        self.initial_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn remaining_display(&self) -> String {
        format_time(self.remaining_secs)
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.initial_secs, self.remaining_secs)
    }
}

pub fn countdown_secs(duration_minutes: f64) -> u64 {
    if duration_minutes.is_finite() && duration_minutes > 0.0 {
        (duration_minutes * 60.0).round() as u64
    } else {
        0
    }
}

/// Elapsed share of the countdown; a zero-length countdown reads as 0%
pub fn progress_percent(initial_secs: u64, remaining_secs: u64) -> f64 {
    if initial_secs == 0 {
        return 0.0;
    }
    let elapsed = initial_secs.saturating_sub(remaining_secs);
    elapsed as f64 / initial_secs as f64 * 100.0
}

/// `m:ss`
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
