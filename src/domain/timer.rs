//! Agenda item timers. At most one item per meeting runs at a time.

use super::entities::{AgendaItem, Meeting, MeetingState};
use super::errors::DomainError;
use tracing::debug;

impl AgendaItem {
    pub fn timer_running(&self) -> bool {
        self.timer.running
    }

    /// Epoch millis the running timer was started at; 0 when stopped.
    pub fn timer_start(&self) -> i64 {
        self.timer.start
    }

    /// Accumulated millis from previous runs (excludes a run in progress).
    pub fn timer_elapsed(&self) -> i64 {
        self.timer.elapsed
    }

    /// Elapsed millis including a run in progress.
    pub fn elapsed_at(&self, now: i64) -> i64 {
        if self.timer.running {
            self.timer.elapsed + (now - self.timer.start).max(0)
        } else {
            self.timer.elapsed
        }
    }

    /// No-op when already running.
    pub fn start_timer(&mut self, now: i64) {
        if self.timer.running {
            return;
        }
        self.timer.running = true;
        self.timer.start = now;
    }

    /// Folds the current run into `elapsed`. Returns whether the timer was running.
    pub fn stop_timer(&mut self, now: i64) -> bool {
        if !self.timer.running {
            return false;
        }
        self.timer.elapsed += (now - self.timer.start).max(0);
        self.timer.running = false;
        self.timer.start = 0;
        true
    }
}

impl Meeting {
    /// Starts the timer of `item_id` and stops every other one. A meeting that is not
    /// Running becomes Running.
    ///
    /// The id is checked first: an unknown id fails with `NotFound` and leaves the
    /// meeting untouched (no state change, no timers stopped).
    pub fn start_timer(&mut self, item_id: &str, now: i64) -> Result<(), DomainError> {
        self.find_agenda_item(item_id)?;
        if self.state != MeetingState::Running {
            self.set_state(MeetingState::Running);
        }
        for ai in self.agenda.iter_mut() {
            if ai.id == item_id {
                ai.start_timer(now);
            } else if ai.stop_timer(now) {
                debug!(meeting_id = %self.id, item_id = %ai.id, "timer stopped");
            }
        }
        debug!(meeting_id = %self.id, item_id, "timer started");
        Ok(())
    }

    /// Stops whichever item is running, if any.
    pub fn stop_timer(&mut self, now: i64) {
        for ai in self.agenda.iter_mut() {
            ai.stop_timer(now);
        }
    }

    pub fn running_item(&self) -> Option<&AgendaItem> {
        self.agenda.iter().find(|ai| ai.timer.running)
    }
}
