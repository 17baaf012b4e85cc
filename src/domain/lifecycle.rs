//! Meeting lifecycle: state machine, start time, attendees, recipients.
//!
//! The start-time setter owns the reminder coupling: any change of the start
//! time clears the reminder-sent marker so the scheduler treats the old
//! reminder as stale.

use super::entities::{Meeting, MeetingState, RollCallEntry, UserProfile};
use super::errors::DomainError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Who a reminder goes to: explicit participants win over the target role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Recipients {
    Participants(Vec<String>),
    Role(String),
}

impl Meeting {
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            owner: owner.into(),
            state: MeetingState::Draft,
            meeting_type: None,
            start_time: 0,
            duration: 60,
            target_role: String::new(),
            participants: Vec::new(),
            reminder_advance: 0,
            reminder_sent: 0,
            attended: Vec::new(),
            roll_call: Vec::new(),
            agenda: Vec::new(),
            time_slots: Vec::new(),
            future_slots: Vec::new(),
            previous_meeting: None,
            minutes_id: None,
            backlog: false,
        }
    }

    pub fn state(&self) -> MeetingState {
        self.state
    }

    /// Transitions are externally driven; any state may follow any other.
    pub fn set_state(&mut self, state: MeetingState) {
        if self.state != state {
            debug!(meeting_id = %self.id, from = %self.state, to = %state, "meeting state change");
            self.state = state;
        }
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn is_scheduled(&self) -> bool {
        self.start_time > 0
    }

    /// Sets the start time. A different value clears `reminder_sent`, even when the
    /// new time lies in the past. Returns whether anything changed.
    pub fn set_start_time(&mut self, new_time: i64) -> bool {
        if new_time == self.start_time {
            return false;
        }
        debug!(
            meeting_id = %self.id,
            old = self.start_time,
            new = new_time,
            "start time changed; reminder marker cleared"
        );
        self.start_time = new_time;
        self.reminder_sent = 0;
        true
    }

    pub fn reminder_sent(&self) -> i64 {
        self.reminder_sent
    }

    /// Explicit override, used by the UI to force a resend.
    pub fn set_reminder_sent(&mut self, when: i64) {
        self.reminder_sent = when;
    }

    pub fn attendees(&self) -> &[String] {
        &self.attended
    }

    /// Records `user` as present. Only while Running, and only when no attendee entry
    /// matches any of the user's ids. Returns whether the list changed.
    pub fn add_attendee_if_needed(&mut self, user: &UserProfile) -> bool {
        if self.state != MeetingState::Running {
            return false;
        }
        if self.attended.iter().any(|a| user.has_any_id(a)) {
            return false;
        }
        self.attended.push(user.universal_id.clone());
        true
    }

    pub fn set_attendees(&mut self, attendees: Vec<String>) {
        self.attended = attendees;
    }

    /// Adds `id` unless an identical entry exists. Independent of state.
    pub fn add_attendee_unique(&mut self, id: &str) -> bool {
        if self.attended.iter().any(|a| a == id) {
            return false;
        }
        self.attended.push(id.to_string());
        true
    }

    pub fn remove_attendee(&mut self, id: &str) -> bool {
        let before = self.attended.len();
        self.attended.retain(|a| a != id);
        self.attended.len() != before
    }

    /// Inserts or updates the roll-call entry for `entry.uid`.
    pub fn upsert_roll_call(&mut self, entry: RollCallEntry) {
        match self.roll_call.iter_mut().find(|r| r.uid == entry.uid) {
            Some(existing) => {
                existing.attend = entry.attend;
                existing.situation = entry.situation;
            }
            None => self.roll_call.push(entry),
        }
    }

    /// Target role, or `default_role` when none is set.
    pub fn effective_target_role<'a>(&'a self, default_role: &'a str) -> &'a str {
        if self.target_role.is_empty() {
            default_role
        } else {
            &self.target_role
        }
    }

    pub fn recipients(&self, default_role: &str) -> Recipients {
        if self.participants.is_empty() {
            Recipients::Role(self.effective_target_role(default_role).to_string())
        } else {
            Recipients::Participants(self.participants.clone())
        }
    }

    /// Makes sure the target role names an existing role. Falls back to `default_role`,
    /// then to the first known role. Returns whether the target role was rewritten.
    pub fn verify_target_role(
        &mut self,
        existing_roles: &[String],
        default_role: &str,
    ) -> Result<bool, DomainError> {
        if existing_roles.iter().any(|r| r == &self.target_role) {
            return Ok(false);
        }
        let replacement = if existing_roles.iter().any(|r| r == default_role) {
            default_role.to_string()
        } else if let Some(first) = existing_roles.first() {
            first.clone()
        } else {
            return Err(DomainError::InvalidConfiguration(format!(
                "no roles exist; at least one is required to have meeting '{}'",
                self.name
            )));
        };
        debug!(
            meeting_id = %self.id,
            from = %self.target_role,
            to = %replacement,
            "target role replaced"
        );
        self.target_role = replacement;
        Ok(true)
    }

    /// `(Meeting) <name> @ <date>` in the given offset, or "(to be determined)".
    pub fn self_description(&self, utc_offset_minutes: i32) -> String {
        let when = format_millis(self.start_time, utc_offset_minutes, "%Y-%m-%d %H:%M")
            .unwrap_or_else(|| "(to be determined)".to_string());
        format!("(Meeting) {} @ {}", self.name, when)
    }
}

/// Formats epoch millis in a fixed offset. `None` for unscheduled (<= 0) or
/// unrepresentable values.
pub fn format_millis(millis: i64, utc_offset_minutes: i32, fmt: &str) -> Option<String> {
    if millis <= 0 {
        return None;
    }
    let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
        .or_else(|| FixedOffset::east_opt(0))?;
    let dt = DateTime::from_timestamp_millis(millis)?.with_timezone(&offset);
    Some(dt.format(fmt).to_string())
}

/// Latest first. Unscheduled meetings sort as if they started at `now`.
pub fn chrono_order(a: &Meeting, b: &Meeting, now: i64) -> Ordering {
    let key = |m: &Meeting| if m.start_time <= 0 { now } else { m.start_time };
    key(b).cmp(&key(a))
}

pub fn sort_chrono(meetings: &mut [Meeting], now: i64) {
    meetings.sort_by(|a, b| chrono_order(a, b, now));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, aliases: &[&str]) -> UserProfile {
        UserProfile {
            universal_id: id.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_codes_round_trip() {
        for code in 0u8..=3 {
            let s = MeetingState::try_from(code).unwrap();
            assert_eq!(u8::from(s), code);
        }
        assert!(MeetingState::try_from(4).is_err());
    }

    #[test]
    fn test_set_start_time_resets_reminder_on_any_change() {
        let mut m = Meeting::new("m1", "Weekly", "owner@example.com");
        m.set_start_time(10_000_000);
        m.set_reminder_sent(9_000_000);

        assert!(!m.set_start_time(10_000_000));
        assert_eq!(m.reminder_sent(), 9_000_000);

        // Earlier time still resets.
        assert!(m.set_start_time(5_000_000));
        assert_eq!(m.reminder_sent(), 0);

        m.set_reminder_sent(4_000_000);
        assert!(m.set_start_time(20_000_000));
        assert_eq!(m.reminder_sent(), 0);
    }

    #[test]
    fn test_add_attendee_only_while_running() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        let alice = profile("alice", &["alice@example.com"]);

        assert!(!m.add_attendee_if_needed(&alice));
        assert!(m.attendees().is_empty());

        m.set_state(MeetingState::Running);
        assert!(m.add_attendee_if_needed(&alice));
        assert!(!m.add_attendee_if_needed(&alice));
        assert_eq!(m.attendees(), ["alice".to_string()]);
    }

    #[test]
    fn test_add_attendee_matches_alias() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        m.set_state(MeetingState::Running);
        m.set_attendees(vec!["alice@example.com".to_string()]);

        let alice = profile("alice", &["alice@example.com"]);
        assert!(!m.add_attendee_if_needed(&alice));
        assert_eq!(m.attendees().len(), 1);
    }

    #[test]
    fn test_recipients_prefer_participants() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        assert_eq!(m.recipients("Members"), Recipients::Role("Members".into()));

        m.target_role = "Stewards".into();
        assert_eq!(m.recipients("Members"), Recipients::Role("Stewards".into()));

        m.participants = vec!["bob".into()];
        assert_eq!(
            m.recipients("Members"),
            Recipients::Participants(vec!["bob".into()])
        );
    }

    #[test]
    fn test_verify_target_role_fallbacks() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        m.target_role = "Gone".into();

        let roles = vec!["Stewards".to_string(), "Members".to_string()];
        assert!(m.verify_target_role(&roles, "Members").unwrap());
        assert_eq!(m.target_role, "Members");
        assert!(!m.verify_target_role(&roles, "Members").unwrap());

        m.target_role = "Gone".into();
        assert!(m.verify_target_role(&["Stewards".into()], "Members").unwrap());
        assert_eq!(m.target_role, "Stewards");

        let err = m.verify_target_role(&[], "Members").unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_roll_call_upsert() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        m.upsert_roll_call(RollCallEntry {
            uid: "bob".into(),
            attend: "maybe".into(),
            situation: String::new(),
        });
        m.upsert_roll_call(RollCallEntry {
            uid: "bob".into(),
            attend: "yes".into(),
            situation: "remote".into(),
        });
        assert_eq!(m.roll_call.len(), 1);
        assert_eq!(m.roll_call[0].attend, "yes");
        assert_eq!(m.roll_call[0].situation, "remote");
    }

    #[test]
    fn test_self_description() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        assert_eq!(m.self_description(0), "(Meeting) Weekly @ (to be determined)");

        // 2024-01-01 00:00:00 UTC
        m.set_start_time(1_704_067_200_000);
        assert_eq!(m.self_description(0), "(Meeting) Weekly @ 2024-01-01 00:00");
        assert_eq!(m.self_description(90), "(Meeting) Weekly @ 2024-01-01 01:30");
    }

    #[test]
    fn test_sort_chrono_latest_first_unscheduled_as_now() {
        let mut a = Meeting::new("a", "A", "o");
        a.set_start_time(1_000);
        let b = Meeting::new("b", "B", "o");
        let mut c = Meeting::new("c", "C", "o");
        c.set_start_time(9_000);

        let mut list = vec![a, b, c];
        sort_chrono(&mut list, 5_000);
        let ids: Vec<&str> = list.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }
}
