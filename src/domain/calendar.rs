//! Single-event iCalendar export of one meeting.

use super::entities::{Meeting, UserProfile};
use super::errors::DomainError;
use chrono::DateTime;

const PRODID: &str = "-//meeting-planner//NONSGML v1.0//EN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    /// Epoch millis.
    pub dtstamp: i64,
    pub start: i64,
    pub end: i64,
    pub organizer_name: String,
    pub organizer_email: String,
    pub summary: String,
    /// Plain text; escaped on render.
    pub description: String,
}

/// `yyyyMMddTHHmmssZ` in UTC.
fn ics_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y%m%dT%H%M%SZ").to_string())
        .unwrap_or_else(|| "19700101T000000Z".to_string())
}

/// TEXT escaping: newlines become `\n`, other control characters are dropped,
/// and `\`, `;`, `,` are backslash-escaped.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\\' | ';' | ',' => {
                out.push('\\');
                out.push(ch);
            }
            c if c < ' ' => {}
            c => out.push(c),
        }
    }
    out
}

impl CalendarEvent {
    pub fn to_ics(&self) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", PRODID),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", ics_timestamp(self.dtstamp)),
            format!(
                "ORGANIZER;CN={}:MAILTO:{}",
                escape_text(&self.organizer_name),
                self.organizer_email
            ),
            format!("DTSTART:{}", ics_timestamp(self.start)),
            format!("DTEND:{}", ics_timestamp(self.end)),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];
        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }
}

impl Meeting {
    /// Builds the event. An unscheduled meeting cannot be exported.
    pub fn calendar_event(
        &self,
        uid_prefix: &str,
        organizer: &UserProfile,
        now: i64,
    ) -> Result<CalendarEvent, DomainError> {
        if !self.is_scheduled() {
            return Err(DomainError::InvalidInput(format!(
                "meeting '{}' has no start time to export",
                self.id
            )));
        }
        let end = self
            .duration
            .max(0)
            .checked_mul(60_000)
            .and_then(|d| self.start_time.checked_add(d))
            .filter(|end| DateTime::from_timestamp_millis(*end).is_some())
            .ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "meeting '{}' ends beyond the representable time range",
                    self.id
                ))
            })?;
        Ok(CalendarEvent {
            uid: format!("{}{}", uid_prefix, self.id),
            dtstamp: now,
            start: self.start_time,
            end,
            organizer_name: organizer.name.clone(),
            organizer_email: organizer.email.clone(),
            summary: self.name.clone(),
            description: self.description.clone(),
        })
    }
}
