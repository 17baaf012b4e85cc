//! Minutes taken per agenda item while the meeting runs.

use super::entities::Meeting;
use super::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Read model for the note-taking view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaNote {
    pub id: String,
    pub title: String,
    pub pos: i32,
    pub notes: String,
    pub timer_running: bool,
    pub timer_start: i64,
    pub timer_elapsed: i64,
    pub duration: i64,
}

/// One edit: `old` is the text the editor started from, `new` what they wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEdit {
    pub id: String,
    #[serde(default)]
    pub old: String,
    pub new: String,
}

/// Three-way merge of a single text field. When nobody else changed the text since
/// `old` was read, `new` replaces it; otherwise the edit is appended so neither
/// writer loses text.
pub fn merge_notes(current: &str, old: &str, new: &str) -> String {
    if current == old || current.is_empty() {
        return new.to_string();
    }
    if new == old || current.contains(new) {
        return current.to_string();
    }
    format!("{}\n\n{}", current, new)
}

impl Meeting {
    pub fn meeting_notes(&self) -> Vec<AgendaNote> {
        self.sorted_agenda_items()
            .into_iter()
            .map(|ai| AgendaNote {
                id: ai.id.clone(),
                title: ai.subject.clone(),
                pos: ai.position,
                notes: ai.notes.clone(),
                timer_running: ai.timer_running(),
                timer_start: ai.timer_start(),
                timer_elapsed: ai.timer_elapsed(),
                duration: ai.duration,
            })
            .collect()
    }

    /// Merges every edit. All ids are checked before anything is written.
    pub fn update_meeting_notes(&mut self, edits: &[NoteEdit]) -> Result<(), DomainError> {
        for edit in edits {
            self.find_agenda_item(&edit.id)?;
        }
        for edit in edits {
            let ai = self.find_agenda_item_mut(&edit.id)?;
            ai.notes = merge_notes(&ai.notes, &edit.old, &edit.new);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::update::AgendaItemUpdate;

    #[test]
    fn test_merge_notes() {
        assert_eq!(merge_notes("", "", "first"), "first");
        assert_eq!(merge_notes("a", "a", "a b"), "a b");
        assert_eq!(merge_notes("a c", "a", "a b"), "a c\n\na b");
        assert_eq!(merge_notes("a c", "a", "a"), "a c");
    }

    #[test]
    fn test_update_notes_checks_ids_first() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        m.update_agenda(&[AgendaItemUpdate::new_item("Intro")]).unwrap();
        let id = m.agenda_items()[0].id.clone();

        let edits = vec![
            NoteEdit {
                id: id.clone(),
                old: String::new(),
                new: "said hello".into(),
            },
            NoteEdit {
                id: "ghost".into(),
                old: String::new(),
                new: "x".into(),
            },
        ];
        assert!(matches!(
            m.update_meeting_notes(&edits),
            Err(DomainError::NotFound(_))
        ));
        assert!(m.agenda_items()[0].notes.is_empty());

        m.update_meeting_notes(&edits[..1]).unwrap();
        let notes = m.meeting_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].notes, "said hello");
        assert_eq!(notes[0].title, "Intro");
        assert_eq!(notes[0].pos, 1);
    }
}
