//! Agenda ordering: stable sort, dense positions, user-facing numbers.

use super::entities::{AgendaItem, Meeting, NEW_ITEM_POSITION, SPACER_NUMBER};
use super::errors::DomainError;
use std::cmp::Ordering;

/// Total order for agenda items: accepted (non-proposed) items first, then proposed;
/// each group by ascending position. Equal positions fall back to the id so the
/// result never depends on the incoming order.
pub fn agenda_order(a: &AgendaItem, b: &AgendaItem) -> Ordering {
    a.proposed
        .cmp(&b.proposed)
        .then_with(|| a.position.cmp(&b.position))
        .then_with(|| a.id.cmp(&b.id))
}

impl Meeting {
    /// Agenda as stored. After `renumber_items` this is also the display order.
    pub fn agenda_items(&self) -> &[AgendaItem] {
        &self.agenda
    }

    pub fn sorted_agenda_items(&self) -> Vec<&AgendaItem> {
        let mut items: Vec<&AgendaItem> = self.agenda.iter().collect();
        items.sort_by(|a, b| agenda_order(a, b));
        items
    }

    pub fn find_agenda_item(&self, id: &str) -> Result<&AgendaItem, DomainError> {
        self.agenda
            .iter()
            .find(|ai| ai.id == id)
            .ok_or_else(|| self.missing_item(id))
    }

    pub fn find_agenda_item_mut(&mut self, id: &str) -> Result<&mut AgendaItem, DomainError> {
        match self.agenda.iter().position(|ai| ai.id == id) {
            Some(idx) => Ok(&mut self.agenda[idx]),
            None => Err(self.missing_item(id)),
        }
    }

    fn missing_item(&self, id: &str) -> DomainError {
        DomainError::NotFound(format!(
            "agenda item '{}' does not exist in meeting '{}'",
            id, self.id
        ))
    }

    /// Appends a new item placed after everything, including items created earlier in
    /// the same batch. Call `renumber_items` once the caller has finished filling it in.
    pub fn create_agenda_item(&mut self) -> &mut AgendaItem {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let after_last = self
            .agenda
            .iter()
            .map(|ai| ai.position.saturating_add(1))
            .max()
            .unwrap_or(NEW_ITEM_POSITION);
        let mut ai = AgendaItem::new(id, "");
        ai.position = after_last.max(NEW_ITEM_POSITION);
        self.agenda.push(ai);
        let last = self.agenda.len() - 1;
        &mut self.agenda[last]
    }

    /// Adds an existing item (e.g. restored or cloned) and renumbers.
    pub fn push_agenda_item(&mut self, mut item: AgendaItem) {
        if item.position <= 0 {
            item.position = NEW_ITEM_POSITION;
        }
        self.agenda.push(item);
        self.renumber_items();
    }

    /// Removes the item and closes the gap. Returns whether an item was removed.
    pub fn remove_agenda_item(&mut self, id: &str) -> bool {
        let before = self.agenda.len();
        self.agenda.retain(|ai| ai.id != id);
        let removed = self.agenda.len() != before;
        if removed {
            self.renumber_items();
        }
        removed
    }

    /// Sorts the agenda and assigns position 1..N and number 1..K (spacers get -1).
    /// Idempotent.
    pub fn renumber_items(&mut self) {
        self.agenda.sort_by(agenda_order);
        let mut num = 0;
        for (idx, ai) in self.agenda.iter_mut().enumerate() {
            ai.position = idx as i32 + 1;
            if ai.spacer {
                ai.number = SPACER_NUMBER;
            } else {
                num += 1;
                ai.number = num;
            }
        }
    }

    /// Shifts every item at or after `position` down by one, leaving a hole at
    /// `position`. Numbers are not touched.
    pub fn open_position(&mut self, position: i32) {
        for ai in self.agenda.iter_mut().filter(|ai| ai.position >= position) {
            ai.position += 1;
        }
    }

    /// Moves an existing item to `position` and renumbers.
    pub fn move_agenda_item(&mut self, id: &str, position: i32) -> Result<(), DomainError> {
        self.find_agenda_item(id)?;
        self.open_position(position);
        self.find_agenda_item_mut(id)?.position = position;
        self.renumber_items();
        Ok(())
    }

    /// Items linked to the given document, in agenda order.
    pub fn document_linked_items(&self, doc_id: &str) -> Vec<&AgendaItem> {
        self.sorted_agenda_items()
            .into_iter()
            .filter(|ai| ai.doc_list.iter().any(|d| d == doc_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, position: i32, proposed: bool, spacer: bool) -> AgendaItem {
        let mut ai = AgendaItem::new(id, id.to_uppercase());
        ai.position = position;
        ai.proposed = proposed;
        ai.spacer = spacer;
        ai
    }

    fn meeting_with(items: Vec<AgendaItem>) -> Meeting {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        m.agenda = items;
        m
    }

    fn layout(m: &Meeting) -> Vec<(String, i32, i32)> {
        m.agenda_items()
            .iter()
            .map(|ai| (ai.id.clone(), ai.position, ai.number))
            .collect()
    }

    #[test]
    fn test_agenda_order_proposed_last() {
        let accepted = item("a", 9, false, false);
        let proposed = item("p", 1, true, false);
        assert_eq!(agenda_order(&accepted, &proposed), Ordering::Less);
        assert_eq!(agenda_order(&proposed, &accepted), Ordering::Greater);
    }

    #[test]
    fn test_agenda_order_ties_broken_by_id() {
        let a = item("a", 3, false, false);
        let b = item("b", 3, false, false);
        assert_eq!(agenda_order(&a, &b), Ordering::Less);
        assert_eq!(agenda_order(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_renumber_dense_and_proposed_last() {
        let mut m = meeting_with(vec![
            item("p1", 2, true, false),
            item("a3", 40, false, false),
            item("a1", 5, false, false),
            item("p0", 1, true, false),
            item("a2", 7, false, false),
        ]);
        m.renumber_items();

        let ids: Vec<&str> = m.agenda_items().iter().map(|ai| ai.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2", "a3", "p0", "p1"]);
        let positions: Vec<i32> = m.agenda_items().iter().map(|ai| ai.position).collect();
        assert_eq!(positions, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_spacers_do_not_consume_numbers() {
        let mut m = meeting_with(vec![
            item("a", 1, false, false),
            item("s", 2, false, true),
            item("b", 3, false, false),
            item("t", 4, true, true),
            item("c", 5, true, false),
        ]);
        m.renumber_items();
        assert_eq!(
            layout(&m),
            vec![
                ("a".into(), 1, 1),
                ("s".into(), 2, -1),
                ("b".into(), 3, 2),
                ("t".into(), 4, -1),
                ("c".into(), 5, 3),
            ]
        );
    }

    #[test]
    fn test_renumber_idempotent() {
        let mut m = meeting_with(vec![
            item("x", 10, false, false),
            item("y", 10, false, true),
            item("z", 3, true, false),
        ]);
        m.renumber_items();
        let first = layout(&m);
        m.renumber_items();
        assert_eq!(first, layout(&m));
    }

    #[test]
    fn test_open_position_then_place() {
        let mut m = meeting_with(vec![
            item("a", 1, false, false),
            item("b", 2, false, false),
            item("c", 3, false, false),
        ]);
        m.renumber_items();
        m.open_position(2);
        assert_eq!(m.find_agenda_item("a").unwrap().position, 1);
        assert_eq!(m.find_agenda_item("b").unwrap().position, 3);
        assert_eq!(m.find_agenda_item("c").unwrap().position, 4);
        // numbers untouched by open_position
        assert_eq!(m.find_agenda_item("b").unwrap().number, 2);

        let new_id = {
            let ai = m.create_agenda_item();
            ai.subject = "Inserted".into();
            ai.position = 2;
            ai.id.clone()
        };
        m.renumber_items();
        let ids: Vec<&str> = m.agenda_items().iter().map(|ai| ai.id.as_str()).collect();
        assert_eq!(ids, ["a", new_id.as_str(), "b", "c"]);
    }

    #[test]
    fn test_new_item_goes_last() {
        let mut m = meeting_with(vec![item("a", 1, false, false)]);
        let id = m.create_agenda_item().id.clone();
        m.renumber_items();
        assert_eq!(m.find_agenda_item(&id).unwrap().position, 2);
        assert_eq!(m.find_agenda_item(&id).unwrap().number, 2);
    }

    #[test]
    fn test_remove_closes_gap() {
        let mut m = meeting_with(vec![
            item("a", 1, false, false),
            item("b", 2, false, false),
            item("c", 3, false, false),
        ]);
        assert!(m.remove_agenda_item("b"));
        assert!(!m.remove_agenda_item("b"));
        assert_eq!(layout(&m), vec![("a".into(), 1, 1), ("c".into(), 2, 2)]);
    }

    #[test]
    fn test_move_item() {
        let mut m = meeting_with(vec![
            item("a", 1, false, false),
            item("b", 2, false, false),
            item("c", 3, false, false),
        ]);
        m.move_agenda_item("c", 1).unwrap();
        let ids: Vec<&str> = m.agenda_items().iter().map(|ai| ai.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert!(matches!(
            m.move_agenda_item("zzz", 1),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_document_linked_items_in_order() {
        let mut first = item("first", 2, false, false);
        first.doc_list = vec!["doc-1".into()];
        let mut late = item("late", 1, true, false);
        late.doc_list = vec!["doc-1".into(), "doc-2".into()];
        let other = item("other", 1, false, false);

        let m = meeting_with(vec![late, other, first]);
        let linked: Vec<&str> = m
            .document_linked_items("doc-1")
            .iter()
            .map(|ai| ai.id.as_str())
            .collect();
        assert_eq!(linked, ["first", "late"]);
        assert!(m.document_linked_items("nope").is_empty());
    }

    #[test]
    fn test_find_missing_item_is_not_found() {
        let m = meeting_with(vec![]);
        assert!(matches!(
            m.find_agenda_item("ghost"),
            Err(DomainError::NotFound(_))
        ));
    }
}
