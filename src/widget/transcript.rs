use crate::session::Turn;
use crate::widget::form::{FormId, InlineForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Turn(Turn),
    /// Placeholder shown while a chat reply is outstanding.
    Typing,
    Form(InlineForm),
}

/// Ordered conversation stream. Turns are append-only; only the typing
/// placeholder and inline forms are ever removed.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Turn(turn) => Some(turn),
            _ => None,
        })
    }

    pub fn forms(&self) -> impl Iterator<Item = &InlineForm> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Form(form) => Some(form),
            _ => None,
        })
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.entries.push(Entry::Turn(turn));
    }

    /// Adds the typing placeholder unless one is already showing.
    pub fn show_typing(&mut self) -> bool {
        if self.has_typing() {
            return false;
        }
        self.entries.push(Entry::Typing);
        true
    }

    pub fn clear_typing(&mut self) -> bool {
        match self.entries.iter().position(|entry| *entry == Entry::Typing) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_typing(&self) -> bool {
        self.entries.iter().any(|entry| *entry == Entry::Typing)
    }

    pub fn insert_form(&mut self, form: InlineForm) -> bool {
        if self.form(form.id).is_some() {
            return false;
        }
        self.entries.push(Entry::Form(form));
        true
    }

    pub fn form(&self, id: FormId) -> Option<&InlineForm> {
        self.forms().find(|form| form.id == id)
    }

    pub fn form_mut(&mut self, id: FormId) -> Option<&mut InlineForm> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Form(form) if form.id == id => Some(form),
            _ => None,
        })
    }

    pub fn remove_form(&mut self, id: FormId) -> Option<InlineForm> {
        let index = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Form(form) if form.id == id))?;
        match self.entries.remove(index) {
            Entry::Form(form) => Some(form),
            _ => None,
        }
    }
}
