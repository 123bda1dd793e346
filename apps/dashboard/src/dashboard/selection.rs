use indexmap::IndexSet;
use serde::Serialize;

/// The application ids currently checked for a bulk action.
///
/// Iteration follows insertion order, which is also the order bulk
/// requests are dispatched in. Unknown ids are harmless: removing one is a
/// no-op and adding one never double counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: IndexSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str, included: bool) {
        if included {
            self.ids.insert(id.to_string());
        } else {
            self.ids.shift_remove(id);
        }
    }

    /// Sets membership of every id in `ids` to `included`.
    pub fn select_all<'a, I>(&mut self, ids: I, included: bool)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            self.toggle(id, included);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn size(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Drives the "select all" checkbox: true only when `ids` is non-empty
    /// and every one of them is selected.
    pub fn all_selected<'a, I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut any = false;
        for id in ids {
            if !self.has(id) {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}
