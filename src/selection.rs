use std::collections::BTreeSet;

/// The set of record indices currently checked in the management table.
///
/// Scoped to one render cycle of the table: every store reload clears it,
/// so a selection never outlives the rows it was made against.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    checked: BTreeSet<u32>,
}

impl Selection {
    pub fn toggle(&mut self, index: u32) {
        if !self.checked.insert(index) {
            self.checked.remove(&index);
        }
    }

    pub fn contains(&self, index: u32) -> bool {
        self.checked.contains(&index)
    }

    pub fn indices(&self) -> Vec<u32> {
        self.checked.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }
}
