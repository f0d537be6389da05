/// Parts of derived state that need to be re-broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub pattern_library: bool,
    pub page: bool,
    pub selection: bool,
}

impl ChangeSet {
    pub fn all() -> Self {
        Self {
            pattern_library: true,
            page: true,
            selection: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.pattern_library || self.page || self.selection)
    }

    pub fn merge(&mut self, other: ChangeSet) {
        self.pattern_library |= other.pattern_library;
        self.page |= other.page;
        self.selection |= other.selection;
    }
}
