use std::collections::VecDeque;

use crate::model::Project;

use super::command::EditCommand;

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<EditCommand>,
    redo: Vec<EditCommand>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record an applied edit. Clears the redo stack.
    pub fn push(&mut self, command: EditCommand) {
        self.redo.clear();
        self.undo.push_back(command);
        if self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Revert the latest edit; `false` when there is nothing to undo.
    pub fn undo(&mut self, project: &mut Project) -> bool {
        let Some(command) = self.undo.pop_back() else {
            return false;
        };
        match command.revert(project) {
            Ok(()) => {
                self.redo.push(command);
                true
            }
            Err(err) => {
                tracing::warn!(edit = command.label(), error = %err, "Undo failed, dropping entry");
                false
            }
        }
    }

    /// Re-apply the latest undone edit; `false` when there is nothing to redo.
    pub fn redo(&mut self, project: &mut Project) -> bool {
        let Some(command) = self.redo.pop() else {
            return false;
        };
        match command.apply(project) {
            Ok(()) => {
                self.undo.push_back(command);
                true
            }
            Err(err) => {
                tracing::warn!(edit = command.label(), error = %err, "Redo failed, dropping entry");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
