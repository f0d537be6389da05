//! Reversible edits of the project tree.

use crate::model::{Detached, DetachedPage, ModelError, Project};

/// One logical edit, holding the snapshot needed to apply and revert it.
///
/// `apply` then `revert` leaves the project exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    InsertElement(Detached),
    RemoveElement(Detached),
    InsertPage(DetachedPage),
    RemovePage(DetachedPage),
}

impl EditCommand {
    pub fn apply(&self, project: &mut Project) -> Result<(), ModelError> {
        match self {
            Self::InsertElement(detached) => project.attach(detached.clone()),
            Self::RemoveElement(detached) => detach_element(project, detached),
            Self::InsertPage(detached) => project.restore_page(detached.clone()),
            Self::RemovePage(detached) => detach_page(project, detached),
        }
    }

    pub fn revert(&self, project: &mut Project) -> Result<(), ModelError> {
        match self {
            Self::InsertElement(detached) => detach_element(project, detached),
            Self::RemoveElement(detached) => project.attach(detached.clone()),
            Self::InsertPage(detached) => detach_page(project, detached),
            Self::RemovePage(detached) => project.restore_page(detached.clone()),
        }
    }

    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InsertElement(_) => "insert element",
            Self::RemoveElement(_) => "remove element",
            Self::InsertPage(_) => "insert page",
            Self::RemovePage(_) => "remove page",
        }
    }
}

fn detach_element(project: &mut Project, detached: &Detached) -> Result<(), ModelError> {
    let id = &detached.subtree.root_id;
    project
        .remove_element_by_id(id)
        .map(|_| ())
        .ok_or_else(|| ModelError::MissingElement { id: id.clone() })
}

fn detach_page(project: &mut Project, detached: &DetachedPage) -> Result<(), ModelError> {
    let id = &detached.page.id;
    project
        .remove_page(id)
        .map(|_| ())
        .ok_or_else(|| ModelError::MissingPage { id: id.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PatternType, Placement, Subtree};

    fn box_subtree(project: &Project) -> Subtree {
        let pattern = project
            .pattern_library()
            .get_pattern_by_type(PatternType::SyntheticBox)
            .expect("box pattern");
        Subtree::from_pattern(pattern, Vec::new())
    }

    fn root_content(project: &Project) -> String {
        let root = &project.pages()[0].root_id;
        project.default_content_of(root).expect("content").id.clone()
    }

    #[test]
    fn insert_element_reverts_cleanly() {
        let mut project = Project::create("Demo");
        let before = project.clone();
        let command = EditCommand::InsertElement(Detached {
            placement: Placement {
                content_id: root_content(&project),
                index: 0,
            },
            subtree: box_subtree(&project),
        });

        command.apply(&mut project).expect("apply");
        assert_eq!(project.elements().count(), before.elements().count() + 1);
        command.revert(&mut project).expect("revert");
        assert_eq!(project, before);

        command.apply(&mut project).expect("reapply");
        assert!(project.validate().is_ok());
    }

    #[test]
    fn remove_page_reverts_cleanly() {
        let mut project = Project::create("Demo");
        let before = project.clone();
        let page_id = project.pages()[0].id.clone();
        let detached = project.clone().remove_page(&page_id).expect("page");

        let command = EditCommand::RemovePage(detached);
        command.apply(&mut project).expect("apply");
        assert!(project.pages().is_empty());
        command.revert(&mut project).expect("revert");
        assert_eq!(project, before);
    }

    #[test]
    fn removing_missing_element_fails() {
        let mut project = Project::create("Demo");
        let command = EditCommand::RemoveElement(Detached {
            placement: Placement {
                content_id: root_content(&project),
                index: 0,
            },
            subtree: box_subtree(&project),
        });
        assert!(matches!(
            command.apply(&mut project),
            Err(ModelError::MissingElement { .. })
        ));
    }
}
