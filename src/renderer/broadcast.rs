use crate::message::{MessageBody, PageChange};
use crate::store::{ChangeSet, ViewStore};

/// Messages re-broadcasting the parts of derived state marked in `changes`.
///
/// Reads the store only.
pub fn derived_messages(store: &ViewStore, changes: ChangeSet) -> Vec<MessageBody> {
    let mut bodies = Vec::new();
    let Some(project) = store.project() else {
        return bodies;
    };

    if changes.pattern_library {
        bodies.push(MessageBody::PatternLibraryChange(
            project.pattern_library().clone(),
        ));
    }

    if changes.page {
        let page_tree = store
            .active_page()
            .and_then(|page| Some((page.id.clone(), project.collect_subtree(&page.root_id)?)));
        if let Some((page_id, subtree)) = page_tree {
            bodies.push(MessageBody::PageChange(PageChange {
                page_id,
                pages: project.pages().to_vec(),
                element_contents: subtree.contents,
                elements: subtree.elements,
            }));
        }
    }

    if changes.selection {
        bodies.push(MessageBody::ElementChange(
            store.selected_element_id().map(str::to_string),
        ));
    }

    bodies
}
