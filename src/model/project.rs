use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::analysis::{InstallType, LibraryAnalysis};
use super::element::{Detached, Element, ElementContent, Placement, Subtree};
use super::error::ModelError;
use super::library::{ImportReport, PatternLibrary, PatternType};
use super::new_id;
use super::page::{DetachedPage, Page};

/// Serialized form of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub element_contents: Vec<ElementContent>,
    pub pattern_library: PatternLibrary,
}

/// In-memory project tree.
///
/// Owns every element and content. Pages point at root elements, contents
/// list child element ids, elements point back at their container.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    id: String,
    name: String,
    path: Option<PathBuf>,
    pages: Vec<Page>,
    elements: BTreeMap<String, Element>,
    contents: BTreeMap<String, ElementContent>,
    pattern_library: PatternLibrary,
}

impl Project {
    /// An empty project with a pristine library and no pages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            path: None,
            pages: Vec::new(),
            elements: BTreeMap::new(),
            contents: BTreeMap::new(),
            pattern_library: PatternLibrary::pristine(),
        }
    }

    /// A new project with one blank page, as created from the splash screen.
    pub fn create(name: impl Into<String>) -> Self {
        let mut project = Self::new(name);
        if let Some((page, subtree)) = project.new_page("Page 1") {
            let index = project.pages.len();
            if let Err(err) = project.restore_page(DetachedPage {
                page,
                index,
                subtree,
            }) {
                tracing::warn!(error = %err, "Failed to add initial page");
            }
        }
        project
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn element_contents(&self) -> impl Iterator<Item = &ElementContent> {
        self.contents.values()
    }

    pub fn pattern_library(&self) -> &PatternLibrary {
        &self.pattern_library
    }

    pub fn pattern_library_mut(&mut self) -> &mut PatternLibrary {
        &mut self.pattern_library
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_content_by_id(&self, id: &str) -> Option<&ElementContent> {
        self.contents.get(id)
    }

    pub fn get_page_by_id(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }

    /// Register an element without placing it in any content.
    pub fn add_element(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
    }

    pub fn add_content(&mut self, content: ElementContent) {
        self.contents.insert(content.id.clone(), content);
    }

    /// Container content and index of a nested element.
    pub fn element_location(&self, id: &str) -> Option<Placement> {
        let content_id = self.elements.get(id)?.container_id.clone()?;
        let index = self
            .contents
            .get(&content_id)?
            .element_ids
            .iter()
            .position(|child| child == id)?;
        Some(Placement { content_id, index })
    }

    /// Content of `element_id` that receives children, preferring the `children` slot.
    pub fn default_content_of(&self, element_id: &str) -> Option<&ElementContent> {
        let element = self.elements.get(element_id)?;
        let contents: Vec<&ElementContent> = element
            .content_ids
            .iter()
            .filter_map(|id| self.contents.get(id))
            .collect();
        contents
            .iter()
            .find(|content| content.name == "children")
            .or_else(|| contents.first())
            .copied()
    }

    /// Snapshot of an element and everything below it, in pre-order.
    pub fn collect_subtree(&self, root_id: &str) -> Option<Subtree> {
        self.elements.get(root_id)?;

        let mut elements = Vec::new();
        let mut contents = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root_id.to_string()];

        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                tracing::warn!(element = %id, "Subtree visits element twice, skipping");
                continue;
            }
            let Some(element) = self.elements.get(&id) else {
                tracing::warn!(element = %id, "Subtree references missing element");
                continue;
            };
            elements.push(element.clone());
            for content_id in &element.content_ids {
                let Some(content) = self.contents.get(content_id) else {
                    tracing::warn!(content = %content_id, "Subtree references missing content");
                    continue;
                };
                contents.push(content.clone());
                stack.extend(content.element_ids.iter().rev().cloned());
            }
        }

        Some(Subtree {
            root_id: root_id.to_string(),
            elements,
            contents,
        })
    }

    /// Detach a nested element and its descendants.
    ///
    /// Returns `None` when the element is missing or is a page root.
    pub fn remove_element_by_id(&mut self, id: &str) -> Option<Detached> {
        let placement = self.element_location(id)?;
        let subtree = self.collect_subtree(id)?;

        if let Some(content) = self.contents.get_mut(&placement.content_id) {
            content.element_ids.remove(placement.index);
        }
        self.forget(&subtree);

        Some(Detached { placement, subtree })
    }

    /// Put a detached subtree back at its placement. Inverse of [`Self::remove_element_by_id`].
    pub fn attach(&mut self, detached: Detached) -> Result<(), ModelError> {
        let Detached {
            placement,
            mut subtree,
        } = detached;

        let len = self
            .contents
            .get(&placement.content_id)
            .ok_or_else(|| ModelError::MissingContent {
                id: placement.content_id.clone(),
            })?
            .element_ids
            .len();
        if placement.index > len {
            return Err(ModelError::IndexOutOfBounds {
                container: placement.content_id,
                index: placement.index,
                len,
            });
        }
        self.ensure_absent(&subtree)?;

        let root_id = subtree.root_id.clone();
        let root = subtree
            .elements
            .iter_mut()
            .find(|element| element.id == root_id)
            .ok_or_else(|| ModelError::MissingElement {
                id: root_id.clone(),
            })?;
        root.container_id = Some(placement.content_id.clone());

        self.remember(subtree);
        if let Some(content) = self.contents.get_mut(&placement.content_id) {
            content.element_ids.insert(placement.index, root_id);
        }
        Ok(())
    }

    /// A fresh page and its root element tree; not yet part of the project.
    pub fn new_page(&self, name: impl Into<String>) -> Option<(Page, Subtree)> {
        let pattern = self
            .pattern_library
            .get_pattern_by_type(PatternType::SyntheticPage)?;
        let subtree = Subtree::from_pattern(pattern, Vec::new());
        let page = Page {
            id: new_id(),
            name: name.into(),
            root_id: subtree.root_id.clone(),
        };
        Some((page, subtree))
    }

    pub fn remove_page(&mut self, id: &str) -> Option<DetachedPage> {
        let index = self.page_index(id)?;
        let subtree = self.collect_subtree(&self.pages[index].root_id)?;
        let page = self.pages.remove(index);
        self.forget(&subtree);
        Some(DetachedPage {
            page,
            index,
            subtree,
        })
    }

    /// Insert a page with its tree at `index`. Inverse of [`Self::remove_page`].
    pub fn restore_page(&mut self, detached: DetachedPage) -> Result<(), ModelError> {
        let DetachedPage {
            page,
            index,
            subtree,
        } = detached;

        if index > self.pages.len() {
            return Err(ModelError::IndexOutOfBounds {
                container: "pages".to_string(),
                index,
                len: self.pages.len(),
            });
        }
        if self.get_page_by_id(&page.id).is_some() {
            return Err(ModelError::DuplicateId { id: page.id });
        }
        if page.root_id != subtree.root_id {
            return Err(ModelError::DanglingReference {
                owner: page.id,
                id: subtree.root_id,
            });
        }
        self.ensure_absent(&subtree)?;

        self.remember(subtree);
        self.pages.insert(index, page);
        Ok(())
    }

    /// Re-import the pattern library and flag elements whose pattern vanished.
    pub fn import_library(
        &mut self,
        analysis: &LibraryAnalysis,
        path: &Path,
        install_type: InstallType,
    ) -> ImportReport {
        let mut report = self.pattern_library.import(analysis, path, install_type);

        for element in self.elements.values_mut() {
            element.orphaned = self
                .pattern_library
                .get_pattern_by_id(&element.pattern_id)
                .is_none();
            if element.orphaned {
                report.orphaned_elements.push(element.id.clone());
            }
        }

        if !report.orphaned_elements.is_empty() {
            tracing::warn!(
                count = report.orphaned_elements.len(),
                "Elements lost their pattern on library import"
            );
        }
        report
    }

    /// Check every cross reference of the tree.
    pub fn validate(&self) -> Result<(), ModelError> {
        for page in &self.pages {
            let root = self
                .elements
                .get(&page.root_id)
                .ok_or_else(|| ModelError::DanglingReference {
                    owner: page.id.clone(),
                    id: page.root_id.clone(),
                })?;
            if let Some(container_id) = &root.container_id {
                return Err(ModelError::MembershipMismatch {
                    element: root.id.clone(),
                    content: container_id.clone(),
                    count: 0,
                });
            }
        }

        for content in self.contents.values() {
            let parent = self.elements.get(&content.parent_id).ok_or_else(|| {
                ModelError::DanglingReference {
                    owner: content.id.clone(),
                    id: content.parent_id.clone(),
                }
            })?;
            if !parent.content_ids.contains(&content.id) {
                return Err(ModelError::DanglingReference {
                    owner: parent.id.clone(),
                    id: content.id.clone(),
                });
            }
            for child_id in &content.element_ids {
                let child = self.elements.get(child_id).ok_or_else(|| {
                    ModelError::DanglingReference {
                        owner: content.id.clone(),
                        id: child_id.clone(),
                    }
                })?;
                if child.container_id.as_deref() != Some(content.id.as_str()) {
                    return Err(ModelError::MembershipMismatch {
                        element: child.id.clone(),
                        content: content.id.clone(),
                        count: 1,
                    });
                }
            }
        }

        for element in self.elements.values() {
            for content_id in &element.content_ids {
                if !self.contents.contains_key(content_id) {
                    return Err(ModelError::DanglingReference {
                        owner: element.id.clone(),
                        id: content_id.clone(),
                    });
                }
            }
            if let Some(container_id) = &element.container_id {
                let content = self.contents.get(container_id).ok_or_else(|| {
                    ModelError::DanglingReference {
                        owner: element.id.clone(),
                        id: container_id.clone(),
                    }
                })?;
                let count = content
                    .element_ids
                    .iter()
                    .filter(|id| *id == &element.id)
                    .count();
                if count != 1 {
                    return Err(ModelError::MembershipMismatch {
                        element: element.id.clone(),
                        content: container_id.clone(),
                        count,
                    });
                }
            }
        }

        for element in self.elements.values() {
            self.ensure_rooted(element)?;
        }

        Ok(())
    }

    /// Walk up the container chain of `element`; it must end without revisiting an element.
    fn ensure_rooted(&self, element: &Element) -> Result<(), ModelError> {
        let mut visited = HashSet::new();
        let mut current = element;
        while let Some(container_id) = &current.container_id {
            if !visited.insert(current.id.as_str()) {
                return Err(ModelError::Cycle {
                    element: element.id.clone(),
                });
            }
            current = self
                .contents
                .get(container_id)
                .and_then(|content| self.elements.get(&content.parent_id))
                .ok_or_else(|| ModelError::DanglingReference {
                    owner: current.id.clone(),
                    id: container_id.clone(),
                })?;
        }
        Ok(())
    }

    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            pages: self.pages.clone(),
            elements: self.elements.values().cloned().collect(),
            element_contents: self.contents.values().cloned().collect(),
            pattern_library: self.pattern_library.clone(),
        }
    }

    /// Rebuild a project from its document, rejecting inconsistent trees.
    pub fn from_document(document: ProjectDocument) -> Result<Self, ModelError> {
        let mut elements = BTreeMap::new();
        for element in document.elements {
            let id = element.id.clone();
            if elements.insert(id.clone(), element).is_some() {
                return Err(ModelError::DuplicateId { id });
            }
        }

        let mut contents = BTreeMap::new();
        for content in document.element_contents {
            let id = content.id.clone();
            if contents.insert(id.clone(), content).is_some() {
                return Err(ModelError::DuplicateId { id });
            }
        }

        let project = Self {
            id: document.id,
            name: document.name,
            path: None,
            pages: document.pages,
            elements,
            contents,
            pattern_library: document.pattern_library,
        };
        project.validate()?;
        Ok(project)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let document: ProjectDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    fn ensure_absent(&self, subtree: &Subtree) -> Result<(), ModelError> {
        for element in &subtree.elements {
            if self.elements.contains_key(&element.id) {
                return Err(ModelError::DuplicateId {
                    id: element.id.clone(),
                });
            }
        }
        for content in &subtree.contents {
            if self.contents.contains_key(&content.id) {
                return Err(ModelError::DuplicateId {
                    id: content.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Insert a subtree, flagging elements whose pattern the current library lacks.
    fn remember(&mut self, subtree: Subtree) {
        for mut element in subtree.elements {
            element.orphaned = self
                .pattern_library
                .get_pattern_by_id(&element.pattern_id)
                .is_none();
            self.elements.insert(element.id.clone(), element);
        }
        for content in subtree.contents {
            self.contents.insert(content.id.clone(), content);
        }
    }

    fn forget(&mut self, subtree: &Subtree) {
        for element in &subtree.elements {
            self.elements.remove(&element.id);
        }
        for content in &subtree.contents {
            self.contents.remove(&content.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementProperty;
    use serde_json::json;

    fn insert_box(project: &mut Project, content_id: &str, index: usize) -> String {
        let pattern = project
            .pattern_library()
            .get_pattern_by_type(PatternType::SyntheticBox)
            .cloned()
            .expect("box");
        let subtree = Subtree::from_pattern(
            &pattern,
            vec![ElementProperty::new("synthetic:box:flex", json!(false))],
        );
        let id = subtree.root_id.clone();
        project
            .attach(Detached {
                placement: Placement {
                    content_id: content_id.to_string(),
                    index,
                },
                subtree,
            })
            .expect("attach");
        id
    }

    fn root_content(project: &Project) -> String {
        let root_id = &project.pages()[0].root_id;
        project
            .default_content_of(root_id)
            .expect("root content")
            .id
            .clone()
    }

    #[test]
    fn create_has_one_valid_page() {
        let project = Project::create("Demo");
        assert_eq!(project.pages().len(), 1);
        assert!(project.validate().is_ok());
    }

    #[test]
    fn document_round_trip_preserves_tree() {
        let mut project = Project::create("Demo");
        let content = root_content(&project);
        let a = insert_box(&mut project, &content, 0);
        let a_content = project.default_content_of(&a).expect("content").id.clone();
        insert_box(&mut project, &a_content, 0);
        insert_box(&mut project, &content, 1);

        let restored = Project::from_document(project.to_document()).expect("round trip");
        assert_eq!(restored, project);

        let json = project.to_json().expect("json");
        let reparsed = Project::from_json(&json).expect("parse");
        assert_eq!(reparsed.to_document(), project.to_document());
    }

    #[test]
    fn remove_then_attach_restores_project() {
        let mut project = Project::create("Demo");
        let content = root_content(&project);
        insert_box(&mut project, &content, 0);
        let b = insert_box(&mut project, &content, 1);
        let b_content = project.default_content_of(&b).expect("content").id.clone();
        let nested = insert_box(&mut project, &b_content, 0);
        let before = project.clone();

        let detached = project.remove_element_by_id(&b).expect("removed");
        assert_eq!(detached.placement.index, 1);
        assert_eq!(detached.placement.content_id, content);
        assert!(project.get_element_by_id(&nested).is_none());
        assert!(project.get_content_by_id(&b_content).is_none());
        assert!(project.validate().is_ok());

        project.attach(detached).expect("attach");
        assert_eq!(project, before);
    }

    #[test]
    fn page_root_cannot_be_removed_as_element() {
        let mut project = Project::create("Demo");
        let root_id = project.pages()[0].root_id.clone();
        assert!(project.remove_element_by_id(&root_id).is_none());
        assert!(project.remove_element_by_id("missing").is_none());
    }

    #[test]
    fn remove_and_restore_page() {
        let mut project = Project::create("Demo");
        let before = project.clone();
        let page_id = project.pages()[0].id.clone();

        let detached = project.remove_page(&page_id).expect("page");
        assert!(project.pages().is_empty());
        assert_eq!(project.elements().count(), 0);

        project.restore_page(detached).expect("restore");
        assert_eq!(project, before);
    }

    #[test]
    fn from_document_rejects_dangling_child() {
        let mut document = Project::create("Demo").to_document();
        document.element_contents[0]
            .element_ids
            .push("ghost".to_string());
        let result = Project::from_document(document);
        assert!(matches!(result, Err(ModelError::DanglingReference { .. })));
    }

    #[test]
    fn from_document_rejects_duplicate_membership() {
        let mut project = Project::create("Demo");
        let content = root_content(&project);
        let a = insert_box(&mut project, &content, 0);
        let mut document = project.to_document();
        let doc_content = document
            .element_contents
            .iter_mut()
            .find(|c| c.id == content)
            .expect("content");
        doc_content.element_ids.push(a);
        let result = Project::from_document(document);
        assert!(matches!(
            result,
            Err(ModelError::MembershipMismatch { count: 2, .. })
        ));
    }

    #[test]
    fn from_document_rejects_cycle() {
        let mut project = Project::create("Demo");
        let content = root_content(&project);
        let a = insert_box(&mut project, &content, 0);
        let inner = project.default_content_of(&a).expect("box content").id.clone();

        let mut document = project.to_document();
        for doc_content in &mut document.element_contents {
            if doc_content.id == content {
                doc_content.element_ids.retain(|id| id != &a);
            } else if doc_content.id == inner {
                doc_content.element_ids.push(a.clone());
            }
        }
        let element = document
            .elements
            .iter_mut()
            .find(|element| element.id == a)
            .expect("element");
        element.container_id = Some(inner);

        let result = Project::from_document(document);
        assert!(matches!(result, Err(ModelError::Cycle { element }) if element == a));
    }

    #[test]
    fn attach_flags_elements_missing_from_library() {
        let mut project = Project::create("Demo");
        let content = root_content(&project);
        let a = insert_box(&mut project, &content, 0);
        let detached = project.remove_element_by_id(&a).expect("detached");
        assert!(!detached.subtree.elements[0].orphaned);

        project
            .pattern_library_mut()
            .patterns
            .retain(|pattern| pattern.pattern_type != PatternType::SyntheticBox);
        project.attach(detached).expect("attach");

        assert!(project.get_element_by_id(&a).expect("element").orphaned);
    }
}
