use std::path::Path;

use serde_json::Value;

use crate::message::ShowError;
use crate::model::{
    new_id, Detached, DetachedPage, ElementProperty, ImportReport, InstallType, LibraryAnalysis,
    Page, PatternLibraryState, PatternType, Placement, Project, Subtree,
};

use super::changes::ChangeSet;
use super::command::EditCommand;
use super::history::History;
use super::state::{AppState, Clipboard, ItemType, View};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// The renderer's single stateful coordinator.
///
/// Holds the active project plus everything the user sees around it, and
/// exposes every edit as a method that mutates the project, records one
/// history entry and marks the derived state that changed. Operations that
/// reference a missing element or page log and leave everything untouched.
#[derive(Debug)]
pub struct ViewStore {
    project: Option<Project>,
    view: View,
    active_page: Option<String>,
    selected_element: Option<String>,
    selected_page: Option<String>,
    highlighted_element: Option<String>,
    highlight_flat: bool,
    clipboard: Option<Clipboard>,
    focused_item_type: ItemType,
    app_state: AppState,
    server_port: Option<u16>,
    meta_down: bool,
    last_error: Option<ShowError>,
    pending_library_update: Option<String>,
    history: History,
    changes: ChangeSet,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ViewStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            project: None,
            view: View::SplashScreen,
            active_page: None,
            selected_element: None,
            selected_page: None,
            highlighted_element: None,
            highlight_flat: true,
            clipboard: None,
            focused_item_type: ItemType::None,
            app_state: AppState::Starting,
            server_port: None,
            meta_down: false,
            last_error: None,
            pending_library_update: None,
            history: History::new(history_limit),
            changes: ChangeSet::default(),
        }
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn active_page(&self) -> Option<&Page> {
        let id = self.active_page.as_deref()?;
        self.project.as_ref()?.get_page_by_id(id)
    }

    pub fn selected_element_id(&self) -> Option<&str> {
        self.selected_element.as_deref()
    }

    pub fn selected_page_id(&self) -> Option<&str> {
        self.selected_page.as_deref()
    }

    pub fn highlighted_element_id(&self) -> Option<&str> {
        self.highlighted_element.as_deref()
    }

    /// Ids drawn as highlighted: the element alone, or with its descendants
    /// when the meta key was down as it was highlighted.
    pub fn highlighted_element_ids(&self) -> Vec<String> {
        let Some(id) = self.highlighted_element.as_deref() else {
            return Vec::new();
        };
        if self.highlight_flat {
            return vec![id.to_string()];
        }
        self.project
            .as_ref()
            .and_then(|project| project.collect_subtree(id))
            .map(|subtree| subtree.elements.into_iter().map(|element| element.id).collect())
            .unwrap_or_default()
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn focused_item_type(&self) -> ItemType {
        self.focused_item_type
    }

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    pub fn server_port(&self) -> Option<u16> {
        self.server_port
    }

    pub fn is_meta_down(&self) -> bool {
        self.meta_down
    }

    pub fn last_error(&self) -> Option<&ShowError> {
        self.last_error.as_ref()
    }

    /// Library id announced by `UpdatingPatternLibrary` and not yet answered.
    pub fn pending_library_update(&self) -> Option<&str> {
        self.pending_library_update.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Replace the active project and reset all view state around it.
    ///
    /// Opens the page overview for a project without pages, else the first page.
    pub fn set_project(&mut self, project: Project) {
        tracing::info!(project = %project.id(), name = %project.name(), "Project loaded");
        self.active_page = project.pages().first().map(|page| page.id.clone());
        self.view = if project.pages().is_empty() {
            View::Pages
        } else {
            View::PageDetail
        };
        self.project = Some(project);
        self.selected_element = None;
        self.selected_page = None;
        self.highlighted_element = None;
        self.clipboard = None;
        self.focused_item_type = ItemType::None;
        self.pending_library_update = None;
        self.last_error = None;
        self.history.clear();
        self.changes = ChangeSet::all();
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn set_active_page(&mut self, id: &str) -> bool {
        if !self.has_page(id) {
            tracing::debug!(page = %id, "Page not found, keeping active page");
            return false;
        }
        self.active_page = Some(id.to_string());
        self.changes.page = true;
        true
    }

    /// Host handshake finished; the preview server listens on `port`.
    pub fn start(&mut self, port: u16) {
        self.server_port = Some(port);
        self.app_state = AppState::Started;
    }

    pub fn set_meta_down(&mut self, down: bool) {
        self.meta_down = down;
    }

    pub fn set_focused_item_type(&mut self, item_type: ItemType) {
        self.focused_item_type = item_type;
    }

    pub fn set_last_error(&mut self, error: Option<ShowError>) {
        self.last_error = error;
    }

    pub fn set_pending_library_update(&mut self, library_id: Option<String>) {
        self.pending_library_update = library_id;
    }

    pub fn select_element(&mut self, id: &str) -> bool {
        if !self.has_element(id) {
            tracing::debug!(element = %id, "Element not found, keeping selection");
            return false;
        }
        self.selected_element = Some(id.to_string());
        self.focused_item_type = ItemType::Element;
        self.changes.selection = true;
        true
    }

    pub fn unselect_element(&mut self) {
        if self.selected_element.take().is_some() {
            self.changes.selection = true;
        }
        if self.focused_item_type == ItemType::Element {
            self.focused_item_type = ItemType::None;
        }
    }

    /// Highlight `id`; with the meta key down its descendants light up too.
    pub fn highlight_element(&mut self, id: Option<&str>) {
        self.highlight_flat = !self.meta_down;
        self.highlighted_element = match id {
            Some(id) if self.has_element(id) => Some(id.to_string()),
            Some(id) => {
                tracing::debug!(element = %id, "Element not found, clearing highlight");
                None
            }
            None => None,
        };
    }

    pub fn select_page(&mut self, id: &str) -> bool {
        if !self.has_page(id) {
            tracing::debug!(page = %id, "Page not found, keeping selection");
            return false;
        }
        self.selected_page = Some(id.to_string());
        self.focused_item_type = ItemType::Page;
        true
    }

    /// Re-import the project's pattern library from a fresh analysis.
    pub fn import_library(
        &mut self,
        analysis: &LibraryAnalysis,
        path: &Path,
        install_type: InstallType,
    ) -> Option<ImportReport> {
        let Some(project) = self.project.as_mut() else {
            tracing::debug!("No project loaded, ignoring library import");
            return None;
        };
        let report = project.import_library(analysis, path, install_type);
        self.pending_library_update = None;
        self.changes.pattern_library = true;
        self.changes.page = true;
        Some(report)
    }

    /// Apply a connection check for library `id`. Pristine libraries are never checked.
    pub fn set_library_state(&mut self, id: &str, connected: bool) -> bool {
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let library = project.pattern_library_mut();
        if library.id != id || library.state == PatternLibraryState::Pristine {
            return false;
        }
        let state = if connected {
            PatternLibraryState::Connected
        } else {
            PatternLibraryState::Disconnected
        };
        if library.state != state {
            library.state = state;
            self.changes.pattern_library = true;
        }
        true
    }

    pub fn copy_element_by_id(&mut self, id: &str) -> bool {
        let Some(detached) = self.snapshot_element(id) else {
            return false;
        };
        self.clipboard = Some(Clipboard::Element(detached.subtree));
        true
    }

    /// Copy and remove in one history entry.
    pub fn cut_element_by_id(&mut self, id: &str) -> bool {
        let Some(detached) = self.snapshot_element(id) else {
            return false;
        };
        let subtree = detached.subtree.clone();
        if !self.perform(EditCommand::RemoveElement(detached)) {
            return false;
        }
        self.clipboard = Some(Clipboard::Element(subtree));
        true
    }

    pub fn remove_element_by_id(&mut self, id: &str) -> bool {
        match self.snapshot_element(id) {
            Some(detached) => self.perform(EditCommand::RemoveElement(detached)),
            None => false,
        }
    }

    /// Insert a copy of the clipboard element right after `id`; returns the new element id.
    pub fn paste_after_element_by_id(&mut self, id: &str) -> Option<String> {
        let subtree = self.clipboard_element()?;
        let placement = self.placement_after(id)?;
        self.insert_subtree(placement, subtree)
    }

    /// Append a copy of the clipboard element as the last child of `id`.
    pub fn paste_inside_element_by_id(&mut self, id: &str) -> Option<String> {
        let subtree = self.clipboard_element()?;
        let placement = self.placement_inside(id)?;
        self.insert_subtree(placement, subtree)
    }

    /// Deep-clone `id` with fresh ids right after itself and select the copy.
    pub fn duplicate_element_by_id(&mut self, id: &str) -> Option<String> {
        let source = self.snapshot_element(id)?;
        let placement = Placement {
            content_id: source.placement.content_id,
            index: source.placement.index + 1,
        };
        self.insert_subtree(placement, source.subtree.with_fresh_ids())
    }

    pub fn copy_page_by_id(&mut self, id: &str) -> bool {
        let Some(detached) = self.snapshot_page(id) else {
            return false;
        };
        self.clipboard = Some(Clipboard::Page {
            page: detached.page,
            subtree: detached.subtree,
        });
        true
    }

    pub fn cut_page_by_id(&mut self, id: &str) -> bool {
        let Some(detached) = self.snapshot_page(id) else {
            return false;
        };
        let clipboard = Clipboard::Page {
            page: detached.page.clone(),
            subtree: detached.subtree.clone(),
        };
        if !self.perform(EditCommand::RemovePage(detached)) {
            return false;
        }
        self.clipboard = Some(clipboard);
        true
    }

    pub fn remove_page_by_id(&mut self, id: &str) -> bool {
        match self.snapshot_page(id) {
            Some(detached) => self.perform(EditCommand::RemovePage(detached)),
            None => false,
        }
    }

    /// Insert a copy of the clipboard page after page `id`; returns the new page id.
    pub fn paste_after_page_by_id(&mut self, id: &str) -> Option<String> {
        let Some(Clipboard::Page { page, subtree }) = self.clipboard.clone() else {
            tracing::debug!("Clipboard holds no page, ignoring paste");
            return None;
        };
        let index = self.page_index(id)? + 1;
        self.insert_page_copy(&page.name, &subtree, index)
    }

    pub fn duplicate_page_by_id(&mut self, id: &str) -> Option<String> {
        let source = self.snapshot_page(id)?;
        self.insert_page_copy(&source.page.name, &source.subtree, source.index + 1)
    }

    /// Append a blank page and make it active.
    pub fn add_new_page(&mut self) -> Option<String> {
        let Some(project) = self.project.as_ref() else {
            tracing::debug!("No project loaded, ignoring new page");
            return None;
        };
        let index = project.pages().len();
        let (page, subtree) = project.new_page(format!("Page {}", index + 1))?;
        let page_id = page.id.clone();
        if !self.perform(EditCommand::InsertPage(DetachedPage {
            page,
            index,
            subtree,
        })) {
            return None;
        }
        self.focus_page(&page_id);
        Some(page_id)
    }

    pub fn copy_selected(&mut self) -> bool {
        match self.focused_target() {
            Some((ItemType::Element, id)) => self.copy_element_by_id(&id),
            Some((ItemType::Page, id)) => self.copy_page_by_id(&id),
            _ => false,
        }
    }

    pub fn cut_selected(&mut self) -> bool {
        match self.focused_target() {
            Some((ItemType::Element, id)) => self.cut_element_by_id(&id),
            Some((ItemType::Page, id)) => self.cut_page_by_id(&id),
            _ => false,
        }
    }

    pub fn remove_selected(&mut self) -> bool {
        match self.focused_target() {
            Some((ItemType::Element, id)) => self.remove_element_by_id(&id),
            Some((ItemType::Page, id)) => self.remove_page_by_id(&id),
            _ => false,
        }
    }

    /// Paste below the selected element, or after the selected page.
    pub fn paste_selected(&mut self) -> Option<String> {
        match self.focused_target() {
            Some((ItemType::Element, id)) => self.paste_after_element_by_id(&id),
            Some((ItemType::Page, id)) => self.paste_after_page_by_id(&id),
            _ => None,
        }
    }

    pub fn duplicate_selected(&mut self) -> Option<String> {
        match self.focused_target() {
            Some((ItemType::Element, id)) => self.duplicate_element_by_id(&id),
            Some((ItemType::Page, id)) => self.duplicate_page_by_id(&id),
            _ => None,
        }
    }

    /// Insert a placeholder element showing `data` where a file was dropped.
    ///
    /// A sibling drop lands right after the target element inside
    /// `target_content_id`; any other drop appends to that content.
    pub fn create_placeholder(
        &mut self,
        target_element_id: &str,
        target_content_id: &str,
        is_sibling_drop: bool,
        data: &str,
    ) -> Option<String> {
        let (placement, subtree) = {
            let Some(project) = self.project.as_ref() else {
                tracing::debug!("No project loaded, ignoring placeholder");
                return None;
            };
            let Some(content) = project.get_content_by_id(target_content_id) else {
                tracing::debug!(content = %target_content_id, "Drop target content not found");
                return None;
            };
            let len = content.element_ids.len();
            let index = if is_sibling_drop {
                content
                    .element_ids
                    .iter()
                    .position(|id| id == target_element_id)
                    .map_or(len, |index| index + 1)
            } else {
                len
            };

            let pattern = project
                .pattern_library()
                .get_pattern_by_type(PatternType::SyntheticPlaceholder)?;
            let properties = pattern
                .get_property_by_name("src")
                .map(|property| {
                    vec![ElementProperty::new(
                        property.id.clone(),
                        Value::String(data.to_string()),
                    )]
                })
                .unwrap_or_default();

            (
                Placement {
                    content_id: content.id.clone(),
                    index,
                },
                Subtree::from_pattern(pattern, properties),
            )
        };
        self.insert_subtree(placement, subtree)
    }

    pub fn undo(&mut self) -> bool {
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let undone = self.history.undo(project);
        if undone {
            self.after_edit();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let Some(project) = self.project.as_mut() else {
            return false;
        };
        let redone = self.history.redo(project);
        if redone {
            self.after_edit();
        }
        redone
    }

    /// Derived state changed since the last call.
    pub fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.changes)
    }

    fn perform(&mut self, command: EditCommand) -> bool {
        let Some(project) = self.project.as_mut() else {
            tracing::debug!(edit = command.label(), "No project loaded, ignoring edit");
            return false;
        };
        if let Err(err) = command.apply(project) {
            tracing::warn!(edit = command.label(), error = %err, "Edit rejected");
            return false;
        }
        tracing::debug!(edit = command.label(), "Edit applied");
        self.history.push(command);
        self.after_edit();
        true
    }

    fn insert_subtree(&mut self, placement: Placement, subtree: Subtree) -> Option<String> {
        let root_id = subtree.root_id.clone();
        if !self.perform(EditCommand::InsertElement(Detached { placement, subtree })) {
            return None;
        }
        self.select_element(&root_id);
        Some(root_id)
    }

    fn insert_page_copy(&mut self, name: &str, subtree: &Subtree, index: usize) -> Option<String> {
        let subtree = subtree.with_fresh_ids();
        let page = Page {
            id: new_id(),
            name: name.to_string(),
            root_id: subtree.root_id.clone(),
        };
        let page_id = page.id.clone();
        if !self.perform(EditCommand::InsertPage(DetachedPage {
            page,
            index,
            subtree,
        })) {
            return None;
        }
        self.focus_page(&page_id);
        Some(page_id)
    }

    fn focus_page(&mut self, id: &str) {
        self.active_page = Some(id.to_string());
        self.selected_page = Some(id.to_string());
        self.focused_item_type = ItemType::Page;
    }

    /// Mark the tree dirty and drop view references into removed parts.
    fn after_edit(&mut self) {
        self.changes.page = true;
        let Some(project) = self.project.as_ref() else {
            return;
        };

        if let Some(id) = &self.selected_element {
            if project.get_element_by_id(id).is_none() {
                self.selected_element = None;
                self.changes.selection = true;
            }
        }
        if let Some(id) = &self.highlighted_element {
            if project.get_element_by_id(id).is_none() {
                self.highlighted_element = None;
            }
        }
        if let Some(id) = &self.selected_page {
            if project.get_page_by_id(id).is_none() {
                self.selected_page = None;
            }
        }
        let active_missing = self
            .active_page
            .as_deref()
            .map_or(true, |id| project.get_page_by_id(id).is_none());
        if active_missing {
            self.active_page = project.pages().first().map(|page| page.id.clone());
        }
    }

    fn focused_target(&self) -> Option<(ItemType, String)> {
        let id = match self.focused_item_type {
            ItemType::Element => self.selected_element.clone(),
            ItemType::Page => self.selected_page.clone(),
            ItemType::None => None,
        }?;
        Some((self.focused_item_type, id))
    }

    fn has_element(&self, id: &str) -> bool {
        self.project
            .as_ref()
            .is_some_and(|project| project.get_element_by_id(id).is_some())
    }

    fn has_page(&self, id: &str) -> bool {
        self.project
            .as_ref()
            .is_some_and(|project| project.get_page_by_id(id).is_some())
    }

    fn page_index(&self, id: &str) -> Option<usize> {
        let index = self.project.as_ref()?.page_index(id);
        if index.is_none() {
            tracing::debug!(page = %id, "Page not found, ignoring edit");
        }
        index
    }

    fn clipboard_element(&self) -> Option<Subtree> {
        match &self.clipboard {
            Some(Clipboard::Element(subtree)) => Some(subtree.with_fresh_ids()),
            _ => {
                tracing::debug!("Clipboard holds no element, ignoring paste");
                None
            }
        }
    }

    /// Current placement and subtree of a nested element. Page roots are not editable.
    fn snapshot_element(&self, id: &str) -> Option<Detached> {
        let project = self.project.as_ref()?;
        let Some(placement) = project.element_location(id) else {
            tracing::debug!(element = %id, "Element not found or not nested, ignoring edit");
            return None;
        };
        let subtree = project.collect_subtree(id)?;
        Some(Detached { placement, subtree })
    }

    fn snapshot_page(&self, id: &str) -> Option<DetachedPage> {
        let project = self.project.as_ref()?;
        let Some(index) = project.page_index(id) else {
            tracing::debug!(page = %id, "Page not found, ignoring edit");
            return None;
        };
        let page = project.pages()[index].clone();
        let subtree = project.collect_subtree(&page.root_id)?;
        Some(DetachedPage {
            page,
            index,
            subtree,
        })
    }

    fn placement_after(&self, id: &str) -> Option<Placement> {
        let project = self.project.as_ref()?;
        let Some(placement) = project.element_location(id) else {
            tracing::debug!(element = %id, "Paste target not found, ignoring paste");
            return None;
        };
        Some(Placement {
            content_id: placement.content_id,
            index: placement.index + 1,
        })
    }

    fn placement_inside(&self, id: &str) -> Option<Placement> {
        let project = self.project.as_ref()?;
        let Some(content) = project.default_content_of(id) else {
            tracing::debug!(element = %id, "Paste target has no content, ignoring paste");
            return None;
        };
        Some(Placement {
            content_id: content.id.clone(),
            index: content.element_ids.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with_boxes(count: usize) -> (ViewStore, String, Vec<String>) {
        let mut project = Project::create("Demo");
        let root = project.pages()[0].root_id.clone();
        let content = project.default_content_of(&root).expect("content").id.clone();
        let pattern = project
            .pattern_library()
            .get_pattern_by_type(PatternType::SyntheticBox)
            .cloned()
            .expect("box");
        let mut ids = Vec::new();
        for index in 0..count {
            let subtree = Subtree::from_pattern(
                &pattern,
                vec![ElementProperty::new("synthetic:box:flex", json!(index % 2 == 0))],
            );
            ids.push(subtree.root_id.clone());
            project
                .attach(Detached {
                    placement: Placement {
                        content_id: content.clone(),
                        index,
                    },
                    subtree,
                })
                .expect("attach");
        }
        let mut store = ViewStore::default();
        store.set_project(project);
        store.take_changes();
        (store, content, ids)
    }

    fn children(store: &ViewStore, content: &str) -> Vec<String> {
        store
            .project()
            .and_then(|project| project.get_content_by_id(content))
            .map(|content| content.element_ids.clone())
            .unwrap_or_default()
    }

    #[test]
    fn set_project_resets_view_state() {
        let (mut store, _, ids) = store_with_boxes(1);
        store.select_element(&ids[0]);
        store.copy_element_by_id(&ids[0]);
        store.remove_element_by_id(&ids[0]);

        store.set_project(Project::create("Other"));
        assert_eq!(store.view(), View::PageDetail);
        assert!(store.selected_element_id().is_none());
        assert!(store.clipboard().is_none());
        assert!(!store.history().can_undo());
        assert!(store.active_page().is_some());
        assert_eq!(store.take_changes(), ChangeSet::all());
    }

    #[test]
    fn project_without_pages_opens_page_overview() {
        let mut store = ViewStore::default();
        store.set_project(Project::new("Empty"));
        assert_eq!(store.view(), View::Pages);
        assert!(store.active_page().is_none());
    }

    #[test]
    fn meta_key_highlights_descendants() {
        let (mut store, _, ids) = store_with_boxes(2);
        store.copy_element_by_id(&ids[0]);
        let child = store.paste_inside_element_by_id(&ids[1]).expect("pasted");

        store.highlight_element(Some(&ids[1]));
        assert_eq!(store.highlighted_element_ids(), vec![ids[1].clone()]);

        store.set_meta_down(true);
        store.highlight_element(Some(&ids[1]));
        assert_eq!(store.highlighted_element_ids(), vec![ids[1].clone(), child]);
    }

    #[test]
    fn cut_is_one_history_entry() {
        let (mut store, content, ids) = store_with_boxes(2);
        let before = store.project().cloned();

        assert!(store.cut_element_by_id(&ids[0]));
        assert_eq!(store.history().undo_len(), 1);
        assert_eq!(children(&store, &content), vec![ids[1].clone()]);
        assert!(matches!(store.clipboard(), Some(Clipboard::Element(_))));

        assert!(store.undo());
        assert_eq!(store.project().cloned(), before);
    }

    #[test]
    fn paste_below_inserts_fresh_copy_after_target() {
        let (mut store, content, ids) = store_with_boxes(2);
        store.copy_element_by_id(&ids[0]);

        let pasted = store.paste_after_element_by_id(&ids[1]).expect("pasted");
        let list = children(&store, &content);
        assert_eq!(list, vec![ids[0].clone(), ids[1].clone(), pasted.clone()]);
        assert_ne!(pasted, ids[0]);

        let project = store.project().expect("project");
        let original = project.get_element_by_id(&ids[0]).expect("original");
        let copy = project.get_element_by_id(&pasted).expect("copy");
        assert_eq!(copy.pattern_id, original.pattern_id);
        assert_eq!(copy.properties[0].value, original.properties[0].value);
        assert_ne!(copy.properties[0].id, original.properties[0].id);
        assert_eq!(store.selected_element_id(), Some(pasted.as_str()));
    }

    #[test]
    fn paste_inside_appends_to_children() {
        let (mut store, _, ids) = store_with_boxes(2);
        store.copy_element_by_id(&ids[0]);

        let pasted = store.paste_inside_element_by_id(&ids[1]).expect("pasted");
        let project = store.project().expect("project");
        let target_content = project.default_content_of(&ids[1]).expect("content");
        assert_eq!(target_content.element_ids, vec![pasted]);
    }

    #[test]
    fn paste_with_missing_target_adds_no_history() {
        let (mut store, _, ids) = store_with_boxes(1);
        store.copy_element_by_id(&ids[0]);
        assert!(store.paste_after_element_by_id("missing").is_none());
        assert!(store.paste_inside_element_by_id("missing").is_none());
        assert!(!store.history().can_undo());
    }

    #[test]
    fn duplicate_inserts_after_source() {
        let (mut store, content, ids) = store_with_boxes(1);
        let copy = store.duplicate_element_by_id(&ids[0]).expect("duplicate");
        assert_eq!(children(&store, &content), vec![ids[0].clone(), copy.clone()]);
        assert_eq!(store.selected_element_id(), Some(copy.as_str()));
        assert!(store.project().expect("project").validate().is_ok());
    }

    #[test]
    fn removing_selected_element_clears_selection() {
        let (mut store, _, ids) = store_with_boxes(1);
        store.select_element(&ids[0]);
        store.highlight_element(Some(&ids[0]));
        store.take_changes();

        assert!(store.remove_selected());
        assert!(store.selected_element_id().is_none());
        assert!(store.highlighted_element_id().is_none());
        let changes = store.take_changes();
        assert!(changes.page && changes.selection);
    }

    #[test]
    fn focus_selects_edit_target() {
        let (mut store, _, ids) = store_with_boxes(1);
        assert!(!store.copy_selected());

        let page_id = store.project().expect("project").pages()[0].id.clone();
        store.select_page(&page_id);
        assert!(store.copy_selected());
        assert!(matches!(store.clipboard(), Some(Clipboard::Page { .. })));

        store.select_element(&ids[0]);
        assert!(store.copy_selected());
        assert!(matches!(store.clipboard(), Some(Clipboard::Element(_))));
    }

    #[test]
    fn page_duplicate_and_undo() {
        let (mut store, _, _) = store_with_boxes(2);
        let before = store.project().cloned();
        let page_id = store.project().expect("project").pages()[0].id.clone();

        let copy = store.duplicate_page_by_id(&page_id).expect("copy");
        let project = store.project().expect("project");
        assert_eq!(project.pages().len(), 2);
        assert_eq!(project.pages()[1].id, copy);
        assert_eq!(store.active_page().map(|page| page.id.clone()), Some(copy));

        assert!(store.undo());
        assert_eq!(store.project().cloned(), before);
        assert_eq!(
            store.active_page().map(|page| page.id.clone()),
            Some(page_id)
        );
    }

    #[test]
    fn cut_page_then_paste_restores_shape() {
        let (mut store, _, _) = store_with_boxes(1);
        let first = store.add_new_page().expect("page");
        let pages: Vec<String> = store
            .project()
            .expect("project")
            .pages()
            .iter()
            .map(|page| page.id.clone())
            .collect();
        assert_eq!(pages.len(), 2);

        assert!(store.cut_page_by_id(&pages[0]));
        let pasted = store.paste_after_page_by_id(&first).expect("pasted");
        let project = store.project().expect("project");
        assert_eq!(project.pages().len(), 2);
        assert_eq!(project.pages()[1].id, pasted);
        assert_eq!(store.history().undo_len(), 3);
    }

    #[test]
    fn placeholder_lands_after_sibling() {
        let (mut store, content, ids) = store_with_boxes(2);
        let placeholder = store
            .create_placeholder(&ids[0], &content, true, "data:image/png;base64,AAAA")
            .expect("placeholder");
        assert_eq!(
            children(&store, &content),
            vec![ids[0].clone(), placeholder.clone(), ids[1].clone()]
        );

        let project = store.project().expect("project");
        let element = project.get_element_by_id(&placeholder).expect("element");
        assert_eq!(element.properties[0].value, json!("data:image/png;base64,AAAA"));
    }

    #[test]
    fn edits_without_project_are_noops() {
        let mut store = ViewStore::default();
        assert!(!store.cut_selected());
        assert!(store.add_new_page().is_none());
        assert!(!store.undo());
        assert!(!store.select_element("e1"));
        assert!(store.take_changes().is_empty());
    }

    #[test]
    fn library_check_updates_connected_library_only() {
        let (mut store, _, _) = store_with_boxes(0);
        let id = store
            .project()
            .expect("project")
            .pattern_library()
            .id
            .clone();
        assert!(!store.set_library_state(&id, true));

        let analysis = LibraryAnalysis {
            name: "foo".to_string(),
            version: "1.0.0".to_string(),
            path: "/lib".into(),
            description: None,
            patterns: Vec::new(),
        };
        store.set_pending_library_update(Some("old".to_string()));
        store
            .import_library(&analysis, Path::new("/lib"), InstallType::Local)
            .expect("report");
        assert!(store.pending_library_update().is_none());

        assert!(store.set_library_state("foo@1.0.0", false));
        assert_eq!(
            store.project().expect("project").pattern_library().state,
            PatternLibraryState::Disconnected
        );
    }
}
