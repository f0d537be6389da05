mod common;

use std::path::PathBuf;

use alva_sync::message::{
    CreateNewPlaceholder, ElementRef, LibraryCheck, LibraryResponse, Message, MessageBody,
    ProjectFile,
};
use alva_sync::model::{InstallType, PatternLibraryState, Project};
use alva_sync::renderer::{RendererContext, RendererRouter};
use alva_sync::store::{View, ViewStore};
use common::{analysis, project_with_boxes, FocusedBridge};

struct Renderer {
    store: ViewStore,
    router: RendererRouter,
    ui: FocusedBridge,
}

impl Renderer {
    fn with_boxes(count: usize) -> (Self, String, Vec<String>) {
        let (project, content, ids) = project_with_boxes(count);
        let mut renderer = Self {
            store: ViewStore::default(),
            router: RendererRouter::new(64),
            ui: FocusedBridge::default(),
        };
        renderer.route(MessageBody::OpenFileResponse(ProjectFile {
            path: None,
            contents: project.to_document(),
        }));
        (renderer, content, ids)
    }

    fn route(&mut self, body: MessageBody) -> Vec<Message> {
        let mut ctx = RendererContext {
            store: &mut self.store,
            app: &self.ui,
        };
        self.router.route(&Message::new(body), &mut ctx)
    }
}

#[test]
fn focused_input_blocks_every_edit_command() {
    let (mut renderer, _content, ids) = Renderer::with_boxes(2);
    renderer.route(MessageBody::SelectElement(ElementRef { id: ids[0].clone() }));
    renderer.route(MessageBody::CopyElement(ids[0].clone()));
    renderer.route(MessageBody::SelectElement(ElementRef { id: ids[1].clone() }));
    let before = renderer.store.project().cloned();
    let clipboard = renderer.store.clipboard().cloned();

    renderer.ui.set_focused(true);
    for body in [
        MessageBody::Copy,
        MessageBody::CopyElement(ids[1].clone()),
        MessageBody::Delete,
        MessageBody::DeleteElement(ids[1].clone()),
        MessageBody::Cut,
        MessageBody::CutElement(ids[1].clone()),
        MessageBody::Paste,
        MessageBody::PasteElementBelow(ids[1].clone()),
        MessageBody::PasteElementInside(ids[1].clone()),
        MessageBody::Duplicate,
        MessageBody::DuplicateElement(ids[1].clone()),
        MessageBody::Undo,
        MessageBody::Redo,
    ] {
        renderer.route(body);
    }

    assert_eq!(renderer.store.project().cloned(), before);
    assert_eq!(renderer.store.clipboard().cloned(), clipboard);
    assert_eq!(renderer.store.history().undo_len(), 0);
}

#[test]
fn commands_run_once_input_loses_focus() {
    let (mut renderer, content, ids) = Renderer::with_boxes(2);
    renderer.ui.set_focused(true);
    renderer.route(MessageBody::DeleteElement(ids[0].clone()));
    assert_eq!(renderer.store.history().undo_len(), 0);

    renderer.ui.set_focused(false);
    renderer.route(MessageBody::DeleteElement(ids[0].clone()));
    let remaining = renderer
        .store
        .project()
        .and_then(|project| project.get_content_by_id(&content))
        .map(|content| content.element_ids.clone());
    assert_eq!(remaining, Some(vec![ids[1].clone()]));

    renderer.route(MessageBody::Undo);
    assert_eq!(renderer.store.history().redo_len(), 1);
}

#[test]
fn library_response_imports_and_notifies_host() {
    let (mut renderer, _content, _ids) = Renderer::with_boxes(1);
    let request = Message::new(MessageBody::ConnectPatternLibraryRequest(
        alva_sync::message::ConnectLibraryRequest {
            project_id: "unused".to_string(),
            library: None,
        },
    ));
    let response = Message::respond_to(
        &request,
        MessageBody::ConnectPatternLibraryResponse(LibraryResponse {
            analysis: analysis("foo", "1.0.0"),
            path: PathBuf::from("/libraries/foo"),
            previous_library_id: None,
            install_type: InstallType::Local,
        }),
    );

    let mut ctx = RendererContext {
        store: &mut renderer.store,
        app: &renderer.ui,
    };
    let outgoing = renderer.router.route(&response, &mut ctx);

    assert_eq!(outgoing.len(), 1);
    let MessageBody::ConnectedPatternLibraryNotification(notification) = &outgoing[0].body else {
        panic!("unexpected {:?}", outgoing[0].body);
    };
    assert_eq!(notification.id, "foo@1.0.0");
    let project = renderer.store.project().expect("project");
    assert_eq!(notification.project_id, project.id());
    assert_eq!(&notification.library, project.pattern_library());
    assert_eq!(project.pattern_library().state, PatternLibraryState::Connected);
}

#[test]
fn check_response_marks_missing_library_disconnected() {
    let (mut renderer, _content, _ids) = Renderer::with_boxes(1);
    renderer.route(MessageBody::ConnectPatternLibraryResponse(LibraryResponse {
        analysis: analysis("foo", "1.0.0"),
        path: PathBuf::from("/libraries/foo"),
        previous_library_id: None,
        install_type: InstallType::Local,
    }));
    renderer.store.take_changes();

    renderer.route(MessageBody::CheckLibraryResponse(vec![LibraryCheck {
        id: "foo@1.0.0".to_string(),
        connected: false,
    }]));
    let library = renderer.store.project().expect("project").pattern_library();
    assert_eq!(library.state, PatternLibraryState::Disconnected);
    assert!(renderer.store.take_changes().pattern_library);
}

#[test]
fn placeholder_lands_after_sibling_target() {
    let (mut renderer, content, ids) = Renderer::with_boxes(2);
    renderer.route(MessageBody::CreateNewPlaceholder(CreateNewPlaceholder {
        target_element_id: ids[0].clone(),
        target_content_id: content.clone(),
        is_sibling_drop: true,
        data: "data:image/png;base64,cG5n".to_string(),
    }));

    let project = renderer.store.project().expect("project");
    let order = project
        .get_content_by_id(&content)
        .map(|content| content.element_ids.clone())
        .unwrap_or_default();
    assert_eq!(order.len(), 3);
    assert_eq!(order[0], ids[0]);
    assert_eq!(order[2], ids[1]);
    assert_eq!(renderer.store.history().undo_len(), 1);
}

#[test]
fn opening_connected_project_asks_host_to_check_library() {
    let (mut renderer, _content, _ids) = Renderer::with_boxes(1);
    let pristine = renderer.store.project().expect("project").to_document();
    assert!(renderer
        .route(MessageBody::OpenFileResponse(ProjectFile {
            path: None,
            contents: pristine,
        }))
        .is_empty());

    renderer.route(MessageBody::ConnectPatternLibraryResponse(LibraryResponse {
        analysis: analysis("foo", "1.0.0"),
        path: PathBuf::from("/libraries/foo"),
        previous_library_id: None,
        install_type: InstallType::Local,
    }));
    let connected = renderer.store.project().expect("project").to_document();

    let outgoing = renderer.route(MessageBody::OpenFileResponse(ProjectFile {
        path: Some(PathBuf::from("/projects/demo.alva")),
        contents: connected.clone(),
    }));
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].body, MessageBody::CheckLibraryRequest(connected));
    assert_eq!(renderer.store.view(), View::PageDetail);
}

#[test]
fn opening_project_without_pages_shows_page_overview() {
    let (mut renderer, _content, _ids) = Renderer::with_boxes(1);
    renderer.route(MessageBody::OpenFileResponse(ProjectFile {
        path: None,
        contents: Project::new("Empty").to_document(),
    }));
    assert_eq!(renderer.store.view(), View::Pages);
}
