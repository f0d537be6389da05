//! Shared test utilities and mock collaborators.

#![allow(dead_code, unused_imports)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alva_sync::config::Config;
use alva_sync::host::{
    App, AppRegistry, DataHost, FileDialogOptions, Host, HostContext, HostError, LibraryAnalyzer,
    MemoryDataHost,
};
use alva_sync::message::{LibraryConnection, Message, MessageBody, MessageType};
use alva_sync::model::{
    AnalysisFailure, Detached, ElementProperty, LibraryAnalysis, LibraryAnalysisResult,
    PatternLibrary, PatternType, Placement, Project, Subtree,
};
use alva_sync::renderer::UiBridge;
use alva_sync::transport::{Handler, Transport};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::json;

pub const APP_ID: &str = "app-1";

/// Records outbound messages and lets tests inject inbound ones.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Message>>,
    handlers: RwLock<Vec<Handler>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().clone()
    }

    pub fn sent_types(&self) -> Vec<MessageType> {
        self.sent.lock().iter().map(Message::message_type).collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    /// Run every registered handler as if `message` arrived from the peer.
    pub fn deliver(&self, message: &Message) {
        for handler in self.handlers.read().iter() {
            handler(message);
        }
    }
}

impl Transport for RecordingTransport {
    fn send(&self, message: Message) {
        self.sent.lock().push(message);
    }

    fn receive(&self, handler: Handler) {
        self.handlers.write().push(handler);
    }
}

/// Host with scripted dialog answers; file access hits the real filesystem.
#[derive(Default)]
pub struct MockHost {
    pub apps: AppRegistry,
    answers: Mutex<VecDeque<Option<PathBuf>>>,
    pub dialogs: Mutex<Vec<FileDialogOptions>>,
    pub urls: Mutex<Vec<String>>,
    pub logs: Mutex<Vec<String>>,
}

impl MockHost {
    /// Queue the path the next file dialog returns; `None` cancels it.
    pub fn answer_dialog(&self, path: Option<PathBuf>) {
        self.answers.lock().push_back(path);
    }

    pub fn dialog_count(&self) -> usize {
        self.dialogs.lock().len()
    }
}

#[async_trait]
impl Host for MockHost {
    fn get_app(&self, id: &str) -> Option<App> {
        self.apps.get(id)
    }

    async fn select_file(&self, options: FileDialogOptions) -> Option<PathBuf> {
        self.dialogs.lock().push(options);
        self.answers.lock().pop_front().flatten()
    }

    async fn open_external_url(&self, url: &str) -> Result<(), HostError> {
        self.urls.lock().push(url.to_string());
        Ok(())
    }

    fn log(&self, message: &str) {
        self.logs.lock().push(message.to_string());
    }
}

/// Analyzer returning a fixed result and recording what it was asked.
pub struct MockAnalyzer {
    result: LibraryAnalysisResult,
    calls: AtomicUsize,
    pub previous: Mutex<Vec<Option<String>>>,
}

impl MockAnalyzer {
    pub fn new(result: LibraryAnalysisResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            previous: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LibraryAnalyzer for MockAnalyzer {
    async fn analyze(
        &self,
        _directory: &Path,
        previous: Option<&PatternLibrary>,
    ) -> LibraryAnalysisResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.previous
            .lock()
            .push(previous.map(|library| library.id.clone()));
        self.result.clone()
    }
}

/// In-memory data host that counts connection writes.
#[derive(Default)]
pub struct CountingDataHost {
    inner: MemoryDataHost,
    added: Mutex<Vec<LibraryConnection>>,
}

impl CountingDataHost {
    pub fn added(&self) -> Vec<LibraryConnection> {
        self.added.lock().clone()
    }
}

#[async_trait]
impl DataHost for CountingDataHost {
    async fn get_project(&self, id: &str) -> Option<Project> {
        self.inner.get_project(id).await
    }

    async fn add_project(&self, project: Project) {
        self.inner.add_project(project).await
    }

    async fn add_connection(
        &self,
        project: &Project,
        connection: LibraryConnection,
    ) -> Result<(), HostError> {
        self.added.lock().push(connection.clone());
        self.inner.add_connection(project, connection).await
    }

    async fn connections(&self, project: &Project) -> Vec<LibraryConnection> {
        self.inner.connections(project).await
    }
}

/// UI bridge whose input focus tests can flip.
#[derive(Default)]
pub struct FocusedBridge(AtomicBool);

impl FocusedBridge {
    pub fn set_focused(&self, focused: bool) {
        self.0.store(focused, Ordering::SeqCst);
    }
}

impl UiBridge for FocusedBridge {
    fn has_focused_input(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A host side wired to mocks, with one registered app.
pub struct HostFixture {
    pub host: Arc<MockHost>,
    pub data: Arc<CountingDataHost>,
    pub analyzer: Arc<MockAnalyzer>,
    pub transport: Arc<RecordingTransport>,
}

impl HostFixture {
    pub fn new(result: LibraryAnalysisResult) -> Self {
        let transport = RecordingTransport::new();
        let host = Arc::new(MockHost::default());
        host.apps.register(App::new(APP_ID, transport.clone()));
        Self {
            host,
            data: Arc::new(CountingDataHost::default()),
            analyzer: Arc::new(MockAnalyzer::new(result)),
            transport,
        }
    }

    pub fn context(&self, config: Config) -> HostContext {
        HostContext {
            host: self.host.clone(),
            data_host: self.data.clone(),
            analyzer: self.analyzer.clone(),
            config,
        }
    }
}

pub fn analysis(name: &str, version: &str) -> LibraryAnalysis {
    LibraryAnalysis {
        name: name.to_string(),
        version: version.to_string(),
        path: PathBuf::from("/libraries").join(name),
        description: None,
        patterns: Vec::new(),
    }
}

pub fn analysis_success(name: &str, version: &str) -> LibraryAnalysisResult {
    LibraryAnalysisResult::Success {
        result: analysis(name, version),
    }
}

pub fn analysis_failure(message: &str) -> LibraryAnalysisResult {
    LibraryAnalysisResult::Error {
        error: AnalysisFailure {
            message: message.to_string(),
            stack: Some("at analyze".to_string()),
        },
    }
}

/// A request from the registered app with a fresh transaction.
pub fn request(body: MessageBody) -> Message {
    Message::new(body)
        .with_transaction(uuid::Uuid::new_v4())
        .with_app(APP_ID)
}

/// A one-page project whose root content holds `count` boxes.
///
/// Returns the project, the root content id and the box ids in order.
pub fn project_with_boxes(count: usize) -> (Project, String, Vec<String>) {
    let mut project = Project::create("Demo");
    let root = project.pages()[0].root_id.clone();
    let content = project
        .default_content_of(&root)
        .expect("root content")
        .id
        .clone();
    let pattern = project
        .pattern_library()
        .get_pattern_by_type(PatternType::SyntheticBox)
        .cloned()
        .expect("box pattern");

    let mut ids = Vec::new();
    for index in 0..count {
        let subtree = Subtree::from_pattern(
            &pattern,
            vec![ElementProperty::new("synthetic:box:flex", json!(true))],
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
            .expect("attach box");
    }
    (project, content, ids)
}

/// Poll `check` until it holds or the timeout expires.
pub async fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
