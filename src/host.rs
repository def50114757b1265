//! Host application content.
//!
//! The executor asks the host for "the currently active content" whenever a
//! search is started without an explicit target. [`Workspace`] is the bundled
//! host: a set of open documents, one of which is active.

use crate::content::{RenderedDocument, TextEditor};
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::target::SearchTarget;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Source of the default search target.
pub trait ActiveContent: Send + Sync {
    /// The content the user is currently looking at, if any.
    fn active_target(&self) -> Option<SearchTarget>;
}

/// Extensions opened as rendered documents rather than text editors.
///
/// Only HTML markup is stripped for display, so Markdown stays in an editor.
const RENDERED_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// How an open document is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    TextEditor,
    RenderedDocument,
}

impl DocumentKind {
    /// Pick the presentation for a file by its extension.
    pub fn for_path(path: &Path) -> Self {
        let rendered = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                RENDERED_EXTENSIONS
                    .iter()
                    .any(|r| r.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false);

        if rendered {
            Self::RenderedDocument
        } else {
            Self::TextEditor
        }
    }
}

/// A document open in the workspace.
#[derive(Debug, Clone)]
pub enum OpenDocument {
    Editor(Arc<TextEditor>),
    Rendered(Arc<RenderedDocument>),
}

impl OpenDocument {
    /// Search target wrapping this document's content.
    pub fn target(&self) -> SearchTarget {
        match self {
            Self::Editor(editor) => SearchTarget::new(Arc::clone(editor)),
            Self::Rendered(doc) => SearchTarget::new(Arc::clone(doc)),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Editor(_) => DocumentKind::TextEditor,
            Self::Rendered(_) => DocumentKind::RenderedDocument,
        }
    }
}

/// Summary of an open document for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub id: String,
    pub title: String,
    pub kind: DocumentKind,
    pub active: bool,
}

#[derive(Debug, Default)]
struct WorkspaceState {
    documents: Vec<(String, String, OpenDocument)>,
    active: Option<String>,
    next_id: u64,
}

/// Open documents plus the active one.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    state: RwLock<WorkspaceState>,
}

impl Workspace {
    /// Create an empty workspace resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: RwLock::new(WorkspaceState::default()),
        }
    }

    /// Open `text` in a new text editor and make it active.
    pub fn add_text_editor(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> WorkspaceResult<String> {
        let title = title.into();
        let editor = Arc::new(TextEditor::new(title.clone(), text));
        self.insert(title, OpenDocument::Editor(editor))
    }

    /// Render `markup` in a new document view and make it active.
    pub fn add_rendered_document(
        &self,
        title: impl Into<String>,
        markup: impl Into<String>,
    ) -> WorkspaceResult<String> {
        let title = title.into();
        let doc = Arc::new(RenderedDocument::new(title.clone(), markup));
        self.insert(title, OpenDocument::Rendered(doc))
    }

    /// Read a file and open it, presentation chosen by extension.
    ///
    /// Relative paths are resolved against the workspace root.
    pub fn open_path(&self, path: impl AsRef<Path>) -> WorkspaceResult<String> {
        let path = path.as_ref();
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let contents = std::fs::read_to_string(&full_path).map_err(|source| WorkspaceError::Io {
            path: full_path.display().to_string(),
            source,
        })?;

        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let id = match DocumentKind::for_path(path) {
            DocumentKind::TextEditor => self.add_text_editor(title, contents)?,
            DocumentKind::RenderedDocument => self.add_rendered_document(title, contents)?,
        };

        tracing::info!(id = %id, path = %full_path.display(), "Opened document");
        Ok(id)
    }

    /// Make the document with `id` the active one.
    pub fn activate(&self, id: &str) -> WorkspaceResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| WorkspaceError::LockPoisoned)?;

        if !state.documents.iter().any(|(doc_id, _, _)| doc_id == id) {
            return Err(WorkspaceError::NotFound(id.to_string()));
        }
        state.active = Some(id.to_string());
        Ok(())
    }

    /// Look up an open document.
    pub fn document(&self, id: &str) -> Option<OpenDocument> {
        let state = self.state.read().ok()?;
        state
            .documents
            .iter()
            .find(|(doc_id, _, _)| doc_id == id)
            .map(|(_, _, doc)| doc.clone())
    }

    /// Search target for an open document.
    pub fn target_for(&self, id: &str) -> WorkspaceResult<SearchTarget> {
        self.document(id)
            .map(|doc| doc.target())
            .ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
    }

    /// Id of the active document.
    pub fn active_id(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.active.clone())
    }

    /// All open documents in the order they were opened.
    pub fn list(&self) -> Vec<DocumentInfo> {
        let Ok(state) = self.state.read() else {
            return Vec::new();
        };

        state
            .documents
            .iter()
            .map(|(id, title, doc)| DocumentInfo {
                id: id.clone(),
                title: title.clone(),
                kind: doc.kind(),
                active: state.active.as_deref() == Some(id.as_str()),
            })
            .collect()
    }

    fn insert(&self, title: String, doc: OpenDocument) -> WorkspaceResult<String> {
        let mut state = self
            .state
            .write()
            .map_err(|_| WorkspaceError::LockPoisoned)?;

        state.next_id += 1;
        let id = format!("doc-{}", state.next_id);
        state.documents.push((id.clone(), title, doc));
        state.active = Some(id.clone());
        Ok(id)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ActiveContent for Workspace {
    fn active_target(&self) -> Option<SearchTarget> {
        let id = self.active_id()?;
        self.document(&id).map(|doc| doc.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_for_path() {
        assert_eq!(
            DocumentKind::for_path(Path::new("page.HTML")),
            DocumentKind::RenderedDocument
        );
        assert_eq!(
            DocumentKind::for_path(Path::new("index.htm")),
            DocumentKind::RenderedDocument
        );
        assert_eq!(
            DocumentKind::for_path(Path::new("README.md")),
            DocumentKind::TextEditor
        );
        assert_eq!(
            DocumentKind::for_path(Path::new("main.rs")),
            DocumentKind::TextEditor
        );
        assert_eq!(
            DocumentKind::for_path(Path::new("Makefile")),
            DocumentKind::TextEditor
        );
    }

    #[test]
    fn test_newest_document_becomes_active() {
        let workspace = Workspace::default();
        assert!(workspace.active_target().is_none());

        let first = workspace.add_text_editor("a.txt", "alpha").unwrap();
        let second = workspace
            .add_rendered_document("b.html", "<p>beta</p>")
            .unwrap();

        assert_eq!(workspace.active_id(), Some(second.clone()));
        assert!(workspace.active_target().unwrap().is::<RenderedDocument>());

        workspace.activate(&first).unwrap();
        assert!(workspace.active_target().unwrap().is::<TextEditor>());

        let listed = workspace.list();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].active);
        assert!(!listed[1].active);
        assert_eq!(listed[1].kind, DocumentKind::RenderedDocument);
    }

    #[test]
    fn test_activate_unknown_document() {
        let workspace = Workspace::default();
        assert!(matches!(
            workspace.activate("doc-99"),
            Err(WorkspaceError::NotFound(_))
        ));
        assert!(workspace.target_for("doc-99").is_err());
    }

    #[test]
    fn test_open_missing_path() {
        let workspace = Workspace::new("/nonexistent-root");
        let result = workspace.open_path("missing.txt");
        assert!(matches!(result, Err(WorkspaceError::Io { .. })));
    }

    #[test]
    fn test_target_for_shares_content() {
        let workspace = Workspace::default();
        let id = workspace.add_text_editor("a.txt", "alpha").unwrap();

        let a = workspace.target_for(&id).unwrap();
        let b = workspace.active_target().unwrap();
        assert!(a.same_content(&b));
    }

    #[test]
    fn test_markdown_opens_as_plain_text() {
        let dir = std::env::temp_dir().join(format!("docsearch-md-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.md"), "# Title\n\n**bold** text").unwrap();

        let workspace = Workspace::new(&dir);
        let id = workspace.open_path("notes.md").unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let doc = workspace.document(&id).unwrap();
        assert_eq!(doc.kind(), DocumentKind::TextEditor);
        assert!(workspace.active_target().unwrap().is::<TextEditor>());
    }

    #[test]
    fn test_poisoned_state_is_reported() {
        let workspace = Workspace::default();
        let id = workspace.add_text_editor("a.txt", "alpha").unwrap();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = workspace.state.write().unwrap();
            panic!("writer died");
        }));

        assert!(matches!(
            workspace.add_text_editor("b.txt", "beta"),
            Err(WorkspaceError::LockPoisoned)
        ));
        assert!(matches!(
            workspace.add_rendered_document("c.html", "<p>gamma</p>"),
            Err(WorkspaceError::LockPoisoned)
        ));
        assert!(matches!(
            workspace.activate(&id),
            Err(WorkspaceError::LockPoisoned)
        ));
    }
}
