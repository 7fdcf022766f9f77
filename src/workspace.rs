//! Saved generation results ("workspace items").
//!
//! The whole collection is one JSON array stored under [`WORKSPACE_KEY`]
//! in the shared [`KeyValueStore`].

use crate::store::KeyValueStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const WORKSPACE_KEY: &str = "aiworx_workspace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceItemKind {
    Blog,
    Image,
    Audio,
    Code,
    Analysis,
}

impl WorkspaceItemKind {
    pub const ALL: [WorkspaceItemKind; 5] = [
        WorkspaceItemKind::Blog,
        WorkspaceItemKind::Image,
        WorkspaceItemKind::Audio,
        WorkspaceItemKind::Code,
        WorkspaceItemKind::Analysis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceItemKind::Blog => "blog",
            WorkspaceItemKind::Image => "image",
            WorkspaceItemKind::Audio => "audio",
            WorkspaceItemKind::Code => "code",
            WorkspaceItemKind::Analysis => "analysis",
        }
    }
}

impl fmt::Display for WorkspaceItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceItem {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: WorkspaceItemKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub tool: String,
}

impl WorkspaceItem {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }

    /// `My Blog Post` becomes `My-Blog-Post.txt`. Path separators and other
    /// characters not allowed in file names become `-`; leading dots are
    /// dropped so the name always stays inside the export directory.
    pub fn export_file_name(&self) -> String {
        let cleaned: String = self
            .title
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
                c if c.is_control() => '-',
                c => c,
            })
            .collect();
        let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("-");
        let slug = joined.trim_start_matches(['.', '-']);
        if slug.is_empty() {
            format!("{}.txt", self.id)
        } else {
            format!("{}.txt", slug)
        }
    }
}

pub struct WorkspaceStore {
    store: KeyValueStore,
}

impl WorkspaceStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_store(KeyValueStore::open(dir)?))
    }

    pub fn from_store(store: KeyValueStore) -> Self {
        Self { store }
    }

    pub fn add(
        &self,
        title: &str,
        kind: WorkspaceItemKind,
        content: &str,
        tool: &str,
    ) -> Result<WorkspaceItem> {
        let item = WorkspaceItem {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            kind,
            content: content.to_string(),
            created_at: Utc::now(),
            tool: tool.to_string(),
        };

        let mut items = self.load()?;
        items.push(item.clone());
        self.save(&items)?;

        info!("Saved {} item '{}' to workspace", item.kind, item.title);
        Ok(item)
    }

    /// All items, newest first.
    pub fn list(&self) -> Result<Vec<WorkspaceItem>> {
        let mut items = self.load()?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Case-insensitive match on title or content, optionally limited to one kind.
    pub fn search(
        &self,
        query: &str,
        kind: Option<WorkspaceItemKind>,
    ) -> Result<Vec<WorkspaceItem>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|item| kind.map_or(true, |k| item.kind == k))
            .filter(|item| needle.is_empty() || item.matches(&needle))
            .collect())
    }

    pub fn get(&self, id: Uuid) -> Result<Option<WorkspaceItem>> {
        Ok(self.load()?.into_iter().find(|item| item.id == id))
    }

    /// Returns whether an item was removed.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items)?;
        Ok(true)
    }

    pub fn count_by_kind(&self, kind: WorkspaceItemKind) -> Result<usize> {
        Ok(self
            .load()?
            .iter()
            .filter(|item| item.kind == kind)
            .count())
    }

    /// Write an item's content as a text file into `dir`.
    pub fn export(&self, id: Uuid, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let item = self
            .get(id)?
            .ok_or_else(|| Error::InvalidInput(format!("no workspace item with id {}", id)))?;

        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(item.export_file_name());
        fs::write(&path, &item.content)?;

        info!("Exported '{}' to {}", item.title, path.display());
        Ok(path)
    }

    fn load(&self) -> Result<Vec<WorkspaceItem>> {
        let Some(raw) = self.store.get(WORKSPACE_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Workspace data is unreadable, starting empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, items: &[WorkspaceItem]) -> Result<()> {
        self.store.set(WORKSPACE_KEY, &serde_json::to_string(items)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn open() -> (TempDir, WorkspaceStore) {
        let dir = TempDir::new().unwrap();
        let store = WorkspaceStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_add_and_list_newest_first() {
        let (_dir, store) = open();
        let first = store
            .add("First post", WorkspaceItemKind::Blog, "hello", "blog-writer")
            .unwrap();

        // Backdate the first item so ordering does not depend on clock resolution.
        let mut items = store.load().unwrap();
        items[0].created_at = first.created_at - Duration::minutes(5);
        store.save(&items).unwrap();

        let second = store
            .add("Second", WorkspaceItemKind::Code, "fn main() {}", "code-explainer")
            .unwrap();

        let ids: Vec<Uuid> = store.list().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_filters_kind() {
        let (_dir, store) = open();
        store
            .add("Rust Tips", WorkspaceItemKind::Blog, "borrowing", "blog-writer")
            .unwrap();
        store
            .add("Invoice", WorkspaceItemKind::Analysis, "Talks about RUST", "ocr")
            .unwrap();
        store
            .add("Cat", WorkspaceItemKind::Image, "data:image/png;base64,AA==", "image")
            .unwrap();

        assert_eq!(store.search("rust", None).unwrap().len(), 2);

        let blogs = store.search("rust", Some(WorkspaceItemKind::Blog)).unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].title, "Rust Tips");

        assert_eq!(
            store.search("", Some(WorkspaceItemKind::Image)).unwrap().len(),
            1
        );
        assert_eq!(store.count_by_kind(WorkspaceItemKind::Blog).unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let (_dir, store) = open();
        let item = store
            .add("Gone soon", WorkspaceItemKind::Audio, "narration.wav", "narrator")
            .unwrap();

        assert!(store.remove(item.id).unwrap());
        assert!(!store.remove(item.id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_export_writes_content_with_slug_name() {
        let (dir, store) = open();
        let item = store
            .add("My  Blog Post", WorkspaceItemKind::Blog, "# Title\nBody", "blog-writer")
            .unwrap();

        let out = dir.path().join("exports");
        let path = store.export(item.id, &out).unwrap();
        assert_eq!(path, out.join("My-Blog-Post.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "# Title\nBody");

        assert!(matches!(
            store.export(Uuid::new_v4(), &out),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_export_keeps_unsafe_titles_inside_directory() {
        let (dir, store) = open();
        let out = dir.path().join("exports");

        let escaping = store
            .add("../escaped", WorkspaceItemKind::Blog, "outside?", "blog-writer")
            .unwrap();
        let path = store.export(escaping.id, &out).unwrap();
        assert_eq!(path, out.join("escaped.txt"));
        assert!(!dir.path().join("escaped.txt").exists());

        let nested = store
            .add("a/b\\c", WorkspaceItemKind::Code, "nested", "code-explainer")
            .unwrap();
        let path = store.export(nested.id, &out).unwrap();
        assert_eq!(path, out.join("a-b-c.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "nested");

        let dots = store
            .add("...", WorkspaceItemKind::Blog, "dots", "blog-writer")
            .unwrap();
        assert_eq!(dots.export_file_name(), format!("{}.txt", dots.id));
    }

    #[test]
    fn test_items_persist_and_serialize_with_type_field() {
        let dir = TempDir::new().unwrap();
        let item = WorkspaceStore::open(dir.path())
            .unwrap()
            .add("Kept", WorkspaceItemKind::Code, "let x = 1;", "code-explainer")
            .unwrap();

        let reopened = WorkspaceStore::open(dir.path()).unwrap();
        assert_eq!(reopened.list().unwrap(), vec![item]);

        let raw = KeyValueStore::open(dir.path())
            .unwrap()
            .get(WORKSPACE_KEY)
            .unwrap()
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["type"], "code");
        assert!(json[0].get("createdAt").is_some());
    }

    #[test]
    fn test_corrupt_blob_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        KeyValueStore::open(dir.path())
            .unwrap()
            .set(WORKSPACE_KEY, "not json")
            .unwrap();

        let store = WorkspaceStore::open(dir.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }
}
