//! Resource sources: where translation documents come from.
//!
//! A [`ResourceSource`] hands out [`Document`]s, each of which opens to a
//! JSON stream of the form `{ "key": { "language": "value" } }`. Sources are
//! refreshed by the store at the start of every rebuild.

use crate::error::SourceError;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single decodable translation document.
pub trait Document: Send {
    /// Human-readable name used in logs and rebuild reports.
    fn name(&self) -> String;

    /// Open the document for reading.
    fn open(&self) -> Result<Box<dyn Read + '_>, SourceError>;
}

/// A provider of translation documents.
pub trait ResourceSource: Send {
    /// Human-readable name used in logs and rebuild reports.
    fn name(&self) -> &str;

    /// Best-effort update of the documents this source can provide.
    ///
    /// On failure the store logs the error and still reads whatever
    /// [`documents`](Self::documents) returns.
    fn refresh(&mut self) -> Result<(), SourceError>;

    /// The documents currently known to this source, in merge order.
    fn documents(&self) -> Vec<Box<dyn Document>>;
}

// ==================== Directory Source ====================

/// Translation files on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Document for FileDocument {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Box<dyn Read + '_>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            document: self.name(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// All translation files with a given extension in one directory.
///
/// The directory is scanned (non-recursively) on every [`refresh`]. Files are
/// listed sorted by file name so the merge order is stable across runs.
///
/// [`refresh`]: ResourceSource::refresh
#[derive(Debug, Clone)]
pub struct DirectorySource {
    name: String,
    directory: PathBuf,
    extension: String,
    files: Vec<PathBuf>,
}

impl DirectorySource {
    /// Create a source for `*.json` files in `directory`.
    ///
    /// No files are listed until the first refresh.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_extension(directory, "json")
    }

    /// Create a source for files with a custom extension (without the dot).
    pub fn with_extension(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let directory = directory.into();
        Self {
            name: directory.display().to_string(),
            directory,
            extension: extension.into().trim_start_matches('.').to_string(),
            files: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Files found by the last successful refresh.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn scan(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let matches_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == self.extension);
            if path.is_file() && matches_extension {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl ResourceSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh(&mut self) -> Result<(), SourceError> {
        let files = self.scan().map_err(|e| SourceError::Refresh {
            source_name: self.name.clone(),
            reason: e.to_string(),
        })?;
        debug!(
            "Found {} .{} file(s) in {}",
            files.len(),
            self.extension,
            self.name
        );
        self.files = files;
        Ok(())
    }

    fn documents(&self) -> Vec<Box<dyn Document>> {
        self.files
            .iter()
            .map(|path| Box::new(FileDocument::new(path.clone())) as Box<dyn Document>)
            .collect()
    }
}

// ==================== Memory Source ====================

/// A named JSON document held in memory.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    name: String,
    content: String,
}

impl MemoryDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl Document for MemoryDocument {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> Result<Box<dyn Read + '_>, SourceError> {
        Ok(Box::new(Cursor::new(self.content.as_bytes())))
    }
}

/// In-memory documents, useful for embedded catalogs and tests.
///
/// Refreshing is a no-op; documents are served in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    documents: Vec<MemoryDocument>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Add a document (builder style).
    pub fn with_document(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.push(name, content);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.documents.push(MemoryDocument::new(name, content));
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ResourceSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn refresh(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn documents(&self) -> Vec<Box<dyn Document>> {
        self.documents
            .iter()
            .cloned()
            .map(|doc| Box::new(doc) as Box<dyn Document>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_all(doc: &dyn Document) -> String {
        let mut content = String::new();
        doc.open()
            .expect("Should open")
            .read_to_string(&mut content)
            .expect("Should read");
        content
    }

    // ==================== DirectorySource Tests ====================

    #[test]
    fn test_directory_source_empty_before_refresh() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("greeting.json"), "{}").unwrap();

        let source = DirectorySource::new(temp_dir.path());
        assert!(source.documents().is_empty());
    }

    #[test]
    fn test_directory_source_lists_json_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

        let mut source = DirectorySource::new(temp_dir.path());
        source.refresh().expect("Should refresh");

        let names: Vec<_> = source
            .files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        assert_eq!(source.documents().len(), 2);
    }

    #[test]
    fn test_directory_source_custom_extension() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("de.i18n"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("en.json"), "{}").unwrap();

        let mut source = DirectorySource::with_extension(temp_dir.path(), ".i18n");
        source.refresh().expect("Should refresh");

        assert_eq!(source.files().len(), 1);
        assert!(source.files()[0].ends_with("de.i18n"));
    }

    #[test]
    fn test_directory_source_refresh_picks_up_new_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut source = DirectorySource::new(temp_dir.path());
        source.refresh().expect("Should refresh");
        assert!(source.files().is_empty());

        std::fs::write(temp_dir.path().join("greeting.json"), "{}").unwrap();
        source.refresh().expect("Should refresh");
        assert_eq!(source.files().len(), 1);
    }

    #[test]
    fn test_directory_source_missing_directory_fails_refresh() {
        let temp_dir = TempDir::new().unwrap();
        let mut source = DirectorySource::new(temp_dir.path().join("missing"));

        let err = source.refresh().unwrap_err();
        assert!(matches!(err, SourceError::Refresh { .. }));
    }

    #[test]
    fn test_file_document_reads_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("greeting.json");
        std::fs::write(&path, r#"{"hello":{"en":"hello"}}"#).unwrap();

        let doc = FileDocument::new(&path);
        assert_eq!(read_all(&doc), r#"{"hello":{"en":"hello"}}"#);
    }

    #[test]
    fn test_file_document_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let doc = FileDocument::new(temp_dir.path().join("gone.json"));

        let err = doc.open().err().expect("Should fail");
        assert!(matches!(err, SourceError::Io { .. }));
    }

    // ==================== MemorySource Tests ====================

    #[test]
    fn test_memory_source_serves_documents_in_order() {
        let source = MemorySource::new("embedded")
            .with_document("first", r#"{"a":{"en":"A"}}"#)
            .with_document("second", r#"{"b":{"en":"B"}}"#);

        assert_eq!(source.name(), "embedded");
        assert_eq!(source.len(), 2);

        let docs = source.documents();
        assert_eq!(docs[0].name(), "first");
        assert_eq!(docs[1].name(), "second");
        assert_eq!(read_all(docs[1].as_ref()), r#"{"b":{"en":"B"}}"#);
    }

    #[test]
    fn test_memory_source_refresh_is_noop() {
        let mut source = MemorySource::new("embedded");
        assert!(source.is_empty());
        source.refresh().expect("Should refresh");
        assert!(source.documents().is_empty());
    }
}
