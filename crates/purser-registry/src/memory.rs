//! In-process registries for tests and local development
//!
//! These keep everything behind the same traits the REST clients implement,
//! so the pipeline under test is byte-for-byte the production pipeline.
//! Clones share state, which lets a test keep a handle for scripting while
//! the pipeline owns another.

use async_trait::async_trait;
use purser_domain::{
    checksum::content_hash, file::validate_upload, CategoryRegistry, FileDescriptor, FileRegistry,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::RegistryError;

struct StoredFile {
    descriptor: FileDescriptor,
    content: Vec<u8>,
}

/// In-memory file registry
#[derive(Clone, Default)]
pub struct MemoryFileRegistry {
    files: Arc<Mutex<HashMap<String, StoredFile>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl MemoryFileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a document through the upload path: validate, hash, store
    ///
    /// Mirrors what the registry service does at upload time, including the
    /// mime/size constraints and checksum computation.
    pub fn register(
        &self,
        id: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
        uploaded_by: impl Into<String>,
    ) -> Result<FileDescriptor, RegistryError> {
        let mime_type = mime_type.into();
        validate_upload(&mime_type, content.len() as u64)?;

        let descriptor = FileDescriptor {
            id: id.into(),
            mime_type,
            byte_size: content.len() as u64,
            content_hash: content_hash(&content),
            uploaded_by: uploaded_by.into(),
        };
        self.insert(descriptor.clone(), content);
        Ok(descriptor)
    }

    /// Store a descriptor and content verbatim, skipping validation
    ///
    /// Lets tests construct inconsistent fixtures, e.g. a descriptor whose
    /// recorded hash no longer matches the stored bytes.
    pub fn insert(&self, descriptor: FileDescriptor, content: Vec<u8>) {
        self.files.lock().unwrap().insert(
            descriptor.id.clone(),
            StoredFile {
                descriptor,
                content,
            },
        );
    }

    /// Script the registry to fail every call until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    fn check_available(&self) -> Result<(), RegistryError> {
        if *self.unavailable.lock().unwrap() {
            return Err(RegistryError::Unreachable(
                "memory registry scripted offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FileRegistry for MemoryFileRegistry {
    type Error = RegistryError;

    async fn descriptor(&self, file_id: &str) -> Result<Option<FileDescriptor>, Self::Error> {
        self.check_available()?;
        let files = self.files.lock().unwrap();
        Ok(files.get(file_id).map(|f| f.descriptor.clone()))
    }

    async fn content(&self, descriptor: &FileDescriptor) -> Result<Vec<u8>, Self::Error> {
        self.check_available()?;
        let files = self.files.lock().unwrap();
        files
            .get(&descriptor.id)
            .map(|f| f.content.clone())
            .ok_or_else(|| RegistryError::Status {
                status: 404,
                body: format!("no content for {}", descriptor.id),
            })
    }
}

/// In-memory category registry
#[derive(Clone, Default)]
pub struct MemoryCategoryRegistry {
    names: Arc<Mutex<Vec<String>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl MemoryCategoryRegistry {
    /// Create a registry with no active categories
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-seeded with active category names
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::new();
        registry.set_active(names);
        registry
    }

    /// Replace the active category names
    pub fn set_active<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.names.lock().unwrap() = names.into_iter().map(Into::into).collect();
    }

    /// Script the registry to fail every call until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }
}

#[async_trait]
impl CategoryRegistry for MemoryCategoryRegistry {
    type Error = RegistryError;

    async fn active_names(&self) -> Result<Vec<String>, Self::Error> {
        if *self.unavailable.lock().unwrap() {
            return Err(RegistryError::Unreachable(
                "memory registry scripted offline".to_string(),
            ));
        }
        Ok(self.names.lock().unwrap().clone())
    }
}
