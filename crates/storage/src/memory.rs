//! In-memory storage backend.
//!
//! Keeps object lengths in a map and records every call, so callers can
//! assert exactly which requests a flow issued. Deletes can be made to fail
//! per bucket to exercise partial-failure paths.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::locator::ObjectLocator;
use crate::traits::StorageClient;

/// In-memory `StorageClient`.
#[derive(Debug, Default)]
pub struct MemoryStorageClient {
    /// Object lengths keyed by (bucket, key).
    objects: Mutex<HashMap<(String, String), i64>>,
    /// Every HEAD issued, in order.
    head_calls: Mutex<Vec<ObjectLocator>>,
    /// Every bulk delete issued, in order.
    delete_calls: Mutex<Vec<(String, Vec<String>)>>,
    /// Buckets whose bulk deletes fail.
    failing_buckets: Mutex<HashSet<String>>,
}

impl MemoryStorageClient {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object with the given content length.
    ///
    /// # Arguments
    /// * `bucket` - Bucket name
    /// * `key` - Object key
    /// * `length` - Content length reported by HEAD (may be negative to
    ///   simulate a malformed backend response)
    pub fn insert(&self, bucket: impl Into<String>, key: impl Into<String>, length: i64) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.into(), key.into()), length);
    }

    /// Whether an object is present.
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Whether no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every bulk delete against `bucket` fail.
    pub fn fail_deletes_in(&self, bucket: impl Into<String>) {
        self.failing_buckets.lock().unwrap().insert(bucket.into());
    }

    /// HEAD requests issued so far.
    pub fn head_calls(&self) -> Vec<ObjectLocator> {
        self.head_calls.lock().unwrap().clone()
    }

    /// Bulk delete requests issued so far, as (bucket, keys).
    pub fn delete_calls(&self) -> Vec<(String, Vec<String>)> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageClient for MemoryStorageClient {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<Option<i64>, StorageError> {
        self.head_calls
            .lock()
            .unwrap()
            .push(ObjectLocator::new(bucket, key));

        let objects = self.objects.lock().unwrap();
        Ok(objects.get(&(bucket.to_string(), key.to_string())).copied())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        self.delete_calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), keys.to_vec()));

        if self.failing_buckets.lock().unwrap().contains(bucket) {
            return Err(StorageError::NetworkError {
                message: format!("bulk delete rejected for bucket {}", bucket),
                retryable: true,
            });
        }

        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(&(bucket.to_string(), key.clone()));
        }
        Ok(())
    }
}
