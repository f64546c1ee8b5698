//! Storage locators.
//!
//! A locator is a URL whose path decomposes into `/{bucket}/{key}`:
//!
//! ```text
//! https://s3.eu-west-2.amazonaws.com/{bucket}/{asset_id}_original
//! ```
//!
//! The low representation of an asset is addressed by replacing the
//! `_original` marker in the key with `_low`.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use photoshare_common::{LOW_KEY_MARKER, ORIGINAL_KEY_MARKER};
use url::Url;

use crate::error::StorageError;

/// Bucket and key addressed by a locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocator {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl ObjectLocator {
    /// Create a locator from its parts.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a fully-qualified locator.
    ///
    /// # Arguments
    /// * `locator` - URL-shaped locator
    ///
    /// # Errors
    /// Returns `InvalidLocator` if the string is not a URL, its path is not
    /// valid percent-encoded UTF-8, or the path lacks a bucket or key segment.
    pub fn parse(locator: &str) -> Result<Self, StorageError> {
        let url: Url = Url::parse(locator)
            .map_err(|e| StorageError::invalid_locator(locator, e.to_string()))?;

        // Keys are addressed by their decoded form.
        let path: String = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|e| StorageError::invalid_locator(locator, e.to_string()))?
            .into_owned();

        let mut segments = path.splitn(3, '/').skip(1);
        let bucket: &str = segments.next().unwrap_or_default();
        let key: &str = segments.next().unwrap_or_default();

        if bucket.is_empty() {
            return Err(StorageError::invalid_locator(locator, "missing bucket"));
        }
        if key.is_empty() {
            return Err(StorageError::invalid_locator(locator, "missing object key"));
        }

        Ok(Self::new(bucket, key))
    }

    /// Locator of the low representation belonging to this original.
    ///
    /// Only the key is rewritten; every `_original` marker becomes `_low`.
    pub fn low_representation(&self) -> Self {
        Self {
            bucket: self.bucket.clone(),
            key: self.key.replace(ORIGINAL_KEY_MARKER, LOW_KEY_MARKER),
        }
    }
}

/// Parse locators and group their keys by bucket.
///
/// Buckets are returned in sorted order; keys keep their input order.
///
/// # Errors
/// Fails on the first locator that cannot be parsed, before anything is grouped.
pub fn group_by_bucket<S: AsRef<str>>(
    locators: &[S],
) -> Result<BTreeMap<String, Vec<String>>, StorageError> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for locator in locators {
        let parsed: ObjectLocator = ObjectLocator::parse(locator.as_ref())?;
        grouped.entry(parsed.bucket).or_default().push(parsed.key);
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locator() {
        let loc = ObjectLocator::parse("https://s3.amazonaws.com/photos/abc_original").unwrap();
        assert_eq!(loc, ObjectLocator::new("photos", "abc_original"));
    }

    #[test]
    fn test_parse_locator_nested_key() {
        let loc = ObjectLocator::parse("http://localhost:9000/photos/user/abc_low").unwrap();
        assert_eq!(loc.bucket, "photos");
        assert_eq!(loc.key, "user/abc_low");
    }

    #[test]
    fn test_parse_locator_decodes_key() {
        let loc = ObjectLocator::parse("https://s3.example.com/media/my%20photo_original").unwrap();
        assert_eq!(loc, ObjectLocator::new("media", "my photo_original"));
        assert_eq!(loc.low_representation().key, "my photo_low");
    }

    #[test]
    fn test_parse_locator_rejects_invalid_utf8() {
        let err = ObjectLocator::parse("https://s3.example.com/media/%FF_original").unwrap_err();
        assert!(matches!(err, StorageError::InvalidLocator { .. }));
    }

    #[test]
    fn test_parse_locator_missing_key() {
        let err = ObjectLocator::parse("https://s3.amazonaws.com/photos").unwrap_err();
        assert!(matches!(err, StorageError::InvalidLocator { .. }));

        let err = ObjectLocator::parse("https://s3.amazonaws.com/photos/").unwrap_err();
        assert!(matches!(err, StorageError::InvalidLocator { .. }));
    }

    #[test]
    fn test_parse_locator_not_a_url() {
        let err = ObjectLocator::parse("photos/abc_original").unwrap_err();
        assert!(matches!(err, StorageError::InvalidLocator { .. }));
    }

    #[test]
    fn test_low_representation() {
        let original = ObjectLocator::new("photos", "abc_original");
        assert_eq!(
            original.low_representation(),
            ObjectLocator::new("photos", "abc_low")
        );
    }

    #[test]
    fn test_low_representation_bucket_untouched() {
        let original = ObjectLocator::new("bucket_original", "abc_original");
        let low = original.low_representation();
        assert_eq!(low.bucket, "bucket_original");
        assert_eq!(low.key, "abc_low");
    }

    #[test]
    fn test_group_by_bucket() {
        let locators: Vec<&str> = vec![
            "https://s3.amazonaws.com/b2/x_low",
            "https://s3.amazonaws.com/b1/y_low",
            "https://s3.amazonaws.com/b2/x_original",
        ];
        let grouped = group_by_bucket(&locators).unwrap();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["b1"], vec!["y_low".to_string()]);
        assert_eq!(
            grouped["b2"],
            vec!["x_low".to_string(), "x_original".to_string()]
        );
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["b1", "b2"]);
    }

    #[test]
    fn test_group_by_bucket_rejects_any_bad_locator() {
        let locators: Vec<&str> = vec!["https://s3.amazonaws.com/b1/ok_low", "garbage"];
        assert!(group_by_bucket(&locators).is_err());
    }
}
