use crate::ast::Path;
use crate::error::PathResult;
use crate::parser::parse;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Parses each distinct path string once.
///
/// Stores and selectors address the same few dozen paths over and over;
/// parsed paths are shared as `Arc<Path>`. Syntax errors are not cached.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: Mutex<HashMap<String, Arc<Path>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, reusing a previous parse of the same string
    pub fn parse(&self, source: &str) -> PathResult<Arc<Path>> {
        if let Some(path) = self.lock().get(source) {
            return Ok(path.clone());
        }

        let path = Arc::new(parse(source)?);
        self.lock().insert(source.to_string(), path.clone());
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Path>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_shares_parse() {
        let cache = PathCache::new();
        let a = cache.parse("sections[0].title").unwrap();
        let b = cache.parse("sections[0].title").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = PathCache::new();
        assert!(cache.parse("sections[").is_err());
        assert!(cache.is_empty());
    }
}
