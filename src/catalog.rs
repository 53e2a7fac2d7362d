//! Class catalog: the fixed, ordered list of recognizable classes.

use crate::api::{DetectClient, DetectError};

/// Ordered list of class names, fetched once at session start and immutable
/// afterwards.
///
/// The order is load-bearing: results panel row `i` always corresponds to
/// entry `i`, even on cycles where a class goes undetected. The catalog is
/// an owned value handed to whichever component needs it rather than shared
/// mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    classes: Vec<String>,
}

impl ClassCatalog {
    /// Build a catalog from an already-fetched class list.
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Fetch the catalog from the detection server.
    ///
    /// # Errors
    ///
    /// Propagates [`DetectError`] from the fetch, including
    /// `DetectError::EmptyCatalog` when the server knows no classes.
    pub async fn fetch(client: &DetectClient) -> Result<Self, DetectError> {
        let classes = client.fetch_classes().await?;
        Ok(Self::new(classes))
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class names in catalog order.
    pub fn names(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = ClassCatalog::new(vec![
            "RBC".to_string(),
            "WBC".to_string(),
            "Candida".to_string(),
        ]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.names(), &["RBC", "WBC", "Candida"]);
    }

    #[test]
    fn test_catalog_len_and_empty() {
        let catalog = ClassCatalog::new(vec!["cat".to_string()]);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());

        let empty = ClassCatalog::new(Vec::new());
        assert!(empty.is_empty());
    }
}
