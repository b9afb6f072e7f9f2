//! Last successfully fetched option set

use tracing::warn;

use crate::domain::{EnumOption, EnumeratedOptionSet, OptionCategory, RemoteError};

/// Holds the option set for the life of a view.
///
/// A failed fetch leaves the cache empty; labels then fall back to a
/// humanized form of the code.
#[derive(Debug, Clone, Default)]
pub struct OptionsCache {
    options: Option<EnumeratedOptionSet>,
}

impl OptionsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fetch result. Returns whether options are now available.
    pub fn absorb(&mut self, result: Result<EnumeratedOptionSet, RemoteError>) -> bool {
        match result {
            Ok(options) => {
                self.options = Some(options);
                true
            }
            Err(e) => {
                warn!(error = %e, "Error loading enum values");
                false
            }
        }
    }

    pub fn get(&self) -> Option<&EnumeratedOptionSet> {
        self.options.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.options.is_some()
    }

    /// Choices for a select input; empty until loaded
    pub fn choices(&self, category: OptionCategory) -> &[EnumOption] {
        self.options
            .as_ref()
            .map(|options| options.options(category))
            .unwrap_or_default()
    }

    /// Human-readable label for a code
    pub fn label(&self, category: OptionCategory, code: &str) -> String {
        self.options
            .as_ref()
            .and_then(|options| options.display_name(category, code))
            .map(str::to_string)
            .unwrap_or_else(|| humanize_code(code))
    }
}

/// `IN_DEVELOPMENT` -> `In Development`
pub fn humanize_code(code: &str) -> String {
    code.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_come_from_loaded_options() {
        let mut cache = OptionsCache::new();
        let mut options = EnumeratedOptionSet::standard();
        options.model_types[3].display_name = "Anti Money Laundering".to_string();

        assert!(cache.absorb(Ok(options)));
        assert_eq!(
            cache.label(OptionCategory::ModelTypes, "AML"),
            "Anti Money Laundering"
        );
        assert_eq!(cache.choices(OptionCategory::RiskRatings).len(), 3);
    }

    #[test]
    fn test_failed_fetch_degrades_to_humanized_codes() {
        let mut cache = OptionsCache::new();

        assert!(!cache.absorb(Err(RemoteError::new("down"))));
        assert!(!cache.is_loaded());
        assert!(cache.choices(OptionCategory::Statuses).is_empty());
        assert_eq!(
            cache.label(OptionCategory::Statuses, "IN_DEVELOPMENT"),
            "In Development"
        );
    }

    #[test]
    fn test_failed_refetch_keeps_previous_options() {
        let mut cache = OptionsCache::new();
        cache.absorb(Ok(EnumeratedOptionSet::standard()));
        cache.absorb(Err(RemoteError::new("down")));

        assert!(cache.is_loaded());
    }

    #[test]
    fn test_humanize_code() {
        assert_eq!(humanize_code("RETAIL_BANKING"), "Retail Banking");
        assert_eq!(humanize_code("AML"), "Aml");
        assert_eq!(humanize_code(""), "");
    }
}
