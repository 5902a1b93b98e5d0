//! Resolves a header row to a schema by asking each provider in turn.

use tracing::debug;

use super::field::Field;
use super::id::SchemaId;
use super::jhopkins::JHopkinsProvider;
use super::provider::SchemaProvider;
use super::yandex::YandexRussiaProvider;

/// Ordered registry of schema providers.
///
/// The first provider that recognizes a header wins, so providers with
/// more specific headers must be registered first.
pub struct SchemaResolver {
    providers: Vec<Box<dyn SchemaProvider>>,
}

impl SchemaResolver {
    /// Create a resolver with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a resolver with the built-in providers.
    pub fn with_defaults() -> Self {
        Self::new()
            .with_provider(YandexRussiaProvider::new())
            .with_provider(JHopkinsProvider::new())
    }

    /// Append a provider after the ones already registered.
    pub fn with_provider(mut self, provider: impl SchemaProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Resolve a header to a schema identifier.
    pub fn resolve(&self, header: &[String]) -> SchemaId {
        for provider in &self.providers {
            let schema = provider.detect(header);
            if schema.is_known() {
                debug!(provider = provider.name(), %schema, "header recognized");
                return schema;
            }
        }

        SchemaId::Unknown
    }

    /// Expected fields for a schema, from whichever provider owns it.
    pub fn fields(&self, schema: SchemaId) -> &[Field] {
        self.providers
            .iter()
            .map(|provider| provider.fields(schema))
            .find(|fields| !fields.is_empty())
            .unwrap_or(&[])
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for SchemaResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(SchemaId, &'static str);

    impl SchemaProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn fields(&self, _schema: SchemaId) -> &[Field] {
            &[]
        }

        fn detect(&self, header: &[String]) -> SchemaId {
            if header.first().map(|s| s.as_str()) == Some(self.1) {
                self.0
            } else {
                SchemaId::Unknown
            }
        }
    }

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_match_wins() {
        let resolver = SchemaResolver::new()
            .with_provider(FixedProvider(SchemaId::JHopkinsV2, "A"))
            .with_provider(FixedProvider(SchemaId::JHopkinsV1, "A"));

        assert_eq!(resolver.resolve(&header(&["A"])), SchemaId::JHopkinsV2);
    }

    #[test]
    fn test_no_match_is_unknown() {
        let resolver = SchemaResolver::with_defaults();
        assert_eq!(resolver.resolve(&header(&["a", "b"])), SchemaId::Unknown);
        assert_eq!(SchemaResolver::new().resolve(&header(&["a"])), SchemaId::Unknown);
    }

    #[test]
    fn test_defaults_resolve_both_sources() {
        let resolver = SchemaResolver::with_defaults();
        let jh = header(&["Province/State", "Country/Region", "Last Update", "Confirmed", "Deaths", "Recovered"]);
        assert_eq!(resolver.resolve(&jh), SchemaId::JHopkinsV1);

        let ya = header(&["Дата", "Регион", "Заражений", "Выздоровлений", "Смертей"]);
        assert_eq!(resolver.resolve(&ya), SchemaId::YandexRussia);
        assert_eq!(resolver.fields(SchemaId::YandexRussia).len(), 8);
    }
}
