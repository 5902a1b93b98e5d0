//! Canonical field vocabulary, source schemas and header resolution.

mod field;
mod id;
mod jhopkins;
mod provider;
mod resolver;
mod yandex;

pub use field::Field;
pub use id::SchemaId;
pub use jhopkins::JHopkinsProvider;
pub use provider::{SchemaProvider, VersionTable};
pub use resolver::SchemaResolver;
pub use yandex::YandexRussiaProvider;
