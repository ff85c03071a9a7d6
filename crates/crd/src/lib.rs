//! CRD (CustomResourceDefinition) parsing and schema resolution

pub mod error;
pub mod parser;
pub mod schema;
pub mod types;

pub use error::CrdError;
pub use parser::CrdDocument;
pub use schema::resolve_schemas;
pub use types::{ApiVersion, SchemaLocation, CRD_KIND};
