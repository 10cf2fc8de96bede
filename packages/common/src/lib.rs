//! Shared domain logic for the image-reference migration: the tenant and
//! content-type enumerations, the legacy-URL normalizer, and the rewriters
//! applied to the two document-shaped row fields.

pub mod content;
pub mod field;
pub mod normalize;
pub mod rewrite;
pub mod tenant;

pub use content::ContentType;
pub use field::FieldValue;
pub use normalize::UrlNormalizer;
pub use tenant::Tenant;
