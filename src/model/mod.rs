//! Data model for the parts catalog.
//!
//! Products and the category tree come from the catalog backend and are
//! treated as immutable once loaded. Offers are decoded from price
//! responses into a tagged [`Offer`] so that "out of stock" is a variant to
//! match on rather than a message to compare.

mod category;
mod offer;
mod pricing;
mod product;

pub use category::*;
pub use offer::*;
pub use pricing::*;
pub use product::*;
