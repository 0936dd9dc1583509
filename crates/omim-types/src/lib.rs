//! # omim-types
//!
//! Type definitions for the OMIM disease graph.
//!
//! This crate provides the entities produced when OMIM flat-file exports
//! are linked together: diseases keyed by MIM number, genes keyed by their
//! resolved identifier and publications keyed by PubMed id.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use omim_types::{well_known, Disease, MapKey};
//!
//! let mut disease = Disease::new("100070", well_known::OMIM_PREFIX);
//! disease.set_name("Foo");
//! disease.add_synonym("Bar");
//!
//! assert_eq!(disease.identifier, "OMIM:100070");
//! assert_eq!(MapKey::from_char('3'), MapKey::MolecularBasis);
//! ```

#![warn(missing_docs)]

mod disease;
mod gene;
mod ids;
mod map_key;
mod publication;
pub mod well_known;

pub use disease::Disease;
pub use gene::Gene;
pub use ids::{is_mim_number, GeneId, MimNumber, PubMedId, TaxonId};
pub use map_key::MapKey;
pub use publication::Publication;
