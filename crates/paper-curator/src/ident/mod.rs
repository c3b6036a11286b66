//! Identity resolution: fingerprints, identifier normalization, and the
//! duplicate resolver.

mod fingerprint;
mod resolver;

pub use fingerprint::{
    Fingerprint, first_author_surname, is_well_formed_doi, normalize_arxiv_id, normalize_doi,
    normalize_title,
};
pub use resolver::{IdentityResolver, Resolution};
