//! URL handling module for Website Words
//!
//! Sites are identified by the raw URL string from the input list; this
//! module only derives the domain that robots.txt is fetched from.

mod domain;

pub use domain::extract_domain;
