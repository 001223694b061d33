//! URL feature extraction.
//!
//! [`extract`] maps a raw URL string to a [`FeatureVector`]: an ordered mapping
//! of named numeric features covering lengths, punctuation counts, protocol
//! and host flags, domain structure, suspicious keywords and path/query shape.
//! Extraction is pure and deterministic.
//!
//! A trained model freezes the vector's order into a [`FeatureLayout`].

pub mod domain;
pub mod extractor;
pub mod layout;
pub mod vector;

pub use domain::DomainParts;
pub use extractor::{
    FEATURE_NAMES, LAYOUT_VERSION, SUSPICIOUS_WORDS, UrlFeatureExtractor, digit_ratio, extract,
    has_ip_address, has_suspicious_words, letter_ratio,
};
pub use layout::FeatureLayout;
pub use vector::FeatureVector;
