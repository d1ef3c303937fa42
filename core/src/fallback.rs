//! Static hashtags used when the trending list cannot be fetched.

use crate::types::Hashtag;

const DEFAULT_HASHTAGS: [(u64, &str); 8] = [
    (1, "Alumni"),
    (2, "Networking"),
    (3, "CareerGrowth"),
    (4, "Mentorship"),
    (5, "Reunion"),
    (6, "Hiring"),
    (7, "Startups"),
    (8, "Throwback"),
];

/// The eight fallback hashtags, identical on every call.
pub fn default_hashtags() -> Vec<Hashtag> {
    DEFAULT_HASHTAGS
        .iter()
        .map(|&(id, tag)| Hashtag::new(id, tag))
        .collect()
}
