//! Decoding and annotation layer for unicode-preview.
//!
//! Cooks the raw tokens from `upv_scan` into display annotations:
//! numeric decoding, UTF-16 surrogate pairing, and merging of combining
//! marks into the preceding base character's annotation. Also hosts the
//! layered preview settings the editor front end resolves per language.

mod cluster;
mod decode;
mod settings;

pub use cluster::{merge_clusters, Annotation};
pub use decode::{decode_run, DecodedChar};
pub use settings::{LanguageOverride, Options, Settings};

use upv_scan::{find_runs, split_run};

/// Scan a full document and produce its ordered annotation list.
///
/// One pass, left to right: find maximal escape runs, decode each run's
/// tokens, flatten in document order, then merge clusters once over the
/// flattened sequence. Deterministic — identical text yields an
/// identical annotation list.
pub fn annotate(text: &str) -> Vec<Annotation> {
    let mut decoded = Vec::new();
    for run in find_runs(text) {
        let tokens = split_run(text, &run);
        decoded.extend(decode_run(text, &tokens));
    }
    merge_clusters(decoded)
}
