use crate::engine::RomanizationOptions;
use crate::script::{RomanizationSystem, ScriptCode};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Namespace for `/romanize` payloads.
pub const TEXT_NAMESPACE: &str = "romanize";
/// Namespace for `/music-romanize` payloads; the two pipelines have
/// different payload shapes and must never collide.
pub const MUSIC_NAMESPACE: &str = "music-romanize";

/// Serialized with a fixed field order so the digest is a pure function
/// of the logical request.
#[derive(Serialize)]
struct KeyData<'a> {
    text: &'a str,
    language: ScriptCode,
    system: RomanizationSystem,
    options: &'a RomanizationOptions,
}

/// Derive the cache key for a normalized request. Text is trimmed, the
/// options are already canonical (a validated struct), and the whole
/// tuple is hashed with SHA-256 under a namespace prefix.
pub fn cache_key(
    namespace: &str,
    text: &str,
    language: ScriptCode,
    system: RomanizationSystem,
    options: &RomanizationOptions,
) -> String {
    let data = KeyData {
        text: text.trim(),
        language,
        system,
        options,
    };
    let json = serde_json::to_string(&data).expect("key data serializes");
    let digest = Sha256::digest(json.as_bytes());
    format!("{}:{:x}", namespace, digest)
}
