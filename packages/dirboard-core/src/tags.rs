/// Deterministic tag colouring for the board view.
///
/// The hue depends only on the tag text, so the same tag keeps its colour
/// across rebuilds, boards and processes.
use sha2::{Digest, Sha256};

/// Map a tag to a hue in `0..360`.
pub fn tag_hue(tag: &str) -> u16 {
    let digest = Sha256::digest(tag.as_bytes());
    let n = u16::from_be_bytes([digest[0], digest[1]]);
    n % 360
}
