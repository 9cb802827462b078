/// Path derivation rules shared by the board builder and the move executor.
///
/// Anchor file -> board folder (its parent) -> column directories -> card files.
/// Cards are addressed by `file://` URIs with percent-encoded segments; plain
/// filesystem paths are accepted wherever a locator is parsed.
use std::path::{Component, Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use sha2::{Digest, Sha256};

/// Characters escaped inside a single URI path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const FILE_SCHEME: &str = "file://";

/// The directory holding the board's columns: the anchor's parent.
pub fn board_folder(anchor: &Path) -> PathBuf {
    match anchor.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Deterministic board ID from the anchor path: SHA-256 first 12 hex chars.
pub fn board_id(anchor: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(anchor.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..6])
}

/// Render a filesystem path as a `file://` URI.
pub fn file_uri(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let encoded: Vec<String> = raw
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect();
    let joined = encoded.join("/");
    if joined.starts_with('/') {
        format!("{}{}", FILE_SCHEME, joined)
    } else {
        format!("{}/{}", FILE_SCHEME, joined)
    }
}

/// Resolve a card locator (`file://` URI or plain path) to a filesystem path.
/// Returns `None` for an empty locator.
pub fn path_from_locator(locator: &str) -> Option<PathBuf> {
    let locator = locator.trim();
    if locator.is_empty() {
        return None;
    }
    let Some(rest) = locator.strip_prefix(FILE_SCHEME) else {
        return Some(PathBuf::from(locator));
    };
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    let decoded = percent_decode_str(rest).decode_utf8_lossy().to_string();
    if decoded.is_empty() {
        return None;
    }
    // file:///C:/dir -> C:/dir
    let bytes = decoded.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
        return Some(PathBuf::from(&decoded[1..]));
    }
    Some(PathBuf::from(decoded))
}

/// Leaf file name of a path, if it has a UTF-8 one.
pub fn leaf_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// True when `name` names exactly one ordinary directory entry, so joining
/// it onto a folder stays inside that folder. The name is taken as is.
pub fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
