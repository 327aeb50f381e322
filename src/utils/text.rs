/// Truncate `content` to `cap` characters, marking the cut with `...`.
///
/// The cap is measured in characters, not bytes, so multi-byte content can
/// never be split mid-character. Content at or under the cap is returned
/// unchanged, without a marker.
pub fn truncate_with_ellipsis(content: &str, cap: usize) -> String {
    match content.char_indices().nth(cap) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}
