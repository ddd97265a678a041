//! Overlapping character windows over normalised text.
//!
//! Windows are measured in Unicode scalar values, never bytes, so multi-byte
//! text is never split inside a character.

/// Collapse whitespace runs (including non-breaking spaces) to one space and trim.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into windows of `window` characters advancing by
/// `window - overlap`.
///
/// The last window always ends exactly at the end of the normalised text.
/// Empty (or whitespace-only) input yields no windows. An `overlap` at or
/// above `window` degrades to a step of one character rather than looping.
#[must_use]
pub fn chunk_text(text: &str, window: usize, overlap: usize) -> Vec<String> {
    let text = normalize(text);
    if text.is_empty() || window == 0 {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = bounds.len() - 1;
    let step = window.saturating_sub(overlap).max(1);

    let mut chunks = Vec::with_capacity(len.div_ceil(step));
    let mut start = 0;
    loop {
        let end = (start + window).min(len);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == len {
            break;
        }
        start += step;
    }
    chunks
}
