use crate::error::{TtsError, TtsResult};

/// Unit a chunk limit is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    /// Unicode scalar values
    #[default]
    Chars,
    /// UTF-8 encoded bytes
    Bytes,
}

impl LengthUnit {
    pub fn measure(&self, text: &str) -> usize {
        match self {
            LengthUnit::Chars => text.chars().count(),
            LengthUnit::Bytes => text.len(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Chars => "characters",
            LengthUnit::Bytes => "bytes",
        }
    }
}

/// Split text into chunks of at most `limit` characters using greedy word wrapping.
///
/// Text that already fits is returned verbatim as a single chunk. Longer text is
/// re-joined word by word with single spaces, so whitespace at split points is
/// normalized. A word longer than `limit` is emitted on its own, oversized.
///
/// # Errors
/// Returns `InvalidArgument` when `limit` is zero.
pub fn chunk_text(text: &str, limit: usize) -> TtsResult<Vec<String>> {
    chunk_text_in(text, limit, LengthUnit::Chars)
}

/// [`chunk_text`] with the limit measured in `unit`
pub fn chunk_text_in(text: &str, limit: usize, unit: LengthUnit) -> TtsResult<Vec<String>> {
    if limit == 0 {
        return Err(TtsError::InvalidArgument(
            "chunk limit must be a positive integer".to_string(),
        ));
    }

    if unit.measure(text) <= limit {
        return Ok(vec![text.to_string()]);
    }

    let mut chunks = Vec::new();
    let mut current_chunk = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = unit.measure(word);

        if current_len == 0 {
            current_chunk.push_str(word);
            current_len = word_len;
            continue;
        }

        // The separating space counts towards the limit
        if current_len + 1 + word_len > limit {
            chunks.push(std::mem::take(&mut current_chunk));
            current_chunk.push_str(word);
            current_len = word_len;
        } else {
            current_chunk.push(' ');
            current_chunk.push_str(word);
            current_len += 1 + word_len;
        }
    }

    if !current_chunk.is_empty() || chunks.is_empty() {
        chunks.push(current_chunk);
    }

    Ok(chunks)
}

/// Concatenate provider payloads in chunk order
pub fn merge_outputs(outputs: Vec<Vec<u8>>) -> Vec<u8> {
    let total = outputs.iter().map(Vec::len).sum();
    let mut merged_audio = Vec::with_capacity(total);
    for output in outputs {
        merged_audio.extend(output);
    }
    merged_audio
}
