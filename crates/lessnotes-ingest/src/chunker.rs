//! Splitting text into overlapping windows for embedding.

use lessnotes_config::ChunkingConfig;

/// Splits document text into overlapping character windows.
///
/// Paragraph boundaries are preferred, then sentence boundaries, falling back
/// to a hard character split for content without natural breaks. Adjacent
/// windows overlap by `window_overlap` characters so retrieval favors recall
/// over storage.
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Split text into windows. Empty or whitespace-only input yields none.
    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![];
        }

        if trimmed.chars().count() <= self.config.window_size {
            return vec![trimmed.to_string()];
        }

        let mut windows = Vec::new();
        let mut current = String::new();

        for para in trimmed.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }

            let para_len = para.chars().count();
            if para_len > self.config.window_size {
                // Paragraph itself overflows a window; fall back to finer
                // pieces.
                let sentences = split_sentences(para);
                if sentences.len() <= 1 {
                    for piece in self.force_split(para) {
                        self.push_piece(&mut current, &mut windows, &piece);
                    }
                } else {
                    for sentence in sentences {
                        self.push_piece(&mut current, &mut windows, sentence);
                    }
                }
            } else {
                self.push_piece(&mut current, &mut windows, para);
            }
        }

        let last = current.trim();
        if !last.is_empty() {
            windows.push(last.to_string());
        }

        windows
    }

    /// Append a piece to the accumulating window, flushing with overlap
    /// carry-over when the window would overflow.
    fn push_piece(&self, current: &mut String, windows: &mut Vec<String>, piece: &str) {
        let current_len = current.chars().count();
        let piece_len = piece.chars().count();

        if current_len > 0 && current_len + piece_len + 1 > self.config.window_size {
            let window = current.trim();
            if window.chars().count() >= self.config.min_window_size || windows.is_empty() {
                windows.push(window.to_string());
            }

            if self.config.window_overlap > 0 {
                let chars: Vec<char> = current.chars().collect();
                let skip = chars.len().saturating_sub(self.config.window_overlap);
                *current = chars[skip..].iter().collect();
            } else {
                current.clear();
            }
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(piece);
    }

    /// Hard split by character count, for content without sentence breaks.
    fn force_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = std::cmp::min(start + self.config.window_size, chars.len());
            pieces.push(chars[start..end].iter().collect());
            let next = end.saturating_sub(self.config.window_overlap);
            start = if next > start { next } else { end };
        }

        pieces
    }
}

/// Split on sentence-final punctuation followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if c == '.' || c == '!' || c == '?' {
            let next = i + c.len_utf8();
            if next >= text.len()
                || text[next..].starts_with(' ')
                || text[next..].starts_with('\n')
            {
                sentences.push(&text[start..next]);
                start = next;
                if start < text.len() && text[start..].starts_with(' ') {
                    start += 1;
                }
            }
        }
    }

    if start < text.len() {
        let remaining = text[start..].trim();
        if !remaining.is_empty() {
            sentences.push(remaining);
        }
    }

    sentences
}
