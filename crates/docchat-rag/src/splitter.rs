//! Separator-based text splitter with positional overlap

use std::collections::VecDeque;

use docchat_core::{Error, IndexingConfig, Result};

/// Splits text on a literal separator and greedily merges the pieces into
/// windows of at most `chunk_size` characters, carrying up to `chunk_overlap`
/// characters of trailing pieces into the next window.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: String,
}

impl TextSplitter {
    pub fn new(config: &IndexingConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be positive".to_string()));
        }
        if config.chunk_overlap > config.chunk_size {
            return Err(Error::Configuration(format!(
                "chunk_overlap ({}) is larger than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }

        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            separator: config.separator.clone(),
        })
    }

    /// Split `text` into ordered chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = if self.separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(self.separator.as_str())
                .filter(|piece| !piece.is_empty())
                .collect()
        };

        self.merge_pieces(&pieces)
    }

    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let separator_len = char_len(&self.separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len + joiner_len(&window, separator_len) > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        size = total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }

                if !window.is_empty() {
                    if let Some(chunk) = self.join(&window) {
                        chunks.push(chunk);
                    }

                    while total > self.chunk_overlap
                        || (total + len + joiner_len(&window, separator_len) > self.chunk_size
                            && total > 0)
                    {
                        let Some(front) = window.pop_front() else {
                            break;
                        };
                        let trailing = if window.is_empty() { 0 } else { separator_len };
                        total -= char_len(front) + trailing;
                    }
                }
            }

            window.push_back(piece);
            total += len + if window.len() > 1 { separator_len } else { 0 };
        }

        if let Some(chunk) = self.join(&window) {
            chunks.push(chunk);
        }

        chunks
    }

    fn join(&self, window: &VecDeque<&str>) -> Option<String> {
        let joined = window
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(&self.separator);
        let trimmed = joined.trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn joiner_len(window: &VecDeque<&str>, separator_len: usize) -> usize {
    if window.is_empty() { 0 } else { separator_len }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> TextSplitter {
        TextSplitter::new(&IndexingConfig {
            chunk_size,
            chunk_overlap,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let chunks = TextSplitter::new(&IndexingConfig::default())
            .unwrap()
            .split_text("");
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_whitespace_only_text_has_no_chunks() {
        assert!(splitter(10, 2).split_text("\n \n\n  \n").is_empty());
    }

    #[test]
    fn test_overlap_is_carried_forward() {
        let chunks = splitter(10, 4).split_text("aaaa\nbbbb\ncccc\ndddd");
        assert_eq!(chunks, vec!["aaaa\nbbbb", "bbbb\ncccc", "cccc\ndddd"]);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = splitter(1000, 200).split_text("one line\nanother line\n");
        assert_eq!(chunks, vec!["one line\nanother line"]);
    }

    #[test]
    fn test_oversized_line_stands_alone() {
        let long_line = "x".repeat(25);
        let text = format!("short\n{}\nend", long_line);

        let chunks = splitter(10, 2).split_text(&text);
        assert_eq!(chunks, vec!["short".to_string(), long_line, "end".to_string()]);
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let chunks = splitter(5, 0).split_text("ééé\nüüü");
        assert_eq!(chunks, vec!["ééé", "üüü"]);

        let chunks = splitter(7, 0).split_text("ééé\nüüü");
        assert_eq!(chunks, vec!["ééé\nüüü"]);
    }

    #[test]
    fn test_splitting_is_deterministic() {
        let text = (0..200)
            .map(|i| format!("Policy clause {} covers annual leave and travel.", i))
            .collect::<Vec<_>>()
            .join("\n");
        let splitter = TextSplitter::new(&IndexingConfig::default()).unwrap();

        let first = splitter.split_text(&text);
        let second = splitter.split_text(&text);

        assert_eq!(first, second);
        assert!(first.len() > 1);
        assert!(first.iter().all(|chunk| chunk.chars().count() <= 1000));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let too_much_overlap = IndexingConfig {
            chunk_size: 100,
            chunk_overlap: 200,
            ..Default::default()
        };
        assert!(TextSplitter::new(&too_much_overlap).is_err());

        let zero_size = IndexingConfig {
            chunk_size: 0,
            chunk_overlap: 0,
            ..Default::default()
        };
        assert!(TextSplitter::new(&zero_size).is_err());
    }
}
