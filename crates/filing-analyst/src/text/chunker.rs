//! Recursive character chunking for retrieval indexes
//!
//! Text is split on the first separator (paragraph, line, word, character)
//! that occurs in it. Pieces shorter than the chunk size are merged greedily
//! into chunks with a trailing overlap; longer pieces recurse with the
//! remaining separators. Separators stay attached to the start of the piece
//! that follows them. Lengths are counted in characters.

use std::collections::VecDeque;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Character-based recursive text splitter
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter with the default separator ladder
    ///
    /// `chunk_size` is raised to at least 1 and `chunk_overlap` kept below it.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Replace the separator ladder, most preferred first
    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    /// Split text into trimmed, non-empty chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        self.split_recursive(text, &self.separators, &mut chunks);
        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[String], out: &mut Vec<String>) {
        let (separator, remaining) = pick_separator(text, separators);

        let mut short_pieces: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                short_pieces.push(piece);
                continue;
            }

            if !short_pieces.is_empty() {
                self.merge_pieces(&short_pieces, out);
                short_pieces.clear();
            }

            if remaining.is_empty() {
                out.push(piece.to_string());
            } else {
                self.split_recursive(piece, remaining, out);
            }
        }

        if !short_pieces.is_empty() {
            self.merge_pieces(&short_pieces, out);
        }
    }

    fn merge_pieces(&self, pieces: &[&str], out: &mut Vec<String>) {
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                push_joined(&window, out);

                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        push_joined(&window, out);
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

/// First separator present in the text, plus the finer ones after it
fn pick_separator<'s>(text: &str, separators: &'s [String]) -> (&'s str, &'s [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }
        if text.contains(separator.as_str()) {
            return (separator, &separators[i + 1..]);
        }
    }
    (separators.last().map_or("", String::as_str), &[])
}

/// Split before every separator occurrence, dropping empty pieces
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut last = 0;
    for (index, _) in text.match_indices(separator) {
        pieces.push(&text[last..index]);
        last = index;
    }
    pieces.push(&text[last..]);
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn push_joined(window: &VecDeque<&str>, out: &mut Vec<String>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
