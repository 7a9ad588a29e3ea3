// =============================================================================
// Text Chunker — bounded-size segments for per-chunk downstream processing
// =============================================================================
//
// Text is packed greedily at the coarsest boundary that fits:
//
//   paragraphs (blank lines)  joined by "\n\n"
//   sentences  (. ! ?)        joined by ". "
//   words      (whitespace)   joined by " "
//
// A piece that alone exceeds the limit is re-packed one level finer. Words are
// never cut, so a single word longer than the limit becomes its own chunk.
// Lengths are counted in chars, not bytes.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_max_tokens() -> usize {
    30_000
}

fn default_chars_per_token() -> usize {
    4
}

/// Token budget of the downstream consumer, converted to a character limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkBudget {
    /// Maximum tokens accepted per downstream request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Rough average of characters per token.
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,
}

impl Default for ChunkBudget {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            chars_per_token: default_chars_per_token(),
        }
    }
}

impl ChunkBudget {
    pub fn max_chunk_size(&self) -> usize {
        self.max_tokens.saturating_mul(self.chars_per_token)
    }
}

/// Split `text` using the character limit derived from `budget`.
pub fn chunk_text(text: &str, budget: &ChunkBudget) -> Vec<String> {
    let max_chunk_size = budget.max_chunk_size();
    let chunks = split_into_chunks(text, max_chunk_size);
    debug!(
        chars = char_len(text),
        max_chunk_size,
        chunks = chunks.len(),
        "text chunked"
    );
    chunks
}

/// Split `text` into ordered chunks of at most `max_chunk_size` chars.
///
/// Text that already fits is returned untouched as the only chunk (an empty
/// string yields `[""]`). Otherwise pieces are trimmed and re-joined with the
/// separator of their level, so whitespace and sentence punctuation at the
/// boundaries are normalized. Oversized text with no words at all (only
/// whitespace) still yields a single empty chunk.
pub fn split_into_chunks(text: &str, max_chunk_size: usize) -> Vec<String> {
    if char_len(text) <= max_chunk_size {
        return vec![text.to_string()];
    }
    let chunks = pack(text, Level::Paragraph, max_chunk_size);
    if chunks.is_empty() {
        return vec![String::new()];
    }
    chunks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Paragraph,
    Sentence,
    Word,
}

impl Level {
    fn separator(self) -> &'static str {
        match self {
            Self::Paragraph => "\n\n",
            Self::Sentence => ". ",
            Self::Word => " ",
        }
    }

    fn finer(self) -> Option<Self> {
        match self {
            Self::Paragraph => Some(Self::Sentence),
            Self::Sentence => Some(Self::Word),
            Self::Word => None,
        }
    }

    /// Non-empty, trimmed pieces of `text` at this level.
    fn split(self, text: &str) -> Vec<&str> {
        let pieces: Vec<&str> = match self {
            Self::Paragraph => paragraphs(text),
            Self::Sentence => text.split(['.', '!', '?']).collect(),
            Self::Word => return text.split_whitespace().collect(),
        };
        pieces
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Running chunk being filled at one level.
#[derive(Default)]
struct Accumulator {
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Accumulator {
    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.chunks.push(std::mem::take(&mut self.current));
            self.current_len = 0;
        }
    }

    fn start(&mut self, piece: String, len: usize) {
        self.flush();
        self.current = piece;
        self.current_len = len;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

fn pack(text: &str, level: Level, max: usize) -> Vec<String> {
    let separator = level.separator();
    let separator_len = char_len(separator);
    let pieces = level.split(text);

    // Text made only of separators at this level (e.g. "?!?!") is re-read as
    // words so it is not dropped.
    if pieces.is_empty() {
        return match level.finer() {
            Some(finer) => pack(text, finer, max),
            None => Vec::new(),
        };
    }

    let mut acc = Accumulator::default();
    for piece in pieces {
        let piece_len = char_len(piece);

        if piece_len > max {
            match level.finer() {
                Some(finer) => {
                    let mut sub = pack(piece, finer, max);
                    acc.flush();
                    // The last finer chunk stays open so following pieces can
                    // still join it.
                    if let Some(tail) = sub.pop() {
                        acc.chunks.extend(sub);
                        let tail_len = char_len(&tail);
                        acc.start(tail, tail_len);
                    }
                }
                None => {
                    acc.flush();
                    acc.chunks.push(piece.to_string());
                }
            }
            continue;
        }

        if acc.current.is_empty() || acc.current_len + separator_len + piece_len > max {
            acc.start(piece.to_string(), piece_len);
        } else {
            acc.current.push_str(separator);
            acc.current.push_str(piece);
            acc.current_len += separator_len + piece_len;
        }
    }

    acc.finish()
}

/// Paragraphs are runs of lines separated by at least one whitespace-only
/// line. Single newlines inside a paragraph are kept.
fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                out.push(&text[s..end]);
            }
        } else {
            start.get_or_insert(offset);
            end = offset + line.len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        out.push(&text[s..end]);
    }

    out
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
