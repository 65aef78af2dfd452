//! Text segmentation for speech synthesis.
//!
//! Splits unbounded text into speakable chunks, sentence-first and
//! clause-aware. Each chunk maps to exactly one engine invocation, so the
//! cap bounds how long a single synthesis can run.

/// Sentence-terminal punctuation, including the full-width forms.
const SENTENCE_TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Short text passes through untouched as a single chunk. Longer text is
/// split at sentence boundaries and greedily re-packed, each sentence
/// getting a normalizing `.` terminator back. A sentence that cannot fit
/// in a chunk of its own is split again at clause punctuation and
/// whitespace runs, and a fragment with no boundary left is sliced at the
/// cap, so the bound holds for arbitrary input and no trailing content is
/// ever dropped.
///
/// Lengths are counted in characters, not bytes — full-width punctuation
/// must never land a cut inside a UTF-8 sequence.
///
/// Empty (or whitespace-only) input yields no chunks.
#[must_use]
pub fn segment(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if count_chars(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in split_sentences(text) {
        let sentence_chars = count_chars(&sentence);

        // A sentence that cannot fit in any chunk even with its restored
        // terminator drops to clause granularity.
        if sentence_chars + 1 > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            split_clauses(&sentence, max_chars, &mut chunks);
            continue;
        }

        // Flush once appending (joining space plus terminator included)
        // would push the buffer past the cap.
        let sep = usize::from(!current.is_empty());
        if current_chars + sep + sentence_chars + 1 > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(&sentence);
        current.push('.');
        current_chars += sentence_chars + 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Truncate `text` to `max_chars` characters for acknowledgments and logs.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    if count_chars(text) <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// Split text into sentence candidates at terminal punctuation, stripping
/// the terminators and any whitespace that follows them.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if SENTENCE_TERMINATORS.contains(&ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// Greedy re-pack of one oversized sentence at clause granularity.
///
/// Clause punctuation and whitespace runs both separate fragments, so a
/// fragment never contains an internal split point; one longer than the
/// cap is sliced outright.
fn split_clauses(sentence: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_chars = 0usize;

    for part in sentence
        .split(|c: char| matches!(c, ',' | ';' | ':') || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        let part_chars = count_chars(part);

        if part_chars > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let mut piece = String::new();
            let mut piece_chars = 0usize;
            for ch in part.chars() {
                piece.push(ch);
                piece_chars += 1;
                if piece_chars == max_chars {
                    chunks.push(std::mem::take(&mut piece));
                    piece_chars = 0;
                }
            }
            if !piece.is_empty() {
                current = piece;
                current_chars = piece_chars;
            }
            continue;
        }

        let sep = usize::from(!current.is_empty());
        if current_chars + sep + part_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(part);
        current_chars += part_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
}
