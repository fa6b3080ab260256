//! Word-wrapping of the practice stream into fixed-width display lines.
//!
//! All widths are counted in Unicode code points, which is also how the
//! session indexes its cursor.

pub const LINES_PER_VIEW: usize = 3;
pub const CHARS_PER_LINE: usize = 50;

/// Result of packing: exactly `lines_per_view` lines and the index of the
/// first word that did not fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLines {
    pub lines: Vec<String>,
    pub next_index: usize,
}

/// Greedily fill `lines_per_view` lines of at most `chars_per_line` code
/// points from `words[start..]`, joining words with single spaces.
///
/// A word that would overflow moves whole to the next line. When words run
/// out, the remaining lines are empty. A single word wider than the line is
/// given a line of its own rather than stalling the stream.
pub fn pack<S: AsRef<str>>(
    words: &[S],
    start: usize,
    lines_per_view: usize,
    chars_per_line: usize,
) -> PackedLines {
    let mut lines = Vec::with_capacity(lines_per_view);
    let mut idx = start.min(words.len());

    for _ in 0..lines_per_view {
        let mut line = String::new();
        let mut width = 0usize;

        while let Some(word) = words.get(idx) {
            let word = word.as_ref();
            let word_width = word.chars().count();
            let sep = usize::from(width > 0);

            if width + sep + word_width <= chars_per_line || width == 0 {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                width += sep + word_width;
                idx += 1;
                if width >= chars_per_line {
                    break;
                }
            } else {
                break;
            }
        }

        lines.push(line);
    }

    PackedLines {
        lines,
        next_index: idx,
    }
}

/// Number of space-separated words on a display line.
pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}
