//! Statement splitting policies

/// Breaks a batch of text into statements
///
/// Each piece carries its byte offset within the batch so errors can be
/// reported against the original text.
pub trait StatementSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)>;
}

/// The whole text is one statement; the caller does the splitting
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleStatement;

impl StatementSplitter for SingleStatement {
    fn split<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        if text.trim().is_empty() {
            Vec::new()
        } else {
            vec![(0, text)]
        }
    }
}

/// Split on a terminator character outside backtick and single-quoted literals
#[derive(Debug, Clone, Copy)]
pub struct Terminated {
    pub terminator: char,
}

impl Terminated {
    pub fn new(terminator: char) -> Self {
        Self { terminator }
    }
}

impl Default for Terminated {
    fn default() -> Self {
        Self { terminator: ';' }
    }
}

impl StatementSplitter for Terminated {
    fn split<'a>(&self, text: &'a str) -> Vec<(usize, &'a str)> {
        let mut pieces = Vec::new();
        let mut quote: Option<char> = None;
        let mut start = 0;

        for (i, c) in text.char_indices() {
            match quote {
                Some(open) if c == open => quote = None,
                Some(_) => {}
                None if c == '`' || c == '\'' => quote = Some(c),
                None if c == self.terminator => {
                    push_piece(&mut pieces, text, start, i);
                    start = i + c.len_utf8();
                }
                None => {}
            }
        }
        push_piece(&mut pieces, text, start, text.len());

        pieces
    }
}

/// Keep a non-blank piece, trimmed, with the offset of its first character
fn push_piece<'a>(pieces: &mut Vec<(usize, &'a str)>, text: &'a str, start: usize, end: usize) {
    let piece = &text[start..end];
    let trimmed = piece.trim_start();
    let offset = start + (piece.len() - trimmed.len());
    let trimmed = trimmed.trim_end();
    if !trimmed.is_empty() {
        pieces.push((offset, trimmed));
    }
}
