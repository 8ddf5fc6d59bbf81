use crate::file::{File, TokenizedFile};
use crate::region::Region;
use crate::TokenizeError;

/// Tokenize a file with the default language-agnostic tokenizer.
///
/// Tokens are maximal runs of `[A-Za-z0-9_]` (identifiers, numbers, keywords)
/// or single non-whitespace punctuation characters. Whitespace only separates
/// tokens. Each token carries a 0-indexed source region.
///
/// This is intentionally grammar-free: callers with a language-aware
/// tokenizer construct [`TokenizedFile`] directly and never go through here.
pub fn tokenize(file: File) -> Result<TokenizedFile, TokenizeError> {
    let mut tokens = Vec::new();
    let mut mapping = Vec::new();

    let mut row = 0usize;
    let mut col = 0usize;
    let mut word: Option<(usize, usize, String)> = None;

    let mut flush = |word: &mut Option<(usize, usize, String)>,
                     tokens: &mut Vec<String>,
                     mapping: &mut Vec<Region>,
                     row: usize,
                     col: usize| {
        if let Some((start_row, start_col, text)) = word.take() {
            tokens.push(text);
            mapping.push(Region::new(start_row, start_col, row, col));
        }
    };

    for (offset, ch) in file.content.char_indices() {
        if ch.is_control() && ch != '\n' && ch != '\r' && ch != '\t' {
            // Control characters outside line structure mark binary content;
            // the caller excludes the file and continues with the rest.
            return Err(TokenizeError::BinaryContent { offset });
        }

        if ch == '\n' {
            flush(&mut word, &mut tokens, &mut mapping, row, col);
            row += 1;
            col = 0;
            continue;
        }
        if ch.is_whitespace() {
            flush(&mut word, &mut tokens, &mut mapping, row, col);
            col += 1;
            continue;
        }

        if ch.is_alphanumeric() || ch == '_' {
            match &mut word {
                Some((_, _, text)) => text.push(ch),
                None => word = Some((row, col, ch.to_string())),
            }
        } else {
            flush(&mut word, &mut tokens, &mut mapping, row, col);
            tokens.push(ch.to_string());
            mapping.push(Region::new(row, col, row, col + 1));
        }
        col += 1;
    }
    flush(&mut word, &mut tokens, &mut mapping, row, col);

    TokenizedFile::new(file, tokens, mapping)
}
