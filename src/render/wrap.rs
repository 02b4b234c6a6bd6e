//! Greedy word wrapping for body text.

/// Rows longer than this many characters are wrapped.
pub const WRAP_WIDTH: usize = 85;

/// Split `line` into rows of at most `width` characters, breaking only
/// between words. A word longer than `width` gets a row of its own.
/// Lines that already fit are returned unchanged as a single row.
pub fn wrap_words(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }
    let mut rows = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0;
    for word in line.split_whitespace() {
        let word_chars = word.chars().count();
        if buffer_chars > 0 && buffer_chars + 1 + word_chars > width {
            rows.push(std::mem::take(&mut buffer));
            buffer_chars = 0;
        }
        if buffer_chars > 0 {
            buffer.push(' ');
            buffer_chars += 1;
        }
        buffer.push_str(word);
        buffer_chars += word_chars;
    }
    if !buffer.is_empty() {
        rows.push(buffer);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "Start the morning at a sunlit corner cafe where the smell of cardamom \
        tea drifts across the street and vendors are already frying crisp vada for the \
        commuters heading towards the station before the heat of the day settles in.";

    #[test]
    fn short_line_is_single_row() {
        assert_eq!(wrap_words("Sunny and warm.", WRAP_WIDTH), vec!["Sunny and warm."]);
        let exact = "a".repeat(WRAP_WIDTH);
        assert_eq!(wrap_words(&exact, WRAP_WIDTH), vec![exact.clone()]);
    }

    #[test]
    fn rows_rejoin_to_original_words() {
        let rows = wrap_words(LONG, WRAP_WIDTH);
        assert!(rows.len() > 1);
        let original: Vec<&str> = LONG.split_whitespace().collect();
        let rejoined = rows.join(" ");
        let rejoined: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(rejoined, original);
        for row in &rows {
            assert!(row.chars().count() <= WRAP_WIDTH, "row too long: {row}");
            assert!(!row.starts_with(' ') && !row.ends_with(' '));
        }
    }

    #[test]
    fn greedy_fill_packs_each_row() {
        let rows = wrap_words(LONG, WRAP_WIDTH);
        for pair in rows.windows(2) {
            let next_word = pair[1].split(' ').next().unwrap_or_default();
            assert!(pair[0].chars().count() + 1 + next_word.chars().count() > WRAP_WIDTH);
        }
    }

    #[test]
    fn oversized_word_gets_own_row() {
        let giant = "z".repeat(100);
        let line = format!("before {giant} after");
        let rows = wrap_words(&line, WRAP_WIDTH);
        assert_eq!(rows, vec!["before".to_string(), giant, "after".to_string()]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let word = "café";
        let line = [word; 20].join(" ");
        for row in wrap_words(&line, WRAP_WIDTH) {
            assert!(row.chars().count() <= WRAP_WIDTH);
        }
        assert_eq!(wrap_words(&"é".repeat(85), WRAP_WIDTH).len(), 1);
    }
}
