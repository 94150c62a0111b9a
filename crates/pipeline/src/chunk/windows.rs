//! Character windows with overlap and whitespace snapping.

/// A window of the source text. Offsets are in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split `text` into windows of at most `window_chars` characters, each
/// overlapping the previous by `overlap_chars`.
///
/// A window that does not reach the end of the text is cut at the last space
/// inside it, so words stay whole. Every window starts strictly after the
/// previous one.
pub fn split_windows(text: &str, window_chars: usize, overlap_chars: usize) -> Vec<TextWindow<'_>> {
    // Byte offset of every char, plus the end of the text
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = offsets.len() - 1;
    let window_chars = window_chars.max(1);

    let mut windows = Vec::new();
    let mut start = 0;

    while start < total {
        let mut end = (start + window_chars).min(total);

        if end < total {
            let slice = &text[offsets[start]..offsets[end]];
            if let Some(space) = slice.rfind(' ') {
                let snapped = start + slice[..space].chars().count();
                if snapped > start {
                    end = snapped;
                }
            }
        }

        windows.push(TextWindow {
            text: &text[offsets[start]..offsets[end]],
            start,
            end,
        });

        if end == total {
            break;
        }

        let next = end.saturating_sub(overlap_chars);
        start = if next > start { next } else { end };
    }

    tracing::debug!(
        windows = windows.len(),
        chars = total,
        "Split text into character windows"
    );

    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_window() {
        let windows = split_windows("hello world", 100, 10);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].text, "hello world");
        assert_eq!((windows[0].start, windows[0].end), (0, 11));
    }

    #[test]
    fn test_empty_text_has_no_windows() {
        assert!(split_windows("", 100, 10).is_empty());
    }

    #[test]
    fn test_windows_snap_to_spaces() {
        let text = "alpha beta gamma delta epsilon";
        let windows = split_windows(text, 12, 0);

        assert_eq!(windows[0].text, "alpha beta");
        assert_eq!(windows[1].text, " gamma");
        for window in &windows {
            assert!(window.text.chars().count() <= 12);
        }
        assert_eq!(windows.last().unwrap().end, text.chars().count());
    }

    #[test]
    fn test_windows_overlap() {
        let text = "word ".repeat(100);
        let windows = split_windows(&text, 50, 10);

        assert!(windows.len() > 1);
        for pair in windows.windows(2) {
            assert_eq!(pair[1].start, pair[0].end - 10);
        }
    }

    #[test]
    fn test_forward_progress_when_overlap_exceeds_window() {
        let text = "abcdefghij".repeat(10);
        let windows = split_windows(&text, 5, 20);

        assert_eq!(windows.len(), 20);
        for pair in windows.windows(2) {
            assert!(pair[1].start > pair[0].start);
        }
    }

    #[test]
    fn test_utf8_text_is_never_split_inside_a_char() {
        let text = "Gamedex é um aplicativo 🎮 brasileiro com acentuação: ã, õ, ç. ".repeat(40);
        let windows = split_windows(&text, 64, 8);

        assert!(windows.len() > 1);
        for window in &windows {
            assert!(!window.text.is_empty());
            assert!(window.text.chars().count() <= 64);
        }
        assert_eq!(windows.last().unwrap().end, text.chars().count());
    }
}
