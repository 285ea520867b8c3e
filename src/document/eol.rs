//! Line-ending conventions for host documents.

/// Line-ending convention of a host document.
///
/// Editors report this as a numeric enum (`1` = LF, `2` = CRLF). Anything
/// else falls back to LF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EndOfLine {
    #[default]
    Lf,
    Crlf,
}

impl EndOfLine {
    /// Map an editor's numeric end-of-line code to a convention.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => EndOfLine::Lf,
            2 => EndOfLine::Crlf,
            _ => EndOfLine::Lf,
        }
    }

    /// Guess the convention from the first line break in `text`.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => EndOfLine::Crlf,
            _ => EndOfLine::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::Lf => "\n",
            EndOfLine::Crlf => "\r\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, EndOfLine::Lf)]
    #[case(2, EndOfLine::Crlf)]
    #[case(0, EndOfLine::Lf)]
    #[case(3, EndOfLine::Lf)]
    #[case(-1, EndOfLine::Lf)]
    fn from_code_defaults_to_lf(#[case] code: i64, #[case] expected: EndOfLine) {
        assert_eq!(EndOfLine::from_code(code), expected);
    }

    #[rstest]
    #[case("", EndOfLine::Lf)]
    #[case("single line", EndOfLine::Lf)]
    #[case("a\nb\r\nc", EndOfLine::Lf)]
    #[case("a\r\nb\nc", EndOfLine::Crlf)]
    #[case("\nstarts with newline", EndOfLine::Lf)]
    fn detect_uses_first_line_break(#[case] text: &str, #[case] expected: EndOfLine) {
        assert_eq!(EndOfLine::detect(text), expected);
    }

    #[test]
    fn default_separator_is_lf() {
        assert_eq!(EndOfLine::default().as_str(), "\n");
        assert_eq!(EndOfLine::Crlf.as_str(), "\r\n");
    }
}
