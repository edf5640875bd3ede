//! Symbol scanners for the two driver back ends.
//!
//! The IR back end walks [`crate::ir::IrModule`] directly; the source-text
//! back end in [`source`] is a lexical recogniser working on a masked copy of
//! the buffer. The masker lives here because the text rewriter uses the same
//! shadow to keep substitution out of comments and literals.

pub mod source;

/// Produces a same-length shadow of `source` in which comments, string and
/// character literals, and preprocessor lines are blanked out with spaces.
///
/// Newlines are kept so byte offsets and line numbers in the shadow match the
/// original buffer exactly.
pub fn mask_non_code(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        StringLit,
        CharLit,
        Preprocessor,
    }

    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = State::Code;
    let mut at_line_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            State::Code => match byte {
                b'/' if next == Some(b'/') => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::LineComment;
                    i += 2;
                    continue;
                }
                b'/' if next == Some(b'*') => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::BlockComment;
                    i += 2;
                    continue;
                }
                b'"' => {
                    out[i] = b' ';
                    state = State::StringLit;
                }
                b'\'' => {
                    out[i] = b' ';
                    state = State::CharLit;
                }
                b'#' if at_line_start => {
                    out[i] = b' ';
                    state = State::Preprocessor;
                }
                b'\n' => at_line_start = true,
                b' ' | b'\t' | b'\r' => {}
                _ => at_line_start = false,
            },
            State::LineComment => {
                if byte == b'\n' {
                    state = State::Code;
                    at_line_start = true;
                } else {
                    out[i] = b' ';
                }
            }
            State::BlockComment => {
                if byte == b'*' && next == Some(b'/') {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::Code;
                    i += 2;
                    continue;
                }
                if byte != b'\n' {
                    out[i] = b' ';
                }
            }
            State::StringLit | State::CharLit => {
                let terminator = if state == State::StringLit { b'"' } else { b'\'' };
                if byte == b'\\' && next.is_some() {
                    out[i] = b' ';
                    if next != Some(b'\n') {
                        out[i + 1] = b' ';
                    }
                    i += 2;
                    continue;
                }
                if byte == terminator {
                    out[i] = b' ';
                    state = State::Code;
                } else if byte == b'\n' {
                    // Unterminated literal; give up at end of line.
                    state = State::Code;
                    at_line_start = true;
                } else {
                    out[i] = b' ';
                }
            }
            State::Preprocessor => {
                if byte == b'\n' {
                    // A trailing backslash continues the directive.
                    if bytes.get(i.wrapping_sub(1)) != Some(&b'\\') {
                        state = State::Code;
                    }
                    at_line_start = true;
                } else {
                    out[i] = b' ';
                }
            }
        }
        i += 1;
    }

    // Masking only writes ASCII spaces, so the buffer stays valid UTF-8.
    String::from_utf8_lossy(&out).into_owned()
}
