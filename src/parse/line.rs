// Line analysis over the source buffer.
//
// The parser consumes input one line at a time. `analyze_line` finds the
// current line's bounds and counts its leading horizontal whitespace; that
// count drives list nesting and paragraph continuation. The whitespace run is
// scanned 16 bytes at a time on targets with baseline vector support, with a
// scalar tail that produces identical results; the terminator search uses
// `memchr`.

use memchr::memchr2;

/// A cursor over the source, holding the bounds of the most recently
/// analyzed line.
pub(crate) struct ParseLocation<'a> {
    source: &'a str,
    /// Byte offset of the next unconsumed byte.
    pub cursor: usize,
    /// Start of the line found by the last `analyze_line` call.
    pub line_start: usize,
    /// One past the last content byte of the line (the `\n`, a NUL, or end
    /// of input).
    pub line_end: usize,
    /// Count of leading `' '`, `'\t'`, `'\r'` bytes on the line.
    pub nspaces: usize,
}

impl<'a> ParseLocation<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            line_start: 0,
            line_end: 0,
            nspaces: 0,
        }
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.source.len()
    }

    /// Locate the current line: `line_start = cursor`, `line_end` at the
    /// next `\n`, NUL, or end of input, `nspaces` = leading whitespace.
    pub fn analyze_line(&mut self) {
        let bytes = self.source.as_bytes();
        let nspaces = leading_blank_len(&bytes[self.cursor..]);
        let body = self.cursor + nspaces;
        self.line_end = match memchr2(b'\n', 0, &bytes[body..]) {
            Some(i) => body + i,
            None => bytes.len(),
        };
        self.line_start = self.cursor;
        self.nspaces = nspaces;
    }

    /// Move the cursor past the current line and its terminator.
    pub fn advance_row(&mut self) {
        if self.line_end == self.source.len() {
            self.cursor = self.line_end;
        } else {
            self.cursor = self.line_end + 1;
        }
    }

    /// The current line, terminator excluded.
    pub fn line(&self) -> &'a str {
        &self.source[self.line_start..self.line_end]
    }

    /// The current line with its leading whitespace removed.
    pub fn rest(&self) -> &'a str {
        &self.source[self.line_start + self.nspaces..self.line_end]
    }

    /// Whether the current line holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.line_start + self.nspaces == self.line_end
    }
}

/// Length of the leading run of bytes in `{' ', '\t', '\r'}`.
fn leading_blank_len(bytes: &[u8]) -> usize {
    let mut n = 0;
    let mut rest = bytes;

    #[cfg(target_arch = "x86_64")]
    while rest.len() >= 16 {
        // SAFETY: `rest` holds at least 16 readable bytes.
        let run = unsafe { blank_run_sse2(rest.as_ptr()) };
        n += run;
        if run != 16 {
            return n;
        }
        rest = &rest[16..];
    }

    #[cfg(target_arch = "aarch64")]
    while rest.len() >= 16 {
        // SAFETY: `rest` holds at least 16 readable bytes.
        let run = unsafe { blank_run_neon(rest.as_ptr()) };
        n += run;
        if run != 16 {
            return n;
        }
        rest = &rest[16..];
    }

    for &b in rest {
        match b {
            b' ' | b'\t' | b'\r' => n += 1,
            _ => break,
        }
    }
    n
}

/// Leading-whitespace run length within one 16-byte chunk: a lane-equality
/// test per whitespace byte, then count trailing ones of the combined mask.
#[cfg(target_arch = "x86_64")]
#[inline]
unsafe fn blank_run_sse2(ptr: *const u8) -> usize {
    use std::arch::x86_64::*;

    let data = _mm_loadu_si128(ptr.cast());
    let space = _mm_cmpeq_epi8(data, _mm_set1_epi8(b' ' as i8));
    let tab = _mm_cmpeq_epi8(data, _mm_set1_epi8(b'\t' as i8));
    let cr = _mm_cmpeq_epi8(data, _mm_set1_epi8(b'\r' as i8));
    let blank = _mm_or_si128(_mm_or_si128(space, cr), tab);
    let mask = _mm_movemask_epi8(blank) as u32;
    (!mask).trailing_zeros() as usize
}

/// NEON variant of [`blank_run_sse2`], counting through the nibble fat-mask.
#[cfg(target_arch = "aarch64")]
#[inline]
unsafe fn blank_run_neon(ptr: *const u8) -> usize {
    use std::arch::aarch64::*;

    use crate::simd::fat_mask;

    let data = vld1q_u8(ptr);
    let space = vceqq_u8(data, vdupq_n_u8(b' '));
    let tab = vceqq_u8(data, vdupq_n_u8(b'\t'));
    let cr = vceqq_u8(data, vdupq_n_u8(b'\r'));
    let blank = vorrq_u8(vorrq_u8(space, cr), tab);
    ((!fat_mask(blank)).trailing_zeros() / 4) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference implementation for the vectorized leading-whitespace count.
    fn leading_blank_len_scalar(bytes: &[u8]) -> usize {
        bytes
            .iter()
            .take_while(|b| matches!(b, b' ' | b'\t' | b'\r'))
            .count()
    }

    #[test]
    fn test_leading_blank_matches_scalar_reference() {
        let cases: &[&str] = &[
            "",
            "a",
            "  a",
            "\t\tx",
            "\r\nx",
            "                    x", // run longer than one vector chunk
            "                                        ", // all whitespace, several chunks
            "   \t \r  mixed whitespace then text and more text to pass 16 bytes",
            "no leading whitespace but a long enough line to hit the vector path",
        ];
        for case in cases {
            assert_eq!(
                leading_blank_len(case.as_bytes()),
                leading_blank_len_scalar(case.as_bytes()),
                "input: {case:?}"
            );
        }
    }

    #[test]
    fn test_analyze_line_basic() {
        let mut loc = ParseLocation::new("  hello\nworld\n");
        loc.analyze_line();
        assert_eq!(loc.line_start, 0);
        assert_eq!(loc.nspaces, 2);
        assert_eq!(loc.line(), "  hello");
        assert_eq!(loc.rest(), "hello");
        loc.advance_row();
        loc.analyze_line();
        assert_eq!(loc.line(), "world");
        assert_eq!(loc.nspaces, 0);
    }

    #[test]
    fn test_blank_line_invariant() {
        // On a whitespace-only line, line_start + nspaces == line_end.
        let mut loc = ParseLocation::new("   \nnext");
        loc.analyze_line();
        assert!(loc.is_blank());
        assert_eq!(loc.line_start + loc.nspaces, loc.line_end);
    }

    #[test]
    fn test_crlf_counts_cr_as_whitespace() {
        let mut loc = ParseLocation::new("abc\r\ndef");
        loc.analyze_line();
        // '\r' terminates nothing on its own; the line ends at '\n' and the
        // '\r' is simply the last content byte.
        assert_eq!(loc.line(), "abc\r");
        loc.advance_row();
        loc.analyze_line();
        assert_eq!(loc.line(), "def");
    }

    #[test]
    fn test_nul_terminates_line() {
        let mut loc = ParseLocation::new("ab\0cd");
        loc.analyze_line();
        assert_eq!(loc.line(), "ab");
        loc.advance_row();
        loc.analyze_line();
        assert_eq!(loc.line(), "cd");
    }

    #[test]
    fn test_advance_row_at_end_of_input() {
        let mut loc = ParseLocation::new("last");
        loc.analyze_line();
        assert_eq!(loc.line_end, 4);
        loc.advance_row();
        // No terminator: the cursor parks at the end instead of past it.
        assert!(loc.at_end());
    }
}
