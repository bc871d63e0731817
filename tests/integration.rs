// End-to-end conversion tests.
//
// Each case pins the exact output bytes, including the intentionally omitted
// closing tags, so any drift in block recognition or emission order shows up
// as a diff.

use pretty_assertions::assert_eq;

use drmd::{to_html, DrmdError};

#[track_caller]
fn convert(input: &str) -> String {
    to_html(input).unwrap()
}

#[test]
fn test_blockquote_with_continuation_line() {
    assert_eq!(convert(">a\nb\n"), "<blockquote>\na\nb</blockquote>\n");
}

#[test]
fn test_list_then_paragraph_at_normal_indent() {
    assert_eq!(convert("- foo\nbar\n"), "<ul>\n<li>foo</ul>\n<p>bar");
}

#[test]
fn test_single_item_list() {
    assert_eq!(convert("- foo\n"), "<ul>\n<li>foo</ul>\n");
}

#[test]
fn test_list_item_continuation_is_space_joined() {
    assert_eq!(convert("- foo\n  bar\n"), "<ul>\n<li>foo bar</ul>\n");
}

#[test]
fn test_indented_marker_nests_inside_item() {
    assert_eq!(
        convert("- foo\n  bar\n - baz\n"),
        "<ul>\n<li>foo bar <ul>\n<li>baz</ul>\n</ul>\n"
    );
}

#[test]
fn test_quote_lines_are_newline_joined() {
    assert_eq!(
        convert("> foo\n> bar\n> baz\n"),
        "<blockquote>\nfoo\nbar\nbaz</blockquote>\n"
    );
}

#[test]
fn test_fenced_code_escapes_but_keeps_lines() {
    assert_eq!(
        convert("```\n> foo\n> bar\n> baz\n```\n"),
        "<pre>&gt; foo\n&gt; bar\n&gt; baz\n</pre>\n"
    );
}

#[test]
fn test_table_first_row_is_header() {
    assert_eq!(
        convert("|hello|world\n|foo | bar\n"),
        "<table>\n<thead>\n<tr>\n<th>hello<th>world\n<tbody>\n<tr><td>foo<td>bar</table>\n"
    );
}

#[test]
fn test_heading_interrupts_list() {
    assert_eq!(
        convert("- foo\n#hello\n- bar\n"),
        "<ul>\n<li>foo</ul>\n<h1>hello</h1>\n<ul>\n<li>bar</ul>\n"
    );
}

#[test]
fn test_header_only_table_has_empty_body() {
    assert_eq!(
        convert("|foo\na\n"),
        "<table>\n<thead>\n<tr>\n<th>foo\n<tbody>\n</table>\n<p>a"
    );
}

#[test]
fn test_dedent_below_all_frames_starts_a_new_list() {
    assert_eq!(convert("  - a\n- b\n"), "<ul>\n<li>a</ul>\n<ul>\n<li>b</ul>\n");
}

#[test]
fn test_mixed_bullet_markers_and_partial_dedent() {
    assert_eq!(
        convert("+ a\n  o b\n o c\n"),
        "<ul>\n<li>a <ul>\n<li>b</ul>\n</ul>\n<ul>\n<li>c</ul>\n"
    );
}

// The paragraph indent is fixed by the first non-blank line and never
// re-lowered. A non-marker line at exactly that indent always breaks an open
// list; any other indent continues the current item.

#[test]
fn test_line_off_normal_indent_continues_item() {
    // Indent 4 differs from the paragraph indent (0): continuation text.
    assert_eq!(convert("- a\n    bar\n"), "<ul>\n<li>a bar</ul>\n");
}

#[test]
fn test_normal_indent_comes_from_indented_first_line() {
    // The first non-blank line sits at indent 2; a later line at indent 2
    // breaks the list even though the list itself started at indent 0.
    assert_eq!(
        convert("  lead\n\n- a\n  bar\n"),
        "<p>lead<ul>\n<li>a</ul>\n<p>bar"
    );
}

// Error paths.

#[test]
fn test_deep_nesting_exceeds_render_depth() {
    // Ten strictly deeper markers: the innermost text node sits past the
    // renderer's depth cap of 20.
    let mut source = String::new();
    for depth in 0..10 {
        source.push_str(&" ".repeat(depth));
        source.push_str("- x\n");
    }
    assert_eq!(to_html(&source), Err(DrmdError::RecursionExceeded));
}

#[test]
fn test_nesting_inside_render_depth_is_ok() {
    let mut source = String::new();
    for depth in 0..9 {
        source.push_str(&" ".repeat(depth));
        source.push_str("- x\n");
    }
    assert!(to_html(&source).is_ok());
}

#[test]
fn test_list_stack_overflow_reports_out_of_memory() {
    // Seventeen strictly deeper markers exceed the 16-frame list stack.
    let mut source = String::new();
    for depth in 0..17 {
        source.push_str(&" ".repeat(depth));
        source.push_str("- x\n");
    }
    assert_eq!(to_html(&source), Err(DrmdError::OutOfMemory));
}

// Assorted structure cases.

#[test]
fn test_unicode_bullet_marker() {
    assert_eq!(convert("\u{2022} dot\n"), "<ul>\n<li>dot</ul>\n");
}

#[test]
fn test_ordered_list_from_digit_dot() {
    assert_eq!(convert("1. one\n2. two\n"), "<ol>\n<li>one<li>two</ol>\n");
}

#[test]
fn test_ordered_and_bullet_siblings() {
    assert_eq!(
        convert("1. one\n- dash\n"),
        "<ol>\n<li>one</ol>\n<ul>\n<li>dash</ul>\n"
    );
}

#[test]
fn test_blank_line_splits_paragraphs() {
    assert_eq!(convert("a\n\nb\n"), "<p>a<p>b");
}

#[test]
fn test_heading_text_is_stripped() {
    assert_eq!(convert("#  spaced  \n"), "<h1>spaced</h1>\n");
}

#[test]
fn test_escaping_applies_to_paragraph_text() {
    assert_eq!(convert("a & b\n"), "<p>a &amp; b");
    assert_eq!(convert("1 < 2 > 0\n"), "<p>1 &lt; 2 &gt; 0");
}

#[test]
fn test_inline_whitelist_passes_through_paragraph() {
    assert_eq!(convert("a <b>bold</b> word\n"), "<p>a <b>bold</b> word");
}

#[test]
fn test_em_dash_substitution_in_text() {
    assert_eq!(convert("yes --- no\n"), "<p>yes &mdash; no");
}

#[test]
fn test_input_without_trailing_newline() {
    assert_eq!(convert("- foo"), "<ul>\n<li>foo</ul>\n");
    assert_eq!(convert("#t"), "<h1>t</h1>\n");
}
