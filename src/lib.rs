// drmd — Markdown dialect to HTML converter.
//
// Architecture:
//   source text → line analyzer → block parser → node arena tree → HTML renderer
//
// The parser borrows text runs straight out of the input buffer, so the whole
// tree is index-handles into one arena plus slices of the source; rendering
// walks it once into an owned output string.

mod error;
mod node;
mod parse;
mod render;
#[cfg(target_arch = "aarch64")]
mod simd;

pub use error::DrmdError;

#[cfg(feature = "tracing")]
use tracing::debug;

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

/// Convert a Markdown document to an HTML fragment.
///
/// The input is consumed byte-wise; the output is a fragment (no surrounding
/// `<html>`/`<body>`). Closing tags are omitted where HTML permits.
///
/// # Examples
///
/// ```
/// let html = drmd::to_html("# Hello\n").unwrap();
/// assert_eq!(html, "<h1>Hello</h1>\n");
/// ```
///
/// # Errors
///
/// [`DrmdError::OutOfMemory`] when an allocation fails or list nesting
/// exceeds the parser's bound; [`DrmdError::RecursionExceeded`] when the
/// tree is deeper than the renderer's cap.
pub fn to_html(input: &str) -> Result<String, DrmdError> {
    let mut arena = node::NodeArena::new();
    let root = arena.alloc(node::NodeKind::Document)?;
    parse::parse(&mut arena, input, root)?;
    debug!(input_bytes = input.len(), nodes = arena.len(), "parsed block tree");
    let html = render::render(&arena, root)?;
    debug!(output_bytes = html.len(), "rendered html");
    Ok(html)
}
