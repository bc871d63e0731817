/// Errors that can occur during Markdown-to-HTML conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DrmdError {
    /// An allocation failed, or the list nesting stack overflowed.
    #[error("out of memory")]
    OutOfMemory,
    /// The node tree is deeper than the renderer's recursion cap.
    #[error("node tree exceeds the maximum render depth")]
    RecursionExceeded,
}
