// Block-level parser.
//
// Consumes the source line by line, dispatching on the first non-whitespace
// byte, and emits a tree rooted at a synthetic document node. List nesting is
// tracked with a bounded stack of frames; paragraph, table, and quote lines
// extend a current container node instead. Malformed input never fails the
// parse — anything unrecognized degrades to a paragraph line.

pub(crate) mod line;

use arrayvec::ArrayVec;
use memchr::memchr;

use crate::error::DrmdError;
use crate::node::{NodeArena, NodeId, NodeKind};
use self::line::ParseLocation;

/// Most deeply nested list the parser will track.
const MAX_LIST_DEPTH: usize = 16;

/// The kind of block currently being extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    None,
    Para,
    Bullet,
    List,
    Table,
    Quote,
}

/// One level of the list-nesting stack.
struct ListFrame {
    /// The list container at this level.
    list: NodeId,
    /// The item currently receiving content.
    item: NodeId,
    /// Indentation of the marker lines at this level.
    indentation: usize,
    /// `Bullet` or `List`.
    state: BlockState,
}

impl ListFrame {
    /// Open a new list under `parent` and wrap it in a frame. `item` is
    /// overwritten as soon as the first item is appended.
    fn open(
        arena: &mut NodeArena<'_>,
        parent: NodeId,
        state: BlockState,
        indentation: usize,
    ) -> Result<Self, DrmdError> {
        let kind = if state == BlockState::Bullet {
            NodeKind::BulletList
        } else {
            NodeKind::OrderedList
        };
        let list = arena.append_node(parent, kind)?;
        Ok(Self {
            list,
            item: list,
            indentation,
            state,
        })
    }
}

fn push_frame(
    stack: &mut ArrayVec<ListFrame, MAX_LIST_DEPTH>,
    frame: ListFrame,
) -> Result<(), DrmdError> {
    stack.try_push(frame).map_err(|_| DrmdError::OutOfMemory)
}

/// Strip leading and trailing ASCII whitespace, including vertical tab and
/// form feed. `str::trim` is Unicode-aware and would strip more.
pub(crate) fn strip(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C'))
}

/// Parse `source` into block nodes attached to `parent`.
pub(crate) fn parse<'a>(
    arena: &mut NodeArena<'a>,
    source: &'a str,
    parent: NodeId,
) -> Result<(), DrmdError> {
    let mut loc = ParseLocation::new(source);
    let mut state = BlockState::None;
    let mut stack: ArrayVec<ListFrame, MAX_LIST_DEPTH> = ArrayVec::new();
    // Continuation container for Para/Table/Quote. Never read before one of
    // those states assigns it.
    let mut container = parent;
    let mut normal_indent: Option<usize> = None;

    while !loc.at_end() {
        loc.analyze_line();
        if loc.is_blank() {
            state = BlockState::None;
            stack.clear();
            loc.advance_row();
            continue;
        }
        // The first non-blank line fixes the paragraph indent for the rest
        // of the document.
        let normal_indent = *normal_indent.get_or_insert(loc.nspaces);

        let rest = loc.rest();
        let rb = rest.as_bytes();
        let (newstate, prefix_len) = match rb[0] {
            // "• " (U+2022)
            0xE2 => {
                if rb.starts_with(b"\xe2\x80\xa2 ") {
                    (BlockState::Bullet, 4)
                } else {
                    (BlockState::Para, 0)
                }
            }
            b'+' | b'-' | b'*' | b'o' => {
                if rb.get(1) == Some(&b' ') {
                    (BlockState::Bullet, 1)
                } else {
                    (BlockState::Para, 0)
                }
            }
            b'#' => {
                let level = rb.iter().take_while(|&&b| b == b'#').count();
                let heading = arena.append_node(parent, NodeKind::Heading)?;
                let node = arena.get_mut(heading);
                node.heading_level = level as u32;
                node.header = strip(&rest[level..]);
                loc.advance_row();
                state = BlockState::None;
                stack.clear();
                continue;
            }
            b'0'..=b'9' => {
                let digits = rb.iter().take_while(|b| b.is_ascii_digit()).count();
                if rb.get(digits) == Some(&b'.') {
                    (BlockState::List, digits + 1)
                } else {
                    (BlockState::Para, 0)
                }
            }
            b'`' if rb == b"```" => {
                let pre = arena.append_node(parent, NodeKind::Pre)?;
                loc.advance_row();
                // Raw-copy whole lines until the closing fence; an
                // unterminated fence consumes the rest of the input.
                while !loc.at_end() {
                    loc.analyze_line();
                    if loc.rest().as_bytes() == b"```" {
                        loc.advance_row();
                        state = BlockState::None;
                        stack.clear();
                        break;
                    }
                    arena.append_text(pre, loc.line())?;
                    loc.advance_row();
                }
                continue;
            }
            b'|' => (BlockState::Table, 0),
            b'>' => (BlockState::Quote, 0),
            _ => (BlockState::Para, 0),
        };

        if newstate == BlockState::Bullet || newstate == BlockState::List {
            if stack.is_empty() {
                let frame = ListFrame::open(arena, parent, newstate, loc.nspaces)?;
                push_frame(&mut stack, frame)?;
            } else {
                let si = stack.len() - 1;
                let top_indent = stack[si].indentation;
                if loc.nspaces > top_indent {
                    // Deeper marker: nest a new list under the current item.
                    let attach = stack[si].item;
                    let frame = ListFrame::open(arena, attach, newstate, loc.nspaces)?;
                    push_frame(&mut stack, frame)?;
                } else if loc.nspaces == top_indent {
                    if stack[si].state != newstate {
                        // Sibling list of the other marker kind.
                        let attach = if si > 0 { stack[si - 1].item } else { parent };
                        stack[si] = ListFrame::open(arena, attach, newstate, loc.nspaces)?;
                    }
                } else {
                    // Dedent: pop until a frame matches this indentation.
                    loop {
                        stack.pop();
                        if stack.is_empty() {
                            let frame = ListFrame::open(arena, parent, newstate, loc.nspaces)?;
                            push_frame(&mut stack, frame)?;
                            break;
                        }
                        let si = stack.len() - 1;
                        let indent = stack[si].indentation;
                        if indent > loc.nspaces {
                            continue;
                        }
                        if indent < loc.nspaces {
                            // No frame sits at this indentation; restart at
                            // the top level.
                            stack.clear();
                            let frame = ListFrame::open(arena, parent, newstate, loc.nspaces)?;
                            push_frame(&mut stack, frame)?;
                            break;
                        }
                        if stack[si].state != newstate {
                            let attach = if si > 0 { stack[si - 1].item } else { parent };
                            stack[si] = ListFrame::open(arena, attach, newstate, loc.nspaces)?;
                        }
                        break;
                    }
                }
            }
            let si = stack.len() - 1;
            let item = arena.append_node(stack[si].list, NodeKind::ListItem)?;
            stack[si].item = item;
            arena.append_text(item, strip(&rest[prefix_len..]))?;
            loc.advance_row();
            state = newstate;
            continue;
        }

        if newstate == BlockState::Table {
            if state != BlockState::Table {
                container = arena.append_node(parent, NodeKind::Table)?;
            }
            let row = arena.append_node(container, NodeKind::TableRow)?;
            // Split on '|', dropping the leading segment. The segment after
            // the last '|' is always a cell, even when empty.
            let cells = &rest[1..];
            let mut start = 0;
            loop {
                match memchr(b'|', &cells.as_bytes()[start..]) {
                    Some(i) => {
                        arena.append_text(row, strip(&cells[start..start + i]))?;
                        start += i + 1;
                    }
                    None => {
                        arena.append_text(row, strip(&cells[start..]))?;
                        break;
                    }
                }
            }
            loc.advance_row();
            state = BlockState::Table;
            stack.clear();
            continue;
        }

        if newstate == BlockState::Quote {
            if state != BlockState::Quote {
                container = arena.append_node(parent, NodeKind::Blockquote)?;
                stack.clear();
            }
            arena.append_text(container, strip(&loc.line()[1..]))?;
            loc.advance_row();
            state = BlockState::Quote;
            continue;
        }

        // Paragraph candidate. Inside a quote it extends the quote.
        if state == BlockState::Quote {
            arena.append_text(container, strip(rest))?;
            loc.advance_row();
            continue;
        }
        // While a list is open, a line off the paragraph indent is
        // continuation text for the current item.
        if let Some(frame) = stack.last() {
            if state != BlockState::Para
                && state != BlockState::Table
                && loc.nspaces != normal_indent
            {
                arena.append_text(frame.item, strip(rest))?;
                loc.advance_row();
                continue;
            }
        }
        if state != BlockState::Para {
            container = arena.append_node(parent, NodeKind::Paragraph)?;
        }
        arena.append_text(container, strip(rest))?;
        loc.advance_row();
        stack.clear();
        state = BlockState::Para;
    }
    Ok(())
}
