// Block tree → HTML serializer.
//
// A recursive walk dispatched by node kind, appending to one output string.
// Closing tags are omitted wherever HTML permits, so the output is a compact
// fragment rather than a pretty-printed document. Recursion depth is capped;
// a deeper tree is a render-time error, not a stack overflow.

pub(crate) mod escape;

use std::fmt::Write as _;

use crate::error::DrmdError;
use crate::node::{Node, NodeArena, NodeId, NodeKind};
use self::escape::append_escaped;

/// Hard cap on the render walk's depth.
const MAX_NODE_DEPTH: usize = 20;

/// Output estimate per node, used to pre-reserve the builder.
const RESERVE_PER_NODE: usize = 120;

/// Serialize the tree under `root` to an HTML fragment.
pub(crate) fn render(arena: &NodeArena<'_>, root: NodeId) -> Result<String, DrmdError> {
    let mut out = String::new();
    out.try_reserve(arena.len() * RESERVE_PER_NODE)
        .map_err(|_| DrmdError::OutOfMemory)?;
    render_node(arena, &mut out, root, 0)?;
    Ok(out)
}

fn render_node(
    arena: &NodeArena<'_>,
    out: &mut String,
    id: NodeId,
    depth: usize,
) -> Result<(), DrmdError> {
    if depth > MAX_NODE_DEPTH {
        return Err(DrmdError::RecursionExceeded);
    }
    let node = arena.get(id);
    let depth = depth + 1;
    match node.kind {
        NodeKind::Document => render_children(arena, out, node, depth),
        NodeKind::Text => append_escaped(out, node.header),
        NodeKind::Paragraph => render_paragraph(arena, out, node, depth),
        NodeKind::Heading => render_heading(out, node),
        NodeKind::Blockquote => render_blockquote(arena, out, node, depth),
        NodeKind::Pre => render_pre(arena, out, node, depth),
        NodeKind::BulletList => render_list(arena, out, node, depth, "<ul>\n", "</ul>\n"),
        NodeKind::OrderedList => render_list(arena, out, node, depth, "<ol>\n", "</ol>\n"),
        NodeKind::ListItem => render_list_item(arena, out, node, depth),
        NodeKind::Table => render_table(arena, out, node, depth),
        NodeKind::TableRow => render_table_row(arena, out, node, depth),
    }
}

fn render_children(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
) -> Result<(), DrmdError> {
    for &child in &node.children {
        render_node(arena, out, child, depth)?;
    }
    Ok(())
}

fn render_paragraph(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
) -> Result<(), DrmdError> {
    out.push_str("<p>");
    for (i, &child) in node.children.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_node(arena, out, child, depth)?;
    }
    // closing </p> is not needed
    Ok(())
}

fn render_heading(out: &mut String, node: &Node<'_>) -> Result<(), DrmdError> {
    let level = node.heading_level;
    let _ = write!(out, "<h{level}>");
    append_escaped(out, node.header)?;
    let _ = write!(out, "</h{level}>\n");
    Ok(())
}

fn render_blockquote(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
) -> Result<(), DrmdError> {
    out.push_str("<blockquote>\n");
    for (i, &child) in node.children.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_node(arena, out, child, depth)?;
    }
    out.push_str("</blockquote>\n");
    Ok(())
}

fn render_pre(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
) -> Result<(), DrmdError> {
    out.push_str("<pre>");
    for &child in &node.children {
        render_node(arena, out, child, depth)?;
        out.push('\n');
    }
    out.push_str("</pre>\n");
    Ok(())
}

fn render_list(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
    open: &str,
    close: &str,
) -> Result<(), DrmdError> {
    out.push_str(open);
    render_children(arena, out, node, depth)?;
    out.push_str(close);
    Ok(())
}

fn render_list_item(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
) -> Result<(), DrmdError> {
    out.push_str("<li>");
    for (i, &child) in node.children.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        render_node(arena, out, child, depth)?;
    }
    // closing </li> is not needed
    Ok(())
}

fn render_table(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
) -> Result<(), DrmdError> {
    out.push_str("<table>\n<thead>\n");
    // The first row is rendered inline so its cells become <th>.
    if let Some(&header) = node.children.first() {
        out.push_str("<tr>\n");
        for &cell in &arena.get(header).children {
            out.push_str("<th>");
            render_node(arena, out, cell, depth)?;
        }
    }
    out.push_str("\n<tbody>\n");
    for &row in node.children.iter().skip(1) {
        render_node(arena, out, row, depth)?;
    }
    out.push_str("</table>\n");
    Ok(())
}

fn render_table_row(
    arena: &NodeArena<'_>,
    out: &mut String,
    node: &Node<'_>,
    depth: usize,
) -> Result<(), DrmdError> {
    out.push_str("<tr>");
    for &cell in &node.children {
        out.push_str("<td>");
        render_node(arena, out, cell, depth)?;
    }
    // closing </td>/</tr> are not needed
    Ok(())
}
