//! Indented text rendering of a merge tree.
//!
//! ```text
//! -
//!  Slashdot
//!  -
//!   Boing Boing
//!   Gizmodo
//! ```
//!
//! Internal nodes print as `-`, leaves as their label (or id when no label
//! covers them). Each level adds one space of indent. Traversal uses an
//! explicit stack, so trees of depth `n - 1` render without recursion.

use core::fmt::{self, Write};

use crate::cluster::ClusterNode;

/// Write `root` as indented text, one node per line.
pub fn write_tree<W: Write, S: AsRef<str>>(
    out: &mut W,
    root: &ClusterNode,
    labels: Option<&[S]>,
) -> fmt::Result {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, indent)) = stack.pop() {
        for _ in 0..indent {
            out.write_char(' ')?;
        }
        match node.children() {
            Some((l, r)) => {
                out.write_str("-\n")?;
                stack.push((r, indent + 1));
                stack.push((l, indent + 1));
            }
            None => {
                let label = node
                    .leaf_index()
                    .and_then(|i| labels.and_then(|ls| ls.get(i)));
                match label {
                    Some(label) => writeln!(out, "{}", label.as_ref())?,
                    None => writeln!(out, "{}", node.id())?,
                }
            }
        }
    }
    Ok(())
}

/// Render `root` as indented text.
pub fn render_text<S: AsRef<str>>(root: &ClusterNode, labels: Option<&[S]>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_tree(&mut out, root, labels);
    out
}
