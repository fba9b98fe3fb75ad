//! ASCII-art rendering of a tree's shape.
//!
//! ```text
//!   _B2__
//!  /     \
//! R1    R3
//! ```
//!
//! Labels of depth `d` go on line `2d`, ordered left to right by the in-order
//! sequence. A node is joined to its children by `_` runs on its own line and
//! by `/` or `\` on the next line, above each child's label.
use alloc::{string::String, vec, vec::Vec};
use core::{fmt, fmt::Write, ops::Range};

use super::worklist::WorkList;
use crate::raw::{
    node::{IsRightChild, Link},
    Discipline,
};

/// A node's label and position.
struct Cell {
    label: Vec<char>,
    depth: usize,
    /// Indices into the cell list
    children: [Option<usize>; 2],
    /// The width of the node's whole subtree
    span: usize,
    /// The column of the label's first character
    x: usize,
}

impl Cell {
    /// The label plus one column of spacing.
    #[inline]
    fn width(&self) -> usize {
        self.label.len() + 1
    }

    #[inline]
    fn centre(&self) -> usize {
        self.x + self.label.len() / 2
    }
}

/// The character grid of one rendering.
struct Canvas {
    rows: Vec<Vec<char>>,
}

impl Canvas {
    fn new(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![' '; width]; height],
        }
    }

    fn put(&mut self, row: usize, col: usize, ch: char) {
        self.rows[row][col] = ch;
    }

    fn fill(&mut self, row: usize, cols: Range<usize>, ch: char) {
        for col in cols {
            self.put(row, col, ch);
        }
    }

    fn put_str(&mut self, row: usize, col: usize, label: &[char]) {
        self.rows[row][col..col + label.len()].copy_from_slice(label);
    }

    fn finish(self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let end = row.iter().rposition(|&ch| ch != ' ').map_or(0, |i| i + 1);
            out.extend(&row[..end]);
        }
        out
    }
}

/// Render the tree rooted by `root`. An empty tree renders as an empty
/// string.
///
/// # Safety
///
///  - `root` must be a valid tree.
pub unsafe fn render<K: fmt::Debug, D: Discipline>(root: Link<K, D::Meta>) -> String {
    // Safety: Upheld by the caller
    let cells = unsafe { layout::<K, D>(root) };
    let Some(root_cell) = cells.first() else {
        return String::new();
    };

    let max_depth = cells.iter().map(|cell| cell.depth).max().unwrap_or(0);
    let mut canvas = Canvas::new(2 * max_depth + 1, root_cell.span);

    for cell in cells.iter() {
        let row = 2 * cell.depth;
        canvas.put_str(row, cell.x, &cell.label);

        if let Some(left) = cell.children[0] {
            let centre = cells[left].centre();
            canvas.fill(row, centre + 1..cell.x, '_');
            canvas.put(row + 1, centre, '/');
        }
        if let Some(right) = cell.children[1] {
            let centre = cells[right].centre();
            canvas.fill(row, cell.x + cell.label.len()..centre, '_');
            canvas.put(row + 1, centre, '\\');
        }
    }

    canvas.finish()
}

/// Compute every node's label and column. The returned cells are in
/// pre-order, so `cells[0]` is the root and every parent precedes its
/// children.
unsafe fn layout<K: fmt::Debug, D: Discipline>(root: Link<K, D::Meta>) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();
    let mut pending = WorkList::new();
    if let Some(root) = root {
        pending.push((root, 0usize, None::<(usize, IsRightChild)>));
    }

    while let Some((node, depth, parent)) = pending.pop() {
        // Safety: `root` is a valid tree, and so is every node reached from it
        let node = unsafe { node.as_ref() };
        let index = cells.len();

        let mut label = String::new();
        let _ = write!(label, "{}{:?}", D::tag(node.meta()), node.key);

        cells.push(Cell {
            label: label.chars().collect(),
            depth,
            children: [None; 2],
            span: 0,
            x: 0,
        });
        if let Some((parent, side)) = parent {
            cells[parent].children[side as usize] = Some(index);
        }

        for side in [true, false] {
            if let Some(child) = node.child(side) {
                pending.push((child, depth + 1, Some((index, side))));
            }
        }
    }

    // Subtree widths, bottom-up
    for i in (0..cells.len()).rev() {
        let span = cells[i].width()
            + cells[i]
                .children
                .iter()
                .flatten()
                .map(|&child| cells[child].span)
                .sum::<usize>();
        cells[i].span = span;
    }

    // Columns, top-down. A subtree occupies `offsets[i]..offsets[i] + span`.
    let mut offsets = vec![0; cells.len()];
    for i in 0..cells.len() {
        let [left, right] = cells[i].children;
        let x = offsets[i] + left.map_or(0, |left| cells[left].span);
        cells[i].x = x;
        if let Some(left) = left {
            offsets[left] = offsets[i];
        }
        if let Some(right) = right {
            offsets[right] = x + cells[i].width();
        }
    }

    cells
}
