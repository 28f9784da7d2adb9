//! Maps the linear selection of the text field onto rendered digit cells.
//!
//! In currency mode the integer part is right-aligned inside its cells, so a
//! value `12.5` in a `####.##` mask renders as `__12 5_` and every linear
//! position has to be shifted by the padding.

use crate::pattern::Pattern;
use crate::utils::TextField;

/// Side of the cell where the caret bar is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaretEdge {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    pub cell: usize,
    pub edge: CaretEdge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    /// Character shown in each digit cell, `None` for padding.
    pub cells: Vec<Option<char>>,
    pub caret: Caret,
    /// Cells of right-alignment padding. Negative when the integer part is
    /// wider than its zone.
    pub pad: isize,
}

impl Projection {
    /// Whether display cell `idx` lies inside a non-collapsed selection.
    pub fn is_selected(&self, idx: usize, field: &TextField) -> bool {
        if field.is_collapsed() {
            return false;
        }
        let linear = idx as isize - self.pad;
        linear >= field.selection_start as isize
            && linear < field.selection_end as isize
            && matches!(self.cells.get(idx), Some(Some(_)))
    }

    pub fn cell(&self, idx: usize) -> Option<char> {
        self.cells.get(idx).copied().flatten()
    }
}

/// Length of the euros part: everything before the separator.
pub fn integer_len(value: &str) -> usize {
    value.find('.').unwrap_or(value.len())
}

pub fn project(pattern: &Pattern, currency: bool, field: &TextField) -> Projection {
    if currency {
        project_currency(pattern, field)
    } else {
        project_plain(pattern, field)
    }
}

fn project_plain(pattern: &Pattern, field: &TextField) -> Projection {
    let max = pattern.max_width();
    let caret = if field.value.is_empty() {
        Caret {
            cell: 0,
            edge: CaretEdge::Right,
        }
    } else if field.selection_start >= max {
        Caret {
            cell: max.saturating_sub(1),
            edge: CaretEdge::Right,
        }
    } else {
        Caret {
            cell: field.selection_start,
            edge: CaretEdge::Left,
        }
    };
    Projection {
        cells: field.value.chars().map(Some).collect(),
        caret,
        pad: 0,
    }
}

fn project_currency(pattern: &Pattern, field: &TextField) -> Projection {
    let integer_width = pattern.integer_width() as isize;
    let max = pattern.max_width() as isize;
    let ilen = integer_len(&field.value);
    let pad = integer_width - ilen as isize;

    let mut cells: Vec<Option<char>> = vec![None; pad.max(0) as usize];
    cells.extend(field.value.replacen('.', "", 1).chars().map(Some));

    if field.value.is_empty() {
        return Projection {
            cells,
            caret: Caret {
                cell: 0,
                edge: CaretEdge::Right,
            },
            pad,
        };
    }

    let start = field.selection_start;
    let (cell, edge) = if start <= ilen {
        let cell = integer_width - (ilen - start) as isize - 1;
        if start == 0 && ilen != 0 {
            (cell + 1, CaretEdge::Left)
        } else {
            (cell, CaretEdge::Right)
        }
    } else {
        let cell = integer_width + (start - ilen) as isize - 1;
        if cell == max {
            (cell - 1, CaretEdge::Right)
        } else {
            (cell, CaretEdge::Left)
        }
    };

    Projection {
        cells,
        caret: Caret {
            cell: cell.clamp(0, (max - 1).max(0)) as usize,
            edge,
        },
        pad,
    }
}

/// Linear caret position for a click on display cell `cell`.
pub fn cell_to_caret(pattern: &Pattern, currency: bool, field: &TextField, cell: usize) -> usize {
    let caret = if currency {
        let pad = pattern.integer_width() as isize - integer_len(&field.value) as isize;
        let cell = cell as isize;
        if cell >= pad { (cell - pad + 1) as usize } else { 0 }
    } else {
        cell
    };
    caret.min(field.len())
}
