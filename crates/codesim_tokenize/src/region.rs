use serde::{Deserialize, Serialize};

/// A rectangular source region, 0-indexed.
///
/// `end_row`/`end_col` are exclusive on the column axis: a region covering the
/// first three characters of the first line is `{0, 0, 0, 3}`. Downstream
/// consumers that render 1-indexed coordinates add 1 to each bound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Region {
    pub fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Smallest region covering both `self` and `other`.
    pub fn merge(&self, other: &Region) -> Region {
        let (start_row, start_col) = if (self.start_row, self.start_col)
            <= (other.start_row, other.start_col)
        {
            (self.start_row, self.start_col)
        } else {
            (other.start_row, other.start_col)
        };
        let (end_row, end_col) = if (self.end_row, self.end_col) >= (other.end_row, other.end_col)
        {
            (self.end_row, self.end_col)
        } else {
            (other.end_row, other.end_col)
        };
        Region {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_takes_outermost_bounds() {
        let a = Region::new(0, 4, 2, 1);
        let b = Region::new(1, 0, 5, 9);
        let m = a.merge(&b);
        assert_eq!(m, Region::new(0, 4, 5, 9));
        // merge is symmetric
        assert_eq!(b.merge(&a), m);
    }

    #[test]
    fn merge_on_same_row_uses_columns() {
        let a = Region::new(3, 7, 3, 12);
        let b = Region::new(3, 2, 3, 9);
        assert_eq!(a.merge(&b), Region::new(3, 2, 3, 12));
    }
}
