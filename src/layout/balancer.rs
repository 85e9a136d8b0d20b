/// Greedy column balancing for the masonry grid
///
/// Every item goes into whichever column is currently the shortest.
/// Ties go to the leftmost column, so the result only depends on the
/// input order and the starting heights.

/// Running per-column height accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBalancer {
    heights: Vec<f32>,
}

impl ColumnBalancer {
    /// Create a balancer with `columns` empty columns (at least one)
    pub fn new(columns: usize) -> Self {
        Self {
            heights: vec![0.0; columns.max(1)],
        }
    }

    /// Index of the shortest column (lowest index wins ties)
    pub fn shortest(&self) -> usize {
        let mut min_idx = 0;
        let mut min_height = self.heights[0];
        for (idx, &height) in self.heights.iter().enumerate().skip(1) {
            if height < min_height {
                min_height = height;
                min_idx = idx;
            }
        }
        min_idx
    }

    /// Place an item of the given extent and return the column it went to
    pub fn place(&mut self, extent: f32) -> usize {
        let idx = self.shortest();
        // NaN or negative extents would corrupt every later comparison
        let extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
        self.heights[idx] += extent;
        idx
    }

    pub fn column_count(&self) -> usize {
        self.heights.len()
    }

    pub fn into_heights(self) -> Vec<f32> {
        self.heights
    }
}

/// Result of balancing a list of items
#[derive(Debug, Clone, PartialEq)]
pub struct Columns<T> {
    /// Items per column, in placement order
    pub columns: Vec<Vec<T>>,
    /// Accumulated extent per column
    pub heights: Vec<f32>,
}

impl<T> Columns<T> {
    pub fn tallest(&self) -> f32 {
        self.heights.iter().copied().fold(0.0, f32::max)
    }
}

/// Distribute `items` over `columns` columns using the greedy shortest-column rule.
///
/// `extent` returns the vertical space an item occupies (estimated height plus
/// any spacing). A column count of zero is treated as one.
pub fn balance<T, I, F>(items: I, columns: usize, mut extent: F) -> Columns<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> f32,
{
    let mut balancer = ColumnBalancer::new(columns);
    let mut placed: Vec<Vec<T>> = (0..balancer.column_count()).map(|_| Vec::new()).collect();

    for item in items {
        let idx = balancer.place(extent(&item));
        placed[idx].push(item);
    }

    Columns {
        columns: placed,
        heights: balancer.into_heights(),
    }
}
