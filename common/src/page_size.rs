// Rows-per-page estimate from the space available to the job table

/// Derives how many job rows fit in the table body
#[derive(Debug, Clone)]
pub struct PageSizeEstimator {
    row_height: u16,
    reserved: u16,
    current: Option<usize>,
}

impl PageSizeEstimator {
    /// `row_height` is the estimated height of one row; `reserved` is the part
    /// of the viewport the table body cannot use
    pub fn new(row_height: u16, reserved: u16) -> Self {
        Self {
            row_height,
            reserved,
            current: None,
        }
    }

    /// rows = max(1, floor(container_height / row_height))
    pub fn rows_for(container_height: u16, row_height: u16) -> usize {
        if row_height == 0 {
            return 1;
        }
        usize::from(container_height / row_height).max(1)
    }

    /// Estimate for a full viewport height, minus the reserved chrome
    pub fn estimate(&self, viewport_height: u16) -> usize {
        Self::rows_for(viewport_height.saturating_sub(self.reserved), self.row_height)
    }

    /// Record a measurement; returns the new page size only when it changed.
    /// The first measurement (mount) always reports.
    pub fn observe(&mut self, viewport_height: u16) -> Option<usize> {
        let rows = self.estimate(viewport_height);
        if self.current == Some(rows) {
            return None;
        }

        tracing::debug!(
            viewport_height = viewport_height,
            page_size = rows,
            "Page size recomputed"
        );
        self.current = Some(rows);
        Some(rows)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }
}
