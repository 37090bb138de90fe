use framedefer::DeferCounter;

/// A list whose rows become visible one threshold at a time.
///
/// Row `i` is gated on `has_reached(i * stagger)`, so the first row shows on
/// the very first frame.
#[derive(Debug)]
pub struct Reveal {
    rows: Vec<String>,
    stagger: u32,
    shown: usize,
}

impl Reveal {
    pub fn new(rows: Vec<String>, stagger: u32) -> Self {
        Self { rows, stagger, shown: 0 }
    }

    pub fn threshold(&self, index: usize) -> i64 {
        index as i64 * i64::from(self.stagger)
    }

    /// Frames the counter must reach before the last row shows.
    pub fn frames_needed(&self) -> i64 {
        self.rows.len().checked_sub(1).map_or(0, |last| self.threshold(last))
    }

    /// Reveals every row whose threshold the counter has reached and returns
    /// the rows that became visible on this call.
    pub fn advance(&mut self, counter: &DeferCounter) -> &[String] {
        let start = self.shown;
        while self.shown < self.rows.len() && counter.has_reached(self.threshold(self.shown)) {
            self.shown += 1;
        }
        &self.rows[start..self.shown]
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_complete(&self) -> bool {
        self.shown == self.rows.len()
    }
}
