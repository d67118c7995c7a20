/// Sequence numbers for ephemeris lookups. Only the response to the most
/// recently issued lookup is applied, older ones are stale.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryTracker {
    issued: u64,
}

impl QueryTracker {
    pub fn new() -> Self { Self::default() }

    /// Tags a new lookup.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn latest(&self) -> u64 { self.issued }

    pub fn is_latest(&self, seq: u64) -> bool { seq == self.issued }
}
