use memchr::memchr_iter;

/// Maps absolute byte offsets to `(lineno, column)` pairs the way Ripper
/// reports them: lines are 1-based, columns are 0-based byte counts.
///
/// Built once per source; lookups are a binary search over line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Strictly increasing line-start offsets. The first entry is `0`; the
    /// last entry equals the source length, so offsets at or past the final
    /// newline still resolve.
    offsets: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &[u8]) -> Self {
        let mut offsets = Vec::with_capacity(16);
        offsets.push(0);
        for pos in memchr_iter(b'\n', source) {
            offsets.push(pos + 1);
        }
        if *offsets.last().unwrap() != source.len() {
            offsets.push(source.len());
        }
        Self { offsets }
    }

    /// Returns the 1-based line and 0-based byte column of `offset`.
    ///
    /// The line number is the index of the first line start strictly greater
    /// than `offset`; the empty source maps offset `0` to `(1, 0)`.
    #[inline]
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let lineno = self.offsets.partition_point(|&start| start <= offset);
        (lineno, offset - self.offsets[lineno - 1])
    }
}
