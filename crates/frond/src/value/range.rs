//! Lazily-computed integer ranges
//!
//! `a..b`, `a..<b`, `a..*n` and the right-unbounded `a..` all become a
//! [`RangeValue`]: begin, step, and a size. The index-to-value mapping is
//! `begin + step * index`, computed on demand; a range is never
//! materialized eagerly.

/// How many elements a range has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSize {
    /// Exactly this many elements
    Bounded(usize),
    /// Right-unbounded; iteration produces elements until the consumer
    /// stops
    Unbounded,
}

fn span_len(begin: i64, end: i64) -> usize {
    let span = (end as i128 - begin as i128).unsigned_abs();
    usize::try_from(span).unwrap_or(usize::MAX)
}

/// A lazy integer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeValue {
    begin: i64,
    step: i64,
    size: RangeSize,
}

impl RangeValue {
    /// `a..b`: inclusive on both ends, descending when `b < a`.
    pub fn inclusive(begin: i64, end: i64) -> Self {
        let step = if end >= begin { 1 } else { -1 };
        // i128: the span of two i64s does not fit in i64.
        let size = span_len(begin, end).saturating_add(1);
        RangeValue {
            begin,
            step,
            size: RangeSize::Bounded(size),
        }
    }

    /// `a..<b`: excludes the right end, descending when `b < a`; empty when
    /// `a == b`.
    pub fn exclusive(begin: i64, end: i64) -> Self {
        let step = if end >= begin { 1 } else { -1 };
        let size = span_len(begin, end);
        RangeValue {
            begin,
            step,
            size: RangeSize::Bounded(size),
        }
    }

    /// `a..*n`: `n` elements starting at `a`, counting downward when `n` is
    /// negative.
    pub fn with_length(begin: i64, length: i64) -> Self {
        RangeValue {
            begin,
            step: if length >= 0 { 1 } else { -1 },
            size: RangeSize::Bounded(length.unsigned_abs() as usize),
        }
    }

    /// `a..`: right-unbounded, ascending.
    pub fn unbounded(begin: i64) -> Self {
        RangeValue {
            begin,
            step: 1,
            size: RangeSize::Unbounded,
        }
    }

    /// First element of the range.
    pub fn begin(&self) -> i64 {
        self.begin
    }

    /// +1 or -1.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Element count, or `None` when right-unbounded.
    pub fn len(&self) -> Option<usize> {
        match self.size {
            RangeSize::Bounded(n) => Some(n),
            RangeSize::Unbounded => None,
        }
    }

    /// Whether the range has no elements.
    pub fn is_empty(&self) -> bool {
        self.size == RangeSize::Bounded(0)
    }

    /// Whether the range is right-unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.size == RangeSize::Unbounded
    }

    /// `begin + step * index`, or `None` when past the end.
    pub fn get(&self, index: usize) -> Option<i64> {
        match self.size {
            RangeSize::Bounded(n) if index >= n => None,
            _ => {
                let value = self.begin as i128 + self.step as i128 * index as i128;
                i64::try_from(value).ok()
            }
        }
    }

    /// Lazy iteration; infinite for unbounded ranges.
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            range: *self,
            next_index: 0,
        }
    }
}

/// Iterator over a [`RangeValue`].
#[derive(Debug, Clone)]
pub struct RangeIter {
    range: RangeValue,
    next_index: usize,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let value = self.range.get(self.next_index)?;
        self.next_index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.range.len() {
            Some(n) => {
                let rest = n.saturating_sub(self.next_index);
                (rest, Some(rest))
            }
            None => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_range() {
        let r = RangeValue::inclusive(0, 3);
        assert_eq!(r.len(), Some(4));
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exclusive_range() {
        let r = RangeValue::exclusive(0, 3);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(RangeValue::exclusive(2, 2).is_empty());
    }

    #[test]
    fn test_length_range() {
        let r = RangeValue::with_length(5, 3);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![5, 6, 7]);
    }

    #[test]
    fn test_descending_range() {
        let r = RangeValue::inclusive(3, 1);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_unbounded_range_is_lazy() {
        let r = RangeValue::unbounded(0);
        assert_eq!(r.len(), None);
        // Only as many elements as consumed are ever computed.
        let taken: Vec<_> = r.iter().take(5).collect();
        assert_eq!(taken, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_near_full_i64_span() {
        // The element count of a range over most of i64 only fits in
        // 128-bit arithmetic.
        let r = RangeValue::inclusive(i64::MIN + 1, i64::MAX);
        assert_eq!(r.len(), Some(usize::MAX));
        assert_eq!(r.get(0), Some(i64::MIN + 1));
        assert_eq!(r.get(usize::MAX - 1), Some(i64::MAX));
        assert_eq!(r.get(usize::MAX), None);

        let down = RangeValue::inclusive(i64::MAX, i64::MIN + 1);
        assert_eq!(down.get(0), Some(i64::MAX));
        assert_eq!(down.get(usize::MAX - 1), Some(i64::MIN + 1));
    }

    #[test]
    fn test_index_to_value_mapping() {
        let r = RangeValue::inclusive(10, 20);
        assert_eq!(r.get(0), Some(10));
        assert_eq!(r.get(10), Some(20));
        assert_eq!(r.get(11), None);
    }
}
