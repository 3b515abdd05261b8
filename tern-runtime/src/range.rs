//! Half-open integer ranges as generated code iterates them

use crate::integer::Integer;

/// Cursor over `start..end`.
///
/// Yields `current` and steps it by one (wrapping) until it equals `end`. A
/// range whose `start` is past its `end` therefore wraps around the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<T> {
    pub start: T,
    pub end: T,
    pub current: T,
}

impl<T: Integer> Range<T> {
    pub fn new(start: T, end: T) -> Self {
        Self {
            start,
            end,
            current: start,
        }
    }
}

impl<T: Integer> Iterator for Range<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.current == self.end {
            return None;
        }
        let value = self.current;
        self.current = self.current.wrapping_add(T::ONE);
        Some(value)
    }
}
