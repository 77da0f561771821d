// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Contiguous partition of an index range across worker threads.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Splits `0..num_elements` into `num_threads` contiguous ranges, one per
/// worker thread.
///
/// The ranges are yielded in increasing order, don't overlap, and their union
/// is exactly `0..num_elements`. Their lengths differ by at most one. When
/// there are fewer elements than threads, some ranges are empty.
#[derive(Clone, Debug)]
pub struct FixedRanges {
    /// Index of the next thread to hand a range to.
    id: usize,
    /// Total number of threads.
    num_threads: usize,
    /// Total number of elements.
    num_elements: usize,
}

impl FixedRanges {
    /// Creates a partition of `0..num_elements` across `num_threads` threads.
    pub fn new(num_threads: NonZeroUsize, num_elements: usize) -> Self {
        Self {
            id: 0,
            num_threads: num_threads.get(),
            num_elements,
        }
    }

    /// Returns the range owned by the given thread.
    fn range(&self, id: usize) -> Range<usize> {
        let start = split_point(id, self.num_elements, self.num_threads);
        let end = split_point(id + 1, self.num_elements, self.num_threads);
        start..end
    }
}

/// Computes `id * num_elements / num_threads` without overflowing, even for
/// buffers close to `usize::MAX` elements.
fn split_point(id: usize, num_elements: usize, num_threads: usize) -> usize {
    let point = (id as u128 * num_elements as u128) / num_threads as u128;
    // The quotient is at most `num_elements` because `id <= num_threads`.
    point as usize
}

impl Iterator for FixedRanges {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.id == self.num_threads {
            return None;
        }
        let range = self.range(self.id);
        self.id += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_threads - self.id;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FixedRanges {}
