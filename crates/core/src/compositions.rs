//! Ascending integer composition generation.
//!
//! Implements the Kelleher ascending-composition algorithm ("Encoding
//! partitions as ascending compositions", 2006, ch. 3-4): all interpart
//! restricted compositions of `n` with first part >= `m`, produced in
//! lexicographic order in constant amortised time per composition. The
//! restriction function `sigma` selects the family: `sigma(x) = 1` yields
//! strict compositions, `sigma(x) = x` yields partitions. Group
//! randomization always uses the composition variant; the partition variant
//! is kept because the restriction is a one-line difference and it keeps the
//! generator honest under test.

/// Interpart restriction function for the ascending generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Restriction {
    /// `sigma(x) = 1`: ordered compositions.
    Compositions,
    /// `sigma(x) = x`: unordered partitions (ascending part order).
    Partitions,
}

impl Restriction {
    fn sigma(self, x: usize) -> usize {
        match self {
            Self::Compositions => 1,
            Self::Partitions => x,
        }
    }
}

/// Lazy stream of ascending compositions of `n` with first part >= `m`.
///
/// Each call to [`AscendingCompositions::new`] starts an independent stream,
/// so concurrent callers never share generator state. The stream is empty
/// when `n == 0`, `m == 0`, or `m > n`.
#[derive(Clone, Debug)]
pub struct AscendingCompositions {
    a: Vec<usize>,
    k: usize,
    restriction: Restriction,
}

impl AscendingCompositions {
    pub fn new(n: usize, m: usize, restriction: Restriction) -> Self {
        if n == 0 || m == 0 || m > n {
            return Self { a: Vec::new(), k: 0, restriction };
        }

        let mut a = vec![0; n + 1];
        a[0] = m - 1;
        a[1] = n - m + 1;
        Self { a, k: 1, restriction }
    }
}

impl Iterator for AscendingCompositions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.k == 0 {
            return None;
        }

        let mut x = self.a[self.k - 1] + 1;
        let mut y = self.a[self.k] - 1;
        self.k -= 1;

        while self.restriction.sigma(x) <= y {
            self.a[self.k] = x;
            x = self.restriction.sigma(x);
            y -= x;
            self.k += 1;
        }

        // The final composition of the stream lands here with k == 0, which
        // terminates the iterator on the following call.
        self.a[self.k] = x + y;
        Some(self.a[..=self.k].to_vec())
    }
}

/// All compositions of `n` whose parts each lie within
/// `[min_value, max_value]`, in lexicographic order.
///
/// Edge-case policy:
/// - `n == 0` yields a single empty composition (the grouping driver rejects
///   empty pools before this can matter);
/// - `0 < n < min_value` yields exactly `[n]`: a pool smaller than the
///   minimum group size becomes one undersized group rather than an error.
pub fn bounded_compositions(
    n: usize,
    min_value: usize,
    max_value: usize,
) -> impl Iterator<Item = Vec<usize>> {
    let degenerate = match n {
        0 => Some(Vec::new()),
        _ if n < min_value => Some(vec![n]),
        _ => None,
    };

    let raw = if degenerate.is_none() {
        Some(AscendingCompositions::new(n, 1, Restriction::Compositions))
    } else {
        None
    };

    degenerate.into_iter().chain(
        raw.into_iter()
            .flatten()
            .filter(move |parts| parts.iter().all(|&part| part >= min_value && part <= max_value)),
    )
}
