//! Prime number source for constraint identities.

/// Hands out consecutive primes, starting at 2.
///
/// Owned by whoever builds a [`ConstraintCatalog`](crate::ConstraintCatalog);
/// two catalogs built from separate allocators therefore reuse the same small
/// primes, and [`reset`](Self::reset) restarts the sequence.
#[derive(Debug, Clone)]
pub struct PrimeAllocator {
    sieve: Vec<bool>,
    primes: Vec<u64>,
    next: usize,
}

const INITIAL_LIMIT: usize = 1 << 12;

impl PrimeAllocator {
    pub fn new() -> Self {
        let mut allocator = Self {
            sieve: Vec::new(),
            primes: Vec::new(),
            next: 0,
        };
        allocator.grow(INITIAL_LIMIT);
        allocator
    }

    /// Returns the next prime in ascending order.
    pub fn next_prime(&mut self) -> u64 {
        if self.next == self.primes.len() {
            let limit = self.sieve.len() * 2;
            self.grow(limit);
        }
        let prime = self.primes[self.next];
        self.next += 1;
        prime
    }

    /// Restarts the sequence at 2.
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Primes handed out since the last reset, ascending.
    pub fn allocated(&self) -> &[u64] {
        &self.primes[..self.next]
    }

    // Sieve of Eratosthenes over [0, limit).
    fn grow(&mut self, limit: usize) {
        let mut sieve = vec![true; limit];
        sieve[0] = false;
        sieve[1] = false;
        let mut i = 2;
        while i * i < limit {
            if sieve[i] {
                let mut j = i * i;
                while j < limit {
                    sieve[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        self.primes = sieve
            .iter()
            .enumerate()
            .filter_map(|(n, &is_prime)| is_prime.then_some(n as u64))
            .collect();
        self.sieve = sieve;
    }
}

impl Default for PrimeAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_at_two() {
        let mut primes = PrimeAllocator::new();
        let first: Vec<u64> = (0..8).map(|_| primes.next_prime()).collect();
        assert_eq!(first, vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert_eq!(primes.allocated(), &first[..]);
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut primes = PrimeAllocator::new();
        primes.next_prime();
        primes.next_prime();
        primes.reset();
        assert_eq!(primes.next_prime(), 2);
        assert_eq!(primes.allocated(), &[2]);
    }

    #[test]
    fn test_grows_past_initial_sieve() {
        let mut primes = PrimeAllocator::new();
        // 564 primes lie below 4096.
        let mut last = 0;
        for _ in 0..1000 {
            last = primes.next_prime();
        }
        assert_eq!(last, 7919);
    }
}
