/// Mixed-radix counter over the option indices of each class.
///
/// Digit `i` ranges over `0..radices[i]`; the last digit varies fastest.
/// The counter starts at all zeroes, which is itself a combination, so
/// callers check the current digits before the first `advance`.
#[derive(Debug, Clone)]
pub struct Odometer {
    radices: Vec<usize>,
    digits: Vec<usize>,
}

impl Odometer {
    /// Every radix must be at least 1.
    pub fn new(radices: Vec<usize>) -> Self {
        debug_assert!(radices.iter().all(|&r| r > 0), "radix of zero");
        let digits = vec![0; radices.len()];
        Self { radices, digits }
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    pub fn radices(&self) -> &[usize] {
        &self.radices
    }

    /// Number of combinations the counter walks through, or `None` when the
    /// product overflows.
    pub fn total(&self) -> Option<u128> {
        self.radices
            .iter()
            .try_fold(1u128, |acc, &r| acc.checked_mul(r as u128))
    }

    /// Steps to the next combination.
    ///
    /// Returns `false` once the carry runs off the first digit; the digits
    /// are then back at all zeroes.
    pub fn advance(&mut self) -> bool {
        for i in (0..self.digits.len()).rev() {
            self.digits[i] += 1;
            if self.digits[i] < self.radices[i] {
                return true;
            }
            self.digits[i] = 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn walk(radices: Vec<usize>) -> Vec<Vec<usize>> {
        let mut odometer = Odometer::new(radices);
        let mut seen = Vec::new();
        loop {
            seen.push(odometer.digits().to_vec());
            if !odometer.advance() {
                break;
            }
        }
        seen
    }

    #[test]
    fn test_last_digit_varies_fastest() {
        assert_eq!(
            walk(vec![2, 3]),
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn test_visits_product_of_radices_exactly_once() {
        let radices = vec![3, 1, 4, 2];
        let seen = walk(radices.clone());
        assert_eq!(seen.len(), 24);

        let distinct: HashSet<_> = seen.iter().cloned().collect();
        assert_eq!(distinct.len(), 24);
        for digits in &seen {
            for (d, r) in digits.iter().zip(&radices) {
                assert!(d < r);
            }
        }
    }

    #[test]
    fn test_single_digit() {
        assert_eq!(walk(vec![3]), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_all_radices_one_yields_single_combination() {
        assert_eq!(walk(vec![1, 1, 1]), vec![vec![0, 0, 0]]);
    }

    #[test]
    fn test_exhaustion_resets_digits() {
        let mut odometer = Odometer::new(vec![2, 2]);
        while odometer.advance() {}
        assert_eq!(odometer.digits(), &[0, 0]);
    }

    #[test]
    fn test_total() {
        assert_eq!(Odometer::new(vec![4, 4, 5, 4]).total(), Some(320));
        assert_eq!(Odometer::new(vec![usize::MAX; 3]).total(), None);
    }
}
