//! Fisher–Yates shuffle over a borrowed slice.

use rand::Rng;

/// Return the elements of `items` in uniformly random order.
///
/// Walks from the last index down to 1, swapping each element with one at a
/// uniformly chosen index at or below it. The input is never mutated; pass a
/// seeded RNG for a reproducible permutation.
pub fn shuffled<T: Clone>(items: &[T], rng: &mut impl Rng) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shuffled_is_a_permutation() {
        let input: Vec<u32> = (0..50).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let output = shuffled(&input, &mut rng);

        assert_eq!(output.len(), input.len());
        let mut sorted = output.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, input);
    }

    #[test]
    fn shuffled_does_not_mutate_input() {
        let input = vec!["a", "b", "c", "d"];
        let snapshot = input.clone();
        let mut rng = StdRng::seed_from_u64(1);
        let _ = shuffled(&input, &mut rng);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn shuffled_is_deterministic_for_a_seed() {
        let input: Vec<u32> = (0..10).collect();
        let a = shuffled(&input, &mut StdRng::seed_from_u64(42));
        let b = shuffled(&input, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffled_handles_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(shuffled::<u32>(&[], &mut rng), Vec::<u32>::new());
        assert_eq!(shuffled(&[9], &mut rng), vec![9]);
    }
}
