use bitlin::{Echelon, Gf2Word};
use proptest::prelude::*;

#[test]
fn empty_input_has_rank_zero() {
    let echelon = Echelon::<u64>::new(&[], 8);
    assert_eq!(echelon.rank(), 0);
    assert!(echelon.contains(0));
    assert!(!echelon.contains(1));
}

#[test]
fn identity_rows_solve_directly() {
    let rows = [0b001u32, 0b010, 0b100];
    let echelon = Echelon::new(&rows, 3);
    assert_eq!(echelon.rank(), 3);
    assert_eq!(echelon.pivots(), &[0, 1, 2]);
    assert_eq!(echelon.solve(0b101), Some(0b101));
    assert_eq!(echelon.solve(0b111), Some(0b111));
}

#[test]
fn dependent_rows_are_dropped() {
    let rows = [0b0111u64, 0b1011, 0b1100];
    let echelon = Echelon::new(&rows, 4);
    assert_eq!(echelon.rank(), 2);
    assert!(echelon.contains(0b1100));
    assert!(!echelon.contains(0b0001));
}

#[test]
fn width_masks_stray_bits() {
    let echelon = Echelon::new(&[0b1_0001u64], 4);
    assert_eq!(echelon.rank(), 1);
    assert!(echelon.contains(0b0001));
    assert!(echelon.contains(0b1_0001));
}

fn xor_of_selected(rows: &[u64], combination: u64) -> u64 {
    combination
        .set_bits()
        .fold(0, |acc, index| acc ^ rows[index])
}

proptest! {
    #[test]
    fn solve_recovers_a_valid_combination(
        rows in proptest::collection::vec(any::<u64>(), 0..12),
        selector: u16,
    ) {
        let echelon = Echelon::new(&rows, 64);
        let target = xor_of_selected(&rows, (selector as u64) & u64::low_mask(rows.len()));
        let combination = echelon.solve(target);
        prop_assert!(combination.is_some());
        if let Some(combination) = combination {
            prop_assert_eq!(xor_of_selected(&rows, combination), target);
        }
    }

    #[test]
    fn rank_never_exceeds_row_count(
        rows in proptest::collection::vec(any::<u32>(), 0..20),
    ) {
        let echelon = Echelon::new(&rows, 32);
        prop_assert!(echelon.rank() <= rows.len());
        prop_assert!(echelon.rank() <= 32);
    }

    #[test]
    fn pivots_strictly_increase(
        rows in proptest::collection::vec(any::<u64>(), 0..16),
    ) {
        let echelon = Echelon::new(&rows, 64);
        let pivots = echelon.pivots();
        for pair in pivots.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
