use bitlin::Gf2Word;
use proptest::prelude::*;

#[test]
fn low_mask_widths() {
    assert_eq!(u64::low_mask(0), 0);
    assert_eq!(u64::low_mask(1), 1);
    assert_eq!(u64::low_mask(7), 0x7f);
    assert_eq!(u64::low_mask(64), u64::MAX);
    assert_eq!(u128::low_mask(128), u128::MAX);
}

#[test]
fn insert_then_remove_is_identity() {
    let word = 0b1011_0110u64;
    assert_eq!(word.insert_zeros(3, 2).remove_bits(3, 2), word);
    assert_eq!(word.insert_zeros(3, 2), 0b10_1100_0110);
}

#[test]
fn remove_bits_drops_the_window() {
    assert_eq!(0b1101_1010u64.remove_bits(2, 3), 0b1_1010);
    assert_eq!(0b1111u64.remove_bits(0, 4), 0);
}

#[test]
fn rotate_window_moves_bits_left() {
    // window [2, 6), rotate by 1: bit 2+p goes to 2+((p+1) mod 4)
    assert_eq!(0b00_0100u64.rotate_window(2, 4, 1), 0b00_1000);
    assert_eq!(0b10_0000u64.rotate_window(2, 4, 1), 0b00_0100);
    assert_eq!(0b01u64.rotate_window(2, 4, 3), 0b01);
}

#[test]
fn swap_bits_examples() {
    assert_eq!(0b01u32.swap_bits(0, 5), 0b100000);
    assert_eq!(0b100001u32.swap_bits(0, 5), 0b100001);
}

#[test]
fn bit_reads_every_width() {
    assert!(u16::MAX.bit(15));
    assert!(!(1u32 << 30).bit(31));
    assert!((1u64 << 63).bit(63));
    assert!((1u128 << 127).bit(127));
    assert!(!0u128.bit(0));
}

#[test]
fn set_bits_iterates_lowest_first() {
    let positions: Vec<usize> = 0b1010_0110u64.set_bits().collect();
    assert_eq!(positions, vec![1, 2, 5, 7]);
    assert_eq!(0u64.set_bits().count(), 0);
}

proptest! {
    #[test]
    fn parity_is_additive(left: u64, right: u64) {
        prop_assert_eq!((left ^ right).parity(), left.parity() != right.parity());
    }

    #[test]
    fn dot_is_symmetric(left: u128, right: u128) {
        prop_assert_eq!(left.dot(right), right.dot(left));
    }

    #[test]
    fn insert_remove_round_trip(word: u64, at in 0usize..32, count in 0usize..16) {
        let widened = (word as u128).insert_zeros(at, count);
        prop_assert_eq!(widened.remove_bits(at, count), word as u128);
        for offset in 0..count {
            prop_assert!(!widened.bit(at + offset));
        }
    }

    #[test]
    fn rotate_window_full_turn(word: u64, start in 0usize..16, len in 1usize..16) {
        prop_assert_eq!(word.rotate_window(start, len, len), word);
    }

    #[test]
    fn weight_counts_set_bits(word: u64) {
        prop_assert_eq!(word.weight(), word.set_bits().count());
    }
}
