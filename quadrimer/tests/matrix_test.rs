use num_complex::Complex64;
use proptest::prelude::*;
use quadrimer::{Payload, QStateMatrix, QsError, TriangleMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn assert_close(actual: &[Complex64], expected: &[Complex64]) {
    assert_eq!(actual.len(), expected.len());
    for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).norm() < 1e-9,
            "entry {index}: {a} != {e} in {actual:?}"
        );
    }
}

fn real(values: &[f64]) -> Vec<Complex64> {
    values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

fn arbitrary_state() -> impl Strategy<Value = QStateMatrix> {
    (0usize..=3, 0usize..=3, 1usize..=7, any::<u64>()).prop_map(|(rows, cols, gens, seed)| {
        let mut rng = StdRng::seed_from_u64(seed);
        QStateMatrix::random(rows, cols, gens, &mut rng).unwrap()
    })
}

#[test]
fn unit_is_the_identity() {
    let unit = QStateMatrix::unit(1).unwrap();
    assert_close(&unit.dense(), &real(&[1.0, 0.0, 0.0, 1.0]));
    assert_eq!(unit.shape(), (1, 1));
    let unit2 = QStateMatrix::unit(2).unwrap();
    let dense = unit2.dense();
    for row in 0..4u64 {
        for col in 0..4u64 {
            let expected = if row == col { 1.0 } else { 0.0 };
            assert!((dense[(row << 2 | col) as usize].re - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn zero_and_basis_states() {
    let zero = QStateMatrix::zero(1, 2).unwrap();
    assert!(zero.is_zero());
    assert_close(&zero.dense(), &real(&[0.0; 8]));

    let ket = QStateMatrix::basis(3, 0, 0b101).unwrap();
    let dense = ket.dense();
    for index in 0..8 {
        let expected = if index == 0b101 { 1.0 } else { 0.0 };
        assert!((dense[index].re - expected).abs() < 1e-12);
    }
    assert!(QStateMatrix::basis(1, 1, 0).is_err());
    assert!(QStateMatrix::basis(2, 0, 4).is_err());
}

#[test]
fn shape_limit_is_enforced() {
    assert_eq!(
        QStateMatrix::zero(13, 0).unwrap_err(),
        QsError::TooLarge {
            rows: 13,
            cols: 0,
            max: 12
        }
    );
    assert!(QStateMatrix::unit(12).is_ok());
}

#[test]
fn from_generators_all_ones() {
    let ones = QStateMatrix::from_generators(
        1,
        1,
        &[0, 0b01, 0b10],
        TriangleMode::LowerTriangular,
    )
    .unwrap();
    assert_close(&ones.dense(), &real(&[1.0, 1.0, 1.0, 1.0]));
}

#[test]
fn from_generators_quadratic_block() {
    // one column qubit, 2 generator rows; Q[1][1] = 1 puts a factor i on
    // the w1 = 1 entry
    let n = 1;
    let data = [0u64, 0b01 | (1 << (n + 1))];
    let state =
        QStateMatrix::from_generators(0, 1, &data, TriangleMode::SymmetricRequired).unwrap();
    assert_close(
        &state.dense(),
        &[Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)],
    );
}

#[test]
fn from_generators_rejects_asymmetry() {
    // Q[0][1] set but Q[1][0] clear
    let data = [0b10_00u64, 0b00_01];
    let result = QStateMatrix::from_generators(0, 2, &data, TriangleMode::SymmetricRequired);
    assert!(matches!(result, Err(QsError::BadPayload(_))));
}

#[test]
fn dependent_generators_reduce_away() {
    // two equal generators double the amplitude
    let doubled =
        QStateMatrix::from_generators(0, 1, &[0, 1, 1], TriangleMode::LowerTriangular).unwrap();
    assert_close(&doubled.dense(), &real(&[2.0, 2.0]));

    // a generator equal to the offset spans the same support
    let shifted =
        QStateMatrix::from_generators(0, 1, &[1, 1], TriangleMode::LowerTriangular).unwrap();
    assert_close(&shifted.dense(), &real(&[1.0, 1.0]));
}

#[test]
fn payload_dispatch() {
    let unit = QStateMatrix::unit(1).unwrap();
    let copy = QStateMatrix::with_payload(2, 0, Payload::CopyOf(&unit)).unwrap();
    assert_eq!(copy.shape(), (2, 0));
    assert_close(&copy.dense(), &real(&[1.0, 0.0, 0.0, 1.0]));
    assert!(QStateMatrix::with_payload(1, 0, Payload::CopyOf(&unit)).is_err());
    assert!(QStateMatrix::with_payload(2, 2, Payload::Empty)
        .unwrap()
        .is_zero());
}

#[test]
fn entries_match_dense() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let state = QStateMatrix::random(2, 2, 5, &mut rng).unwrap();
        let dense = state.dense();
        for row in 0..4u64 {
            for col in 0..4u64 {
                let direct = state.entry(row, col);
                let expected = dense[((row << 2) | col) as usize];
                assert!((direct - expected).norm() < 1e-9);
            }
        }
    }
}

#[test]
fn conjugate_and_transpose_match_dense() {
    let mut rng = StdRng::seed_from_u64(11);
    let state = QStateMatrix::random(2, 1, 4, &mut rng).unwrap();
    let dense = state.dense();

    let conjugated = state.conjugate().dense();
    for (a, b) in conjugated.iter().zip(&dense) {
        assert!((a - b.conj()).norm() < 1e-12);
    }

    let transposed = state.transpose();
    assert_eq!(transposed.shape(), (1, 2));
    let transposed = transposed.dense();
    for row in 0..4u64 {
        for col in 0..2u64 {
            let original = dense[((row << 1) | col) as usize];
            let flipped = transposed[((col << 2) | row) as usize];
            assert!((original - flipped).norm() < 1e-12);
        }
    }

    let dagger = state.dagger().dense();
    for row in 0..4u64 {
        for col in 0..2u64 {
            let original = dense[((row << 1) | col) as usize];
            let flipped = dagger[((col << 2) | row) as usize];
            assert!((original - flipped.conj()).norm() < 1e-12);
        }
    }
}

#[test]
fn reshape_relabels_only() {
    let unit = QStateMatrix::unit(1).unwrap();
    let ket = unit.reshape(2, 0).unwrap();
    assert_eq!(ket.shape(), (2, 0));
    assert_close(&ket.dense(), &real(&[1.0, 0.0, 0.0, 1.0]));
    assert!(unit.reshape(2, 1).is_err());
}

#[test]
fn scale_by_representable_scalars() {
    let unit = QStateMatrix::unit(1).unwrap();
    assert_close(
        &unit.scale(Complex64::new(2.0, 0.0)).unwrap().dense(),
        &real(&[2.0, 0.0, 0.0, 2.0]),
    );
    let rotated = unit.scale(Complex64::new(0.0, -1.0)).unwrap();
    assert_close(
        &rotated.dense(),
        &[
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
        ],
    );
    assert!(unit.scale(Complex64::new(0.3, 0.0)).is_err());
    assert!(unit.scale(Complex64::new(0.0, 0.0)).unwrap().is_zero());
}

#[test]
fn scaling_the_zero_matrix_keeps_it_canonical() {
    let zero = QStateMatrix::zero(1, 2).unwrap();
    let scaled = zero.scale(Complex64::new(2.0, 0.0)).unwrap();
    assert!(scaled.is_zero());
    assert_eq!(scaled, zero);
    assert_eq!(scaled.canonical_key(), zero.canonical_key());
    let nulled = QStateMatrix::unit(2)
        .unwrap()
        .scale(Complex64::new(0.0, 0.0))
        .unwrap()
        .scale(Complex64::new(0.0, 1.0))
        .unwrap();
    assert_eq!(nulled.canonical_key(), QStateMatrix::zero(2, 2).unwrap().canonical_key());
}

#[test]
fn display_smoke() {
    let unit = QStateMatrix::unit(1).unwrap();
    let text = unit.to_string();
    assert!(text.contains("shape (1, 1)"));
    assert!(QStateMatrix::zero(0, 2).unwrap().to_string().contains("zero"));
}

proptest! {
    #[test]
    fn reduce_preserves_the_value(state in arbitrary_state()) {
        let mut reduced = state.clone();
        let rank = reduced.reduce();
        prop_assert!(reduced.is_reduced());
        prop_assert!(rank <= state.shape().0 + state.shape().1);
        let expected = state.dense();
        let actual = reduced.dense();
        for (a, e) in actual.iter().zip(&expected) {
            prop_assert!((a - e).norm() < 1e-9);
        }
    }

    #[test]
    fn equality_is_value_equality(state in arbitrary_state()) {
        prop_assert_eq!(&state, &state.reduced());
        prop_assert_eq!(state.canonical_key(), state.reduced().canonical_key());
        let doubled = state.scale(Complex64::new(2.0, 0.0)).unwrap();
        if !state.is_zero() {
            prop_assert_ne!(&state, &doubled);
        }
    }

    #[test]
    fn reduction_is_idempotent(state in arbitrary_state()) {
        let once = state.reduced();
        let twice = once.reduced();
        prop_assert_eq!(once.canonical_key(), twice.canonical_key());
    }

    #[test]
    fn conjugate_and_transpose_are_involutions(state in arbitrary_state()) {
        prop_assert_eq!(state.conjugate().conjugate(), state.clone());
        prop_assert_eq!(state.transpose().transpose(), state);
    }
}
