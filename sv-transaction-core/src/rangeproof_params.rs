use rand::Rng;

/// The range-proof sizing parameters chosen for one output's amount
/// (§4.3). Implementers must reproduce this bit-for-bit to stay
/// wire-compatible and to preserve the privacy properties of the chosen
/// digit/bit decomposition.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RangeProofParams {
    pub exponent: u32,
    pub min_bits: u32,
    pub min_value: u64,
}

/// Chooses `(exp, minBits, minValue)` for a value `v` (§4.3):
///
/// - `v == 0`: `exp` uniform in `[0, 5)`; `minBits = 32`, with a 10%
///   chance of adding a further `[0, 5)` on top.
/// - otherwise: let `k` be the number of trailing base-10 zeros of `v`;
///   pick `exp` uniform in `[⌊k/2⌋, k]`; let `v' = v / 10^exp`; the
///   required bit width is `v'`'s bit length (§9 open question: the
///   source's `countTrailingZeros` is a leading-zero scan of a 64-bit
///   integer, not a trailing-zero count); `minBits = max(32, bitsReq)`,
///   rounded up to the next multiple of 4 while it remains below 63.
///
/// `minValue` is always 0 — no output in this engine commits to a
/// non-zero floor.
pub fn select_params(value: u64, rng: &mut impl Rng) -> RangeProofParams {
    if value == 0 {
        let exponent = rng.gen_range(0..5);
        let mut min_bits = 32;
        if rng.gen_bool(0.1) {
            min_bits += rng.gen_range(0..5);
        }
        return RangeProofParams {
            exponent,
            min_bits,
            min_value: 0,
        };
    }

    let mut k = 0u32;
    let mut mantissa = value;
    while k < 18 && mantissa % 10 == 0 {
        mantissa /= 10;
        k += 1;
    }

    let low = k / 2;
    let high = k;
    let exponent = if low >= high {
        low
    } else {
        rng.gen_range(low..=high)
    };

    let v_prime = value / 10u64.pow(exponent);
    let bits_req = 64 - v_prime.leading_zeros();
    let mut min_bits = bits_req.max(32);
    while min_bits % 4 != 0 && min_bits < 63 {
        min_bits += 1;
    }

    RangeProofParams {
        exponent,
        min_bits,
        min_value: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn assert_bounds(p: RangeProofParams) {
        assert!(p.exponent <= 18);
        assert!((32..=64).contains(&p.min_bits));
        if p.min_bits < 63 {
            assert_eq!(p.min_bits % 4, 0);
        }
    }

    #[test]
    fn bounds_hold_for_many_values() {
        let mut rng = OsRng;
        for v in [0u64, 1, 7, 10, 100, 1_000, 999, 123_456, 10_000_000_000, u64::MAX] {
            for _ in 0..20 {
                assert_bounds(select_params(v, &mut rng));
            }
        }
    }

    #[test]
    fn zero_value_has_min_bits_at_least_32() {
        let mut rng = OsRng;
        let p = select_params(0, &mut rng);
        assert!(p.min_bits >= 32);
        assert_eq!(p.min_value, 0);
    }

    #[test]
    fn power_of_ten_picks_exponent_within_k_range() {
        let mut rng = OsRng;
        // 1_000_000 = 10^6, so k = 6, exp in [3, 6].
        for _ in 0..50 {
            let p = select_params(1_000_000, &mut rng);
            assert!((3..=6).contains(&p.exponent));
        }
    }

    #[test]
    fn non_divisible_value_has_exponent_zero() {
        let mut rng = OsRng;
        let p = select_params(7, &mut rng);
        assert_eq!(p.exponent, 0);
    }

    proptest::proptest! {
        #[test]
        fn bounds_hold_for_arbitrary_values(value: u64) {
            let mut rng = OsRng;
            assert_bounds(select_params(value, &mut rng));
        }
    }
}
