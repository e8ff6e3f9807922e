use crate::error::{Error, Result};
use k256::elliptic_curve::Field;
use k256::Scalar as K256Scalar;
use sv_crypto_keys::Scalar;

/// Decodes a facade `Scalar` into the underlying curve-arithmetic type.
///
/// `Scalar::inner()` is private to `sv-crypto-keys`, so this crate decodes
/// independently from the same canonical big-endian encoding whenever it
/// needs to multiply a `CurvePoint` directly (key images, commitments,
/// range proofs, MLSAG) rather than going through the facade's named
/// operations.
pub fn to_k256(s: &Scalar) -> Result<K256Scalar> {
    let repr: k256::FieldBytes = (*s.as_bytes()).into();
    Option::from(K256Scalar::from_repr(repr)).ok_or(Error::Keys(sv_crypto_keys::Error::InvalidScalar))
}

pub fn k256_to_scalar(value: K256Scalar) -> Result<Scalar> {
    if bool::from(Field::is_zero(&value)) {
        return Err(Error::Keys(sv_crypto_keys::Error::InvalidScalar));
    }
    let bytes: [u8; 32] = value.to_bytes().into();
    Ok(Scalar::from_canonical_bytes(bytes)?)
}

/// Widens a per-bit scale factor (`2^i * 10^exponent`, up to ~2^127) into a
/// curve scalar, without narrowing through `u64` first: the range proof's
/// bit bases overflow `u64` well before they approach the field order, so
/// every caller that multiplies `H` by a bit's scale goes through this
/// instead of `K256Scalar::from(u64)`.
pub fn k256_scalar_from_u128(value: u128) -> K256Scalar {
    let mut repr = [0u8; 32];
    repr[16..].copy_from_slice(&value.to_be_bytes());
    let field_bytes: k256::FieldBytes = repr.into();
    Option::from(K256Scalar::from_repr(field_bytes)).expect("u128 value is always below the scalar field order")
}
