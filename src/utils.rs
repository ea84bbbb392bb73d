//! Utility functions for hashing and serialization

use std::convert::Infallible;

// Encode a value into CBOR, then hash the encoding. Returns the hex digest and the bytes.
pub fn cbor_digest<T: minicbor::Encode<()>>(
    value: &T,
) -> Result<(String, Vec<u8>), minicbor::encode::Error<Infallible>> {
    let cbor = minicbor::to_vec(value)?;
    let hash = sha256::digest(&cbor);

    Ok((hash, cbor))
}
