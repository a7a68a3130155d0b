use folio_types::Error;

pub mod invalid_token;
pub mod resource;

pub use invalid_token::RevocationRepository;
pub use resource::ResourceRepository;

/// Decodes a little-endian i64 id from an index value, which must be
/// exactly 8 bytes.
#[inline]
pub(crate) fn parse_i64_id(bytes: &[u8]) -> Result<i64, Error> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| Error::storage(format!("malformed id: {} bytes instead of 8", bytes.len())))?;
    Ok(i64::from_le_bytes(arr))
}
