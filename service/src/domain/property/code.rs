//! [`Code`] definitions.

#[cfg(doc)]
use super::Property;
use derive_more::{AsRef, Display, Error, FromStr};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rand::{rngs::OsRng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of characters in a [`Code`].
pub const LENGTH: usize = 10;

/// Characters a [`Code`] consists of.
pub const ALPHABET: &[u8; 16] = b"0123456789ABCDEF";

/// Short human-shareable identifier of a [`Property`].
///
/// Consists of exactly [`LENGTH`] characters of the [`ALPHABET`]. Random, so
/// uniqueness is enforced by the storage rather than here.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[as_ref(forward)]
pub struct Code(String);

impl Code {
    /// Generates a new random [`Code`] using the OS randomness source.
    ///
    /// # Errors
    ///
    /// If the OS randomness source is unavailable.
    pub fn generate() -> Result<Self, GenerationError> {
        Self::generate_from(&mut OsRng)
    }

    /// Generates a new [`Code`] from the provided [`RngCore`].
    ///
    /// # Errors
    ///
    /// If the provided [`RngCore`] fails to fill the buffer.
    pub fn generate_from<R: RngCore + ?Sized>(
        rng: &mut R,
    ) -> Result<Self, GenerationError> {
        let mut bytes = [0; LENGTH];
        rng.try_fill_bytes(&mut bytes).map_err(GenerationError)?;

        Ok(Self(
            bytes
                .iter()
                .map(|b| char::from(ALPHABET[usize::from(b % 16)]))
                .collect(),
        ))
    }

    /// Creates a new [`Code`] if the given `code` is valid.
    ///
    /// Lower case hexadecimal digits are accepted and upper-cased.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Option<Self> {
        let code = code.as_ref();
        Self::check(code).then(|| Self(code.to_ascii_uppercase()))
    }

    /// Checks whether the given `code` is a valid [`Code`].
    fn check(code: &str) -> bool {
        code.len() == LENGTH && code.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl FromStr for Code {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Code`")
    }
}

/// Error of generating a new [`Code`].
#[derive(Debug, Display, Error)]
#[display("failed to generate `Code`: {_0}")]
pub struct GenerationError(rand::Error);

#[cfg(test)]
mod spec {
    use rand::RngCore;

    use super::{Code, ALPHABET, LENGTH};

    /// [`RngCore`] yielding `start`, `start + 1`, ... bytes.
    struct Sequence(u8);

    impl RngCore for Sequence {
        fn next_u32(&mut self) -> u32 {
            let mut buf = [0; 4];
            self.fill_bytes(&mut buf);
            u32::from_le_bytes(buf)
        }

        fn next_u64(&mut self) -> u64 {
            let mut buf = [0; 8];
            self.fill_bytes(&mut buf);
            u64::from_le_bytes(buf)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest {
                *b = self.0;
                self.0 = self.0.wrapping_add(1);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    /// [`RngCore`] which is never able to produce anything.
    struct Broken;

    impl RngCore for Broken {
        fn next_u32(&mut self) -> u32 {
            unreachable!()
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!()
        }

        fn fill_bytes(&mut self, _: &mut [u8]) {
            unreachable!()
        }

        fn try_fill_bytes(&mut self, _: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source is gone"))
        }
    }

    #[test]
    fn generates_from_alphabet() {
        for _ in 0..100 {
            let code = Code::generate().unwrap();

            assert_eq!(code.to_string().len(), LENGTH);
            assert!(code.to_string().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn maps_bytes_modulo_alphabet() {
        let code = Code::generate_from(&mut Sequence(250)).unwrap();

        // 250..=255 then wraps to 0..=3
        assert_eq!(code.to_string(), "ABCDEF0123");

        let mut seq = Sequence(0);
        assert_eq!(seq.next_u32(), 0x0302_0100);
        assert_eq!(seq.next_u64(), 0x0B0A_0908_0706_0504);
    }

    #[test]
    fn reports_broken_source() {
        let err = Code::generate_from(&mut Broken).unwrap_err();

        assert!(err.to_string().starts_with("failed to generate `Code`"));
    }

    #[test]
    fn parses() {
        assert_eq!(
            Code::new("0a1b2c3d4e").unwrap().to_string(),
            "0A1B2C3D4E",
        );

        assert!(Code::new("").is_none());
        assert!(Code::new("0A1B2C3D4").is_none());
        assert!(Code::new("0A1B2C3D4E5").is_none());
        assert!(Code::new("0A1B2C3D4G").is_none());
    }
}
