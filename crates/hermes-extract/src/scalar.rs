//! The closed set of types a textual parameter can be coerced into.
//!
//! Integers are parsed base-10 at full width (`i64`/`u64`) and then narrowed,
//! so `"300"` for a `u8` fails with a range error rather than wrapping.

use serde::de::DeserializeOwned;

use crate::Kind;

mod sealed {
    pub trait Sealed {}
}

/// A type a raw string parameter can be coerced into.
///
/// Implemented for `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32`, `f64`
/// and `String`. The trait is sealed; declaring a textual parameter of any
/// other type is a compile error.
pub trait Scalar: sealed::Sealed + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Coercion kind of the type.
    const KIND: Kind;

    /// Concrete type name shown in documentation (e.g. `int64`).
    const FORMAT: &'static str;

    /// Parses a raw value.
    ///
    /// # Errors
    ///
    /// Returns the parser's message when `raw` is not a valid value.
    fn coerce(raw: &str) -> Result<Self, String>;

    /// The value used for an absent optional parameter.
    fn zero() -> Self;
}

macro_rules! signed {
    ($($ty:ty => $format:literal),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const KIND: Kind = Kind::SignedInteger;
            const FORMAT: &'static str = $format;

            fn coerce(raw: &str) -> Result<Self, String> {
                let wide: i64 = raw.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
                <$ty>::try_from(wide).map_err(|_| format!("value {wide} out of range for {}", $format))
            }

            fn zero() -> Self {
                0
            }
        }
    )*};
}

macro_rules! unsigned {
    ($($ty:ty => $format:literal),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const KIND: Kind = Kind::UnsignedInteger;
            const FORMAT: &'static str = $format;

            fn coerce(raw: &str) -> Result<Self, String> {
                let wide: u64 = raw.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
                <$ty>::try_from(wide).map_err(|_| format!("value {wide} out of range for {}", $format))
            }

            fn zero() -> Self {
                0
            }
        }
    )*};
}

signed! {
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    isize => "int",
}

unsigned! {
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    usize => "uint",
}

impl sealed::Sealed for f32 {}

impl Scalar for f32 {
    const KIND: Kind = Kind::Float;
    const FORMAT: &'static str = "float32";

    fn coerce(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e: std::num::ParseFloatError| e.to_string())
    }

    fn zero() -> Self {
        0.0
    }
}

impl sealed::Sealed for f64 {}

impl Scalar for f64 {
    const KIND: Kind = Kind::Float;
    const FORMAT: &'static str = "float64";

    fn coerce(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e: std::num::ParseFloatError| e.to_string())
    }

    fn zero() -> Self {
        0.0
    }
}

impl sealed::Sealed for String {}

impl Scalar for String {
    const KIND: Kind = Kind::String;
    const FORMAT: &'static str = "string";

    fn coerce(raw: &str) -> Result<Self, String> {
        Ok(raw.to_owned())
    }

    fn zero() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_signed_parse() {
        assert_eq!(i64::coerce("42"), Ok(42));
        assert_eq!(i64::coerce("-7"), Ok(-7));
        assert_eq!(
            i64::coerce("abc").unwrap_err(),
            "invalid digit found in string"
        );
        assert!(i64::coerce("").is_err());
        assert!(i64::coerce(" 1").is_err());
    }

    #[test]
    fn test_signed_narrowing_overflow() {
        assert_eq!(i8::coerce("127"), Ok(127));
        assert_eq!(
            i8::coerce("128").unwrap_err(),
            "value 128 out of range for int8"
        );
        assert!(i64::coerce("9223372036854775808").is_err());
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert_eq!(u32::coerce("7"), Ok(7));
        assert!(u32::coerce("-1").is_err());
        assert!(u8::coerce("256").is_err());
    }

    #[test]
    fn test_float_parse() {
        assert_eq!(f64::coerce("1.5"), Ok(1.5));
        assert_eq!(f32::coerce("-2"), Ok(-2.0));
        assert!(f64::coerce("one").is_err());
    }

    #[test]
    fn test_string_passthrough() {
        assert_eq!(String::coerce(" a b "), Ok(" a b ".to_string()));
        assert_eq!(String::coerce(""), Ok(String::new()));
    }

    #[test]
    fn test_kinds_and_zero_values() {
        assert_eq!(i16::KIND, Kind::SignedInteger);
        assert_eq!(usize::KIND, Kind::UnsignedInteger);
        assert_eq!(f32::KIND, Kind::Float);
        assert_eq!(String::KIND, Kind::String);
        assert_eq!(i64::zero(), 0);
        assert_eq!(String::zero(), "");
    }

    proptest! {
        #[test]
        fn prop_i64_roundtrip(v in any::<i64>()) {
            prop_assert_eq!(i64::coerce(&v.to_string()), Ok(v));
        }

        #[test]
        fn prop_u16_matches_range(v in any::<u64>()) {
            let result = u16::coerce(&v.to_string());
            prop_assert_eq!(result.is_ok(), v <= u64::from(u16::MAX));
        }

        #[test]
        fn prop_i32_matches_range(v in any::<i64>()) {
            let result = i32::coerce(&v.to_string());
            prop_assert_eq!(result.is_ok(), i32::try_from(v).is_ok());
        }

        #[test]
        fn prop_non_numeric_never_coerces(s in "[a-zA-Z_]{1,12}") {
            prop_assert!(i64::coerce(&s).is_err());
            prop_assert!(u64::coerce(&s).is_err());
        }
    }
}
