//! Numeric operands of chance tests.
//!
//! [`RandomExt::x_chance_in_y`](crate::RandomExt::x_chance_in_y) accepts any
//! pair of numeric types. If either type is floating point the real-valued
//! test runs, otherwise the integer test does. The choice is made from
//! [`ChanceOperand::IS_REAL`], a per-type constant, so it is fixed at
//! monomorphization and never depends on the values passed.

/// A numeric type usable as either side of a chance test.
pub trait ChanceOperand: Copy {
    /// Whether the type is floating point.
    const IS_REAL: bool;

    /// The value as an integer, saturating at the `i64` bounds.
    fn to_i64(self) -> i64;

    /// The value as a real.
    fn to_f64(self) -> f64;
}

macro_rules! impl_signed_operand {
    ($($ty:ty),*) => {$(
        impl ChanceOperand for $ty {
            const IS_REAL: bool = false;

            fn to_i64(self) -> i64 {
                i64::from(self)
            }

            #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

macro_rules! impl_wide_operand {
    ($($ty:ty),*) => {$(
        impl ChanceOperand for $ty {
            const IS_REAL: bool = false;

            fn to_i64(self) -> i64 {
                i64::try_from(self).unwrap_or(if self > 0 { i64::MAX } else { i64::MIN })
            }

            #[allow(clippy::cast_precision_loss)]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_signed_operand!(i8, i16, i32, i64, u8, u16, u32);
impl_wide_operand!(u64, usize, isize);

impl ChanceOperand for f32 {
    const IS_REAL: bool = true;

    #[allow(clippy::cast_possible_truncation)]
    fn to_i64(self) -> i64 {
        self as i64
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl ChanceOperand for f64 {
    const IS_REAL: bool = true;

    #[allow(clippy::cast_possible_truncation)]
    fn to_i64(self) -> i64 {
        self as i64
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Whether a chance test over `T` and `U` takes the real-valued path.
#[must_use]
pub const fn uses_real_path<T: ChanceOperand, U: ChanceOperand>() -> bool {
    T::IS_REAL || U::IS_REAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_pairs_use_integer_path() {
        assert!(!uses_real_path::<i32, i32>());
        assert!(!uses_real_path::<u8, i64>());
        assert!(!uses_real_path::<usize, u32>());
    }

    #[test]
    fn test_any_float_selects_real_path() {
        assert!(uses_real_path::<f64, i32>());
        assert!(uses_real_path::<i32, f32>());
        assert!(uses_real_path::<f64, f64>());
    }

    #[test]
    fn test_wide_unsigned_saturates() {
        assert_eq!(u64::MAX.to_i64(), i64::MAX);
        assert_eq!(usize::MAX.to_i64(), i64::MAX);
        assert_eq!(isize::MIN.to_i64(), i64::MIN);
        assert_eq!(300u64.to_i64(), 300);
    }
}
