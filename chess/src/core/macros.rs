//! Impl-generation macros for the core types. Every plain `repr(u8)` enum in
//! this crate wants the same three things (index conversion both ways and an
//! iterator over all values), and every bit-mask newtype wants the same three
//! operators; these macros stamp them out.

/// Index plumbing for a `repr(u8)` enum with a `NUM` constant:
/// `from_unchecked`, `index`, and `iter` over all values in index order.
#[macro_export]
macro_rules! impl_enum_index {
    ($enum_name:ident) => {
        impl $enum_name {
            /// Rebuilds the enum from its index. The caller guarantees
            /// `index < Self::NUM`; debug builds assert it.
            pub const fn from_unchecked(index: u8) -> Self {
                debug_assert!(index < Self::NUM as u8, "enum index out of range");
                unsafe { std::mem::transmute(index) }
            }

            pub const fn index(&self) -> usize {
                *self as usize
            }

            /// Iterates every value, in index order.
            pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
                (0..Self::NUM as u8).map(Self::from_unchecked)
            }
        }
    };
}

/// One bitwise operator plus its assignment form for a single-field newtype.
#[macro_export]
macro_rules! impl_bit_op {
    ($type_name:ident, $op_trait:ident, $assign_trait:ident, $method:ident, $assign_method:ident, $op:tt) => {
        impl std::ops::$op_trait for $type_name {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self(self.0 $op rhs.0)
            }
        }

        impl std::ops::$assign_trait for $type_name {
            fn $assign_method(&mut self, rhs: Self) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}

/// AND, OR and XOR (with assignment forms) for a bit-mask newtype.
#[macro_export]
macro_rules! impl_bit_ops {
    ($type_name:ident) => {
        $crate::impl_bit_op!($type_name, BitAnd, BitAndAssign, bitand, bitand_assign, &);
        $crate::impl_bit_op!($type_name, BitOr, BitOrAssign, bitor, bitor_assign, |);
        $crate::impl_bit_op!($type_name, BitXor, BitXorAssign, bitxor, bitxor_assign, ^);
    };
}
