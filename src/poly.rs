//! Polynomials and the algorithms that operate on them.
//!
//! The central type is the sparse [MultivariatePolynomial](polynomial::MultivariatePolynomial),
//! which is generic over its coefficient ring, its exponent type and its monomial order.
//! Dense univariate polynomials live in [univariate].

pub mod gcd;
pub mod groebner;
pub mod interpolation;
pub mod polynomial;
pub mod sparse_interpolation;
pub mod univariate;

use std::cmp::Ordering::{self, Equal};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add as OpAdd, AddAssign, Div, Mul as OpMul, Sub};

use smartstring::{LazyCompact, SmartString};

pub const INLINED_EXPONENTS: usize = 6;

/// An exponent of a variable in a monomial.
pub trait Exponent:
    Hash
    + Debug
    + Display
    + Ord
    + OpMul<Output = Self>
    + Div<Output = Self>
    + Sub<Output = Self>
    + OpAdd<Output = Self>
    + AddAssign
    + Clone
    + Copy
    + PartialEq
    + Eq
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Convert the exponent to `u32`. This is always possible, as `u32` is the largest supported exponent type.
    fn to_u32(&self) -> u32;
    /// Convert from `u32`. This function panics if the exponent is too large.
    fn from_u32(n: u32) -> Self;
    fn is_zero(&self) -> bool;
    fn checked_add(&self, other: &Self) -> Option<Self>;
    fn gcd(&self, other: &Self) -> Self;
}

macro_rules! impl_exponent {
    ($t:ty) => {
        impl Exponent for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn to_u32(&self) -> u32 {
                *self as u32
            }

            #[inline]
            fn from_u32(n: u32) -> Self {
                if n <= <$t>::MAX as u32 {
                    n as $t
                } else {
                    panic!("Exponent {} too large for {}", n, stringify!($t));
                }
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }

            #[inline]
            fn checked_add(&self, other: &Self) -> Option<Self> {
                <$t>::checked_add(*self, *other)
            }

            #[inline]
            fn gcd(&self, other: &Self) -> Self {
                crate::utils::gcd_unsigned(*self as u64, *other as u64) as $t
            }
        }
    };
}

impl_exponent!(u8);
impl_exponent!(u16);
impl_exponent!(u32);

/// A polynomial variable. It is either a named symbol
/// or a temporary variable introduced by an algorithm.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Variable {
    Symbol(SmartString<LazyCompact>),
    Temporary(usize),
}

impl From<&str> for Variable {
    fn from(s: &str) -> Variable {
        Variable::Symbol(s.into())
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::Symbol(s) => f.write_str(s),
            Variable::Temporary(t) => write!(f, "_TMP_{}", t),
        }
    }
}

/// A well-order of monomials.
pub trait MonomialOrder: Clone + Copy + Debug + PartialEq + Eq + Hash + Send + Sync + 'static {
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering;
}

/// Graded reverse lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GrevLexOrder {}

impl MonomialOrder for GrevLexOrder {
    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        let deg: u32 = a.iter().map(|e| e.to_u32()).sum();
        let deg2: u32 = b.iter().map(|e| e.to_u32()).sum();

        match deg.cmp(&deg2) {
            Equal => {}
            x => {
                return x;
            }
        }

        for (a1, a2) in a.iter().rev().zip(b.iter().rev()) {
            match a1.cmp(a2) {
                Equal => {}
                x => {
                    return x.reverse();
                }
            }
        }

        Equal
    }
}

/// Lexicographic ordering of monomials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LexOrder {}

impl MonomialOrder for LexOrder {
    #[inline]
    fn cmp<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::{Exponent, GrevLexOrder, LexOrder, MonomialOrder, Variable};

    #[test]
    fn monomial_orders() {
        let a: [u16; 3] = [1, 0, 2];
        let b: [u16; 3] = [0, 3, 0];

        assert_eq!(LexOrder::cmp(&a, &b), Ordering::Greater);
        assert_eq!(GrevLexOrder::cmp(&a, &b), Ordering::Less);

        // same degree: the monomial with the smaller last exponent is larger
        let c: [u16; 3] = [1, 1, 1];
        let d: [u16; 3] = [0, 1, 2];
        assert_eq!(GrevLexOrder::cmp(&c, &d), Ordering::Greater);
        assert_eq!(GrevLexOrder::cmp(&c, &c), Ordering::Equal);
    }

    #[test]
    #[should_panic]
    fn exponent_overflow() {
        let _ = u8::from_u32(256);
    }

    #[test]
    fn variable_display() {
        assert_eq!(Variable::from("x").to_string(), "x");
        assert_eq!(Variable::Temporary(2).to_string(), "_TMP_2");
        assert_eq!(12u16.gcd(&18), 6);
    }
}
