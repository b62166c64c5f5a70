//! Defines core algebraic traits and data structures.
//!
//! The core trait is [Ring], which has two binary operations, addition and multiplication.
//! Each ring has an associated element type, that should not be confused with the ring type itself.
//! For example:
//! - The ring of integers [Z](type@integer::Z) has elements of type [Integer].
//! - The finite field [Zp](finite_field::Zp) has elements of type [FiniteFieldElement](finite_field::FiniteFieldElement).
//! - A Galois field [AlgebraicExtension](algebraic_number::AlgebraicExtension) has elements of type
//!   [AlgebraicNumber](algebraic_number::AlgebraicNumber).
//!
//! The ring elements do not implement operations such as addition or multiplication,
//! but rather the ring itself does. All polynomial structures are generic over the ring type.
//!
//! An extension of the ring trait is the [`EuclideanDomain`] trait, which adds the ability to compute remainders, quotients, and gcds.
//! Another extension is the [`Field`] trait, which adds the ability to divide and invert elements.
pub mod algebraic_number;
pub mod finite_field;
pub mod integer;

use std::fmt::{Debug, Display, Error, Formatter};
use std::hash::Hash;

use integer::Integer;

/// An error raised by an exact operation in a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainError {
    /// An exact division left a nonzero remainder.
    NotDivisible,
    /// The element is not a unit of the ring.
    NotInvertible,
    /// An extension element does not lie in the base field.
    NotInBaseField,
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotDivisible => write!(f, "division is not exact"),
            DomainError::NotInvertible => write!(f, "element is not invertible"),
            DomainError::NotInBaseField => write!(f, "element does not lie in the base field"),
        }
    }
}

impl std::error::Error for DomainError {}

/// A ring is a set with two binary operations, addition and multiplication.
/// Examples of rings include the integers, finite fields, and polynomials.
///
/// Each ring has an element type, that should not be confused with the ring type itself.
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    /// The element of a ring. For example, the elements of the ring of integers [Z](type@integer::Z), `Z::Element`, are [Integer].
    type Element: Clone + PartialEq + Eq + Hash + Debug;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: Integer) -> Self::Element;
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;
    /// Should return `true` iff `gcd(1,x)` returns `1` for any `x`.
    fn one_is_gcd_unit() -> bool;
    fn characteristic(&self) -> Integer;
    /// The number of elements in the ring, or `None` for infinite rings.
    fn size(&self) -> Option<Integer>;

    /// Return the result of dividing `a` by `b`, if possible and if the result is unique.
    /// For example, in [Z](type@integer::Z), `4/2` is possible but `3/2` is not.
    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element>;

    /// Sample an element. The range is clamped to the representatives of the ring,
    /// so `(0, i64::MAX)` samples uniformly from a finite field.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element;

    fn format<W: std::fmt::Write>(&self, element: &Self::Element, f: &mut W) -> Result<(), Error>;

    /// Divide `a` by `b`, failing when the division is not exact.
    fn divide_exact(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, DomainError> {
        self.try_div(a, b).ok_or(DomainError::NotDivisible)
    }

    /// Create a new printer for the given ring element that
    /// can be used in a [format!] macro.
    fn printer<'a>(&'a self, element: &'a Self::Element) -> RingPrinter<'a, Self> {
        RingPrinter {
            ring: self,
            element,
        }
    }
}

/// A Euclidean domain is a ring that supports division with remainder, quotients, and gcds.
pub trait EuclideanDomain: Ring {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element);
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
}

/// A field is a ring that supports division and inversion.
pub trait Field: EuclideanDomain {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn inv(&self, a: &Self::Element) -> Self::Element;
    /// Invert `a`, or return `None` when `a` is not a unit. This
    /// happens for zero, or for zero divisors of a modular ring.
    fn try_inv(&self, a: &Self::Element) -> Option<Self::Element>;

    fn reciprocal(&self, a: &Self::Element) -> Result<Self::Element, DomainError> {
        self.try_inv(a).ok_or(DomainError::NotInvertible)
    }
}

/// Provides an interface for printing elements of a ring,
/// suitable as an argument to [format!]. Internally, it will call [Ring::format].
pub struct RingPrinter<'a, R: Ring> {
    pub ring: &'a R,
    pub element: &'a R::Element,
}

impl<R: Ring> Display for RingPrinter<'_, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.ring.format(self.element, f)
    }
}
