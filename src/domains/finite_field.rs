//! Finite fields and modular rings.

use rand::Rng;
use std::fmt::{Debug, Display, Error, Formatter};
use std::hash::Hash;

use crate::domains::integer::Integer;
use crate::domains::DomainError;

use super::algebraic_number::{AlgebraicExtension, AlgebraicNumber};
use super::{EuclideanDomain, Field, Ring};

const HENSEL_LIFTING_MASK: [u8; 128] = [
    255, 85, 51, 73, 199, 93, 59, 17, 15, 229, 195, 89, 215, 237, 203, 33, 31, 117, 83, 105, 231,
    125, 91, 49, 47, 5, 227, 121, 247, 13, 235, 65, 63, 149, 115, 137, 7, 157, 123, 81, 79, 37, 3,
    153, 23, 45, 11, 97, 95, 181, 147, 169, 39, 189, 155, 113, 111, 69, 35, 185, 55, 77, 43, 129,
    127, 213, 179, 201, 71, 221, 187, 145, 143, 101, 67, 217, 87, 109, 75, 161, 159, 245, 211, 233,
    103, 253, 219, 177, 175, 133, 99, 249, 119, 141, 107, 193, 191, 21, 243, 9, 135, 29, 251, 209,
    207, 165, 131, 25, 151, 173, 139, 225, 223, 53, 19, 41, 167, 61, 27, 241, 239, 197, 163, 57,
    183, 205, 171, 1,
];

/// A 32-bit integer finite field.
pub type Zp = FiniteField<u32>;
/// A 64-bit integer finite field.
pub type Zp64 = FiniteField<u64>;

/// Map a value into a finite field.
pub trait ToFiniteField<UField: FiniteFieldWorkspace>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    fn to_finite_field(&self, field: &FiniteField<UField>)
        -> <FiniteField<UField> as Ring>::Element;
}

impl ToFiniteField<u32> for u32 {
    fn to_finite_field(&self, field: &Zp) -> <Zp as Ring>::Element {
        field.to_element(*self % field.get_prime())
    }
}

impl ToFiniteField<u64> for u64 {
    fn to_finite_field(&self, field: &Zp64) -> <Zp64 as Ring>::Element {
        field.to_element(*self % field.get_prime())
    }
}

/// A Galois field `GF(p^n)`, which can be extended to a larger field
/// when it has too few elements for a randomized algorithm.
pub trait GaloisField: Field {
    type Base: Field;

    fn get_extension_degree(&self) -> u64;
    /// Convert the field element to an integer in `[0, p)`.
    fn to_integer(&self, a: &Self::Element) -> Integer;
    /// Convert the field element to an integer in `(-p/2, p/2]`.
    fn to_symmetric_integer(&self, a: &Self::Element) -> Integer;

    /// Construct the Galois field `GF(p^new_pow)` over the base field.
    fn upgrade(&self, new_pow: usize) -> AlgebraicExtension<Self::Base>;

    fn upgrade_element(
        &self,
        e: &Self::Element,
        larger_field: &AlgebraicExtension<Self::Base>,
    ) -> AlgebraicNumber<Self::Base>;

    /// Map an element of an extension back to the base field. Fails if
    /// the element has a non-constant representative.
    fn downgrade_element(&self, e: &AlgebraicNumber<Self::Base>) -> Result<Self::Element, DomainError>;
}

impl<UField: FiniteFieldWorkspace> GaloisField for FiniteField<UField>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    type Base = Self;

    fn get_extension_degree(&self) -> u64 {
        1
    }

    fn to_integer(&self, a: &Self::Element) -> Integer {
        self.from_element(a).into()
    }

    #[inline(always)]
    fn to_symmetric_integer(&self, a: &Self::Element) -> Integer {
        let i: Integer = self.from_element(a).into();
        let p: Integer = self.get_prime().into();

        if &i * &Integer::Natural(2) > p {
            &i - &p
        } else {
            i
        }
    }

    fn upgrade(&self, new_pow: usize) -> AlgebraicExtension<FiniteField<UField>> {
        AlgebraicExtension::galois_field(self.clone(), new_pow)
    }

    fn upgrade_element(
        &self,
        e: &Self::Element,
        larger_field: &AlgebraicExtension<Self::Base>,
    ) -> AlgebraicNumber<Self::Base> {
        larger_field.constant(e.clone())
    }

    fn downgrade_element(&self, e: &AlgebraicNumber<Self::Base>) -> Result<Self::Element, DomainError> {
        if e.poly.degree() > 0 {
            return Err(DomainError::NotInBaseField);
        }

        Ok(e.poly.get_constant())
    }
}

/// A number in a finite field.
#[derive(Debug, Copy, Clone, Hash, PartialEq, PartialOrd, Eq)]
pub struct FiniteFieldElement<UField>(pub(crate) UField);

/// The machine word that stores the prime of a finite field.
pub trait FiniteFieldWorkspace:
    Copy + Clone + Display + Debug + Eq + Hash + Into<Integer> + 'static
{
    /// Convert a non-negative integer that fits in `Self`.
    fn try_from_integer(n: &Integer) -> Option<Self>;

    fn to_u64(&self) -> u64;
}

impl FiniteFieldWorkspace for u32 {
    fn try_from_integer(n: &Integer) -> Option<Self> {
        match n {
            Integer::Natural(s) if *s >= 0 && *s <= u32::MAX as i64 => Some(*s as u32),
            _ => None,
        }
    }

    #[inline]
    fn to_u64(&self) -> u64 {
        *self as u64
    }
}

impl FiniteFieldWorkspace for u64 {
    fn try_from_integer(n: &Integer) -> Option<Self> {
        n.to_u64()
    }

    #[inline]
    fn to_u64(&self) -> u64 {
        *self
    }
}

pub trait FiniteFieldCore<UField: FiniteFieldWorkspace>: Field {
    /// Create a new finite field with modulus prime `p`.
    fn new(p: UField) -> Self;
    fn get_prime(&self) -> UField;
    /// Returns `true` if the modulus was declared prime, i.e., the ring is a field.
    fn is_field(&self) -> bool;
    /// Convert a number to a representative in a prime field.
    fn to_element(&self, a: UField) -> Self::Element;
    /// Convert a number from the finite field to standard form `[0,p)`.
    fn from_element(&self, a: &Self::Element) -> UField;
}

/// The ring `Z / mZ` for an odd modulus `m`, which is a field when `m` is prime.
///
/// Elements are stored in Montgomery form `a * R mod m` with `R = 2^32` for [Zp]
/// and `R = 2^64` for [Zp64], so that a product needs no division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiniteField<UField> {
    p: UField,
    /// `-p^-1 mod R`
    m: UField,
    /// `R mod p`
    one: FiniteFieldElement<UField>,
    is_prime: bool,
}

impl<UField: Display> Display for FiniteField<UField> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, " % {}", self.p)
    }
}

/// Implement the arithmetic of a Montgomery field for the word type `$u`,
/// with `$wide` holding a product of two words.
macro_rules! montgomery_field {
    ($u:ty, $wide:ty, $bits:expr, $newton_steps:expr) => {
        impl FiniteField<$u> {
            /// Create the ring of integers modulo the odd number `p`.
            pub fn new_non_prime(p: $u) -> Self {
                Self::with_modulus(p, false)
            }

            /// Create the field of integers modulo the odd prime `p`. Primality is not checked.
            pub fn new(p: $u) -> Self {
                Self::with_modulus(p, true)
            }

            fn with_modulus(p: $u, is_prime: bool) -> Self {
                if p % 2 == 0 {
                    panic!("Even modulus {} is not supported, use Z2 for the prime 2", p);
                }

                FiniteField {
                    p,
                    m: Self::neg_inverse_mod_r(p),
                    one: FiniteFieldElement(Self::r_mod(p)),
                    is_prime,
                }
            }

            /// `R mod p`, computed as `2 * (R/2 mod p)` to stay within `$wide`.
            fn r_mod(p: $u) -> $u {
                if p as $wide <= 1 << ($bits - 1) {
                    let r = ((((1 as $wide) << ($bits - 1)) % p as $wide) << 1) as $u;
                    if r < p {
                        r
                    } else {
                        r - p
                    }
                } else {
                    p.wrapping_neg()
                }
            }

            /// `-p^-1 mod R` by Newton iteration from an inverse modulo `2^8`.
            fn neg_inverse_mod_r(p: $u) -> $u {
                let mut x = HENSEL_LIFTING_MASK[((p >> 1) & 127) as usize] as $u;
                for _ in 0..$newton_steps {
                    x = x.wrapping_mul(p.wrapping_mul(x).wrapping_add(2));
                }
                x
            }

            /// Montgomery reduction of a product of two elements.
            #[inline(always)]
            fn reduce(&self, t: $wide) -> FiniteFieldElement<$u> {
                let m = (t as $u).wrapping_mul(self.m);
                let (t, overflow) = t.overflowing_add(m as $wide * self.p as $wide);
                let u = (t >> $bits) as $u;

                if overflow {
                    FiniteFieldElement(u.wrapping_sub(self.p))
                } else if u >= self.p {
                    FiniteFieldElement(u - self.p)
                } else {
                    FiniteFieldElement(u)
                }
            }
        }

        impl FiniteFieldCore<$u> for FiniteField<$u> {
            fn new(p: $u) -> Self {
                Self::new(p)
            }

            #[inline]
            fn get_prime(&self) -> $u {
                self.p
            }

            #[inline]
            fn is_field(&self) -> bool {
                self.is_prime
            }

            #[inline(always)]
            fn to_element(&self, a: $u) -> FiniteFieldElement<$u> {
                FiniteFieldElement((((a as $wide) << $bits) % self.p as $wide) as $u)
            }

            #[inline(always)]
            fn from_element(&self, a: &FiniteFieldElement<$u>) -> $u {
                self.reduce(a.0 as $wide).0
            }
        }

        impl Ring for FiniteField<$u> {
            type Element = FiniteFieldElement<$u>;

            #[inline(always)]
            fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
                let (r, overflow) = a.0.overflowing_add(b.0);
                if overflow || r >= self.p {
                    FiniteFieldElement(r.wrapping_sub(self.p))
                } else {
                    FiniteFieldElement(r)
                }
            }

            #[inline(always)]
            fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
                if a.0 >= b.0 {
                    FiniteFieldElement(a.0 - b.0)
                } else {
                    FiniteFieldElement(a.0 + (self.p - b.0))
                }
            }

            #[inline(always)]
            fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
                self.reduce(a.0 as $wide * b.0 as $wide)
            }

            #[inline(always)]
            fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
                *a = self.add(a, b);
            }

            #[inline(always)]
            fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
                *a = self.sub(a, b);
            }

            #[inline(always)]
            fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
                *a = self.mul(a, b);
            }

            #[inline(always)]
            fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
                *a = self.add(a, &self.mul(b, c));
            }

            #[inline(always)]
            fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
                *a = self.sub(a, &self.mul(b, c));
            }

            #[inline]
            fn neg(&self, a: &Self::Element) -> Self::Element {
                if a.0 == 0 {
                    *a
                } else {
                    FiniteFieldElement(self.p - a.0)
                }
            }

            #[inline]
            fn zero(&self) -> Self::Element {
                FiniteFieldElement(0)
            }

            #[inline]
            fn one(&self) -> Self::Element {
                self.one
            }

            #[inline]
            fn nth(&self, n: Integer) -> Self::Element {
                n.to_finite_field(self)
            }

            /// Square-and-multiply. Over a field the exponent is first reduced by Fermat's little theorem.
            fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
                let order = self.p as u64 - 1;
                if self.is_prime && e >= order {
                    e %= order;
                }

                let mut base = *b;
                let mut res = self.one;
                while e > 0 {
                    if e & 1 == 1 {
                        res = self.mul(&res, &base);
                    }
                    e >>= 1;
                    if e > 0 {
                        base = self.mul(&base, &base);
                    }
                }
                res
            }

            #[inline]
            fn is_zero(a: &Self::Element) -> bool {
                a.0 == 0
            }

            #[inline]
            fn is_one(&self, a: &Self::Element) -> bool {
                *a == self.one
            }

            fn one_is_gcd_unit() -> bool {
                true
            }

            fn characteristic(&self) -> Integer {
                self.p.into()
            }

            fn size(&self) -> Option<Integer> {
                Some(self.p.into())
            }

            fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
                Some(self.mul(a, &self.try_inv(b)?))
            }

            /// Elements are drawn directly in Montgomery form, which is a bijection on `[0, p)`.
            fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
                let upper = (self.p as u64).min(i64::MAX as u64) as i64;
                let r = rng.random_range(range.0.max(0)..range.1.min(upper));
                FiniteFieldElement(r as $u)
            }

            fn format<W: std::fmt::Write>(&self, element: &Self::Element, f: &mut W) -> Result<(), Error> {
                write!(f, "{}", self.from_element(element))
            }
        }

        impl EuclideanDomain for FiniteField<$u> {
            #[inline]
            fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
                FiniteFieldElement(0)
            }

            #[inline]
            fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
                (self.div(a, b), FiniteFieldElement(0))
            }

            #[inline]
            fn gcd(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
                self.one
            }
        }

        impl Field for FiniteField<$u> {
            #[inline]
            fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
                self.mul(a, &self.inv(b))
            }

            #[inline]
            fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
                *a = self.div(a, b);
            }

            fn inv(&self, a: &Self::Element) -> Self::Element {
                self.try_inv(a)
                    .unwrap_or_else(|| panic!("{} is not invertible mod {}", self.printer(a), self.p))
            }

            /// Extended Euclid on the standard representative, tracking only the
            /// cofactor of `a` and its sign through the parity of the step count.
            fn try_inv(&self, a: &Self::Element) -> Option<Self::Element> {
                if a.0 == 0 {
                    return None;
                }

                // two reductions turn aR into aR^-1, whose inverse is a^-1 R
                let x = self.reduce(self.reduce(a.0 as $wide).0 as $wide).0;

                let (mut u1, mut u3): ($u, $u) = (1, x);
                let (mut v1, mut v3): ($u, $u) = (0, self.p);
                let mut even = true;

                while v3 != 0 {
                    let q = u3 / v3;
                    (u1, v1) = (v1, u1 + q * v1);
                    (u3, v3) = (v3, u3 % v3);
                    even = !even;
                }

                if u3 != 1 {
                    return None;
                }

                if even {
                    Some(FiniteFieldElement(u1))
                } else {
                    Some(FiniteFieldElement(self.p - u1))
                }
            }
        }
    };
}

montgomery_field!(u32, u64, 32, 2);
montgomery_field!(u64, u128, 64, 3);

/// The field with the two elements 0 and 1.
pub type Z2 = FiniteField<Two>;
/// The field with the two elements 0 and 1.
pub const Z2: FiniteField<Two> = Z2::new();

/// The prime 2, as the word type of [Z2](type@Z2).
#[derive(Copy, Clone, Hash, Eq, PartialEq)]
pub struct Two(pub(crate) u8);

impl Z2 {
    /// Create the finite field with prime 2.
    pub const fn new() -> Z2 {
        FiniteField {
            p: Two(2),
            m: Two(2),
            one: FiniteFieldElement(Two(1)),
            is_prime: true,
        }
    }
}

impl Default for Z2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Two {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for Two {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Two> for Integer {
    fn from(value: Two) -> Self {
        Integer::Natural(value.0 as i64)
    }
}

impl FiniteFieldWorkspace for Two {
    fn try_from_integer(n: &Integer) -> Option<Self> {
        match n {
            Integer::Natural(s) if (0..=2).contains(s) => Some(Two(*s as u8)),
            _ => None,
        }
    }

    #[inline]
    fn to_u64(&self) -> u64 {
        self.0 as u64
    }
}

impl FiniteFieldCore<Two> for Z2 {
    fn new(_: Two) -> Self {
        Z2::new()
    }

    #[inline]
    fn get_prime(&self) -> Two {
        Two(2)
    }

    #[inline]
    fn is_field(&self) -> bool {
        true
    }

    #[inline]
    fn to_element(&self, a: Two) -> u8 {
        a.0 % 2
    }

    #[inline]
    fn from_element(&self, a: &u8) -> Two {
        Two(*a)
    }
}

impl Ring for Z2 {
    type Element = u8;

    #[inline(always)]
    fn add(&self, a: &u8, b: &u8) -> u8 {
        a ^ b
    }

    #[inline(always)]
    fn sub(&self, a: &u8, b: &u8) -> u8 {
        a ^ b
    }

    #[inline(always)]
    fn mul(&self, a: &u8, b: &u8) -> u8 {
        a & b
    }

    #[inline]
    fn add_assign(&self, a: &mut u8, b: &u8) {
        *a ^= b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut u8, b: &u8) {
        *a ^= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut u8, b: &u8) {
        *a &= b;
    }

    fn add_mul_assign(&self, a: &mut u8, b: &u8, c: &u8) {
        *a ^= b & c;
    }

    fn sub_mul_assign(&self, a: &mut u8, b: &u8, c: &u8) {
        *a ^= b & c;
    }

    #[inline]
    fn neg(&self, a: &u8) -> u8 {
        *a
    }

    #[inline]
    fn zero(&self) -> u8 {
        0
    }

    #[inline]
    fn one(&self) -> u8 {
        1
    }

    #[inline]
    fn nth(&self, n: Integer) -> u8 {
        n.to_finite_field(self)
    }

    #[inline]
    fn pow(&self, b: &u8, e: u64) -> u8 {
        if e == 0 {
            1
        } else {
            *b
        }
    }

    #[inline]
    fn is_zero(a: &u8) -> bool {
        *a == 0
    }

    #[inline]
    fn is_one(&self, a: &u8) -> bool {
        *a == 1
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        Integer::Natural(2)
    }

    fn size(&self) -> Option<Integer> {
        Some(Integer::Natural(2))
    }

    fn try_div(&self, a: &u8, b: &u8) -> Option<u8> {
        if *b == 0 {
            None
        } else {
            Some(*a)
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> u8 {
        rng.random_range(range.0.max(0)..range.1.min(2)) as u8
    }

    fn format<W: std::fmt::Write>(&self, element: &u8, f: &mut W) -> Result<(), Error> {
        write!(f, "{}", element)
    }
}

impl EuclideanDomain for Z2 {
    #[inline]
    fn rem(&self, _: &u8, _: &u8) -> u8 {
        0
    }

    #[inline]
    fn quot_rem(&self, a: &u8, b: &u8) -> (u8, u8) {
        (self.div(a, b), 0)
    }

    #[inline]
    fn gcd(&self, _: &u8, _: &u8) -> u8 {
        1
    }
}

impl Field for Z2 {
    #[inline]
    fn div(&self, a: &u8, b: &u8) -> u8 {
        self.mul(a, &self.inv(b))
    }

    #[inline]
    fn div_assign(&self, a: &mut u8, b: &u8) {
        *a = self.div(a, b);
    }

    fn inv(&self, a: &u8) -> u8 {
        if *a == 0 {
            panic!("0 is not invertible mod 2");
        }
        1
    }

    fn try_inv(&self, a: &u8) -> Option<u8> {
        if *a == 0 {
            None
        } else {
            Some(1)
        }
    }
}

/// Do a deterministic Miller test to check if `n` is a prime.
/// Since `n` is a `u64`, a basis of only 7 witnesses has to be tested.
///
/// Based on [Wojciech Izykowski's implementation](https://github.com/wizykowski/miller-rabin).
pub fn is_prime_u64(n: u64) -> bool {
    let w = if n < 341531 {
        [9345883071009581737].as_slice()
    } else if n < 1050535501 {
        [336781006125, 9639812373923155].as_slice()
    } else if n < 350269456337 {
        [
            4230279247111683200,
            14694767155120705706,
            16641139526367750375,
        ]
        .as_slice()
    } else {
        // shortest SPRP basis from Jim Sinclair for testing primality of u64
        [2, 325, 9375, 28178, 450775, 9780504, 1795265022].as_slice()
    };

    if n < 2 {
        return false;
    }

    if n % 2 == 0 {
        return n == 2;
    }

    let mut s = 0;
    let mut d = n - 1;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    let f = Zp64::new(n);
    let neg_one = FiniteFieldElement(n.wrapping_sub(f.one().0));

    'test: for a in w {
        let a = f.to_element(*a % n);

        if a.0 == 0 {
            continue;
        }

        let mut x = f.pow(&a, d);

        if x == f.one() || x == neg_one {
            continue;
        }

        for _ in 0..s {
            x = f.mul(&x, &x);

            if x == f.one() {
                return false;
            }
            if x == neg_one {
                continue 'test;
            }
        }

        return false;
    }

    true
}

/// An iterator over consecutive 64-bit primes.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct PrimeIteratorU64 {
    current_number: u64,
}

impl PrimeIteratorU64 {
    /// Create a new prime iterator that is larger than `start`.
    pub fn new(start: u64) -> PrimeIteratorU64 {
        PrimeIteratorU64 {
            current_number: start.max(1),
        }
    }
}

impl Iterator for PrimeIteratorU64 {
    type Item = u64;

    /// Yield the next prime or `None` if `u64::MAX` has been reached.
    fn next(&mut self) -> Option<u64> {
        while self.current_number < u64::MAX {
            self.current_number += 1;

            if is_prime_u64(self.current_number) {
                return Some(self.current_number);
            }
        }

        None
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{is_prime_u64, FiniteFieldCore, GaloisField, PrimeIteratorU64, Two, Zp, Zp64, Z2};
    use crate::domains::{integer::Integer, DomainError, Field, Ring};

    #[test]
    fn montgomery_roundtrip() {
        let f = Zp::new(4293491017);
        for a in [0, 1, 2, 12345, 4293491016] {
            assert_eq!(f.from_element(&f.to_element(a)), a);
        }

        let a = f.to_element(3);
        let b = f.to_element(4293491015);
        assert_eq!(f.from_element(&f.add(&a, &b)), 1);
        assert_eq!(f.from_element(&f.mul(&a, &b)), 4293491011);
    }

    #[test]
    fn inverse() {
        let f = Zp::new(17);
        for a in 1..17 {
            let e = f.to_element(a);
            assert!(f.is_one(&f.mul(&e, &f.inv(&e))));
        }

        let f = Zp64::new(18446744073709551557);
        let e = f.to_element(123456789);
        assert!(f.is_one(&f.mul(&e, &f.inv(&e))));
    }

    #[test]
    fn non_prime_ring() {
        let r = Zp::new_non_prime(15);
        assert!(!r.is_field());
        assert_eq!(r.try_inv(&r.to_element(5)), None);
        assert_eq!(r.reciprocal(&r.to_element(3)), Err(DomainError::NotInvertible));
        assert_eq!(r.from_element(&r.inv(&r.to_element(2))), 8);
    }

    #[test]
    fn binary_field() {
        let one = Z2.one();
        assert_eq!(Z2.add(&one, &one), Z2.zero());
        assert_eq!(Z2.neg(&one), one);
        assert_eq!(Z2.nth(Integer::Natural(-3)), one);
        assert_eq!(Z2.nth(Integer::Natural(4)), Z2.zero());
        assert_eq!(Z2.try_inv(&Z2.zero()), None);
        assert_eq!(Z2.from_element(&Z2.to_element(Two(1))), Two(1));
        assert_eq!(Z2.to_symmetric_integer(&one), Integer::Natural(1));

        let ext = Z2.upgrade(3);
        assert_eq!(ext.size(), Some(Integer::Natural(8)));
        let e = Z2.upgrade_element(&one, &ext);
        assert_eq!(Z2.downgrade_element(&e), Ok(one));
    }

    #[test]
    fn symmetric_integer() {
        let f = Zp::new(11);
        assert_eq!(f.to_symmetric_integer(&f.to_element(8)), Integer::Natural(-3));
        assert_eq!(f.to_symmetric_integer(&f.to_element(5)), Integer::Natural(5));
    }

    #[test]
    fn sampling_stays_in_field() {
        let f = Zp::new(7);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let e = f.sample(&mut rng, (0, i64::MAX));
            assert!(f.from_element(&e) < 7);
        }
    }

    #[test]
    fn primes() {
        assert!(is_prime_u64(1031));
        assert!(!is_prime_u64(1033 * 1039));
        assert!(is_prime_u64(18446744073709551557));
        assert_eq!(
            PrimeIteratorU64::new(1024).take(3).collect::<Vec<_>>(),
            vec![1031, 1033, 1039]
        );
    }
}
