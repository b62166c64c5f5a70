use std::{
    cmp::Ordering,
    fmt::{Display, Error, Formatter},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rand::Rng;
use rug::{Complete, Integer as MultiPrecisionInteger};

use crate::utils;

use super::{
    finite_field::{FiniteFieldCore, ToFiniteField, Two, Zp, Zp64, Z2},
    EuclideanDomain, Ring,
};

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerRing;

impl Default for IntegerRing {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

/// An arbitrary-precision integer. Values that fit in an `i64` are
/// always stored as [Integer::Natural].
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Integer {
    Natural(i64),
    Large(MultiPrecisionInteger),
}

impl From<i64> for Integer {
    #[inline]
    fn from(value: i64) -> Self {
        Integer::Natural(value)
    }
}

impl From<i32> for Integer {
    #[inline]
    fn from(value: i32) -> Self {
        Integer::Natural(value as i64)
    }
}

impl From<u32> for Integer {
    #[inline]
    fn from(value: u32) -> Self {
        Integer::Natural(value as i64)
    }
}

impl From<u64> for Integer {
    #[inline]
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Integer::Natural(value as i64)
        } else {
            Integer::Large(value.into())
        }
    }
}

impl From<MultiPrecisionInteger> for Integer {
    #[inline]
    fn from(value: MultiPrecisionInteger) -> Self {
        if let Some(n) = value.to_i64() {
            Integer::Natural(n)
        } else {
            Integer::Large(value)
        }
    }
}

impl FromStr for Integer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() <= 18 {
            if let Ok(n) = s.parse::<i64>() {
                return Ok(Integer::Natural(n));
            }
        }

        s.parse::<MultiPrecisionInteger>()
            .map(Integer::from)
            .map_err(|e| format!("Could not parse integer {}: {}", s, e))
    }
}

impl std::fmt::Debug for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Integer::Natural(n) => n.fmt(f),
            Integer::Large(r) => r.fmt(f),
        }
    }
}

impl Display for IntegerRing {
    fn fmt(&self, _: &mut Formatter<'_>) -> Result<(), Error> {
        Ok(())
    }
}

impl ToFiniteField<u32> for Integer {
    fn to_finite_field(&self, field: &Zp) -> <Zp as Ring>::Element {
        match self {
            Integer::Natural(n) => field.to_element(n.rem_euclid(field.get_prime() as i64) as u32),
            Integer::Large(r) => field.to_element(r.mod_u(field.get_prime())),
        }
    }
}

impl ToFiniteField<Two> for Integer {
    fn to_finite_field(&self, _field: &Z2) -> u8 {
        match self {
            Integer::Natural(n) => (n & 1) as u8,
            Integer::Large(r) => r.is_odd() as u8,
        }
    }
}

impl ToFiniteField<u64> for Integer {
    fn to_finite_field(&self, field: &Zp64) -> <Zp64 as Ring>::Element {
        match self {
            Integer::Natural(n) => {
                let p = field.get_prime();
                let r = if *n >= 0 {
                    *n as u64 % p
                } else {
                    (p - n.unsigned_abs() % p) % p
                };
                field.to_element(r)
            }
            Integer::Large(r) => {
                let p = MultiPrecisionInteger::from(field.get_prime());
                let mut m = (r % &p).complete();
                if m < 0 {
                    m += &p;
                }
                field.to_element(m.to_u64().unwrap_or(0))
            }
        }
    }
}

impl Integer {
    pub fn new(num: i64) -> Integer {
        Integer::Natural(num)
    }

    pub fn to_multi_prec(&self) -> MultiPrecisionInteger {
        match self {
            Integer::Natural(n) => MultiPrecisionInteger::from(*n),
            Integer::Large(r) => r.clone(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Integer::Natural(0))
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        matches!(self, Integer::Natural(1))
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        match self {
            Integer::Natural(n) => *n < 0,
            Integer::Large(r) => *r < 0,
        }
    }

    #[inline]
    pub fn zero() -> Integer {
        Integer::Natural(0)
    }

    #[inline]
    pub fn one() -> Integer {
        Integer::Natural(1)
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Integer::Natural(n) => Some(*n),
            Integer::Large(_) => None,
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Integer::Natural(n) if *n >= 0 => Some(*n as u64),
            Integer::Natural(_) => None,
            Integer::Large(r) => r.to_u64(),
        }
    }

    pub fn abs(&self) -> Integer {
        match self {
            Integer::Natural(n) => {
                if *n == i64::MIN {
                    Integer::Large(MultiPrecisionInteger::from(*n).abs())
                } else {
                    Integer::Natural(n.abs())
                }
            }
            Integer::Large(r) => Integer::from(r.clone().abs()),
        }
    }

    pub fn pow(&self, mut e: u64) -> Integer {
        let mut base = self.clone();
        let mut res = Integer::one();
        while e > 0 {
            if e % 2 == 1 {
                res = &res * &base;
            }
            e /= 2;
            if e > 0 {
                base = &base * &base;
            }
        }
        res
    }

    /// Euclidean division: the remainder is always non-negative.
    pub fn quot_rem(&self, b: &Integer) -> (Integer, Integer) {
        if b.is_zero() {
            panic!("Cannot divide by zero");
        }

        match (self, b) {
            (Integer::Natural(aa), Integer::Natural(bb)) => {
                if let (Some(q), Some(r)) = (aa.checked_div_euclid(*bb), aa.checked_rem_euclid(*bb))
                {
                    (Integer::Natural(q), Integer::Natural(r))
                } else {
                    // i64::MIN / -1
                    (Integer::from(MultiPrecisionInteger::from(*aa).neg()), Integer::zero())
                }
            }
            _ => {
                let (q, r) = self.to_multi_prec().div_rem_euc(b.to_multi_prec());
                (Integer::from(q), Integer::from(r))
            }
        }
    }

    /// Compute the non-negative gcd of two integers.
    pub fn gcd(&self, b: &Integer) -> Integer {
        match (self, b) {
            (Integer::Natural(n1), Integer::Natural(n2)) => {
                Integer::from(utils::gcd_signed(*n1, *n2))
            }
            (Integer::Natural(n1), Integer::Large(r2))
            | (Integer::Large(r2), Integer::Natural(n1)) => {
                Integer::from(MultiPrecisionInteger::from(*n1).gcd(r2))
            }
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from(r1.clone().gcd(r2)),
        }
    }

    /// Compute the least common multiple of two integers.
    pub fn lcm(&self, b: &Integer) -> Integer {
        let g = self.gcd(b);
        if g.is_zero() {
            Integer::zero()
        } else {
            (&self.quot_rem(&g).0 * b).abs()
        }
    }

    /// Use Garner's algorithm for the Chinese remainder theorem
    /// to reconstruct an `x` that satisfies `n1 = x % p1` and `n2 = x % p2`.
    /// The `x` will be in the range `[-p1*p2/2,p1*p2/2]`.
    ///
    /// Returns `None` when `p1` and `p2` are not coprime.
    pub fn chinese_remainder(n1: &Integer, n2: &Integer, p1: &Integer, p2: &Integer) -> Option<Integer> {
        let p1 = p1.to_multi_prec();
        let p2 = p2.to_multi_prec();
        let n1 = n1.to_multi_prec();
        let n2 = n2.to_multi_prec();

        // convert to mixed-radix notation
        let gamma1 = (p1.clone() % &p2).invert(&p2).ok()?;

        let mut v1 = ((n2 - &n1) * gamma1) % &p2;
        if v1 < 0 {
            v1 += &p2;
        }

        // convert to standard representation
        let r = v1 * &p1 + n1;
        let modulus = p1 * p2;
        let mut r = r % &modulus;
        if r < 0 {
            r += &modulus;
        }

        let res = if r.clone() * 2 > modulus {
            r - modulus
        } else {
            r
        };

        Some(Integer::from(res))
    }

    /// Perform the symmetric mod `p` on `self`.
    #[inline]
    pub fn symmetric_mod(&self, p: &Integer) -> Integer {
        let c = self.quot_rem(p).1;

        if &c * &Integer::Natural(2) > *p {
            &c - p
        } else {
            c
        }
    }

    /// Compute the modular inverse of `self` in the ring with size `n`.
    /// Returns `None` if `self` and `n` are not coprime.
    pub fn mod_inverse(&self, n: &Integer) -> Option<Integer> {
        let mut t0 = Integer::zero();
        let mut t1 = Integer::one();
        let mut r0 = n.clone();
        let mut r1 = self.quot_rem(n).1;

        while !r1.is_zero() {
            let (q, r) = r0.quot_rem(&r1);
            (t1, t0) = (&t0 - &(&q * &t1), t1);
            (r1, r0) = (r, r1);
        }

        if !r0.is_one() {
            return None;
        }
        if t0.is_negative() {
            t0 += n;
        }

        Some(t0)
    }
}

impl PartialOrd for Integer {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Integer::Natural(n1), Integer::Natural(n2)) => n1.cmp(n2),
            (Integer::Natural(n1), Integer::Large(r2)) => r2.partial_cmp(n1).map_or(Ordering::Equal, |o| o.reverse()),
            (Integer::Large(r1), Integer::Natural(n2)) => r1.partial_cmp(n2).unwrap_or(Ordering::Equal),
            (Integer::Large(r1), Integer::Large(r2)) => r1.cmp(r2),
        }
    }
}

impl Add<&Integer> for &Integer {
    type Output = Integer;

    fn add(self, rhs: &Integer) -> Integer {
        match (self, rhs) {
            (Integer::Natural(n1), Integer::Natural(n2)) => match n1.checked_add(*n2) {
                Some(n) => Integer::Natural(n),
                None => Integer::Large(MultiPrecisionInteger::from(*n1) + *n2),
            },
            (Integer::Natural(n1), Integer::Large(r2)) | (Integer::Large(r2), Integer::Natural(n1)) => {
                Integer::from((r2 + *n1).complete())
            }
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from((r1 + r2).complete()),
        }
    }
}

impl Sub<&Integer> for &Integer {
    type Output = Integer;

    fn sub(self, rhs: &Integer) -> Integer {
        match (self, rhs) {
            (Integer::Natural(n1), Integer::Natural(n2)) => match n1.checked_sub(*n2) {
                Some(n) => Integer::Natural(n),
                None => Integer::Large(MultiPrecisionInteger::from(*n1) - *n2),
            },
            (Integer::Natural(n1), Integer::Large(r2)) => Integer::from((*n1 - r2).complete()),
            (Integer::Large(r1), Integer::Natural(n2)) => Integer::from((r1 - *n2).complete()),
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from((r1 - r2).complete()),
        }
    }
}

impl Mul<&Integer> for &Integer {
    type Output = Integer;

    fn mul(self, rhs: &Integer) -> Integer {
        match (self, rhs) {
            (Integer::Natural(n1), Integer::Natural(n2)) => match n1.checked_mul(*n2) {
                Some(n) => Integer::Natural(n),
                None => Integer::Large(MultiPrecisionInteger::from(*n1) * *n2),
            },
            (Integer::Natural(n1), Integer::Large(r2)) | (Integer::Large(r2), Integer::Natural(n1)) => {
                Integer::from((r2 * *n1).complete())
            }
            (Integer::Large(r1), Integer::Large(r2)) => Integer::from((r1 * r2).complete()),
        }
    }
}

impl Add<Integer> for Integer {
    type Output = Integer;

    #[inline]
    fn add(self, rhs: Integer) -> Integer {
        &self + &rhs
    }
}

impl Sub<Integer> for Integer {
    type Output = Integer;

    #[inline]
    fn sub(self, rhs: Integer) -> Integer {
        &self - &rhs
    }
}

impl Mul<Integer> for Integer {
    type Output = Integer;

    #[inline]
    fn mul(self, rhs: Integer) -> Integer {
        &self * &rhs
    }
}

impl AddAssign<&Integer> for Integer {
    #[inline]
    fn add_assign(&mut self, rhs: &Integer) {
        *self = &*self + rhs;
    }
}

impl SubAssign<&Integer> for Integer {
    #[inline]
    fn sub_assign(&mut self, rhs: &Integer) {
        *self = &*self - rhs;
    }
}

impl MulAssign<&Integer> for Integer {
    #[inline]
    fn mul_assign(&mut self, rhs: &Integer) {
        *self = &*self * rhs;
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        match self {
            Integer::Natural(n) => match n.checked_neg() {
                Some(n) => Integer::Natural(n),
                None => Integer::Large(MultiPrecisionInteger::from(*n).neg()),
            },
            Integer::Large(r) => Integer::from(r.clone().neg()),
        }
    }
}

impl Neg for Integer {
    type Output = Integer;

    #[inline]
    fn neg(self) -> Integer {
        (&self).neg()
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a += &(b * c);
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a -= &(b * c);
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Integer::zero()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Integer::one()
    }

    #[inline]
    fn nth(&self, n: Integer) -> Self::Element {
        n
    }

    #[inline]
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        Integer::zero()
    }

    fn size(&self) -> Option<Integer> {
        None
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            return None;
        }

        let (q, r) = a.quot_rem(b);
        if r.is_zero() {
            Some(q)
        } else {
            None
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        Integer::Natural(rng.random_range(range.0..range.1))
    }

    fn format<W: std::fmt::Write>(&self, element: &Self::Element, f: &mut W) -> Result<(), Error> {
        write!(f, "{}", element)
    }
}

impl EuclideanDomain for IntegerRing {
    #[inline]
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.quot_rem(b).1
    }

    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        a.quot_rem(b)
    }

    #[inline]
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.gcd(b)
    }
}

#[cfg(test)]
mod test {
    use super::Integer;
    use crate::domains::finite_field::{FiniteFieldCore, ToFiniteField, Zp, Zp64};

    #[test]
    fn promotion() {
        let a = Integer::Natural(i64::MAX);
        let b = &a + &Integer::one();
        assert!(matches!(b, Integer::Large(_)));
        let c = &b - &Integer::one();
        assert_eq!(c, a);

        let m = &a * &a;
        assert_eq!(m.quot_rem(&a), (a.clone(), Integer::zero()));
    }

    #[test]
    fn euclidean_division() {
        let (q, r) = Integer::Natural(-7).quot_rem(&Integer::Natural(3));
        assert_eq!(q, Integer::Natural(-3));
        assert_eq!(r, Integer::Natural(2));

        let big: Integer = "-100000000000000000000000".parse().unwrap();
        let (q, r) = big.quot_rem(&Integer::Natural(7));
        assert!(!r.is_negative());
        assert_eq!(&(&q * &Integer::Natural(7)) + &r, big);
    }

    #[test]
    fn chinese_remainder() {
        let x = Integer::chinese_remainder(
            &Integer::Natural(2),
            &Integer::Natural(3),
            &Integer::Natural(5),
            &Integer::Natural(7),
        )
        .unwrap();
        // 17 = 2 mod 5 = 3 mod 7, in the symmetric range [-17, 17]
        assert_eq!(x, Integer::Natural(17));

        let y = Integer::chinese_remainder(
            &Integer::Natural(4),
            &Integer::Natural(6),
            &Integer::Natural(5),
            &Integer::Natural(7),
        )
        .unwrap();
        assert_eq!(y, Integer::Natural(-1));

        assert!(Integer::chinese_remainder(
            &Integer::Natural(1),
            &Integer::Natural(1),
            &Integer::Natural(4),
            &Integer::Natural(6)
        )
        .is_none());
    }

    #[test]
    fn modular_inverse() {
        assert_eq!(
            Integer::Natural(3).mod_inverse(&Integer::Natural(11)),
            Some(Integer::Natural(4))
        );
        assert_eq!(Integer::Natural(6).mod_inverse(&Integer::Natural(9)), None);
        assert_eq!(
            Integer::Natural(8).symmetric_mod(&Integer::Natural(11)),
            Integer::Natural(-3)
        );
    }

    #[test]
    fn to_finite_field() {
        let f = Zp::new(17);
        let e = Integer::Natural(-1).to_finite_field(&f);
        assert_eq!(f.from_element(&e), 16);

        let big = &Integer::Natural(17).pow(30) + &Integer::Natural(5);
        assert!(matches!(big, Integer::Large(_)));
        assert_eq!(f.from_element(&big.to_finite_field(&f)), 5);

        let f64 = Zp64::new(18446744073709551557);
        let neg = Integer::Natural(-2).to_finite_field(&f64);
        assert_eq!(f64.from_element(&neg), 18446744073709551555);
    }
}
