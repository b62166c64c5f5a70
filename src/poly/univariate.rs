//! Dense univariate polynomials and their gcd algorithms.

use std::{
    cmp::Ordering,
    ops::{Add, Mul, Neg, Sub},
    sync::Arc,
};

use tracing::{debug, trace};

use crate::domains::{
    finite_field::{
        FiniteField, FiniteFieldCore, FiniteFieldWorkspace, GaloisField, PrimeIteratorU64,
        ToFiniteField, Zp64,
    },
    integer::{Integer, IntegerRing},
    EuclideanDomain, Field, Ring,
};

use super::{
    gcd::{GcdError, MAX_FAILED_SUBSTITUTIONS, MAX_OVER_ITERATIONS},
    Variable,
};

/// The first prime used for modular gcd computations over the integers.
pub const LIFTING_PRIME_START: u64 = 1 << 31;

/// A dense univariate polynomial.
#[derive(Clone)]
pub struct UnivariatePolynomial<F: Ring> {
    pub coefficients: Vec<F::Element>,
    pub variable: Arc<Variable>,
    pub field: F,
}

impl<F: Ring> std::fmt::Debug for UnivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for c in self.coefficients.iter() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?} }}", c)?;
        }
        write!(f, " ]")
    }
}

impl<F: Ring> std::fmt::Display for UnivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (e, c) in self.coefficients.iter().enumerate().rev() {
            if F::is_zero(c) {
                continue;
            }

            let cs = self.field.printer(c).to_string();
            if !first && !cs.starts_with('-') {
                write!(f, "+")?;
            }
            first = false;

            if e == 0 {
                write!(f, "{}", cs)?;
                continue;
            }

            if self.field.is_one(c) {
                write!(f, "{}", self.variable)?;
            } else {
                write!(f, "{}*{}", cs, self.variable)?;
            }

            if e > 1 {
                write!(f, "^{}", e)?;
            }
        }
        Ok(())
    }
}

impl<F: Ring> UnivariatePolynomial<F> {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable and field are inherited.
    #[inline]
    pub fn new(field: &F, cap: Option<usize>, variable: Arc<Variable>) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap.unwrap_or(0)),
            field: field.clone(),
            variable,
        }
    }

    /// Constructs a polynomial from its coefficients, ordered by ascending degree.
    pub fn from_coefficients(field: &F, coefficients: Vec<F::Element>, variable: Arc<Variable>) -> Self {
        let mut p = Self {
            coefficients,
            field: field.clone(),
            variable,
        };
        p.truncate();
        p
    }

    /// Constructs a zero polynomial, inheriting the field and variable from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self {
            coefficients: vec![],
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Constructs a constant polynomial,
    /// inheriting the field and variable from `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.field.one())
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: F::Element, exponent: usize) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        let mut coefficients = vec![self.field.zero(); exponent + 1];
        coefficients[exponent] = coeff;

        Self {
            coefficients,
            field: self.field.clone(),
            variable: self.variable.clone(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.coefficients.len() == 1 && self.field.is_one(&self.coefficients[0])
    }

    /// Returns true if the polynomial is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.coefficients.len() <= 1
    }

    /// Get the constant term of the polynomial.
    #[inline]
    pub fn get_constant(&self) -> F::Element {
        if self.is_zero() {
            return self.field.zero();
        }

        self.coefficients[0].clone()
    }

    /// Get the coefficient of `x^e`.
    #[inline]
    pub fn coefficient(&self, e: usize) -> F::Element {
        self.coefficients
            .get(e)
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> F::Element {
        self.coefficients
            .last()
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    /// The degree of the polynomial. The zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        if self.is_zero() {
            return 0;
        }

        self.coefficients.len() - 1
    }

    /// Compute `self^pow`.
    pub fn pow(&self, mut pow: usize) -> Self {
        if pow == 0 {
            return self.one();
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Multiply by `x^exp`.
    pub fn mul_exp(&self, exp: usize) -> Self {
        if exp == 0 || self.is_zero() {
            return self.clone();
        }

        let mut a = self.zero();
        a.coefficients = vec![self.field.zero(); self.degree() + exp + 1];

        for (cn, c) in a.coefficients.iter_mut().skip(exp).zip(&self.coefficients) {
            *cn = c.clone();
        }

        a
    }

    pub fn mul_coeff(mut self, coeff: &F::Element) -> Self {
        for c in &mut self.coefficients {
            if !F::is_zero(c) {
                self.field.mul_assign(c, coeff);
            }
        }

        self.truncate();
        self
    }

    pub(crate) fn truncate(&mut self) {
        let d = self
            .coefficients
            .iter()
            .rev()
            .position(|c| !F::is_zero(c))
            .unwrap_or(self.coefficients.len());

        self.coefficients.truncate(self.coefficients.len() - d);
    }

    /// Evaluate the polynomial at `x` using Horner's scheme.
    pub fn evaluate(&self, x: &F::Element) -> F::Element {
        let mut res = self.field.zero();
        for c in self.coefficients.iter().rev() {
            self.field.mul_assign(&mut res, x);
            self.field.add_assign(&mut res, c);
        }
        res
    }

    pub fn derivative(&self) -> Self {
        if self.is_constant() {
            return self.zero();
        }

        let mut res = self.zero();
        res.coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(e, c)| self.field.mul(c, &self.field.nth(Integer::from(e as u64))))
            .collect();
        res.truncate();
        res
    }

    /// Map the coefficients to another ring.
    pub fn map_coeff<U: Ring, T: Fn(&F::Element) -> U::Element>(
        &self,
        f: T,
        field: U,
    ) -> UnivariatePolynomial<U> {
        let coefficients = self.coefficients.iter().map(f).collect();
        UnivariatePolynomial::from_coefficients(&field, coefficients, self.variable.clone())
    }
}

impl<F: Ring> PartialEq for UnivariatePolynomial<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
            && (self.is_constant() || self.variable == other.variable)
    }
}

impl<F: Ring> std::hash::Hash for UnivariatePolynomial<F> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.coefficients.hash(state);
    }
}

impl<F: Ring> Eq for UnivariatePolynomial<F> {}

impl<F: Ring> PartialOrd for UnivariatePolynomial<F> {
    /// An ordering of polynomials that has no intuitive meaning.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.coefficients.len().cmp(&other.coefficients.len()) {
            Ordering::Equal => {}
            o => return Some(o),
        }

        if self == other {
            Some(Ordering::Equal)
        } else {
            None
        }
    }
}

impl<F: Ring> Add for UnivariatePolynomial<F> {
    type Output = Self;

    fn add(mut self, mut other: Self) -> Self::Output {
        debug_assert_eq!(self.field, other.field);

        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }

        if self.coefficients.len() < other.coefficients.len() {
            std::mem::swap(&mut self, &mut other);
        }

        for (i, c) in other.coefficients.iter().enumerate() {
            self.field.add_assign(&mut self.coefficients[i], c);
        }

        self.truncate();

        self
    }
}

impl<'a, 'b, F: Ring> Add<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn add(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        (self.clone()).add(other.clone())
    }
}

impl<F: Ring> Sub for UnivariatePolynomial<F> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b, F: Ring> Sub<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn sub(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        (self.clone()).add(other.clone().neg())
    }
}

impl<F: Ring> Neg for UnivariatePolynomial<F> {
    type Output = Self;
    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = self.field.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring> Mul<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    #[inline]
    fn mul(self, rhs: &'a UnivariatePolynomial<F>) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        let n = self.degree();
        let m = rhs.degree();

        if n == 0 {
            return rhs.clone().mul_coeff(&self.coefficients[0]);
        }

        if m == 0 {
            return self.clone().mul_coeff(&rhs.coefficients[0]);
        }

        let mut res = self.zero();
        res.coefficients = vec![self.field.zero(); n + m + 1];

        for (e1, c1) in self.coefficients.iter().enumerate() {
            if F::is_zero(c1) {
                continue;
            }

            for (e2, c2) in rhs.coefficients.iter().enumerate() {
                if !F::is_zero(c2) {
                    self.field
                        .add_mul_assign(&mut res.coefficients[e1 + e2], c1, c2);
                }
            }
        }

        res.truncate();
        res
    }
}

impl<'a, F: Ring> Mul<&'a UnivariatePolynomial<F>> for UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    #[inline]
    fn mul(self, rhs: &'a UnivariatePolynomial<F>) -> Self::Output {
        (&self) * rhs
    }
}

impl<F: EuclideanDomain> UnivariatePolynomial<F> {
    /// Get the content from the coefficients.
    pub fn content(&self) -> F::Element {
        let mut c = self.field.zero();
        for cc in &self.coefficients {
            // early return if possible (not possible for rationals)
            if F::one_is_gcd_unit() && self.field.is_one(&c) {
                break;
            }

            c = self.field.gcd(&c, cc);
        }
        c
    }

    /// Divide every coefficient by `other`. The division must be exact.
    pub fn div_coeff(mut self, other: &F::Element) -> Self {
        for c in &mut self.coefficients {
            let (quot, rem) = self.field.quot_rem(c, other);
            debug_assert!(F::is_zero(&rem));
            *c = quot;
        }
        self
    }

    /// Make the polynomial primitive by removing the content.
    pub fn make_primitive(self) -> Self {
        if self.is_zero() {
            return self;
        }

        let c = self.content();
        if self.field.is_one(&c) {
            self
        } else {
            self.div_coeff(&c)
        }
    }

    /// Compute the quotient if `div` divides `self`.
    pub fn divides(&self, div: &UnivariatePolynomial<F>) -> Option<UnivariatePolynomial<F>> {
        if self.is_zero() {
            return Some(self.clone());
        }

        if div.is_zero() || self.degree() < div.degree() {
            return None;
        }

        let (q, r) = self.quot_rem(div);
        if r.is_zero() {
            Some(q)
        } else {
            None
        }
    }

    /// Compute the remainder `self % div`.
    pub fn rem(&self, div: &UnivariatePolynomial<F>) -> Self {
        self.quot_rem(div).1
    }

    /// Divide `self` by `div`. If a leading coefficient of the running remainder is
    /// not divisible by the leading coefficient of `div`, the division stops and
    /// the partial quotient and remainder are returned.
    pub fn quot_rem(&self, div: &Self) -> (Self, Self) {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() || self.degree() < div.degree() {
            return (self.zero(), self.clone());
        }

        let n = self.degree();
        let m = div.degree();
        let lc = div.lcoeff();

        let mut q = vec![self.field.zero(); n - m + 1];
        let mut r = self.coefficients.clone();

        for k in (0..=n - m).rev() {
            if F::is_zero(&r[k + m]) {
                continue;
            }

            let (qq, rr) = self.field.quot_rem(&r[k + m], &lc);
            if !F::is_zero(&rr) {
                break;
            }

            for (j, d) in div.coefficients.iter().enumerate() {
                if !F::is_zero(d) {
                    self.field.sub_mul_assign(&mut r[k + j], &qq, d);
                }
            }
            q[k] = qq;
        }

        let mut q = UnivariatePolynomial {
            coefficients: q,
            field: self.field.clone(),
            variable: self.variable.clone(),
        };
        q.truncate();
        let mut r = UnivariatePolynomial {
            coefficients: r,
            field: self.field.clone(),
            variable: self.variable.clone(),
        };
        r.truncate();

        (q, r)
    }

    /// Compute the pseudo-remainder `lc(div)^(deg(self)-deg(div)+1) * self mod div`.
    pub fn pseudo_rem(&self, div: &Self) -> Self {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() || self.degree() < div.degree() {
            return self.clone();
        }

        let m = div.degree();
        let lc = div.lcoeff();
        let mut e = self.degree() - m + 1;
        let mut r = self.clone();

        while !r.is_zero() && r.degree() >= m {
            let shift = r.degree() - m;
            let s = div.mul_exp(shift).mul_coeff(&r.lcoeff());
            r = r.mul_coeff(&lc) - s;
            e -= 1;
        }

        if e > 0 {
            r.mul_coeff(&self.field.pow(&lc, e as u64))
        } else {
            r
        }
    }

    /// Compute the subresultant polynomial remainder sequence of `self` and `other`.
    /// The sequence starts with the input of highest degree, and
    /// the last entry is an associate of the gcd up to content.
    pub fn subresultant_prs(&self, other: &Self) -> Vec<Self> {
        let (mut a, mut b) = if self.degree() >= other.degree() {
            (self.clone(), other.clone())
        } else {
            (other.clone(), self.clone())
        };

        if b.is_zero() {
            return vec![a];
        }

        let mut seq = vec![a.clone(), b.clone()];

        let mut g = self.field.one();
        let mut h = self.field.one();
        loop {
            let delta = a.degree() - b.degree();
            let r = a.pseudo_rem(&b);
            if r.is_zero() {
                break;
            }

            let scale = self.field.mul(&g, &self.field.pow(&h, delta as u64));
            a = b;
            b = r.div_coeff(&scale);
            g = a.lcoeff();

            if delta > 0 {
                let num = self.field.pow(&g, delta as u64);
                let den = self.field.pow(&h, delta as u64 - 1);
                h = self.field.quot_rem(&num, &den).0;
            }

            seq.push(b.clone());
        }

        seq
    }
}

impl<F: Field> UnivariatePolynomial<F> {
    /// Compute the univariate GCD using Euclid's algorithm. The result is normalized to 1.
    pub fn gcd(&self, b: &Self) -> Self {
        if self.is_zero() {
            return b.clone().make_monic();
        }
        if b.is_zero() {
            return self.clone().make_monic();
        }

        let mut c = self.clone();
        let mut d = b.clone();
        if self.degree() < b.degree() {
            std::mem::swap(&mut c, &mut d);
        }

        let mut r = c.rem(&d);
        while !r.is_zero() {
            c = d;
            d = r;
            r = c.rem(&d);
        }

        d.make_monic()
    }

    /// Compute `(g, s, t)` where `self * s + other * t = g`
    /// and `g` is the monic gcd of `self` and `other`.
    pub fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        let mut r0 = self.clone();
        let mut r1 = other.clone();
        let mut s0 = self.one();
        let mut s1 = self.zero();
        let mut t0 = self.zero();
        let mut t1 = self.one();

        while !r1.is_zero() {
            let (q, r) = r0.quot_rem(&r1);
            r0 = std::mem::replace(&mut r1, r);
            let s = &s0 - &(&q * &s1);
            s0 = std::mem::replace(&mut s1, s);
            let t = &t0 - &(&q * &t1);
            t0 = std::mem::replace(&mut t1, t);
        }

        if r0.is_zero() {
            return (r0, s0, t0);
        }

        let inv = self.field.inv(&r0.lcoeff());
        (r0.mul_coeff(&inv), s0.mul_coeff(&inv), t0.mul_coeff(&inv))
    }

    /// Make the polynomial monic, i.e., make the leading coefficient `1`.
    pub fn make_monic(self) -> Self {
        if self.is_zero() || self.field.is_one(&self.lcoeff()) {
            return self;
        }

        let inv = self.field.inv(&self.lcoeff());
        self.mul_coeff(&inv)
    }

    /// Compute `self^e mod m`.
    pub fn pow_mod(&self, mut e: u64, m: &Self) -> Self {
        let mut x = self.rem(m);
        let mut y = self.one();
        while e > 0 {
            if e % 2 == 1 {
                y = (&y * &x).rem(m);
            }

            x = (&x * &x).rem(m);
            e /= 2;
        }
        y
    }
}

fn prime_divisors(mut n: usize) -> Vec<usize> {
    let mut res = vec![];
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            res.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        res.push(n);
    }
    res
}

impl<UField: FiniteFieldWorkspace> UnivariatePolynomial<FiniteField<UField>>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    /// Test irreducibility over a prime field with Rabin's test:
    /// `f` of degree `n` is irreducible iff `x^(p^n) = x mod f`
    /// and `gcd(x^(p^(n/r)) - x, f) = 1` for every prime divisor `r` of `n`.
    pub fn is_irreducible(&self) -> bool {
        let n = self.degree();
        if self.is_zero() || n == 0 {
            return false;
        }
        if n == 1 {
            return true;
        }

        let f = self.clone().make_monic();
        let q = self.field.get_prime().to_u64();
        let x = self.monomial(self.field.one(), 1);

        // frobenius[k] = x^(q^(k+1)) mod f
        let mut frobenius = Vec::with_capacity(n);
        let mut h = x.clone();
        for _ in 0..n {
            h = h.pow_mod(q, &f);
            frobenius.push(h.clone());
        }

        if frobenius[n - 1] != x {
            return false;
        }

        for r in prime_divisors(n) {
            let d = &frobenius[n / r - 1] - &x;
            if d.is_zero() || d.gcd(&f).degree() > 0 {
                return false;
            }
        }

        true
    }
}

impl UnivariatePolynomial<IntegerRing> {
    /// Map the polynomial to a prime field.
    pub fn to_finite_field<UField: FiniteFieldWorkspace>(
        &self,
        field: &FiniteField<UField>,
    ) -> UnivariatePolynomial<FiniteField<UField>>
    where
        Integer: ToFiniteField<UField>,
        FiniteField<UField>: FiniteFieldCore<UField>,
    {
        self.map_coeff(|c| c.to_finite_field(field), field.clone())
    }

    /// Lift a polynomial over a prime field to the integers, using the symmetric representation.
    pub fn from_finite_field<UField: FiniteFieldWorkspace>(
        poly: &UnivariatePolynomial<FiniteField<UField>>,
    ) -> UnivariatePolynomial<IntegerRing>
    where
        FiniteField<UField>: FiniteFieldCore<UField>,
    {
        poly.map_coeff(|c| poly.field.to_symmetric_integer(c), IntegerRing::new())
    }

    /// A bound on the coefficients of any factor of `self`: `2^deg * |self|_1`.
    pub fn mignotte_bound(&self) -> Integer {
        let mut norm = Integer::zero();
        for c in &self.coefficients {
            norm += &c.abs();
        }

        &Integer::Natural(2).pow(self.degree() as u64) * &norm
    }

    /// Compute the gcd over the integers with the modular algorithm. The images modulo
    /// primes are combined with the Chinese remainder theorem until the modulus exceeds
    /// twice the Mignotte bound or the candidate is stable for two consecutive primes.
    /// The result has a positive leading coefficient.
    pub fn modular_gcd(&self, other: &Self) -> Result<Self, GcdError> {
        self.modular_gcd_over(other, PrimeIteratorU64::new(LIFTING_PRIME_START))
    }

    fn modular_gcd_over(
        &self,
        other: &Self,
        primes: impl IntoIterator<Item = u64>,
    ) -> Result<Self, GcdError> {
        if self.is_zero() {
            return Ok(other.clone().normalize_sign());
        }
        if other.is_zero() {
            return Ok(self.clone().normalize_sign());
        }

        let ca = self.content();
        let cb = other.content();
        let content = ca.gcd(&cb);

        let a = self.clone().div_coeff(&ca);
        let b = other.clone().div_coeff(&cb);

        if a.degree() == 0 || b.degree() == 0 {
            return Ok(self.constant(content));
        }

        let lc_gcd = a.lcoeff().gcd(&b.lcoeff());

        let bound = {
            let ba = a.mignotte_bound();
            let bb = b.mignotte_bound();
            &(&lc_gcd * &(if ba < bb { ba } else { bb })) * &Integer::Natural(2)
        };

        let mut image: Option<UnivariatePolynomial<IntegerRing>> = None;
        let mut modulus = Integer::one();
        let mut previous: Option<UnivariatePolynomial<IntegerRing>> = None;
        let mut restarts = 0;
        let mut failed_primes = 0;

        for p in primes {
            if failed_primes > MAX_FAILED_SUBSTITUTIONS {
                break;
            }

            let field = Zp64::new(p);
            let pi = Integer::from(p);

            if lc_gcd.quot_rem(&pi).1.is_zero() {
                continue;
            }

            let ap = a.to_finite_field(&field);
            let bp = b.to_finite_field(&field);
            if ap.degree() != a.degree() || bp.degree() != b.degree() {
                continue;
            }

            let gp = ap.gcd(&bp);
            if gp.degree() == 0 {
                return Ok(self.constant(content));
            }

            let gp = gp.mul_coeff(&lc_gcd.to_finite_field(&field));

            let lifted = match image.take() {
                Some(h) if gp.degree() == h.degree() => {
                    let mut coeffs = Vec::with_capacity(h.coefficients.len());
                    for (i, hc) in h.coefficients.iter().enumerate() {
                        let gc = field.to_symmetric_integer(&gp.coefficient(i));
                        coeffs.push(
                            Integer::chinese_remainder(hc, &gc, &modulus, &pi)
                                .ok_or(GcdError::LiftingExhausted)?,
                        );
                    }
                    modulus = &modulus * &pi;
                    UnivariatePolynomial::from_coefficients(&h.field, coeffs, h.variable.clone())
                }
                Some(h) if gp.degree() > h.degree() => {
                    trace!("Skipping unlucky prime {}", p);
                    failed_primes += 1;
                    image = Some(h);
                    continue;
                }
                h => {
                    if h.is_some() {
                        restarts += 1;
                        if restarts > MAX_OVER_ITERATIONS {
                            return Err(GcdError::LiftingExhausted);
                        }
                    }

                    debug!("New image chain at prime {} of degree {}", p, gp.degree());
                    modulus = pi;
                    previous = None;
                    UnivariatePolynomial::from_finite_field(&gp)
                }
            };
            failed_primes = 0;

            let candidate = lifted.clone().make_primitive().normalize_sign();
            image = Some(lifted);

            if modulus > bound || previous.as_ref() == Some(&candidate) {
                if a.divides(&candidate).is_some() && b.divides(&candidate).is_some() {
                    return Ok(candidate.mul_coeff(&content));
                }

                if modulus > bound {
                    debug!("Candidate {} does not divide beyond the Mignotte bound", candidate);
                    restarts += 1;
                    if restarts > MAX_OVER_ITERATIONS {
                        return Err(GcdError::LiftingExhausted);
                    }
                    image = None;
                    previous = None;
                    continue;
                }
            }

            previous = Some(candidate);
        }

        Err(GcdError::LiftingExhausted)
    }

    /// Make the leading coefficient positive.
    pub fn normalize_sign(self) -> Self {
        if self.lcoeff().is_negative() {
            -self
        } else {
            self
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::{
        finite_field::{FiniteFieldCore, PrimeIteratorU64, Zp},
        integer::{Integer, Z},
        Ring,
    };
    use crate::poly::{gcd::GcdError, Variable};

    use super::{UnivariatePolynomial, LIFTING_PRIME_START};

    fn zp(field: &Zp, coeffs: &[u32]) -> UnivariatePolynomial<Zp> {
        UnivariatePolynomial::from_coefficients(
            field,
            coeffs.iter().map(|c| field.to_element(*c)).collect(),
            Arc::new(Variable::from("x")),
        )
    }

    fn int(coeffs: &[i64]) -> UnivariatePolynomial<crate::domains::integer::IntegerRing> {
        UnivariatePolynomial::from_coefficients(
            &Z,
            coeffs.iter().map(|c| Integer::Natural(*c)).collect(),
            Arc::new(Variable::from("x")),
        )
    }

    #[test]
    fn arithmetic() {
        let f = Zp::new(17);
        let a = zp(&f, &[1, 1]);
        let b = zp(&f, &[16, 1]);

        let p = &a * &b;
        assert_eq!(p, zp(&f, &[16, 0, 1]));
        assert_eq!(f.from_element(&p.evaluate(&f.to_element(3))), 8);
        assert_eq!(p.derivative(), zp(&f, &[0, 2]));
        assert_eq!(p.to_string(), "x^2+16");

        let (q, r) = p.quot_rem(&a);
        assert_eq!(q, b);
        assert!(r.is_zero());
    }

    #[test]
    fn field_gcd() {
        let f = Zp::new(17);
        let a = &zp(&f, &[1, 1]) * &zp(&f, &[2, 1]);
        let b = &zp(&f, &[1, 1]) * &zp(&f, &[3, 1]);

        assert_eq!(a.gcd(&b), zp(&f, &[1, 1]));

        let (g, s, t) = a.extended_gcd(&b);
        assert_eq!(g, zp(&f, &[1, 1]));
        assert_eq!(&(&a * &s) + &(&b * &t), g);
    }

    #[test]
    fn subresultants() {
        let a = int(&[-5, 2, 8, -3, -3, 0, 1, 0, 1]);
        let b = int(&[21, -9, -4, 0, 5, 0, 3]);

        let prs = a.subresultant_prs(&b);
        assert_eq!(prs.len(), 6);
        assert_eq!(prs[2], int(&[-9, 0, 3, 0, -15]));
        assert_eq!(prs[3], int(&[-245, 125, 65]));
        assert_eq!(prs[4], int(&[12300, -9326]));
        assert_eq!(prs[5], int(&[260708]));
    }

    #[test]
    fn integer_gcd() {
        // (6x+9) and (4x+6) share 2x+3
        let a = &int(&[9, 6]) * &int(&[-5, 0, 1]);
        let b = &int(&[6, 4]) * &int(&[7, 1]);

        assert_eq!(a.modular_gcd(&b), Ok(int(&[3, 2])));
        assert_eq!(int(&[4, 8]).modular_gcd(&int(&[6])), Ok(int(&[2])));

        let big = int(&[-1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        let g = big.modular_gcd(&int(&[1, 0, 0, 0, 0, 0, 1]).mul_coeff(&Integer::Natural(-4)));
        assert_eq!(g, Ok(int(&[1, 0, 0, 0, 0, 0, 1])));
    }

    #[test]
    fn lifting_gives_up_on_unlucky_primes() {
        // x and x + p1*p2 share the factor x modulo the first two lifting primes only
        let primes: Vec<_> = PrimeIteratorU64::new(LIFTING_PRIME_START).take(2).collect();
        let shift = &Integer::from(primes[0]) * &Integer::from(primes[1]);

        let a = int(&[0, 1]);
        let b = UnivariatePolynomial::from_coefficients(&Z, vec![shift, Integer::one()], a.variable.clone());

        assert_eq!(a.modular_gcd_over(&b, primes), Err(GcdError::LiftingExhausted));
        assert_eq!(a.modular_gcd(&b), Ok(int(&[1])));
    }

    #[test]
    fn irreducibility() {
        let f = Zp::new(3);
        assert!(zp(&f, &[1, 0, 1]).is_irreducible());
        assert!(!zp(&f, &[2, 0, 1]).is_irreducible());
        assert!(zp(&f, &[1, 2, 0, 1]).is_irreducible());
        assert!(!(&zp(&f, &[1, 0, 1]) * &zp(&f, &[1, 0, 1])).is_irreducible());
        assert!(Z.is_one(&Integer::one()));
    }
}
