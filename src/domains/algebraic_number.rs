//! Simple algebraic extensions `F[x]/(f)` of a field, used as Galois fields `GF(p^n)`.

use std::sync::Arc;

use tracing::debug;

use crate::poly::{univariate::UnivariatePolynomial, Variable};

use super::{
    finite_field::{FiniteField, FiniteFieldCore, FiniteFieldWorkspace},
    integer::Integer,
    EuclideanDomain, Field, Ring,
};

/// An algebraic extension of a field, with a monic, irreducible defining polynomial.
///
/// # Examples
///
/// ```
/// use polygcd::domains::{algebraic_number::AlgebraicExtension, finite_field::Zp, Ring};
///
/// let field = AlgebraicExtension::galois_field(Zp::new(3), 3);
/// assert_eq!(field.size(), Some(27.into()));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AlgebraicExtension<R: Ring> {
    poly: Arc<UnivariatePolynomial<R>>,
}

impl<UField: FiniteFieldWorkspace> AlgebraicExtension<FiniteField<UField>>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    /// Construct the Galois field `GF(prime^exp)`.
    /// The minimal polynomial is the first irreducible one found among
    /// `x^exp+c`, `x^exp+c1*x+c0` and finally all monic polynomials in lexicographic order,
    /// so the construction is deterministic.
    pub fn galois_field(prime: FiniteField<UField>, exp: usize) -> Self {
        assert!(exp > 0);

        let var = Arc::new(Variable::Temporary(0));
        let base = UnivariatePolynomial::new(&prime, Some(exp + 1), var);

        if exp == 1 {
            return AlgebraicExtension::new(base.monomial(prime.one(), 1));
        }

        let p = prime.get_prime().to_u64();
        let sample_max = p.min(1 << 16);

        let to_poly = |coeffs: &[u64]| {
            let mut c: Vec<_> = coeffs.iter().map(|c| prime.nth((*c).into())).collect();
            c.push(prime.one());
            UnivariatePolynomial::from_coefficients(&prime, c, base.variable.clone())
        };

        let mut coeffs = vec![0u64; exp];

        for k in 1..sample_max {
            coeffs[0] = k;
            let f = to_poly(&coeffs);
            if f.is_irreducible() {
                return AlgebraicExtension::new(f);
            }
        }

        for k1 in 1..sample_max {
            for k0 in 1..sample_max {
                coeffs[0] = k0;
                coeffs[1] = k1;
                let f = to_poly(&coeffs);
                if f.is_irreducible() {
                    return AlgebraicExtension::new(f);
                }
            }
        }

        // every degree has an irreducible polynomial, so this terminates
        coeffs.iter_mut().for_each(|c| *c = 0);
        loop {
            let f = to_poly(&coeffs);
            if f.is_irreducible() {
                return AlgebraicExtension::new(f);
            }

            for c in coeffs.iter_mut() {
                *c += 1;
                if *c < p {
                    break;
                }
                *c = 0;
            }
        }
    }
}

impl<R: Field> AlgebraicExtension<R> {
    /// Create a new algebraic extension from a univariate polynomial.
    /// The polynomial is made monic and should be irreducible.
    pub fn new(poly: UnivariatePolynomial<R>) -> AlgebraicExtension<R> {
        assert!(poly.degree() > 0, "The minimal polynomial must not be constant");
        debug!("New algebraic extension with minimal polynomial {}", poly);
        AlgebraicExtension {
            poly: Arc::new(poly.make_monic()),
        }
    }

    pub fn constant(&self, c: R::Element) -> AlgebraicNumber<R> {
        AlgebraicNumber {
            poly: self.poly.constant(c),
        }
    }

    /// Get the minimal polynomial.
    pub fn poly(&self) -> &UnivariatePolynomial<R> {
        &self.poly
    }

    /// The base field of the extension.
    pub fn base(&self) -> &R {
        &self.poly.field
    }

    /// Convert a polynomial in the extension variable to an element,
    /// by reducing it modulo the minimal polynomial.
    pub fn to_element(&self, poly: UnivariatePolynomial<R>) -> AlgebraicNumber<R> {
        let mut poly = if poly.degree() >= self.poly.degree() {
            poly.rem(&self.poly)
        } else {
            poly
        };
        poly.variable = self.poly.variable.clone();
        AlgebraicNumber { poly }
    }
}

impl<R: Ring> std::fmt::Debug for AlgebraicExtension<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " % {:?}", self.poly)
    }
}

impl<R: Ring> std::fmt::Display for AlgebraicExtension<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " % {}", self.poly)
    }
}

/// A number in an algebraic extension, represented by
/// a polynomial of degree lower than that of the minimal polynomial.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AlgebraicNumber<R: Ring> {
    pub(crate) poly: UnivariatePolynomial<R>,
}

impl<R: Ring> std::fmt::Debug for AlgebraicNumber<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.poly)
    }
}

impl<R: Ring> std::fmt::Display for AlgebraicNumber<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.poly)
    }
}

impl<R: Field> Ring for AlgebraicExtension<R> {
    type Element = AlgebraicNumber<R>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: &a.poly + &b.poly,
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: &a.poly - &b.poly,
        }
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: (&a.poly * &b.poly).rem(&self.poly),
        }
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.add(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.sub(a, &self.mul(b, c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: -a.poly.clone(),
        }
    }

    fn zero(&self) -> Self::Element {
        AlgebraicNumber {
            poly: self.poly.zero(),
        }
    }

    fn one(&self) -> Self::Element {
        AlgebraicNumber {
            poly: self.poly.one(),
        }
    }

    fn nth(&self, n: Integer) -> Self::Element {
        self.constant(self.poly.field.nth(n))
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut x = b.clone();
        let mut y = self.one();
        while e > 0 {
            if e % 2 == 1 {
                y = self.mul(&y, &x);
            }
            x = self.mul(&x, &x);
            e /= 2;
        }
        y
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.poly.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.poly.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        self.poly.field.characteristic()
    }

    fn size(&self) -> Option<Integer> {
        self.poly
            .field
            .size()
            .map(|s| s.pow(self.poly.degree() as u64))
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        self.try_inv(b).map(|i| self.mul(a, &i))
    }

    /// Sample an element by sampling each coefficient from the base field.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let coeffs: Vec<_> = (0..self.poly.degree())
            .map(|_| self.poly.field.sample(rng, range))
            .collect();

        AlgebraicNumber {
            poly: UnivariatePolynomial::from_coefficients(
                &self.poly.field,
                coeffs,
                self.poly.variable.clone(),
            ),
        }
    }

    fn format<W: std::fmt::Write>(
        &self,
        element: &Self::Element,
        f: &mut W,
    ) -> Result<(), std::fmt::Error> {
        if element.poly.is_constant() {
            write!(f, "{}", element.poly)
        } else {
            write!(f, "({})", element.poly)
        }
    }
}

impl<R: Field> EuclideanDomain for AlgebraicExtension<R> {
    fn rem(&self, _a: &Self::Element, _b: &Self::Element) -> Self::Element {
        self.zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), self.zero())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if Self::is_zero(a) && Self::is_zero(b) {
            self.zero()
        } else {
            self.one()
        }
    }
}

impl<R: Field> Field for AlgebraicExtension<R> {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        self.try_inv(a)
            .unwrap_or_else(|| panic!("{} is not invertible in{}", a, self))
    }

    fn try_inv(&self, a: &Self::Element) -> Option<Self::Element> {
        if a.poly.is_zero() {
            return None;
        }

        let (g, s, _) = a.poly.extended_gcd(&self.poly);
        if !g.is_one() {
            return None;
        }

        Some(AlgebraicNumber {
            poly: s.rem(&self.poly),
        })
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::domains::finite_field::{FiniteFieldCore, GaloisField, Zp};
    use crate::domains::{Field, Ring};

    use super::AlgebraicExtension;

    #[test]
    fn galois_field() {
        let field = AlgebraicExtension::galois_field(Zp::new(3), 4);
        assert_eq!(field.poly().degree(), 4);
        assert!(field.poly().is_irreducible());
        assert_eq!(field.size(), Some(81.into()));

        // the construction is deterministic
        assert_eq!(field, AlgebraicExtension::galois_field(Zp::new(3), 4));
    }

    #[test]
    fn arithmetic() {
        let base = Zp::new(3);
        let field = base.upgrade(2);
        assert_eq!(field.poly().to_string(), "_TMP_0^2+1");

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let a = field.sample(&mut rng, (0, i64::MAX));
            if a.poly.is_zero() {
                assert!(field.try_inv(&a).is_none());
                continue;
            }

            let inv = field.inv(&a);
            assert!(field.is_one(&field.mul(&a, &inv)));
        }

        // every nonzero element satisfies a^(q-1) = 1
        let x = field.to_element(field.poly().monomial(base.one(), 1));
        assert!(field.is_one(&field.pow(&x, 8)));
        assert!(!field.is_one(&field.pow(&x, 2)));
    }

    #[test]
    fn embedding() {
        let base = Zp::new(5);
        let field = base.upgrade(3);

        let c = base.to_element(4);
        let e = base.upgrade_element(&c, &field);
        assert_eq!(base.downgrade_element(&e), Ok(c));

        let x = field.to_element(field.poly().monomial(base.one(), 1));
        assert!(base.downgrade_element(&x).is_err());
    }
}
