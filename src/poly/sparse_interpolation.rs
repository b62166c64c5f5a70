//! Sparse interpolation of a gcd image from a known monomial skeleton.
//!
//! Given a skeleton of the gcd, the variables `x_1, ..., x_{n-1}` are raised:
//! they are set to `p_k^r` for random nonzero points `p_k` and `r = 1, 2, ...`,
//! which turns the inputs into univariate polynomials in `x_0`. Their univariate
//! gcds provide the right-hand sides of linear systems whose unknowns are
//! the coefficients of the skeleton. The terms with the same power of `x_0`
//! form a stratum, and the system of a stratum is a transposed Vandermonde
//! system in the values of its monomials at the points.
//!
//! Since every univariate gcd is only known up to a scale, one coefficient
//! needs to be fixed. If a stratum has a single term, its coefficient is set to
//! one ([InterpolationMode::Monic]). Otherwise the unknown scales are added
//! to one combined system over all strata ([InterpolationMode::LinZip]).

use std::collections::BTreeMap;

use ahash::HashMap;
use rand::RngCore;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::domains::Field;
use crate::tensors::matrix::{solve_vandermonde_transposed, LinearSolution, Matrix};

use super::gcd::{GcdError, MAX_FAILED_SUBSTITUTIONS, NUMBER_OF_UNDER_DETERMINED_RETRIES};
use super::polynomial::MultivariatePolynomial;
use super::univariate::UnivariatePolynomial;
use super::{Exponent, INLINED_EXPONENTS};

/// Systems with at most this many unknowns are solved by Gaussian elimination,
/// larger ones with the transposed Vandermonde solver.
pub const MAX_GAUSSIAN_UNKNOWNS: usize = 8;

/// Sample a random nonzero element of the field.
pub(crate) fn sample_nonzero<F: Field>(field: &F, mut rng: &mut dyn RngCore) -> F::Element {
    loop {
        let v = field.sample(&mut rng, (0, i64::MAX));
        if !F::is_zero(&v) {
            return v;
        }
    }
}

/// The strategy used to fix the scale of the univariate images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationMode {
    /// The skeleton has a single term.
    Trivial,
    /// The skeleton term with this index is alone in its stratum and gets coefficient one.
    Monic { scaling: usize },
    /// One unknown scale per image, solved together with all coefficients.
    LinZip,
}

/// Skeleton terms that share the same power of `x_0`.
#[derive(Clone, Debug)]
struct Stratum {
    exponent: usize,
    terms: Vec<usize>,
}

/// Univariate images in `x_0` of a polynomial at increasing powers of the points.
struct RaisedImages<'p, F: Field, E: Exponent> {
    poly: &'p MultivariatePolynomial<F, E>,
    base: Vec<F::Element>,
    current: Vec<F::Element>,
    degree: usize,
}

impl<'p, F: Field, E: Exponent> RaisedImages<'p, F, E> {
    fn new(poly: &'p MultivariatePolynomial<F, E>, points: &[F::Element]) -> Self {
        let base = monomial_values(poly, points);
        RaisedImages {
            poly,
            current: vec![poly.field.one(); base.len()],
            base,
            degree: poly.degree(0).to_u32() as usize,
        }
    }

    /// The image at the next power of the points.
    fn next_image(&mut self) -> UnivariatePolynomial<F> {
        let field = &self.poly.field;
        let mut coeffs = vec![field.zero(); self.degree + 1];
        for ((t, cur), base) in self.poly.into_iter().zip(&mut self.current).zip(&self.base) {
            field.mul_assign(cur, base);
            field.add_mul_assign(&mut coeffs[t.exponents[0].to_u32() as usize], t.coefficient, cur);
        }

        UnivariatePolynomial::from_coefficients(field, coeffs, self.poly.variables[0].clone().into())
    }
}

/// For every term, the product of `points[k - 1]^e_k` over the raised variables `k`.
fn monomial_values<F: Field, E: Exponent>(poly: &MultivariatePolynomial<F, E>, points: &[F::Element]) -> Vec<F::Element> {
    poly.exponents_iter()
        .map(|e| {
            let mut w = poly.field.one();
            for (p, ee) in points.iter().zip(&e[1..]) {
                if !ee.is_zero() {
                    poly.field.mul_assign(&mut w, &poly.field.pow(p, ee.to_u32() as u64));
                }
            }
            w
        })
        .collect()
}

/// Check that evaluating the raised variables at the points keeps every power of `x_0`.
fn keeps_main_exponents<F: Field, E: Exponent>(
    poly: &MultivariatePolynomial<F, E>,
    points: &[F::Element],
) -> bool {
    let values = monomial_values(poly, points);
    let raised = points.len();

    let mut groups: HashMap<SmallVec<[E; INLINED_EXPONENTS]>, F::Element> = HashMap::default();
    for (t, w) in poly.into_iter().zip(&values) {
        let mut key: SmallVec<[E; INLINED_EXPONENTS]> = t.exponents.into();
        for e in &mut key[1..=raised] {
            *e = E::zero();
        }

        let entry = groups.entry(key).or_insert_with(|| poly.field.zero());
        poly.field.add_mul_assign(entry, t.coefficient, w);
    }

    let mut before: Vec<E> = poly.exponents_iter().map(|e| e[0]).collect();
    before.sort_unstable();
    before.dedup();

    let mut after: Vec<E> = groups
        .iter()
        .filter(|(_, c)| !F::is_zero(c))
        .map(|(k, _)| k[0])
        .collect();
    after.sort_unstable();
    after.dedup();

    before == after
}

/// Reconstructs images of a gcd with a known skeleton, for different values of
/// the variable `variable`. The variables `x_1, ..., x_{variable - 1}` are raised.
pub struct SparseInterpolation<'a, F: Field, E: Exponent> {
    variable: usize,
    a: &'a MultivariatePolynomial<F, E>,
    b: &'a MultivariatePolynomial<F, E>,
    skeleton: MultivariatePolynomial<F, E>,
    points: Vec<F::Element>,
    values: Vec<F::Element>,
    strata: Vec<Stratum>,
    mode: InterpolationMode,
}

impl<'a, F: Field, E: Exponent> SparseInterpolation<'a, F, E> {
    /// Prepare the interpolation of `gcd(a, b)` with the monomials of `skeleton`.
    ///
    /// If `variable` equals the number of variables, no variable is fixed and
    /// [evaluate](Self::evaluate) reconstructs the gcd of `a` and `b` directly.
    pub fn new(
        variable: usize,
        a: &'a MultivariatePolynomial<F, E>,
        b: &'a MultivariatePolynomial<F, E>,
        skeleton: &MultivariatePolynomial<F, E>,
        rng: &mut dyn RngCore,
        force_linzip: bool,
    ) -> Result<Self, GcdError> {
        let skeleton = skeleton.skeleton();

        let mut strata_map: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, e) in skeleton.exponents_iter().enumerate() {
            strata_map.entry(e[0].to_u32() as usize).or_default().push(i);
        }
        let strata: Vec<_> = strata_map
            .into_iter()
            .map(|(exponent, terms)| Stratum { exponent, terms })
            .collect();

        let mode = if skeleton.nterms() == 1 {
            InterpolationMode::Trivial
        } else if force_linzip && strata.len() > 1 {
            InterpolationMode::LinZip
        } else if let Some(s) = strata.iter().rev().find(|s| s.terms.len() == 1) {
            InterpolationMode::Monic { scaling: s.terms[0] }
        } else {
            InterpolationMode::LinZip
        };

        let field = a.field.clone();
        let raised = variable.saturating_sub(1);

        for attempt in 0..MAX_FAILED_SUBSTITUTIONS {
            let points: Vec<_> = (0..raised).map(|_| sample_nonzero(&field, rng)).collect();
            let values = monomial_values(&skeleton, &points);

            let distinct = strata.iter().all(|s| {
                s.terms.iter().enumerate().all(|(i, t)| {
                    s.terms[..i].iter().all(|t2| values[*t2] != values[*t])
                })
            });

            if !distinct
                || !keeps_main_exponents(a, &points)
                || !keeps_main_exponents(b, &points)
            {
                trace!("Rejected sparse interpolation points at attempt {}", attempt);
                continue;
            }

            debug!(
                "Sparse interpolation of {} terms in {} strata with mode {:?}",
                skeleton.nterms(),
                strata.len(),
                mode
            );

            return Ok(SparseInterpolation {
                variable,
                a,
                b,
                skeleton,
                points,
                values,
                strata,
                mode,
            });
        }

        Err(GcdError::EvaluationStackExhausted)
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// The number of univariate images needed for one reconstruction, when no
    /// system turns out to be under-determined.
    pub fn required_images(&self) -> usize {
        match self.mode {
            InterpolationMode::Trivial => 1,
            InterpolationMode::Monic { .. } => self.strata.iter().map(|s| s.terms.len()).max().unwrap_or(1),
            InterpolationMode::LinZip => self.linzip_images(),
        }
    }

    fn linzip_images(&self) -> usize {
        // each image adds one equation per stratum and one unknown scale
        let n = self.skeleton.nterms();
        let s = self.strata.len();
        if s < 2 {
            return n;
        }
        ((n - 1) + (s - 2)) / (s - 1)
    }

    /// Reconstruct the image of the gcd with `x_variable = value`.
    pub fn evaluate_at(&self, value: &F::Element) -> Result<MultivariatePolynomial<F, E>, GcdError> {
        debug_assert!(self.variable < self.a.nvars());
        let a = self.a.replace(self.variable, value);
        let b = self.b.replace(self.variable, value);
        self.reconstruct(&a, &b)
    }

    /// Reconstruct the gcd of the polynomials without fixing a variable.
    pub fn evaluate(&self) -> Result<MultivariatePolynomial<F, E>, GcdError> {
        self.reconstruct(self.a, self.b)
    }

    fn reconstruct(
        &self,
        a: &MultivariatePolynomial<F, E>,
        b: &MultivariatePolynomial<F, E>,
    ) -> Result<MultivariatePolynomial<F, E>, GcdError> {
        let mut ia = RaisedImages::new(a, &self.points);
        let mut ib = RaisedImages::new(b, &self.points);

        match self.mode {
            InterpolationMode::Trivial => {
                let g = self.next_image(&mut ia, &mut ib)?;
                if g.coefficients.iter().filter(|c| !F::is_zero(c)).count() != 1 {
                    debug!("Single term skeleton does not match the image {}", g);
                    return Err(GcdError::DegreeBoundRevision);
                }
                Ok(self.skeleton.clone())
            }
            InterpolationMode::Monic { scaling } => self.reconstruct_monic(&mut ia, &mut ib, scaling),
            InterpolationMode::LinZip => self.reconstruct_linzip(&mut ia, &mut ib),
        }
    }

    /// Compute the next pair of images and their monic gcd, checking it against the skeleton.
    fn next_image(
        &self,
        ia: &mut RaisedImages<F, E>,
        ib: &mut RaisedImages<F, E>,
    ) -> Result<UnivariatePolynomial<F>, GcdError> {
        let ua = ia.next_image();
        let ub = ib.next_image();

        if ua.is_zero() || ub.is_zero() || ua.degree() != ia.degree || ub.degree() != ib.degree {
            trace!("Raised image lost its degree");
            return Err(GcdError::UnluckyEvaluation);
        }

        let g = ua.gcd(&ub);
        let skeleton_degree = self.strata.last().map(|s| s.exponent).unwrap_or(0);

        if g.degree() > skeleton_degree {
            trace!("Raised image gcd {} has too high degree", g);
            return Err(GcdError::UnluckyEvaluation);
        }

        if g.degree() < skeleton_degree {
            debug!("Raised image gcd {} has lower degree than the skeleton", g);
            return Err(GcdError::DegreeBoundRevision);
        }

        for (e, c) in g.coefficients.iter().enumerate() {
            if !F::is_zero(c) && self.strata.iter().all(|s| s.exponent != e) {
                debug!("Raised image gcd {} has terms outside the skeleton", g);
                return Err(GcdError::DegreeBoundRevision);
            }
        }

        Ok(g)
    }

    fn reconstruct_monic(
        &self,
        ia: &mut RaisedImages<F, E>,
        ib: &mut RaisedImages<F, E>,
        scaling: usize,
    ) -> Result<MultivariatePolynomial<F, E>, GcdError> {
        let field = &self.a.field;
        let needed = self.required_images();
        let scaling_exponent = self.skeleton.exponents(scaling)[0].to_u32() as usize;

        // the scale of image r is chosen such that the scaling term has coefficient 1
        let mut scaled_images = Vec::with_capacity(needed);
        let mut w_pow = field.one();
        for _ in 0..needed {
            let g = self.next_image(ia, ib)?;
            field.mul_assign(&mut w_pow, &self.values[scaling]);

            let Some(inv) = field.try_inv(&g.coefficient(scaling_exponent)) else {
                trace!("Scaling term vanishes in image {}", g);
                return Err(GcdError::UnluckyEvaluation);
            };
            scaled_images.push(g.mul_coeff(&field.mul(&w_pow, &inv)));
        }

        let mut coefficients = vec![field.zero(); self.skeleton.nterms()];
        for s in &self.strata {
            let values: Vec<_> = s.terms.iter().map(|t| self.values[*t].clone()).collect();
            let rhs: Vec<_> = scaled_images[..s.terms.len()]
                .iter()
                .map(|g| g.coefficient(s.exponent))
                .collect();

            let sol = solve_stratum(field, &values, &rhs)?;
            for (t, c) in s.terms.iter().zip(sol) {
                coefficients[*t] = c;
            }
        }

        Ok(self.build(coefficients))
    }

    fn reconstruct_linzip(
        &self,
        ia: &mut RaisedImages<F, E>,
        ib: &mut RaisedImages<F, E>,
    ) -> Result<MultivariatePolynomial<F, E>, GcdError> {
        let field = &self.a.field;
        let nterms = self.skeleton.nterms();
        if self.strata.len() < 2 {
            debug!("LinZip needs at least two strata");
            return Err(GcdError::UnluckyEvaluation);
        }

        let mut images = Vec::new();
        let mut nimages = self.linzip_images().max(1);

        for retry in 0..=NUMBER_OF_UNDER_DETERMINED_RETRIES {
            while images.len() < nimages {
                images.push(self.next_image(ia, ib)?);
            }

            // unknowns: the coefficients, followed by the scales of images 2, 3, ...
            let ncols = nterms + nimages - 1;
            let nrows = nimages * self.strata.len();
            let mut data = vec![field.zero(); nrows * ncols];
            let mut rhs = vec![field.zero(); nrows];

            let mut powers = vec![field.one(); nterms];
            for (r, g) in images.iter().enumerate() {
                for (p, w) in powers.iter_mut().zip(&self.values) {
                    field.mul_assign(p, w);
                }

                for (si, s) in self.strata.iter().enumerate() {
                    let row = r * self.strata.len() + si;
                    for t in &s.terms {
                        data[row * ncols + t] = powers[*t].clone();
                    }

                    let c = g.coefficient(s.exponent);
                    if r == 0 {
                        rhs[row] = c;
                    } else {
                        data[row * ncols + nterms + r - 1] = field.neg(&c);
                    }
                }
            }

            let m = Matrix::from_linear(data, nrows as u32, ncols as u32, field.clone())
                .map_err(|_| GcdError::UnluckyEvaluation)?;
            match m.solve_system(&rhs) {
                Ok(LinearSolution::Consistent(sol)) => {
                    return Ok(self.build(sol.into_iter().take(nterms).collect()));
                }
                Ok(LinearSolution::UnderDetermined) => {
                    trace!("Under-determined LinZip system at retry {}", retry);
                    nimages += 1;
                }
                Ok(LinearSolution::Inconsistent) => {
                    debug!("Inconsistent LinZip system: the skeleton is wrong");
                    return Err(GcdError::DegreeBoundRevision);
                }
                Err(_) => return Err(GcdError::UnluckyEvaluation),
            }
        }

        debug!("LinZip system stayed under-determined");
        Err(GcdError::UnluckyEvaluation)
    }

    fn build(&self, coefficients: Vec<F::Element>) -> MultivariatePolynomial<F, E> {
        let mut res = self.skeleton.zero_with_capacity(coefficients.len());
        for (i, c) in coefficients.into_iter().enumerate() {
            res.append_monomial(c, self.skeleton.exponents(i));
        }
        res
    }
}

/// Solve `sum_j values[j]^r * x_j = rhs[r - 1]` for `r = 1..n`.
fn solve_stratum<F: Field>(
    field: &F,
    values: &[F::Element],
    rhs: &[F::Element],
) -> Result<Vec<F::Element>, GcdError> {
    let n = values.len();

    let solution = if n <= MAX_GAUSSIAN_UNKNOWNS {
        let mut data = Vec::with_capacity(n * n);
        let mut row = values.to_vec();
        for _ in 0..n {
            data.extend(row.iter().cloned());
            for (r, v) in row.iter_mut().zip(values) {
                field.mul_assign(r, v);
            }
        }

        let m = Matrix::from_linear(data, n as u32, n as u32, field.clone())
            .map_err(|_| GcdError::UnluckyEvaluation)?;
        m.solve_system(rhs).map_err(|_| GcdError::UnluckyEvaluation)?
    } else {
        // the Vandermonde solver starts at power 0, so it solves for values[j] * x_j
        match solve_vandermonde_transposed(field, values, rhs).map_err(|_| GcdError::UnluckyEvaluation)? {
            LinearSolution::Consistent(y) => {
                let mut x = Vec::with_capacity(n);
                for (yy, v) in y.iter().zip(values) {
                    x.push(field.div(yy, v));
                }
                LinearSolution::Consistent(x)
            }
            other => other,
        }
    };

    match solution {
        LinearSolution::Consistent(x) => Ok(x),
        LinearSolution::UnderDetermined => Err(GcdError::UnluckyEvaluation),
        LinearSolution::Inconsistent => Err(GcdError::DegreeBoundRevision),
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::Ring;
    use crate::parser::parse_polynomial;

    use super::{solve_stratum, InterpolationMode, SparseInterpolation};

    #[test]
    fn gaussian_and_vandermonde_agree() {
        let field = Zp::new(1000003);
        let values: Vec<_> = (2..14).map(|i| field.to_element(i * i + 7)).collect();
        let x: Vec<_> = (0..12).map(|i| field.to_element(3 * i + 1)).collect();

        let rhs: Vec<_> = (1..=12u64)
            .map(|r| {
                let mut s = field.zero();
                for (v, xx) in values.iter().zip(&x) {
                    field.add_mul_assign(&mut s, &field.pow(v, r), xx);
                }
                s
            })
            .collect();

        // twelve unknowns take the Vandermonde route
        assert_eq!(solve_stratum(&field, &values, &rhs).unwrap(), x);

        // a square sub-system takes the Gaussian route
        let rhs_small: Vec<_> = (1..=4u64)
            .map(|r| {
                let mut s = field.zero();
                for (v, xx) in values[..4].iter().zip(&x[..4]) {
                    field.add_mul_assign(&mut s, &field.pow(v, r), xx);
                }
                s
            })
            .collect();
        assert_eq!(solve_stratum(&field, &values[..4], &rhs_small).unwrap(), x[..4].to_vec());
    }

    #[test]
    fn monic_reconstruction() {
        let field = Zp::new(1000003);
        let vars = ["x", "y", "z"];
        let g = parse_polynomial("x^2+3*x*y^2*z+x*z^3+y+5*y*z+2", &field, &vars).unwrap();
        let a = &g * &parse_polynomial("x+y+z^2", &field, &vars).unwrap();
        let b = &g * &parse_polynomial("x^2+2*y*z+1", &field, &vars).unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let skeleton = g.replace(2, &field.to_element(3));
        let interp = SparseInterpolation::new(2, &a, &b, &skeleton, &mut rng, false).unwrap();
        assert!(matches!(interp.mode(), InterpolationMode::Monic { .. }));

        let v = field.to_element(17);
        let image = interp.evaluate_at(&v).unwrap();
        assert_eq!(image, g.replace(2, &v));
    }

    #[test]
    fn linzip_reconstruction() {
        let field = Zp::new(1000003);
        let vars = ["x", "y", "z"];
        // no stratum in x has a single term
        let g = parse_polynomial("(y+z)*x^2+(y^2+2)*x+3*z+y*z", &field, &vars).unwrap();
        let a = &g * &parse_polynomial("x+y*z+4", &field, &vars).unwrap();
        let b = &g * &parse_polynomial("x^2+y+z^2", &field, &vars).unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let interp = SparseInterpolation::new(3, &a, &b, &g, &mut rng, false).unwrap();
        assert_eq!(interp.mode(), InterpolationMode::LinZip);

        // the image is normalized to a monic first univariate image,
        // so compare up to a scale
        let image = interp.evaluate().unwrap();
        assert!(image.same_skeleton(&g));
        assert_eq!(image.clone().make_monic(), g.clone().make_monic());
    }

    #[test]
    fn forced_linzip() {
        let field = Zp::new(1000003);
        let vars = ["x", "y"];
        let g = parse_polynomial("x^3+y^2*x+3*y+1", &field, &vars).unwrap();
        let a = &g * &parse_polynomial("x+y+1", &field, &vars).unwrap();
        let b = &g * &parse_polynomial("x-y", &field, &vars).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let interp = SparseInterpolation::new(2, &a, &b, &g, &mut rng, true).unwrap();
        assert_eq!(interp.mode(), InterpolationMode::LinZip);
        assert_eq!(interp.evaluate().unwrap().make_monic(), g);
    }
}
