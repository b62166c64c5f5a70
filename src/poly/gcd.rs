//! Greatest common divisors of multivariate polynomials.
//!
//! The gcd is computed by reducing the problem to gcds of images: over finite
//! fields the variables are removed one at a time by evaluation, after which the
//! gcd is reconstructed with dense (Brown) or sparse (Zippel) interpolation. Over
//! the integers, images modulo primes are lifted with the Chinese remainder theorem.
//! Every reconstructed candidate is checked by exact division.

use std::cmp::Ordering;
use std::fmt::Display;
use std::sync::Arc;

use ahash::HashSet;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use smallvec::{smallvec, SmallVec};
use tracing::{debug, instrument, trace};

use crate::domains::algebraic_number::AlgebraicExtension;
use crate::domains::finite_field::{
    FiniteField, FiniteFieldCore, FiniteFieldWorkspace, GaloisField, PrimeIteratorU64, ToFiniteField, Zp64,
};
use crate::domains::integer::{Integer, IntegerRing};
use crate::domains::{DomainError, EuclideanDomain, Field, Ring};

use super::interpolation::NewtonInterpolation;
use super::polynomial::MultivariatePolynomial;
use super::sparse_interpolation::{sample_nonzero, SparseInterpolation};
use super::univariate::{UnivariatePolynomial, LIFTING_PRIME_START};
use super::{Exponent, INLINED_EXPONENTS};

/// The maximum number of consecutive unlucky substitutions before giving up.
pub const MAX_FAILED_SUBSTITUTIONS: usize = 32;
/// The maximum number of failed sparse reconstructions for one skeleton.
pub const MAX_SPARSE_INTERPOLATION_FAILS: usize = 1000;
pub const NUMBER_OF_UNDER_DETERMINED_RETRIES: usize = 8;
/// The maximum number of restarts of an interpolation or lifting.
pub const MAX_OVER_ITERATIONS: usize = 16;
/// The number of points sampled beyond the degree bound before an interpolation restarts.
pub const ALLOWED_OVER_INTERPOLATED_ATTEMPTS: usize = 32;
/// Integer substitutions are drawn from `1..MAX_RNG_PREFACTOR`.
pub const MAX_RNG_PREFACTOR: i64 = 50000;
pub const DEFAULT_GCD_SEED: u64 = 1;

/// An error that occurred during a gcd computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcdError {
    /// An evaluation point or prime produced an image with the wrong shape.
    UnluckyEvaluation,
    /// An earlier image overestimated the degree or the shape of the gcd.
    DegreeBoundRevision,
    SparseInterpolationExhausted,
    /// The field has too few elements to provide new evaluation points.
    EvaluationStackExhausted,
    LiftingExhausted,
    /// The polynomials are defined over different coefficient domains.
    DomainMismatch,
    /// The coefficient ring is not a field or the integers.
    NotAField,
    Domain(DomainError),
}

impl GcdError {
    /// Returns `true` if the computation can be repeated with different random choices.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GcdError::UnluckyEvaluation | GcdError::DegreeBoundRevision)
    }
}

impl Display for GcdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GcdError::UnluckyEvaluation => write!(f, "unlucky evaluation point or prime"),
            GcdError::DegreeBoundRevision => write!(f, "degree bound or skeleton had to be revised"),
            GcdError::SparseInterpolationExhausted => {
                write!(f, "too many failed sparse interpolations")
            }
            GcdError::EvaluationStackExhausted => write!(f, "ran out of evaluation points"),
            GcdError::LiftingExhausted => write!(f, "could not lift the gcd over the integers"),
            GcdError::DomainMismatch => write!(f, "polynomials have different coefficient domains"),
            GcdError::NotAField => write!(f, "the coefficient ring is not a field"),
            GcdError::Domain(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GcdError {}

impl From<DomainError> for GcdError {
    fn from(e: DomainError) -> Self {
        GcdError::Domain(e)
    }
}

/// The interpolation strategy used over finite fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GcdAlgorithm {
    #[default]
    Zippel,
    Brown,
}

/// Settings for a gcd computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GcdOptions {
    pub algorithm: GcdAlgorithm,
    /// Use LinZip sparse interpolation even if a single-term stratum exists.
    pub force_linzip: bool,
    /// The seed used by [MultivariatePolynomial::gcd].
    pub seed: u64,
}

impl Default for GcdOptions {
    fn default() -> Self {
        GcdOptions {
            algorithm: GcdAlgorithm::Zippel,
            force_linzip: false,
            seed: DEFAULT_GCD_SEED,
        }
    }
}

/// The state shared by all steps of one gcd computation.
pub struct GcdContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub options: GcdOptions,
}

/// Distinct nonzero evaluation points for one interpolation.
struct EvaluationStack<F: Ring> {
    used: HashSet<F::Element>,
    limit: u64,
}

impl<F: Field> EvaluationStack<F> {
    fn new(field: &F) -> Self {
        let size = field.size().and_then(|s| s.to_u64()).unwrap_or(u64::MAX);
        EvaluationStack {
            used: HashSet::default(),
            limit: size.saturating_sub(1),
        }
    }

    fn next(&mut self, field: &F, rng: &mut dyn RngCore) -> Result<F::Element, GcdError> {
        if self.used.len() as u64 >= self.limit {
            return Err(GcdError::EvaluationStackExhausted);
        }

        let max_draws = 4 * self.limit.min(1 << 16) + 64;
        for _ in 0..max_draws {
            let v = sample_nonzero(field, &mut *rng);
            if self.used.insert(v.clone()) {
                return Ok(v);
            }
        }

        Err(GcdError::EvaluationStackExhausted)
    }
}

/// Gcd routines for polynomials with coefficients in `Self`.
pub trait PolynomialGCD<E: Exponent>: EuclideanDomain {
    /// Check that gcds can be computed over the ring.
    fn check_gcd_domain(&self) -> Result<(), GcdError>;

    /// Compute the gcd of two primitive polynomials that both depend on all
    /// their variables, given upper bounds on the degree of every variable in the gcd.
    fn gcd_active(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        bounds: &[E],
        ctx: &mut GcdContext,
    ) -> Result<MultivariatePolynomial<Self, E>, GcdError>;

    /// Upper bounds on the degree of every variable in the gcd. The bounds
    /// of the variables in `active` are tightened with random univariate images.
    fn get_gcd_var_bounds(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        active: &[usize],
        ctx: &mut GcdContext,
    ) -> SmallVec<[E; INLINED_EXPONENTS]>;

    /// Bring a gcd in canonical form.
    fn normalize(a: MultivariatePolynomial<Self, E>) -> MultivariatePolynomial<Self, E>;

    /// A random value for a variable that only occurs in one of the inputs.
    fn sample_substitution(&self, rng: &mut dyn RngCore) -> Self::Element;
}

impl<E: Exponent> PolynomialGCD<E> for IntegerRing {
    fn check_gcd_domain(&self) -> Result<(), GcdError> {
        Ok(())
    }

    fn gcd_active(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        bounds: &[E],
        ctx: &mut GcdContext,
    ) -> Result<MultivariatePolynomial<Self, E>, GcdError> {
        integer_gcd(a, b, bounds, ctx)
    }

    fn get_gcd_var_bounds(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        active: &[usize],
        ctx: &mut GcdContext,
    ) -> SmallVec<[E; INLINED_EXPONENTS]> {
        let Some(p) = PrimeIteratorU64::new(LIFTING_PRIME_START).next() else {
            return loose_bounds(a, b);
        };

        let field = Zp64::new(p);
        let ap = a.to_finite_field(&field);
        let bp = b.to_finite_field(&field);
        let mut bounds = field_var_bounds(&ap, &bp, active, &mut *ctx.rng);

        // the images modulo p may have lost terms
        for (bb, l) in bounds.iter_mut().zip(loose_bounds(a, b)) {
            if l < *bb {
                *bb = l;
            }
        }
        bounds
    }

    fn normalize(a: MultivariatePolynomial<Self, E>) -> MultivariatePolynomial<Self, E> {
        a.normalize_sign()
    }

    fn sample_substitution(&self, mut rng: &mut dyn RngCore) -> Self::Element {
        self.sample(&mut rng, (1, MAX_RNG_PREFACTOR))
    }
}

impl<UField: FiniteFieldWorkspace, E: Exponent> PolynomialGCD<E> for FiniteField<UField>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    fn check_gcd_domain(&self) -> Result<(), GcdError> {
        if self.is_field() {
            Ok(())
        } else {
            Err(GcdError::NotAField)
        }
    }

    fn gcd_active(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        bounds: &[E],
        ctx: &mut GcdContext,
    ) -> Result<MultivariatePolynomial<Self, E>, GcdError> {
        let max_bound = bounds.iter().map(|b| b.to_u32() as u64).max().unwrap_or(0);
        let needed = 5 * max_bound;

        if a.nvars() > 1 && a.field.get_prime().to_u64() < needed {
            debug!(
                "Field of size {} is too small for degree bound {}: extending",
                a.field.get_prime(),
                max_bound
            );
            return gcd_in_extension(a, b, bounds, needed, ctx);
        }

        match field_gcd(a, b, bounds, ctx) {
            Err(GcdError::EvaluationStackExhausted) if a.nvars() > 1 => {
                debug!("Ran out of evaluation points modulo {}: extending", a.field.get_prime());
                gcd_in_extension(a, b, bounds, needed, ctx)
            }
            r => r,
        }
    }

    fn get_gcd_var_bounds(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        active: &[usize],
        ctx: &mut GcdContext,
    ) -> SmallVec<[E; INLINED_EXPONENTS]> {
        field_var_bounds(a, b, active, &mut *ctx.rng)
    }

    fn normalize(a: MultivariatePolynomial<Self, E>) -> MultivariatePolynomial<Self, E> {
        a.make_monic()
    }

    fn sample_substitution(&self, mut rng: &mut dyn RngCore) -> Self::Element {
        self.sample(&mut rng, (0, i64::MAX))
    }
}

impl<UField: FiniteFieldWorkspace, E: Exponent> PolynomialGCD<E> for AlgebraicExtension<FiniteField<UField>>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    fn check_gcd_domain(&self) -> Result<(), GcdError> {
        if self.base().is_field() {
            Ok(())
        } else {
            Err(GcdError::NotAField)
        }
    }

    fn gcd_active(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        bounds: &[E],
        ctx: &mut GcdContext,
    ) -> Result<MultivariatePolynomial<Self, E>, GcdError> {
        field_gcd(a, b, bounds, ctx)
    }

    fn get_gcd_var_bounds(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
        active: &[usize],
        ctx: &mut GcdContext,
    ) -> SmallVec<[E; INLINED_EXPONENTS]> {
        field_var_bounds(a, b, active, &mut *ctx.rng)
    }

    fn normalize(a: MultivariatePolynomial<Self, E>) -> MultivariatePolynomial<Self, E> {
        a.make_monic()
    }

    fn sample_substitution(&self, mut rng: &mut dyn RngCore) -> Self::Element {
        self.sample(&mut rng, (0, i64::MAX))
    }
}

fn loose_bounds<R: Ring, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    b: &MultivariatePolynomial<R, E>,
) -> SmallVec<[E; INLINED_EXPONENTS]> {
    (0..a.nvars())
        .map(|v| a.degree(v).min(b.degree(v)))
        .collect()
}

/// Tighten the degree bounds by computing univariate gcds of random images.
/// A bound is only lowered when both images keep their degree.
fn field_var_bounds<F: Field, E: Exponent>(
    a: &MultivariatePolynomial<F, E>,
    b: &MultivariatePolynomial<F, E>,
    active: &[usize],
    rng: &mut dyn RngCore,
) -> SmallVec<[E; INLINED_EXPONENTS]> {
    let mut bounds = loose_bounds(a, b);

    for &var in active {
        let r: Vec<_> = active
            .iter()
            .filter(|v| **v != var)
            .map(|v| (*v, sample_nonzero(&a.field, &mut *rng)))
            .collect();

        let ua = a.replace_all_except(var, &r);
        let ub = b.replace_all_except(var, &r);

        if ua.degree() as u32 != a.degree(var).to_u32() || ub.degree() as u32 != b.degree(var).to_u32() {
            trace!("Image lost its degree in variable {}: keeping loose bound", var);
            continue;
        }

        let g = ua.gcd(&ub);
        let d = E::from_u32(g.degree() as u32);
        if d < bounds[var] {
            bounds[var] = d;
        }
    }

    bounds
}

/// Compute the gcd over the Galois field `GF(p^k)` with `p^k` at least `needed`,
/// and map the result back to the prime field.
fn gcd_in_extension<UField: FiniteFieldWorkspace, E: Exponent>(
    a: &MultivariatePolynomial<FiniteField<UField>, E>,
    b: &MultivariatePolynomial<FiniteField<UField>, E>,
    bounds: &[E],
    needed: u64,
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<FiniteField<UField>, E>, GcdError>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    let p = a.field.get_prime().to_u64();
    let target = needed.max(64);
    let mut k = 2;
    let mut size = p.saturating_mul(p);
    while size < target {
        k += 1;
        size = size.saturating_mul(p);
    }

    for degree in k..k + 4 {
        let ext = a.field.upgrade(degree);
        debug!("Computing gcd in extension of degree {}: {}", degree, ext);

        let ae = a.map_coeff(|c| a.field.upgrade_element(c, &ext), ext.clone());
        let be = b.map_coeff(|c| b.field.upgrade_element(c, &ext), ext.clone());

        match field_gcd(&ae, &be, bounds, ctx) {
            Ok(g) => {
                let g = g.make_monic();
                let mut res = a.zero_with_capacity(g.nterms());
                for t in &g {
                    res.append_monomial(a.field.downgrade_element(t.coefficient)?, t.exponents);
                }
                return Ok(res);
            }
            Err(GcdError::EvaluationStackExhausted) => {
                debug!("Extension of degree {} is too small", degree);
            }
            Err(e) => return Err(e),
        }
    }

    Err(GcdError::EvaluationStackExhausted)
}

/// The gcd of two polynomials that only depend on `var`.
fn univariate_gcd<F: Field, E: Exponent>(
    a: &MultivariatePolynomial<F, E>,
    b: &MultivariatePolynomial<F, E>,
    var: usize,
) -> MultivariatePolynomial<F, E> {
    let g = a.to_univariate(var).gcd(&b.to_univariate(var));
    a.from_univariate(&g, var)
}

/// The monic content of `p` viewed as a polynomial in `x_0, ..., x_{var-1}` with
/// coefficients in `F[x_var]`. All variables after `var` must be absent.
fn univariate_content<F: Field, E: Exponent>(p: &MultivariatePolynomial<F, E>, var: usize) -> UnivariatePolynomial<F> {
    let vars: SmallVec<[usize; INLINED_EXPONENTS]> = (0..var).collect();

    let mut content: Option<UnivariatePolynomial<F>> = None;
    for (_, c) in p.coefficients_in(&vars) {
        let u = c.to_univariate(var);
        let g = match content {
            None => u.make_monic(),
            Some(cc) => cc.gcd(&u),
        };

        if g.is_constant() {
            return g;
        }
        content = Some(g);
    }

    content.unwrap_or_else(|| p.to_univariate(var))
}

/// Remove the contents in `F[x_last]` and return the gcd of the contents.
#[allow(clippy::type_complexity)]
fn remove_last_content<F: Field, E: Exponent>(
    a: &MultivariatePolynomial<F, E>,
    b: &MultivariatePolynomial<F, E>,
    last: usize,
) -> Result<
    (
        MultivariatePolynomial<F, E>,
        MultivariatePolynomial<F, E>,
        MultivariatePolynomial<F, E>,
    ),
    GcdError,
> {
    let ca = univariate_content(a, last);
    let cb = univariate_content(b, last);
    let content = a.from_univariate(&ca.gcd(&cb), last);

    let a = if ca.is_constant() {
        a.clone()
    } else {
        a.divide_exact(&a.from_univariate(&ca, last))?
    };
    let b = if cb.is_constant() {
        b.clone()
    } else {
        b.divide_exact(&b.from_univariate(&cb, last))?
    };

    Ok((content, a, b))
}

/// Take the primitive part of the interpolant in `F[x_last]` and check if it divides both inputs.
fn division_test<F: Field, E: Exponent>(
    interpolant: &MultivariatePolynomial<F, E>,
    a: &MultivariatePolynomial<F, E>,
    b: &MultivariatePolynomial<F, E>,
    last: usize,
) -> Result<Option<MultivariatePolynomial<F, E>>, GcdError> {
    let c = univariate_content(interpolant, last);
    let pp = if c.is_constant() {
        interpolant.clone()
    } else {
        interpolant.divide_exact(&interpolant.from_univariate(&c, last))?
    };

    if a.divides(&pp).is_some() && b.divides(&pp).is_some() {
        Ok(Some(pp))
    } else {
        trace!("Candidate {} does not divide", pp);
        Ok(None)
    }
}

/// How a new image relates to the images collected so far.
enum ImageAction {
    Start,
    Update,
    Skip,
    Restart,
}

fn classify_image<E: Exponent>(current: Option<&[E]>, lm: &[E]) -> ImageAction {
    match current {
        None => ImageAction::Start,
        Some(c) => match lm.cmp(c) {
            Ordering::Equal => ImageAction::Update,
            Ordering::Greater => ImageAction::Skip,
            Ordering::Less => ImageAction::Restart,
        },
    }
}

/// Compute the gcd of two polynomials over a field that depend on all their variables.
#[instrument(level = "debug", skip_all)]
fn field_gcd<F: Field + PolynomialGCD<E>, E: Exponent>(
    a: &MultivariatePolynomial<F, E>,
    b: &MultivariatePolynomial<F, E>,
    bounds: &[E],
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<F, E>, GcdError> {
    if a.nvars() == 1 {
        return Ok(univariate_gcd(a, b, 0));
    }

    let last = a.nvars() - 1;

    match ctx.options.algorithm {
        GcdAlgorithm::Brown => brown_rec(a, b, last, bounds, ctx),
        GcdAlgorithm::Zippel => {
            // remove the content in x_0 first, so that the gcd has at least two strata
            let ca = content_in(a, 0, ctx)?;
            let cb = content_in(b, 0, ctx)?;

            if ca.is_constant() && cb.is_constant() {
                return zippel_rec(a, b, last, bounds, ctx);
            }

            debug!("Content in the first variable: {} and {}", ca, cb);
            let c = gcd_impl(&ca, &cb, ctx)?;
            let a = a.divide_exact(&ca)?;
            let b = b.divide_exact(&cb)?;
            let g = zippel_rec(&a, &b, last, bounds, ctx)?;
            Ok(&g * &c)
        }
    }
}

/// The content of `p` viewed as a polynomial in `var`, computed from the smallest coefficient up.
fn content_in<R: PolynomialGCD<E>, E: Exponent>(
    p: &MultivariatePolynomial<R, E>,
    var: usize,
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<R, E>, GcdError> {
    let coeffs = p.coefficients_in(&[var]).into_iter().map(|(_, c)| c).collect();
    gcd_multiple_impl(coeffs, ctx)
}

/// Brown's algorithm: dense interpolation of the variable `last` from images
/// with `x_last` fixed.
fn brown_rec<F: Field + PolynomialGCD<E>, E: Exponent>(
    a: &MultivariatePolynomial<F, E>,
    b: &MultivariatePolynomial<F, E>,
    last: usize,
    bounds: &[E],
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<F, E>, GcdError> {
    if last == 0 {
        return Ok(univariate_gcd(a, b, 0));
    }

    let (content, a, b) = remove_last_content(a, b, last)?;

    let lca = a.lcoeff_last(last).to_univariate(last);
    let lcb = b.lcoeff_last(last).to_univariate(last);
    let lc_gcd = lca.gcd(&lcb);
    let needed = bounds[last].to_u32() as usize + lc_gcd.degree() + 1;

    let mut stack = EvaluationStack::new(&a.field);
    let mut newton: Option<(NewtonInterpolation<F, E>, SmallVec<[E; INLINED_EXPONENTS]>)> = None;
    let mut unlucky = 0;
    let mut restarts = 0;

    loop {
        let v = stack.next(&a.field, &mut *ctx.rng)?;
        if F::is_zero(&lca.evaluate(&v)) || F::is_zero(&lcb.evaluate(&v)) {
            continue;
        }

        let av = a.replace(last, &v);
        let bv = b.replace(last, &v);

        let g = match brown_rec(&av, &bv, last - 1, bounds, ctx) {
            Ok(g) => g,
            Err(e) if e.is_retryable() => {
                unlucky += 1;
                if unlucky > MAX_FAILED_SUBSTITUTIONS {
                    debug!("Too many unlucky points for variable {}", last);
                    return Err(GcdError::UnluckyEvaluation);
                }
                continue;
            }
            Err(e) => return Err(e),
        };

        if g.is_constant() {
            trace!("Constant image: the gcd is the content {}", content);
            return Ok(content);
        }

        let g = g.make_monic().mul_coeff(lc_gcd.evaluate(&v));
        let lm: SmallVec<[E; INLINED_EXPONENTS]> = g.last_exponents().into();

        let changed = match classify_image(newton.as_ref().map(|(_, l)| l.as_slice()), &lm) {
            ImageAction::Skip => {
                trace!("Image {} has too high degree", g);
                unlucky += 1;
                if unlucky > MAX_FAILED_SUBSTITUTIONS {
                    return Err(GcdError::UnluckyEvaluation);
                }
                continue;
            }
            ImageAction::Restart | ImageAction::Start => {
                if newton.is_some() {
                    debug!("Image {} has lower degree: restarting interpolation", g);
                    restarts += 1;
                    if restarts > MAX_OVER_ITERATIONS {
                        return Err(GcdError::UnluckyEvaluation);
                    }
                }
                newton = Some((NewtonInterpolation::new(last, v, g), lm));
                true
            }
            ImageAction::Update => match newton.as_mut() {
                Some((n, _)) => n.update(v, &g)?,
                None => unreachable!(),
            },
        };
        unlucky = 0;

        let Some((n, _)) = newton.as_ref() else {
            continue;
        };

        if !changed || n.number_of_points() >= needed {
            if let Some(pp) = division_test(n.interpolant(), &a, &b, last)? {
                return Ok(&pp * &content);
            }

            if n.number_of_points() >= needed + ALLOWED_OVER_INTERPOLATED_ATTEMPTS {
                debug!("Over-interpolated variable {}: restarting", last);
                restarts += 1;
                if restarts > MAX_OVER_ITERATIONS {
                    return Err(GcdError::UnluckyEvaluation);
                }
                newton = None;
            }
        }
    }
}

/// Zippel's algorithm: the first image fixes the skeleton of the gcd, later
/// images are reconstructed with sparse interpolation.
fn zippel_rec<F: Field + PolynomialGCD<E>, E: Exponent>(
    a: &MultivariatePolynomial<F, E>,
    b: &MultivariatePolynomial<F, E>,
    last: usize,
    bounds: &[E],
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<F, E>, GcdError> {
    if last == 0 {
        return Ok(univariate_gcd(a, b, 0));
    }

    let (content, a, b) = remove_last_content(a, b, last)?;

    let lca = a.lcoeff_last(last).to_univariate(last);
    let lcb = b.lcoeff_last(last).to_univariate(last);
    let lc_gcd = lca.gcd(&lcb);
    let needed = bounds[last].to_u32() as usize + lc_gcd.degree() + 1;

    let mut stack = EvaluationStack::new(&a.field);
    let state = ZippelLevel {
        a: &a,
        b: &b,
        last,
        lca: &lca,
        lcb: &lcb,
        lc_gcd: &lc_gcd,
        needed,
    };

    for attempt in 0..=MAX_OVER_ITERATIONS {
        match state.attempt(bounds, &mut stack, ctx) {
            Ok(Some(g)) => return Ok(&g * &content),
            Ok(None) => return Ok(content),
            Err(GcdError::DegreeBoundRevision) => {
                debug!("Restarting Zippel interpolation of variable {} after attempt {}", last, attempt);
            }
            Err(e) => return Err(e),
        }
    }

    Err(GcdError::UnluckyEvaluation)
}

/// The data of one level of the Zippel recursion.
struct ZippelLevel<'a, F: Field, E: Exponent> {
    a: &'a MultivariatePolynomial<F, E>,
    b: &'a MultivariatePolynomial<F, E>,
    last: usize,
    lca: &'a UnivariatePolynomial<F>,
    lcb: &'a UnivariatePolynomial<F>,
    lc_gcd: &'a UnivariatePolynomial<F>,
    needed: usize,
}

impl<'a, F: Field + PolynomialGCD<E>, E: Exponent> ZippelLevel<'a, F, E> {
    fn good_point(&self, v: &F::Element) -> bool {
        !F::is_zero(&self.lca.evaluate(v)) && !F::is_zero(&self.lcb.evaluate(v))
    }

    /// Interpolate the primitive part of the gcd from a new seed image.
    /// Returns `None` if the gcd is the content.
    fn attempt(
        &self,
        bounds: &[E],
        stack: &mut EvaluationStack<F>,
        ctx: &mut GcdContext,
    ) -> Result<Option<MultivariatePolynomial<F, E>>, GcdError> {
        let (a, b, last) = (self.a, self.b, self.last);

        let mut unlucky = 0;
        let (v0, g0) = loop {
            let v = stack.next(&a.field, &mut *ctx.rng)?;
            if !self.good_point(&v) {
                continue;
            }

            match zippel_rec(&a.replace(last, &v), &b.replace(last, &v), last - 1, bounds, ctx) {
                Ok(g) => break (v, g),
                Err(e) if e.is_retryable() => {
                    unlucky += 1;
                    if unlucky > MAX_FAILED_SUBSTITUTIONS {
                        return Err(GcdError::UnluckyEvaluation);
                    }
                }
                Err(e) => return Err(e),
            }
        };

        if g0.is_constant() {
            return Ok(None);
        }

        let g0 = g0.make_monic().mul_coeff(self.lc_gcd.evaluate(&v0));
        let lm: SmallVec<[E; INLINED_EXPONENTS]> = g0.last_exponents().into();
        debug!("Seed image for variable {}: {}", last, g0);

        let sparse = SparseInterpolation::new(last, a, b, &g0, &mut *ctx.rng, ctx.options.force_linzip)?;
        let mut newton = NewtonInterpolation::new(last, v0, g0);

        if self.needed == 1 {
            if let Some(pp) = division_test(newton.interpolant(), a, b, last)? {
                return Ok(Some(pp));
            }
        }

        let mut failures = 0;
        loop {
            let v = stack.next(&a.field, &mut *ctx.rng)?;
            if !self.good_point(&v) {
                continue;
            }

            let g = match sparse.evaluate_at(&v) {
                Ok(g) if !g.is_zero() && g.last_exponents() == lm.as_slice() => g,
                Ok(_) | Err(GcdError::UnluckyEvaluation) => {
                    failures += 1;
                    if failures > MAX_SPARSE_INTERPOLATION_FAILS {
                        return Err(GcdError::SparseInterpolationExhausted);
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            let g = g.make_monic().mul_coeff(self.lc_gcd.evaluate(&v));
            trace!("Sparse image at variable {}: {}", last, g);
            let changed = newton.update(v, &g)?;

            if !changed || newton.number_of_points() >= self.needed {
                if let Some(pp) = division_test(newton.interpolant(), a, b, last)? {
                    return Ok(Some(pp));
                }

                if newton.number_of_points() >= self.needed + ALLOWED_OVER_INTERPOLATED_ATTEMPTS {
                    debug!("Over-interpolated variable {}: new seed", last);
                    return Err(GcdError::DegreeBoundRevision);
                }
            }
        }
    }
}

/// Reconstruct the gcd modulo a new prime from the skeleton of an earlier image.
pub fn interpolate_gcd<UField: FiniteFieldWorkspace, E: Exponent>(
    a: &MultivariatePolynomial<FiniteField<UField>, E>,
    b: &MultivariatePolynomial<FiniteField<UField>, E>,
    skeleton: &MultivariatePolynomial<FiniteField<UField>, E>,
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<FiniteField<UField>, E>, GcdError>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    SparseInterpolation::new(a.nvars(), a, b, skeleton, &mut *ctx.rng, ctx.options.force_linzip)?.evaluate()
}

/// Combine the lifted coefficients modulo `modulus` with an image modulo `p`.
/// Terms missing from either side have coefficient zero.
fn chinese_merge<E: Exponent>(
    lifted: &MultivariatePolynomial<IntegerRing, E>,
    modulus: &Integer,
    image: &MultivariatePolynomial<Zp64, E>,
    p: &Integer,
) -> Result<MultivariatePolynomial<IntegerRing, E>, GcdError> {
    let mut res = lifted.zero_with_capacity(lifted.nterms().max(image.nterms()));
    let zero = Integer::zero();

    let (mut i, mut j) = (0, 0);
    while i < lifted.nterms() || j < image.nterms() {
        let ord = if i == lifted.nterms() {
            Ordering::Greater
        } else if j == image.nterms() {
            Ordering::Less
        } else {
            lifted.exponents(i).cmp(image.exponents(j))
        };

        let (n1, n2, exp) = match ord {
            Ordering::Less => {
                i += 1;
                (&lifted.coefficients[i - 1], zero.clone(), lifted.exponents(i - 1))
            }
            Ordering::Greater => {
                j += 1;
                let c = image.field.to_symmetric_integer(&image.coefficients[j - 1]);
                (&zero, c, image.exponents(j - 1))
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
                let c = image.field.to_symmetric_integer(&image.coefficients[j - 1]);
                (&lifted.coefficients[i - 1], c, lifted.exponents(i - 1))
            }
        };

        let c = Integer::chinese_remainder(n1, &n2, modulus, p).ok_or(GcdError::LiftingExhausted)?;
        res.append_monomial(c, exp);
    }

    Ok(res)
}

/// A bound on the coefficients of a factor of `p`.
fn coefficient_bound<E: Exponent>(p: &MultivariatePolynomial<IntegerRing, E>) -> Integer {
    let deg: u64 = (0..p.nvars()).map(|v| p.degree(v).to_u32() as u64).sum();
    &Integer::Natural(2).pow(deg) * &p.one_norm()
}

/// Compute the gcd of primitive integer polynomials by lifting images modulo primes.
#[instrument(level = "debug", skip_all)]
fn integer_gcd<E: Exponent>(
    a: &MultivariatePolynomial<IntegerRing, E>,
    b: &MultivariatePolynomial<IntegerRing, E>,
    bounds: &[E],
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<IntegerRing, E>, GcdError> {
    if a.nvars() == 1 {
        let g = a.to_univariate(0).modular_gcd(&b.to_univariate(0))?;
        return Ok(a.from_univariate(&g, 0));
    }

    let lc_gcd = a.lcoeff().gcd(&b.lcoeff());
    let bound = {
        let ba = coefficient_bound(a);
        let bb = coefficient_bound(b);
        &(&lc_gcd.abs() * &ba.min(bb)) * &Integer::Natural(2)
    };

    let mut base: Option<(MultivariatePolynomial<IntegerRing, E>, SmallVec<[E; INLINED_EXPONENTS]>)> = None;
    let mut modulus = Integer::one();
    let mut previous: Option<MultivariatePolynomial<IntegerRing, E>> = None;
    let mut restarts = 0;
    let mut failed_primes = 0;

    for p in PrimeIteratorU64::new(LIFTING_PRIME_START) {
        if failed_primes > MAX_FAILED_SUBSTITUTIONS {
            break;
        }

        let pi = Integer::from(p);
        if lc_gcd.quot_rem(&pi).1.is_zero() {
            continue;
        }

        let field = Zp64::new(p);
        let ap = a.to_finite_field(&field);
        let bp = b.to_finite_field(&field);
        if ap.nterms() != a.nterms() || bp.nterms() != b.nterms() {
            continue;
        }

        let image = match &base {
            Some((lifted, _)) if ctx.options.algorithm == GcdAlgorithm::Zippel => {
                let mut skeleton = ap.zero_with_capacity(lifted.nterms());
                for t in lifted {
                    skeleton.append_monomial(field.one(), t.exponents);
                }
                interpolate_gcd(&ap, &bp, &skeleton, ctx)
            }
            _ => <Zp64 as PolynomialGCD<E>>::gcd_active(&ap, &bp, bounds, ctx),
        };

        let image = match image {
            Ok(g) => g,
            Err(GcdError::DegreeBoundRevision) if base.is_some() => {
                debug!("Skeleton rejected modulo {}: restarting the lifting", p);
                restarts += 1;
                if restarts > MAX_OVER_ITERATIONS {
                    return Err(GcdError::LiftingExhausted);
                }
                base = None;
                previous = None;
                continue;
            }
            Err(e) if e.is_retryable() => {
                trace!("Skipping prime {}: {}", p, e);
                failed_primes += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        if image.is_constant() && base.is_none() {
            debug!("Constant image modulo {}", p);
            return Ok(a.one());
        }

        if image.is_zero() {
            failed_primes += 1;
            continue;
        }

        let g = image.make_monic().mul_coeff(lc_gcd.to_finite_field(&field));
        let lm: SmallVec<[E; INLINED_EXPONENTS]> = g.last_exponents().into();

        match classify_image(base.as_ref().map(|(_, l)| l.as_slice()), &lm) {
            ImageAction::Skip => {
                trace!("Image modulo {} has too high degree", p);
                failed_primes += 1;
                continue;
            }
            ImageAction::Start | ImageAction::Restart => {
                if base.is_some() {
                    restarts += 1;
                    if restarts > MAX_OVER_ITERATIONS {
                        return Err(GcdError::LiftingExhausted);
                    }
                }

                debug!("New base image modulo {}: {}", p, g);
                base = Some((MultivariatePolynomial::<IntegerRing, E>::from_finite_field(&g), lm));
                modulus = pi;
                previous = None;
            }
            ImageAction::Update => {
                if let Some((lifted, _)) = base.as_mut() {
                    *lifted = chinese_merge(lifted, &modulus, &g, &pi)?;
                    modulus = &modulus * &pi;
                }
            }
        }
        failed_primes = 0;

        let Some((lifted, _)) = base.as_ref() else {
            continue;
        };

        let candidate = lifted.clone().make_primitive().normalize_sign();
        trace!("Lifted candidate {} modulo {}", candidate, modulus);

        let stable = previous.as_ref() == Some(&candidate);
        if modulus > bound || stable {
            if a.divides(&candidate).is_some() && b.divides(&candidate).is_some() {
                return Ok(candidate);
            }

            if modulus > bound {
                debug!("Candidate {} does not divide beyond the coefficient bound", candidate);
                restarts += 1;
                if restarts > MAX_OVER_ITERATIONS {
                    return Err(GcdError::LiftingExhausted);
                }
                base = None;
                previous = None;
                continue;
            }
        }

        previous = Some(candidate);
    }

    Err(GcdError::LiftingExhausted)
}

/// Compute the gcd of two polynomials with variables that do not occur in both, by
/// substituting random values for them. The result is verified by division and
/// computed exactly from the coefficients after too many failures.
fn one_sided_gcd<R: PolynomialGCD<E>, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    b: &MultivariatePolynomial<R, E>,
    only_a: &[usize],
    only_b: &[usize],
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<R, E>, GcdError> {
    for attempt in 0..MAX_FAILED_SUBSTITUTIONS {
        let mut a_sub = a.clone();
        for v in only_a {
            a_sub = a_sub.replace(*v, &a.field.sample_substitution(&mut *ctx.rng));
        }

        let mut b_sub = b.clone();
        for v in only_b {
            b_sub = b_sub.replace(*v, &b.field.sample_substitution(&mut *ctx.rng));
        }

        if a_sub.is_zero() || b_sub.is_zero() {
            continue;
        }

        let g = R::normalize(gcd_impl(&a_sub, &b_sub, ctx)?.make_primitive());
        if a.divides(&g).is_some() && b.divides(&g).is_some() {
            return Ok(g);
        }

        trace!("Substitution attempt {} gave a wrong gcd {}", attempt, g);
    }

    debug!("Computing the gcd from the coefficients in the one-sided variables");
    let mut coeffs: Vec<_> = a.coefficients_in(only_a).into_iter().map(|(_, c)| c).collect();
    coeffs.extend(b.coefficients_in(only_b).into_iter().map(|(_, c)| c));
    Ok(R::normalize(gcd_multiple_impl(coeffs, ctx)?))
}

/// Compute the gcd of primitive polynomials without a common monomial factor.
fn gcd_primitive<R: PolynomialGCD<E>, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    b: &MultivariatePolynomial<R, E>,
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<R, E>, GcdError> {
    if a.nterms() == 1 || b.nterms() == 1 {
        return Ok(a.one());
    }

    if a == b {
        return Ok(a.clone());
    }

    if a.nterms() >= b.nterms() && a.divides(b).is_some() {
        return Ok(b.clone());
    }
    if b.nterms() >= a.nterms() && b.divides(a).is_some() {
        return Ok(a.clone());
    }

    let nvars = a.nvars();
    let mut occurs: SmallVec<[u8; INLINED_EXPONENTS]> = smallvec![0; nvars];
    for (p, bit) in [(a, 1), (b, 2)] {
        for e in p.exponents_iter() {
            for (o, x) in occurs.iter_mut().zip(e) {
                if !x.is_zero() {
                    *o |= bit;
                }
            }
        }
    }

    let select = |mask: u8| -> SmallVec<[usize; INLINED_EXPONENTS]> {
        occurs
            .iter()
            .enumerate()
            .filter_map(|(i, o)| if *o == mask { Some(i) } else { None })
            .collect()
    };
    let only_a = select(1);
    let only_b = select(2);
    let mut active = select(3);

    if !only_a.is_empty() || !only_b.is_empty() {
        debug!("Variables {:?} and {:?} occur in one polynomial only", only_a, only_b);
        return one_sided_gcd(a, b, &only_a, &only_b, ctx);
    }

    let bounds = R::get_gcd_var_bounds(a, b, &active, ctx);
    active.sort_by(|&i, &j| bounds[j].cmp(&bounds[i]));

    let compressed = Arc::new(active.iter().map(|&i| a.variables[i].clone()).collect::<Vec<_>>());
    let order: Vec<_> = active.iter().map(|&i| Some(i)).collect();
    let ac = a.rearrange_with_growth(&order, compressed.clone());
    let bc = b.rearrange_with_growth(&order, compressed);
    let active_bounds: SmallVec<[E; INLINED_EXPONENTS]> = active.iter().map(|&i| bounds[i]).collect();

    debug!(
        "Computing gcd in the variables {:?} with degree bounds {:?}",
        active, active_bounds
    );

    let mut last_error = GcdError::UnluckyEvaluation;
    for attempt in 0..MAX_OVER_ITERATIONS {
        match R::gcd_active(&ac, &bc, &active_bounds, ctx) {
            Ok(g) => {
                let mut inverse = vec![None; nvars];
                for (pos, &i) in active.iter().enumerate() {
                    inverse[i] = Some(pos);
                }
                return Ok(g.rearrange_with_growth(&inverse, a.get_vars()));
            }
            Err(e) if e.is_retryable() => {
                debug!("Retrying the gcd after attempt {}: {}", attempt, e);
                last_error = e;
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error)
}

/// The gcd of the polynomials if one of them is zero or constant.
fn simple_gcd<R: PolynomialGCD<E>, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    b: &MultivariatePolynomial<R, E>,
) -> Option<MultivariatePolynomial<R, E>> {
    if a.is_zero() {
        return Some(R::normalize(b.clone()));
    }
    if b.is_zero() || a == b {
        return Some(R::normalize(a.clone()));
    }

    if a.is_constant() || b.is_constant() {
        let mut g = a.field.zero();
        for c in a.coefficients.iter().chain(&b.coefficients) {
            g = a.field.gcd(&g, c);
            if R::one_is_gcd_unit() && a.field.is_one(&g) {
                break;
            }
        }
        return Some(R::normalize(a.constant(g)));
    }

    None
}

fn gcd_impl<R: PolynomialGCD<E>, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    b: &MultivariatePolynomial<R, E>,
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<R, E>, GcdError> {
    if a.field != b.field {
        return Err(GcdError::DomainMismatch);
    }
    a.field.check_gcd_domain()?;

    if a.variables != b.variables {
        let mut a = a.clone();
        let mut b = b.clone();
        a.unify_variables(&mut b);
        return gcd_impl(&a, &b, ctx);
    }

    if let Some(g) = simple_gcd(a, b) {
        return Ok(g);
    }

    let content = a.field.gcd(&a.content(), &b.content());

    // strip the shared monomial
    let mut shared = a.min_exponents();
    for (s, e) in shared.iter_mut().zip(b.min_exponents()) {
        if e < *s {
            *s = e;
        }
    }

    let strip = |p: &MultivariatePolynomial<R, E>| {
        let mut p = p.clone().make_primitive();
        if shared.iter().any(|e| !e.is_zero()) {
            for e in p.exponents_iter_mut() {
                for (x, s) in e.iter_mut().zip(&shared) {
                    *x = *x - *s;
                }
            }
        }
        p
    };

    let a = strip(a);
    let b = strip(b);

    let g = gcd_primitive(&a, &b, ctx)?;
    Ok(R::normalize(g.mul_exp(&shared)).mul_coeff(content))
}

fn gcd_multiple_impl<R: PolynomialGCD<E>, E: Exponent>(
    mut polys: Vec<MultivariatePolynomial<R, E>>,
    ctx: &mut GcdContext,
) -> Result<MultivariatePolynomial<R, E>, GcdError> {
    polys.sort_by_key(|p| p.nterms());

    let Some(start) = polys.iter().position(|p| !p.is_zero()) else {
        return match polys.pop() {
            Some(zero) => Ok(zero),
            None => panic!("Cannot compute the gcd of an empty list"),
        };
    };

    let mut iter = polys.into_iter().skip(start);
    let Some(first) = iter.next() else {
        unreachable!()
    };

    let mut g = R::normalize(first);
    for p in iter {
        if g.is_one() {
            break;
        }
        g = gcd_impl(&g, &p, ctx)?;
    }

    Ok(g)
}

impl<R: PolynomialGCD<E>, E: Exponent> MultivariatePolynomial<R, E> {
    /// Compute the gcd of two polynomials with the default options. The computation
    /// is randomized with a fixed seed, so the result is reproducible.
    ///
    /// Over fields the gcd is monic, over the integers it has a positive leading coefficient.
    pub fn gcd(&self, other: &Self) -> Result<Self, GcdError> {
        let options = GcdOptions::default();
        let mut rng = StdRng::seed_from_u64(options.seed);
        self.gcd_with_options(other, &options, &mut rng)
    }

    /// Compute the gcd with the random numbers drawn from `rng`.
    pub fn gcd_with_rng(&self, other: &Self, rng: &mut impl RngCore) -> Result<Self, GcdError> {
        self.gcd_with_options(other, &GcdOptions::default(), rng)
    }

    #[instrument(level = "debug", skip_all, fields(algorithm = ?options.algorithm))]
    pub fn gcd_with_options(
        &self,
        other: &Self,
        options: &GcdOptions,
        rng: &mut impl RngCore,
    ) -> Result<Self, GcdError> {
        debug!("gcd of {} and {}", self, other);
        let mut ctx = GcdContext {
            rng,
            options: options.clone(),
        };
        gcd_impl(self, other, &mut ctx)
    }

    /// Compute the gcd using dense interpolation.
    pub fn gcd_brown(&self, other: &Self) -> Result<Self, GcdError> {
        let options = GcdOptions {
            algorithm: GcdAlgorithm::Brown,
            ..GcdOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(options.seed);
        self.gcd_with_options(other, &options, &mut rng)
    }

    /// Compute the gcd using sparse interpolation.
    pub fn gcd_zippel(&self, other: &Self) -> Result<Self, GcdError> {
        let options = GcdOptions {
            algorithm: GcdAlgorithm::Zippel,
            ..GcdOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(options.seed);
        self.gcd_with_options(other, &options, &mut rng)
    }

    /// Compute the gcd of all coefficients of `self` and `other` viewed as
    /// polynomials in the variable `var`.
    pub fn content_gcd(&self, other: &Self, var: usize) -> Result<Self, GcdError> {
        let options = GcdOptions::default();
        let mut rng = StdRng::seed_from_u64(options.seed);
        let mut ctx = GcdContext {
            rng: &mut rng,
            options,
        };

        let mut coeffs: Vec<_> = self.coefficients_in(&[var]).into_iter().map(|(_, c)| c).collect();
        coeffs.extend(other.coefficients_in(&[var]).into_iter().map(|(_, c)| c));
        if coeffs.is_empty() {
            return Ok(self.zero());
        }
        gcd_multiple_impl(coeffs, &mut ctx)
    }

    /// Compute the gcd of a list of polynomials, starting from the smallest.
    /// The list must not be empty.
    pub fn gcd_multiple(polys: Vec<Self>) -> Result<Self, GcdError> {
        let options = GcdOptions::default();
        let mut rng = StdRng::seed_from_u64(options.seed);
        let mut ctx = GcdContext {
            rng: &mut rng,
            options,
        };
        gcd_multiple_impl(polys, &mut ctx)
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::integer::Z;
    use crate::parser::parse_polynomial;

    use super::{GcdAlgorithm, GcdError, GcdOptions};

    #[test]
    fn trivial_cases() {
        let field = Zp::new(17);
        let vars = ["x", "y"];
        let a = parse_polynomial("3*x*y+2", &field, &vars).unwrap();
        let zero = a.zero();

        assert_eq!(a.gcd(&zero).unwrap().to_string(), "x*y+12");
        assert_eq!(zero.gcd(&a).unwrap().to_string(), "x*y+12");
        assert!(zero.gcd(&zero).unwrap().is_zero());
        assert!(a.gcd(&a.constant(field.to_element(5))).unwrap().is_one());
        assert_eq!(a.gcd(&a).unwrap().to_string(), "x*y+12");
    }

    #[test]
    fn monomial_content() {
        let vars = ["x", "y", "z"];
        let a = parse_polynomial("6*x^3*y^2+4*x^2*y^3", &Z, &vars).unwrap();
        let b = parse_polynomial("10*x^2*y*z+2*x^4*y", &Z, &vars).unwrap();
        assert_eq!(a.gcd(&b).unwrap().to_string(), "2*x^2*y");
    }

    #[test]
    fn mismatched_domains() {
        let vars = ["x"];
        let a = parse_polynomial("x+1", &Zp::new(5), &vars).unwrap();
        let b = parse_polynomial("x+1", &Zp::new(7), &vars).unwrap();
        assert_eq!(a.gcd(&b), Err(GcdError::DomainMismatch));
    }

    #[test]
    fn modular_ring_is_rejected() {
        let ring = Zp::new_non_prime(15);
        let vars = ["x"];
        let a = parse_polynomial("x+1", &ring, &vars).unwrap();
        let b = parse_polynomial("x+2", &ring, &vars).unwrap();
        assert_eq!(a.gcd(&b), Err(GcdError::NotAField));
    }

    #[test]
    fn one_sided_variables() {
        let vars = ["x", "y", "z"];
        let a = parse_polynomial("(x+y+1)*(x^2+z)", &Z, &vars).unwrap();
        let b = parse_polynomial("(x+y+1)*(y^2-3)", &Z, &vars).unwrap();
        assert_eq!(a.gcd(&b).unwrap().to_string(), "x+y+1");
    }

    #[test]
    fn brown_and_zippel() {
        let field = Zp::new(1000003);
        let vars = ["x", "y", "z"];
        let g = parse_polynomial("x^2*y+3*x*z^2+y^3*z+5", &field, &vars).unwrap();
        let a = &g * &parse_polynomial("x*y*z+x+2", &field, &vars).unwrap();
        let b = &g * &parse_polynomial("x^3+y^2+z", &field, &vars).unwrap();

        let expected = g.clone().make_monic();
        assert_eq!(a.gcd_brown(&b).unwrap(), expected);
        assert_eq!(a.gcd_zippel(&b).unwrap(), expected);

        let options = GcdOptions {
            algorithm: GcdAlgorithm::Zippel,
            force_linzip: true,
            seed: 7,
        };
        let mut rng = StdRng::seed_from_u64(options.seed);
        assert_eq!(a.gcd_with_options(&b, &options, &mut rng).unwrap(), expected);
    }

    #[test]
    fn content_in_first_variable() {
        let field = Zp::new(101);
        let vars = ["x", "y", "z"];
        // the gcd has content y+z in x
        let a = parse_polynomial("(y+z)*(x+y)*(x-z+1)", &field, &vars).unwrap();
        let b = parse_polynomial("(y+z)*(x+y)*(x^2+y*z)", &field, &vars).unwrap();
        let g = parse_polynomial("(y+z)*(x+y)", &field, &vars).unwrap();
        assert_eq!(a.gcd_zippel(&b).unwrap(), g);
    }

    #[test]
    fn integer_lifting() {
        let vars = ["x", "y", "z"];
        let g = parse_polynomial("123456789*x^2*y-987654321*z+3*x*y*z^2+1", &Z, &vars).unwrap();
        let a = &g * &parse_polynomial("2*x*y-7*z^2+1", &Z, &vars).unwrap();
        let b = &g * &parse_polynomial("-5*x^3+y*z-11", &Z, &vars).unwrap();

        assert_eq!(a.gcd_zippel(&b).unwrap(), g);
        assert_eq!(a.gcd_brown(&b).unwrap(), g);
    }

    #[test]
    fn content_and_multiple() {
        let vars = ["x", "y"];
        let a = parse_polynomial("(y+1)*x^2+(y^2-1)*x", &Z, &vars).unwrap();
        let b = parse_polynomial("(y+1)*x+3*y+3", &Z, &vars).unwrap();
        assert_eq!(a.content_gcd(&b, 0).unwrap().to_string(), "y+1");

        let polys = vec![
            parse_polynomial("4*x^2-4", &Z, &vars).unwrap(),
            parse_polynomial("6*x+6", &Z, &vars).unwrap(),
            parse_polynomial("2*x^2+4*x+2", &Z, &vars).unwrap(),
        ];
        assert_eq!(
            crate::poly::polynomial::MultivariatePolynomial::gcd_multiple(polys)
                .unwrap()
                .to_string(),
            "2*x+2"
        );
    }
}
