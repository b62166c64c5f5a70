//! Dense interpolation of a polynomial in one variable from its images.

use std::sync::Arc;

use crate::domains::{DomainError, Field};

use super::polynomial::MultivariatePolynomial;
use super::univariate::UnivariatePolynomial;
use super::Exponent;

/// An interpolant in Newton form over the variable `variable`. Each sample
/// is an image of the target polynomial with `variable` fixed to a point;
/// the images may depend on all other variables.
///
/// The Newton form is kept incrementally: for points `x_0, ..., x_k` the
/// interpolant is updated with the new sample `(x, v)` as
/// `P + (v - P(x)) / W(x) * W`, where `W = (y - x_0)...(y - x_k)`.
#[derive(Clone, Debug)]
pub struct NewtonInterpolation<F: Field, E: Exponent> {
    variable: usize,
    points: Vec<F::Element>,
    product: UnivariatePolynomial<F>,
    interpolant: MultivariatePolynomial<F, E>,
}

impl<F: Field, E: Exponent> NewtonInterpolation<F, E> {
    /// Start the interpolation from a single sample.
    pub fn new(variable: usize, point: F::Element, value: MultivariatePolynomial<F, E>) -> Self {
        let field = value.field.clone();
        let var = Arc::new(value.variables[variable].clone());
        let product = UnivariatePolynomial::from_coefficients(
            &field,
            vec![field.neg(&point), field.one()],
            var,
        );

        NewtonInterpolation {
            variable,
            points: vec![point],
            product,
            interpolant: value,
        }
    }

    /// Add a sample. Returns `true` if the interpolant changed. The point
    /// must differ from all previous points.
    pub fn update(&mut self, point: F::Element, value: &MultivariatePolynomial<F, E>) -> Result<bool, DomainError> {
        if self.points.contains(&point) {
            return Err(DomainError::NotInvertible);
        }

        let field = self.interpolant.field.clone();

        let current = self.interpolant.replace(self.variable, &point);
        let diff = value - &current;

        let changed = !diff.is_zero();
        if changed {
            let scale = field.reciprocal(&self.product.evaluate(&point))?;
            let w = diff.from_univariate(&self.product, self.variable);
            let correction = diff.mul_coeff(scale);
            self.interpolant = &self.interpolant + &(&correction * &w);
        }

        let linear = self.product.monomial(field.one(), 1) - self.product.constant(point.clone());
        self.product = &self.product * &linear;
        self.points.push(point);

        Ok(changed)
    }

    /// The current interpolant.
    pub fn interpolant(&self) -> &MultivariatePolynomial<F, E> {
        &self.interpolant
    }

    pub fn into_interpolant(self) -> MultivariatePolynomial<F, E> {
        self.interpolant
    }

    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[F::Element] {
        &self.points
    }
}

#[cfg(test)]
mod test {
    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::DomainError;
    use crate::parser::parse_polynomial;

    use super::NewtonInterpolation;

    #[test]
    fn recover_from_images() {
        let field = Zp::new(101);
        let vars = ["x", "y"];
        let target = parse_polynomial("3*x^2*y^2+x*y+5*y+7", &field, &vars).unwrap();

        let image = |v: u32| target.replace(1, &field.to_element(v));

        let mut n = NewtonInterpolation::new(1, field.to_element(1), image(1));
        assert!(n.update(field.to_element(2), &image(2)).unwrap());
        assert!(n.update(field.to_element(5), &image(5)).unwrap());
        assert_eq!(n.number_of_points(), 3);
        assert_eq!(n.interpolant(), &target);

        // one more sample confirms the result
        assert!(!n.update(field.to_element(9), &image(9)).unwrap());
        assert_eq!(n.into_interpolant(), target);
    }

    #[test]
    fn repeated_point() {
        let field = Zp::new(7);
        let p = parse_polynomial("x+1", &field, &["x", "y"]).unwrap();
        let mut n = NewtonInterpolation::new(1, field.to_element(3), p.clone());
        assert_eq!(n.update(field.to_element(3), &p), Err(DomainError::NotInvertible));
    }
}
