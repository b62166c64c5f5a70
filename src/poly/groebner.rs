//! Groebner bases of polynomial ideals over fields, computed with Buchberger's algorithm.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::marker::PhantomData;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::domains::Field;

use super::polynomial::MultivariatePolynomial;
use super::{Exponent, MonomialOrder, INLINED_EXPONENTS};

type Monomial<E> = SmallVec<[E; INLINED_EXPONENTS]>;

/// Returns `true` if the monomial `a` divides `b`.
#[inline]
fn monomial_divides<E: Exponent>(a: &[E], b: &[E]) -> bool {
    a.iter().zip(b).all(|(e1, e2)| *e1 <= *e2)
}

#[inline]
fn monomial_lcm<E: Exponent>(a: &[E], b: &[E]) -> Monomial<E> {
    a.iter().zip(b).map(|(e1, e2)| *e1.max(e2)).collect()
}

/// A pair of basis polynomials whose S-polynomial still has to be reduced.
/// Pairs are ordered by the lcm of the leading monomials, smallest first.
#[derive(Debug)]
struct CriticalPair<F: Field, E: Exponent, O: MonomialOrder> {
    first: Rc<MultivariatePolynomial<F, E, O>>,
    second: Rc<MultivariatePolynomial<F, E, O>>,
    lcm: Monomial<E>,
    /// The leading monomials are coprime.
    disjoint: bool,
    id: usize,
    _phantom: PhantomData<O>,
}

impl<F: Field, E: Exponent, O: MonomialOrder> CriticalPair<F, E, O> {
    fn new(
        f1: Rc<MultivariatePolynomial<F, E, O>>,
        f2: Rc<MultivariatePolynomial<F, E, O>>,
        id: usize,
    ) -> CriticalPair<F, E, O> {
        let lcm = monomial_lcm(f1.last_exponents(), f2.last_exponents());

        let disjoint = f1
            .last_exponents()
            .iter()
            .zip(f2.last_exponents())
            .all(|(e1, e2)| e1.is_zero() || e2.is_zero());

        CriticalPair {
            first: f1,
            second: f2,
            lcm,
            disjoint,
            id,
            _phantom: PhantomData,
        }
    }
}

impl<F: Field, E: Exponent, O: MonomialOrder> PartialEq for CriticalPair<F, E, O> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<F: Field, E: Exponent, O: MonomialOrder> Eq for CriticalPair<F, E, O> {}

impl<F: Field, E: Exponent, O: MonomialOrder> PartialOrd for CriticalPair<F, E, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Field, E: Exponent, O: MonomialOrder> Ord for CriticalPair<F, E, O> {
    /// Reversed, so that the max-heap yields the smallest lcm first.
    fn cmp(&self, other: &Self) -> Ordering {
        O::cmp(&other.lcm, &self.lcm).then_with(|| other.id.cmp(&self.id))
    }
}

/// Counters of a Buchberger run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuchbergerStats {
    pub pairs_reduced: usize,
    pub zero_reductions: usize,
    pub coprime_pairs: usize,
    pub chain_pairs: usize,
    pub max_basis_len: usize,
}

#[derive(Debug, Clone)]
pub struct GroebnerBasis<F: Field, E: Exponent, O: MonomialOrder> {
    pub system: Vec<MultivariatePolynomial<F, E, O>>,
    pub print_stats: bool,
}

impl<F: Field, E: Exponent, O: MonomialOrder> GroebnerBasis<F, E, O> {
    /// Construct the reduced Groebner basis of the ideal generated by `ideal`,
    /// with respect to the monomial order `O`.
    ///
    /// Progress is logged at the `info` level if `print_stats` is set.
    pub fn new(ideal: &[MultivariatePolynomial<F, E, O>], print_stats: bool) -> GroebnerBasis<F, E, O> {
        let mut ideal: Vec<_> = ideal.iter().filter(|p| !p.is_zero()).cloned().collect();
        MultivariatePolynomial::unify_variables_list(&mut ideal);

        let mut b = GroebnerBasis {
            system: ideal,
            print_stats,
        };

        b.buchberger();
        b.reduce_basis()
    }

    /// Add a new polynomial to the basis, updating and filtering the existing
    /// basis and critical pairs, based on Gebauer and Moeller's redundant pair criteria.
    ///
    /// Adapted from "A Computational Approach to Commutative Algebra" by Thomas Becker Volker Weispfenning.
    fn update(
        basis: &mut Vec<Rc<MultivariatePolynomial<F, E, O>>>,
        critical_pairs: &mut BinaryHeap<CriticalPair<F, E, O>>,
        f: MultivariatePolynomial<F, E, O>,
        next_id: &mut usize,
        stats: &mut BuchbergerStats,
    ) {
        let f = Rc::new(f);

        let mut new_pairs: Vec<_> = basis
            .iter()
            .map(|b| {
                *next_id += 1;
                (CriticalPair::new(b.clone(), f.clone(), *next_id), true)
            })
            .collect();

        for i in 0..new_pairs.len() {
            new_pairs[i].1 = false;
            new_pairs[i].1 = new_pairs[i].0.disjoint
                || new_pairs
                    .iter()
                    .all(|p2| !p2.1 || !monomial_divides(&p2.0.lcm, &new_pairs[i].0.lcm));
        }

        stats.chain_pairs += new_pairs.iter().filter(|p| !p.1).count();
        stats.coprime_pairs += new_pairs.iter().filter(|p| p.1 && p.0.disjoint).count();
        new_pairs.retain(|p| p.1 && !p.0.disjoint);

        let lm = f.last_exponents();
        let before = critical_pairs.len();
        critical_pairs.retain(|p| {
            !monomial_divides(lm, &p.lcm)
                || monomial_lcm(p.first.last_exponents(), lm) == p.lcm
                || monomial_lcm(p.second.last_exponents(), lm) == p.lcm
        });
        stats.chain_pairs += before - critical_pairs.len();

        critical_pairs.extend(new_pairs.into_iter().map(|np| np.0));

        basis.retain(|b| !monomial_divides(lm, b.last_exponents()));
        basis.push(f);
    }

    /// Buchberger's algorithm with the pair of smallest lcm selected first.
    fn buchberger(&mut self) {
        let mut basis = vec![];
        let mut critical_pairs = BinaryHeap::new();
        let mut stats = BuchbergerStats::default();
        let mut next_id = 0;

        for f in self.system.drain(..) {
            Self::update(&mut basis, &mut critical_pairs, f.make_monic(), &mut next_id, &mut stats);
        }

        while let Some(pair) = critical_pairs.pop() {
            let s = Self::s_polynomial(&pair.first, &pair.second);
            let h = Self::reduce(&s, &basis[..]);
            stats.pairs_reduced += 1;

            if h.is_zero() {
                stats.zero_reductions += 1;
                continue;
            }

            if self.print_stats && stats.pairs_reduced % 100 == 0 {
                info!(
                    "Reduced {} pairs: basis length={}, critical pairs={}",
                    stats.pairs_reduced,
                    basis.len(),
                    critical_pairs.len()
                );
            }

            Self::update(&mut basis, &mut critical_pairs, h.make_monic(), &mut next_id, &mut stats);
            stats.max_basis_len = stats.max_basis_len.max(basis.len());
        }

        if self.print_stats {
            info!(
                "Buchberger done: {} pairs reduced ({} to zero), {} coprime and {} chain criterion skips, maximal basis length {}",
                stats.pairs_reduced,
                stats.zero_reductions,
                stats.coprime_pairs,
                stats.chain_pairs,
                stats.max_basis_len
            );
        } else {
            debug!("Buchberger stats: {:?}", stats);
        }

        self.system = basis.into_iter().map(|x| (*x).clone()).collect();
    }

    /// Buchberger's algorithm without any criteria: every pair is reduced.
    pub fn simple_buchberger(ideal: &[MultivariatePolynomial<F, E, O>]) -> GroebnerBasis<F, E, O> {
        let mut basis: Vec<_> = ideal
            .iter()
            .filter(|p| !p.is_zero())
            .map(|p| p.clone().make_monic())
            .collect();
        MultivariatePolynomial::unify_variables_list(&mut basis);

        let mut pairs: VecDeque<_> = (0..basis.len())
            .flat_map(|j| (0..j).map(move |i| (i, j)))
            .collect();

        while let Some((i, j)) = pairs.pop_front() {
            let s = Self::s_polynomial(&basis[i], &basis[j]);
            let h = Self::reduce(&s, &basis[..]);
            if !h.is_zero() {
                let k = basis.len();
                pairs.extend((0..k).map(|i| (i, k)));
                basis.push(h.make_monic());
            }
        }

        GroebnerBasis {
            system: basis,
            print_stats: false,
        }
        .reduce_basis()
    }

    /// The S-polynomial `lcm/lt(f) * f - lcm/lt(g) * g`, where `lcm` is the
    /// lcm of the leading monomials.
    pub fn s_polynomial(
        f: &MultivariatePolynomial<F, E, O>,
        g: &MultivariatePolynomial<F, E, O>,
    ) -> MultivariatePolynomial<F, E, O> {
        let lcm = monomial_lcm(f.last_exponents(), g.last_exponents());

        let extra_factor_f: Monomial<E> = lcm
            .iter()
            .zip(f.last_exponents())
            .map(|(e1, e2)| *e1 - *e2)
            .collect();
        let extra_factor_g: Monomial<E> = lcm
            .iter()
            .zip(g.last_exponents())
            .map(|(e1, e2)| *e1 - *e2)
            .collect();

        let new_f = f.clone().mul_exp(&extra_factor_f).mul_coeff(f.field.inv(&f.lcoeff()));
        let new_g = g.clone().mul_exp(&extra_factor_g).mul_coeff(g.field.inv(&g.lcoeff()));
        new_f - new_g
    }

    /// Completely reduce the polynomial `p` w.r.t the polynomials `gs`.
    /// For example reducing `f=y^2+x` by `g=[x]` yields `y^2`.
    pub fn reduce<G: Borrow<MultivariatePolynomial<F, E, O>>>(
        p: &MultivariatePolynomial<F, E, O>,
        gs: &[G],
    ) -> MultivariatePolynomial<F, E, O> {
        let nvars = p.nvars();
        let mut r = p.clone();
        let mut rest: Vec<(F::Element, Monomial<E>)> = vec![];
        let mut monom: Monomial<E> = SmallVec::from_elem(E::zero(), nvars);

        while !r.is_zero() {
            // find a divisor that has the least amount of terms
            let divisor = gs
                .iter()
                .map(|g| <G as Borrow<MultivariatePolynomial<F, E, O>>>::borrow(g))
                .filter(|g| !g.is_zero() && monomial_divides(g.last_exponents(), r.last_exponents()))
                .min_by_key(|g| g.nterms());

            if let Some(g) = divisor {
                for ((e, e1), e2) in monom.iter_mut().zip(r.last_exponents()).zip(g.last_exponents()) {
                    *e = *e1 - *e2;
                }

                let ratio = g.field.div(&r.lcoeff(), &g.lcoeff());
                r = r - g.clone().mul_exp(&monom).mul_coeff(ratio);
                continue;
            }

            // strip leading monomial that is not reducible
            let lm: Monomial<E> = r.last_exponents().into();
            if let Some(c) = r.coefficients.pop() {
                let len = r.exponents.len();
                r.exponents.truncate(len - nvars);
                rest.push((c, lm));
            }
        }

        let mut q = p.zero_with_capacity(rest.len());
        for (c, e) in rest.into_iter().rev() {
            q.append_monomial(c, &e);
        }
        q
    }

    /// Remove the polynomials whose leading monomial is divisible by that of
    /// another polynomial, reduce every polynomial by the others and make them monic.
    pub fn reduce_basis(mut self) -> Self {
        // filter lead-reducible polynomials
        let mut res = vec![true; self.system.len()];
        'l1: for (i, p1) in self.system.iter().enumerate() {
            for (j, p2) in self.system.iter().enumerate() {
                if i != j && res[j] && monomial_divides(p2.last_exponents(), p1.last_exponents()) {
                    res[i] = false;
                    continue 'l1;
                }
            }
        }

        let mut lead_reduced = vec![];
        for (i, p) in self.system.drain(..).enumerate() {
            if res[i] {
                lead_reduced.push(p);
            }
        }

        let mut basis = vec![];
        for i in 0..lead_reduced.len() {
            lead_reduced.swap(0, i);
            let h = Self::reduce(&lead_reduced[0], &lead_reduced[1..]);
            if !h.is_zero() {
                basis.push(h.make_monic());
            }
        }

        basis.sort_by(|p1, p2| O::cmp(p2.last_exponents(), p1.last_exponents()));

        GroebnerBasis {
            system: basis,
            print_stats: self.print_stats,
        }
    }

    /// Check if all S-polynomials of `system` reduce to zero.
    pub fn is_groebner_basis(system: &[MultivariatePolynomial<F, E, O>]) -> bool {
        for (i, p1) in system.iter().enumerate() {
            for p2 in &system[i + 1..] {
                let s = Self::s_polynomial(p1, p2);
                if !Self::reduce(&s, system).is_zero() {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::parser::parse_polynomial;
    use crate::poly::{GrevLexOrder, LexOrder};

    use super::GroebnerBasis;

    #[test]
    fn reduce_by_basis() {
        let field = Zp::new(13);
        let vars = ["x", "y"];
        let f = parse_polynomial("y^2+x", &field, &vars).unwrap();
        let g = parse_polynomial("x", &field, &vars).unwrap();

        let r = GroebnerBasis::<_, _, LexOrder>::reduce(&f, &[g]);
        assert_eq!(r.to_string(), "y^2");
    }

    #[test]
    fn s_polynomial_cancels_leading_terms() {
        let field = Zp::new(13);
        let vars = ["x", "y"];
        let f = parse_polynomial("x^2*y+1", &field, &vars).unwrap();
        let g = parse_polynomial("2*x*y^2+y", &field, &vars).unwrap();

        let s = GroebnerBasis::<_, _, LexOrder>::s_polynomial(&f, &g);
        // y*f - x/2*g = y - x*y/2
        assert_eq!(s.to_string(), "6*x*y+y");
    }

    #[test]
    fn linear_system() {
        let field = Zp::new(101);
        let vars = ["x", "y", "z"];
        let ideal: Vec<_> = ["x+y+z-6", "x-y+2*z-5", "2*x+y-z-1"]
            .iter()
            .map(|s| parse_polynomial(s, &field, &vars).unwrap())
            .collect();

        let gb = GroebnerBasis::new(&ideal, false);
        let res: Vec<_> = gb.system.iter().map(|p| p.to_string()).collect();
        assert_eq!(res, ["x+100", "y+99", "z+98"]);
    }

    #[test]
    fn grevlex_basis() {
        let field = Zp::new(32003);
        let vars = ["x", "y"];
        let ideal: Vec<_> = ["x^2*y-1", "x*y^2-x"]
            .iter()
            .map(|s| parse_polynomial(s, &field, &vars).unwrap().reorder::<GrevLexOrder>())
            .collect();

        let gb = GroebnerBasis::new(&ideal, true);
        assert!(GroebnerBasis::is_groebner_basis(&gb.system));
        assert_eq!(gb.system, GroebnerBasis::simple_buchberger(&ideal).system);
    }
}
