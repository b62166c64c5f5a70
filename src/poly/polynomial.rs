use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::Display;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::domains::finite_field::{FiniteField, FiniteFieldCore, FiniteFieldWorkspace, GaloisField, ToFiniteField};
use crate::domains::integer::{Integer, IntegerRing};
use crate::domains::{DomainError, EuclideanDomain, Field, Ring};

use super::univariate::UnivariatePolynomial;
use super::{Exponent, LexOrder, MonomialOrder, Variable, INLINED_EXPONENTS};

/// Multivariate polynomial with a sparse degree and variable dense representation.
#[derive(Clone)]
pub struct MultivariatePolynomial<F: Ring, E: Exponent = u16, O: MonomialOrder = LexOrder> {
    // Data format: the i-th monomial is stored as coefficients[i] and
    // exponents[i * nvars .. (i + 1) * nvars]. Terms are sorted ascending under `O`,
    // so the leading term is the last one.
    pub coefficients: Vec<F::Element>,
    pub exponents: Vec<E>,
    pub field: F,
    pub variables: Arc<Vec<Variable>>,
    pub(crate) _phantom: PhantomData<O>,
}

impl<F: Ring, E: Exponent, O: MonomialOrder> MultivariatePolynomial<F, E, O> {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable map and field are inherited.
    #[inline]
    pub fn new(field: &F, cap: Option<usize>, variables: Arc<Vec<Variable>>) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap.unwrap_or(0)),
            exponents: Vec::with_capacity(cap.unwrap_or(0) * variables.len()),
            field: field.clone(),
            variables,
            _phantom: PhantomData,
        }
    }

    /// Constructs a zero polynomial, inheriting the field and variable map from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        self.zero_with_capacity(0)
    }

    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * self.nvars()),
            field: self.field.clone(),
            variables: self.variables.clone(),
            _phantom: PhantomData,
        }
    }

    /// Constructs a constant polynomial,
    /// inheriting the field and variable map from `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents: vec![E::zero(); self.nvars()],
            field: self.field.clone(),
            variables: self.variables.clone(),
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.field.one())
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: F::Element, exponents: Vec<E>) -> Self {
        debug_assert!(self.nvars() == exponents.len());

        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents,
            field: self.field.clone(),
            variables: self.variables.clone(),
            _phantom: PhantomData,
        }
    }

    /// Constructs the polynomial `x_var`.
    pub fn variable(&self, var: usize) -> Self {
        let mut e = vec![E::zero(); self.nvars()];
        e[var] = E::one();
        self.monomial(self.field.one(), e)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.nterms() == 1
            && self.field.is_one(&self.coefficients[0])
            && self.exponents.iter().all(|x| x.is_zero())
    }

    /// Returns the number of terms in the polynomial.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the number of variables in the polynomial.
    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the polynomial is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        match self.nterms() {
            0 => true,
            1 => self.exponents.iter().all(|e| e.is_zero()),
            _ => false,
        }
    }

    /// Get the constant term of the polynomial.
    #[inline]
    pub fn get_constant(&self) -> F::Element {
        if self.is_zero() || !self.exponents(0).iter().all(|e| e.is_zero()) {
            return self.field.zero();
        }

        self.coefficients[0].clone()
    }

    /// Returns the slice for the exponents of the specified monomial.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[E] {
        &self.exponents[index * self.nvars()..(index + 1) * self.nvars()]
    }

    /// Returns the exponents of the leading monomial.
    #[inline]
    pub fn last_exponents(&self) -> &[E] {
        assert!(self.nterms() > 0, "Zero polynomial has no leading monomial");
        &self.exponents[(self.nterms() - 1) * self.nvars()..self.nterms() * self.nvars()]
    }

    /// Returns an iterator over the exponents of every monomial.
    #[inline]
    pub fn exponents_iter(&self) -> std::slice::Chunks<E> {
        self.exponents.chunks(self.nvars().max(1))
    }

    /// Returns an iterator over the mutable exponents of every monomial.
    #[inline]
    pub fn exponents_iter_mut(&mut self) -> std::slice::ChunksMut<E> {
        let nvars = self.nvars().max(1);
        self.exponents.chunks_mut(nvars)
    }

    /// Get a copy of the variable list.
    pub fn get_vars(&self) -> Arc<Vec<Variable>> {
        self.variables.clone()
    }

    /// Unify the variable maps of two polynomials, i.e.
    /// rewrite a polynomial in `x` and one in `y` to a
    /// two polynomial in `x` and `y`.
    ///
    /// The variable map will be inherited from
    /// `self` and will be extended by variables occurring
    /// in `other`.
    #[inline(always)]
    pub fn unify_variables(&mut self, other: &mut Self) {
        if self.variables == other.variables {
            return;
        }

        self.unify_variables_impl(other)
    }

    fn unify_variables_impl(&mut self, other: &mut Self) {
        let mut new_var_map = self.variables.as_ref().clone();
        let mut new_var_pos_other = vec![0; other.nvars()];
        for (pos, v) in new_var_pos_other.iter_mut().zip(other.variables.as_ref()) {
            if let Some(p) = new_var_map.iter().position(|x| x == v) {
                *pos = p;
            } else {
                *pos = new_var_map.len();
                new_var_map.push(v.clone());
            }
        }

        let new_nvars = new_var_map.len();
        if new_nvars != self.nvars() {
            let mut newexp = vec![E::zero(); new_nvars * self.nterms()];
            for t in 0..self.nterms() {
                newexp[t * new_nvars..t * new_nvars + self.nvars()].copy_from_slice(self.exponents(t));
            }
            self.exponents = newexp;
        }
        self.variables = Arc::new(new_var_map);

        // reconstruct 'other' with correct monomial ordering
        let mut newother = Self::new(&other.field, other.nterms().into(), self.variables.clone());
        let mut newexp = vec![E::zero(); new_nvars];
        for t in other.into_iter() {
            for c in &mut newexp {
                *c = E::zero();
            }

            for (var, e) in t.exponents.iter().enumerate() {
                newexp[new_var_pos_other[var]] = *e;
            }
            newother.append_monomial(t.coefficient.clone(), &newexp);
        }
        *other = newother;
    }

    /// Unify the variable maps of all polynomials in the slice.
    pub fn unify_variables_list(polys: &mut [Self]) {
        if let Some((first, rest)) = polys.split_first_mut() {
            // the first pass can grow the variable map of `first`
            for _ in 0..2 {
                for p in &mut *rest {
                    first.unify_variables(p);
                }
            }
        }
    }

    /// Reverse the monomial ordering in-place.
    fn reverse(&mut self) {
        let nterms = self.nterms();
        let nvars = self.nvars();
        if nterms < 2 {
            return;
        }

        self.coefficients.reverse();

        if nvars == 0 {
            return;
        }

        let midu = if nterms % 2 == 0 {
            nvars * (nterms / 2)
        } else {
            nvars * (nterms / 2 + 1)
        };

        let (l, r) = self.exponents.split_at_mut(midu);

        let rend = r.len();
        for i in 0..nterms / 2 {
            l[i * nvars..(i + 1) * nvars].swap_with_slice(&mut r[rend - (i + 1) * nvars..rend - i * nvars]);
        }
    }

    /// Check if the polynomial is sorted and has only non-zero coefficients.
    pub fn check_consistency(&self) {
        assert_eq!(self.exponents.len(), self.nterms() * self.nvars());

        for c in &self.coefficients {
            if F::is_zero(c) {
                panic!("Inconsistent polynomial (0 coefficient): {}", self);
            }
        }

        for t in 1..self.nterms() {
            match O::cmp(self.exponents(t), self.exponents(t - 1)) {
                Ordering::Equal => panic!("Inconsistent polynomial (equal monomials): {}", self),
                Ordering::Less => panic!("Inconsistent polynomial (wrong monomial ordering): {}", self),
                Ordering::Greater => {}
            }
        }
    }

    /// Appends a monomial to the polynomial, merging it with an existing
    /// monomial with the same exponents.
    pub fn append_monomial(&mut self, coefficient: F::Element, exponents: &[E]) {
        if F::is_zero(&coefficient) {
            return;
        }
        if self.nvars() != exponents.len() {
            panic!("nvars mismatched: got {}, expected {}", exponents.len(), self.nvars());
        }

        // should we append to the back?
        if self.nterms() == 0 || O::cmp(self.last_exponents(), exponents).is_lt() {
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
            return;
        }

        // binary search for the insertion point
        let mut l = 0;
        let mut r = self.nterms();
        while l < r {
            let m = (l + r) / 2;
            match O::cmp(exponents, self.exponents(m)) {
                Ordering::Equal => {
                    self.field.add_assign(&mut self.coefficients[m], &coefficient);
                    if F::is_zero(&self.coefficients[m]) {
                        self.coefficients.remove(m);
                        let i = m * self.nvars();
                        self.exponents.drain(i..i + self.nvars());
                    }
                    return;
                }
                Ordering::Greater => l = m + 1,
                Ordering::Less => r = m,
            }
        }

        self.coefficients.insert(l, coefficient);
        let i = l * self.nvars();
        self.exponents.splice(i..i, exponents.iter().cloned());
    }

    /// Change the monomial order of the polynomial from `O` to `ON`.
    pub fn reorder<ON: MonomialOrder>(&self) -> MultivariatePolynomial<F, E, ON> {
        let mut sorted_index: Vec<_> = (0..self.nterms()).collect();
        sorted_index.sort_by(|a, b| ON::cmp(self.exponents(*a), self.exponents(*b)));

        let coefficients: Vec<_> = sorted_index.iter().map(|i| self.coefficients[*i].clone()).collect();
        let exponents: Vec<_> = sorted_index
            .iter()
            .flat_map(|i| self.exponents(*i))
            .cloned()
            .collect();

        MultivariatePolynomial {
            coefficients,
            exponents,
            field: self.field.clone(),
            variables: self.variables.clone(),
            _phantom: PhantomData,
        }
    }

    /// Multiply every coefficient with `other`.
    pub fn mul_coeff(mut self, other: F::Element) -> Self {
        for c in &mut self.coefficients {
            self.field.mul_assign(c, &other);
        }

        if self.coefficients.iter().any(|c| F::is_zero(c)) {
            self.remove_zero_terms();
        }

        self
    }

    fn remove_zero_terms(&mut self) {
        let nvars = self.nvars();
        let mut write = 0;
        for read in 0..self.nterms() {
            if F::is_zero(&self.coefficients[read]) {
                continue;
            }

            if read != write {
                self.coefficients.swap(write, read);
                self.exponents
                    .copy_within(read * nvars..(read + 1) * nvars, write * nvars);
            }
            write += 1;
        }

        self.coefficients.truncate(write);
        self.exponents.truncate(write * nvars);
    }

    /// Map a coefficient using the function `f`.
    pub fn map_coeff<U: Ring, T: Fn(&F::Element) -> U::Element>(
        &self,
        f: T,
        field: U,
    ) -> MultivariatePolynomial<U, E, O> {
        let mut coefficients = Vec::with_capacity(self.coefficients.len());
        let mut exponents = Vec::with_capacity(self.exponents.len());

        for m in self.into_iter() {
            let nc = f(m.coefficient);
            if !U::is_zero(&nc) {
                coefficients.push(nc);
                exponents.extend_from_slice(m.exponents);
            }
        }

        MultivariatePolynomial {
            coefficients,
            exponents,
            field,
            variables: self.variables.clone(),
            _phantom: PhantomData,
        }
    }

    /// Add `exponents` to every exponent.
    pub fn mul_exp(mut self, exponents: &[E]) -> Self {
        debug_assert_eq!(self.nvars(), exponents.len());

        for e in self.exponents_iter_mut() {
            for (e1, e2) in e.iter_mut().zip(exponents) {
                *e1 = e1
                    .checked_add(e2)
                    .unwrap_or_else(|| panic!("Overflow in adding exponents"));
            }
        }

        self
    }

    #[inline]
    fn mul_monomial(self, coefficient: &F::Element, exponents: &[E]) -> Self {
        self.mul_coeff(coefficient.clone()).mul_exp(exponents)
    }

    /// Get the degree of the variable `x`.
    /// This operation is O(n).
    pub fn degree(&self, x: usize) -> E {
        self.exponents
            .iter()
            .skip(x)
            .step_by(self.nvars().max(1))
            .max()
            .cloned()
            .unwrap_or(E::zero())
    }

    /// Get the lowest power of every variable over all terms, i.e., the
    /// exponents of the monomial content.
    pub fn min_exponents(&self) -> SmallVec<[E; INLINED_EXPONENTS]> {
        if self.is_zero() {
            return smallvec![E::zero(); self.nvars()];
        }

        let mut d: SmallVec<[E; INLINED_EXPONENTS]> = self.exponents(0).into();
        for e in self.exponents_iter() {
            for (md, v) in d.iter_mut().zip(e) {
                if *v < *md {
                    *md = *v;
                }
            }
        }
        d
    }

    /// Get the degree of the variable `v` in the leading monomial.
    pub fn ldegree(&self, v: usize) -> E {
        if self.is_zero() {
            return E::zero();
        }
        self.last_exponents()[v]
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> F::Element {
        self.coefficients
            .last()
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    /// Get a copy of the polynomial where all coefficients are one.
    pub fn skeleton(&self) -> Self {
        let one = self.field.one();
        MultivariatePolynomial {
            coefficients: vec![one; self.nterms()],
            exponents: self.exponents.clone(),
            field: self.field.clone(),
            variables: self.variables.clone(),
            _phantom: PhantomData,
        }
    }

    /// Returns `true` if both polynomials have the same monomials.
    pub fn same_skeleton<R: Ring>(&self, other: &MultivariatePolynomial<R, E, O>) -> bool {
        self.nvars() == other.nvars() && self.exponents == other.exponents
    }

    /// Replace the variable `n` in the polynomial by an element from the ring `v`.
    pub fn replace(&self, n: usize, v: &F::Element) -> Self {
        let mut res = self.zero_with_capacity(self.nterms());
        let mut e: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];
        let powers = self.powers_of(v, self.degree(n).to_u32() as usize);

        for t in self {
            e.copy_from_slice(t.exponents);
            let p = e[n].to_u32() as usize;
            e[n] = E::zero();
            res.append_monomial(self.field.mul(t.coefficient, &powers[p]), &e);
        }

        res
    }

    /// Evaluate the polynomial at the point `r`, which has an entry for every variable.
    pub fn replace_all(&self, r: &[F::Element]) -> F::Element {
        let mut res = self.field.zero();

        for t in self {
            let mut c = t.coefficient.clone();

            for (v, e) in r.iter().zip(t.exponents) {
                if !e.is_zero() {
                    self.field.mul_assign(&mut c, &self.field.pow(v, e.to_u32() as u64));
                }
            }

            self.field.add_assign(&mut res, &c);
        }

        res
    }

    /// Replace all variables except `v` in the polynomial by elements from
    /// the ring. Variables not listed in `r` must not occur.
    pub fn replace_all_except(&self, v: usize, r: &[(usize, F::Element)]) -> UnivariatePolynomial<F> {
        let cache: Vec<Vec<F::Element>> = r
            .iter()
            .map(|(n, x)| self.powers_of(x, self.degree(*n).to_u32() as usize))
            .collect();

        let mut coeffs = vec![self.field.zero(); self.degree(v).to_u32() as usize + 1];
        for t in self {
            let mut c = t.coefficient.clone();
            for ((n, _), pows) in r.iter().zip(&cache) {
                let p = t.exponents[*n].to_u32() as usize;
                if p > 0 {
                    self.field.mul_assign(&mut c, &pows[p]);
                }
            }

            self.field.add_assign(&mut coeffs[t.exponents[v].to_u32() as usize], &c);
        }

        UnivariatePolynomial::from_coefficients(&self.field, coeffs, Arc::new(self.variables[v].clone()))
    }

    fn powers_of(&self, v: &F::Element, max: usize) -> Vec<F::Element> {
        let mut powers = Vec::with_capacity(max + 1);
        powers.push(self.field.one());
        for i in 0..max {
            let next = self.field.mul(&powers[i], v);
            powers.push(next);
        }
        powers
    }

    /// Change the order of the variables in the polynomial, using `order`.
    /// The new variable `x` is the old variable `order[x]`. The map can also be
    /// reversed, by setting `inverse` to `true`.
    pub fn rearrange(&self, order: &[usize], inverse: bool) -> Self {
        debug_assert_eq!(order.len(), self.nvars());

        let mut new_exp = vec![E::zero(); self.nterms() * self.nvars()];
        for (e, er) in new_exp.chunks_mut(self.nvars().max(1)).zip(self.exponents_iter()) {
            for x in 0..order.len() {
                if !inverse {
                    e[x] = er[order[x]];
                } else {
                    e[order[x]] = er[x];
                }
            }
        }

        let mut vm = self.variables.as_ref().clone();
        for x in 0..order.len() {
            if !inverse {
                vm[x] = self.variables[order[x]].clone();
            } else {
                vm[order[x]] = self.variables[x].clone();
            }
        }

        self.sorted_from_exponents(new_exp, self.nvars(), Arc::new(vm))
    }

    /// Move the variables to a new variable list of a possibly different size.
    /// The new variable `x` is the old variable `order[x]`, or absent if it is `None`.
    /// Old variables that are not mapped must not occur in the polynomial.
    pub fn rearrange_with_growth(&self, order: &[Option<usize>], variables: Arc<Vec<Variable>>) -> Self {
        debug_assert_eq!(order.len(), variables.len());

        let mut new_exp = vec![E::zero(); self.nterms() * order.len()];
        for (e, er) in new_exp.chunks_mut(order.len().max(1)).zip(self.exponents_iter()) {
            for x in 0..order.len() {
                if let Some(v) = order[x] {
                    e[x] = er[v];
                }
            }
        }

        self.sorted_from_exponents(new_exp, order.len(), variables)
    }

    fn sorted_from_exponents(&self, new_exp: Vec<E>, nvars: usize, variables: Arc<Vec<Variable>>) -> Self {
        let mut indices: Vec<usize> = (0..self.nterms()).collect();
        indices.sort_unstable_by(|&i, &j| O::cmp(&new_exp[i * nvars..(i + 1) * nvars], &new_exp[j * nvars..(j + 1) * nvars]));

        let mut res = Self::new(&self.field, Some(self.nterms()), variables);
        for i in indices {
            res.append_monomial(self.coefficients[i].clone(), &new_exp[i * nvars..(i + 1) * nvars]);
        }

        res
    }

    /// View the polynomial as a polynomial in the variables `vars`, whose
    /// coefficients are polynomials in the other variables. Each entry holds the
    /// exponents of `vars` (other entries zero) and the matching coefficient.
    /// The entries are sorted ascending in the monomial order.
    pub fn coefficients_in(&self, vars: &[usize]) -> Vec<(SmallVec<[E; INLINED_EXPONENTS]>, Self)> {
        let mut tm: BTreeMap<SmallVec<[E; INLINED_EXPONENTS]>, Self> = BTreeMap::new();

        let mut e_not_in_xs: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];
        let mut e_in_xs: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];
        for t in self {
            e_not_in_xs.copy_from_slice(t.exponents);
            for e in e_in_xs.iter_mut() {
                *e = E::zero();
            }

            for x in vars {
                e_in_xs[*x] = e_not_in_xs[*x];
                e_not_in_xs[*x] = E::zero();
            }

            tm.entry(e_in_xs.clone())
                .or_insert_with(|| self.zero())
                .append_monomial(t.coefficient.clone(), &e_not_in_xs);
        }

        let mut res: Vec<_> = tm.into_iter().collect();
        res.sort_by(|a, b| O::cmp(&a.0, &b.0));
        res
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

    /// Convert a polynomial that only depends on `var` to a dense univariate polynomial.
    pub fn to_univariate(&self, var: usize) -> UnivariatePolynomial<F> {
        debug_assert!(self
            .exponents_iter()
            .all(|e| e.iter().enumerate().all(|(i, x)| i == var || x.is_zero())));

        let mut coeffs = vec![self.field.zero(); self.degree(var).to_u32() as usize + 1];
        for t in self {
            coeffs[t.exponents[var].to_u32() as usize] = t.coefficient.clone();
        }

        UnivariatePolynomial::from_coefficients(&self.field, coeffs, Arc::new(self.variables[var].clone()))
    }

    /// Embed a univariate polynomial in the variable `var`, inheriting the
    /// field and variable map from `self`.
    pub fn from_univariate(&self, p: &UnivariatePolynomial<F>, var: usize) -> Self {
        let mut res = self.zero_with_capacity(p.coefficients.len());
        let mut e = vec![E::zero(); self.nvars()];
        for (i, c) in p.coefficients.iter().enumerate() {
            e[var] = E::from_u32(i as u32);
            res.append_monomial(c.clone(), &e);
        }
        res
    }

    /// Multiply two polynomials with a heap of pending products. The terms of the
    /// product are generated in ascending order, so no sorting is needed.
    /// Reference: "Sparse polynomial multiplication and division in Maple 14" by Monagan, Pearce.
    fn heap_mul(&self, rhs: &Self) -> Self {
        let (a, b) = if self.nterms() <= rhs.nterms() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        let mut res = self.zero_with_capacity(a.nterms().max(b.nterms()));
        let mut heap = BinaryHeap::with_capacity(a.nterms());
        for i in 0..a.nterms() {
            heap.push(Reverse(HeapTerm::<E, O>::new(a.exponents(i), b.exponents(0), i, 0)));
        }

        while let Some(Reverse(top)) = heap.pop() {
            let mut coeff = self.field.mul(&a.coefficients[top.left], &b.coefficients[top.right]);
            let exponents = top.exponents.clone();
            if top.right + 1 < b.nterms() {
                heap.push(Reverse(top.successor(a, b)));
            }

            while heap
                .peek()
                .map(|Reverse(t)| t.exponents == exponents)
                .unwrap_or(false)
            {
                if let Some(Reverse(t)) = heap.pop() {
                    self.field
                        .add_mul_assign(&mut coeff, &a.coefficients[t.left], &b.coefficients[t.right]);
                    if t.right + 1 < b.nterms() {
                        heap.push(Reverse(t.successor(a, b)));
                    }
                }
            }

            if !F::is_zero(&coeff) {
                res.coefficients.push(coeff);
                res.exponents.extend_from_slice(&exponents);
            }
        }

        res
    }
}

/// A pending product of two terms in heap multiplication and division.
struct HeapTerm<E: Exponent, O: MonomialOrder> {
    exponents: SmallVec<[E; INLINED_EXPONENTS]>,
    left: usize,
    right: usize,
    _order: PhantomData<O>,
}

impl<E: Exponent, O: MonomialOrder> HeapTerm<E, O> {
    fn new(a: &[E], b: &[E], left: usize, right: usize) -> Self {
        HeapTerm {
            exponents: a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    x.checked_add(y)
                        .unwrap_or_else(|| panic!("Overflow in adding exponents"))
                })
                .collect(),
            left,
            right,
            _order: PhantomData,
        }
    }

    /// The product of the same left term with the next right term.
    fn successor<F: Ring>(&self, a: &MultivariatePolynomial<F, E, O>, b: &MultivariatePolynomial<F, E, O>) -> Self {
        HeapTerm::new(a.exponents(self.left), b.exponents(self.right + 1), self.left, self.right + 1)
    }
}

impl<E: Exponent, O: MonomialOrder> PartialEq for HeapTerm<E, O> {
    fn eq(&self, other: &Self) -> bool {
        self.exponents == other.exponents
    }
}

impl<E: Exponent, O: MonomialOrder> Eq for HeapTerm<E, O> {}

impl<E: Exponent, O: MonomialOrder> PartialOrd for HeapTerm<E, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Exponent, O: MonomialOrder> Ord for HeapTerm<E, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        O::cmp(&self.exponents, &other.exponents)
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> std::fmt::Debug for MultivariatePolynomial<F, E, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for monomial in self {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?}, {:?} }}", monomial.coefficient, monomial.exponents)?;
        }
        write!(f, " ]")
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Display for MultivariatePolynomial<F, E, O> {
    /// Print the terms from the leading term down, e.g. `3*x^2*y-x+5`.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for i in (0..self.nterms()).rev() {
            let exps = self.exponents(i);
            let coeff = self.field.printer(&self.coefficients[i]).to_string();
            let is_constant = exps.iter().all(|e| e.is_zero());

            if i + 1 != self.nterms() && !coeff.starts_with('-') {
                write!(f, "+")?;
            }

            let mut needs_mul = true;
            if is_constant {
                write!(f, "{}", coeff)?;
                continue;
            } else if coeff == "1" {
                needs_mul = false;
            } else if coeff == "-1" {
                write!(f, "-")?;
                needs_mul = false;
            } else {
                write!(f, "{}", coeff)?;
            }

            for (v, e) in self.variables.iter().zip(exps) {
                if e.is_zero() {
                    continue;
                }

                if needs_mul {
                    write!(f, "*")?;
                }
                needs_mul = true;

                if e.to_u32() == 1 {
                    write!(f, "{}", v)?;
                } else {
                    write!(f, "{}^{}", v, e)?;
                }
            }
        }

        Ok(())
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> PartialEq for MultivariatePolynomial<F, E, O> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.variables != other.variables {
            // constants are equal regardless of the variable map
            return self.is_constant() && other.is_constant() && self.coefficients == other.coefficients;
        }

        self.exponents == other.exponents && self.coefficients == other.coefficients
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> std::hash::Hash for MultivariatePolynomial<F, E, O> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.coefficients.hash(state);
        if !self.is_constant() {
            self.exponents.hash(state);
            self.variables.hash(state);
        }
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Eq for MultivariatePolynomial<F, E, O> {}

impl<F: Ring, E: Exponent, O: MonomialOrder> Add for MultivariatePolynomial<F, E, O> {
    type Output = Self;

    fn add(mut self, mut other: Self) -> Self::Output {
        debug_assert_eq!(self.field, other.field);

        self.unify_variables(&mut other);

        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }

        // Merge the two polynomials, which are assumed to be already sorted.
        let nvars = self.nvars();
        let mut new_coefficients = Vec::with_capacity(self.nterms() + other.nterms());
        let mut new_exponents: Vec<E> = Vec::with_capacity(nvars * (self.nterms() + other.nterms()));
        let mut i = 0;
        let mut j = 0;

        macro_rules! insert_monomial {
            ($source:expr, $index:expr) => {
                new_coefficients.push(mem::replace(&mut $source.coefficients[$index], self.field.zero()));
                new_exponents.extend_from_slice($source.exponents($index));
            };
        }

        while i < self.nterms() && j < other.nterms() {
            match O::cmp(self.exponents(i), other.exponents(j)) {
                Ordering::Less => {
                    insert_monomial!(self, i);
                    i += 1;
                }
                Ordering::Greater => {
                    insert_monomial!(other, j);
                    j += 1;
                }
                Ordering::Equal => {
                    self.field
                        .add_assign(&mut self.coefficients[i], &other.coefficients[j]);
                    if !F::is_zero(&self.coefficients[i]) {
                        insert_monomial!(self, i);
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        while i < self.nterms() {
            insert_monomial!(self, i);
            i += 1;
        }

        while j < other.nterms() {
            insert_monomial!(other, j);
            j += 1;
        }

        Self {
            coefficients: new_coefficients,
            exponents: new_exponents,
            field: self.field,
            variables: self.variables,
            _phantom: PhantomData,
        }
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Add<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn add(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.clone() + other.clone()
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Sub for MultivariatePolynomial<F, E, O> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Sub<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn sub(self, other: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        self.clone() + other.clone().neg()
    }
}

impl<F: Ring, E: Exponent, O: MonomialOrder> Neg for MultivariatePolynomial<F, E, O> {
    type Output = Self;
    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = self.field.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring, E: Exponent, O: MonomialOrder> Mul<&'a MultivariatePolynomial<F, E, O>>
    for &'b MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    fn mul(self, rhs: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        if self.variables != rhs.variables {
            let mut c1 = self.clone();
            let mut c2 = rhs.clone();
            c1.unify_variables(&mut c2);
            return &c1 * &c2;
        }

        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        if self.nterms() == 1 {
            return rhs.clone().mul_monomial(&self.coefficients[0], &self.exponents);
        }

        if rhs.nterms() == 1 {
            return self.clone().mul_monomial(&rhs.coefficients[0], &rhs.exponents);
        }

        self.heap_mul(rhs)
    }
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> Mul<&'a MultivariatePolynomial<F, E, O>>
    for MultivariatePolynomial<F, E, O>
{
    type Output = MultivariatePolynomial<F, E, O>;

    #[inline]
    fn mul(self, rhs: &'a MultivariatePolynomial<F, E, O>) -> Self::Output {
        (&self) * rhs
    }
}

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E, LexOrder> {
    /// Get the leading coefficient of the polynomial viewed as a polynomial in
    /// the first `n` variables. The result only depends on the variables `n` and up.
    pub fn lcoeff_last(&self, n: usize) -> Self {
        let mut res = self.zero();
        if self.is_zero() {
            return res;
        }

        let lead: SmallVec<[E; INLINED_EXPONENTS]> = self.last_exponents()[..n].into();
        let mut e: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];

        // in lex order the terms with the leading prefix form the tail
        for i in (0..self.nterms()).rev() {
            let exps = self.exponents(i);
            if exps[..n] != lead[..] {
                break;
            }

            e[n..].copy_from_slice(&exps[n..]);
            res.append_monomial(self.coefficients[i].clone(), &e);
        }

        res
    }
}

impl<F: EuclideanDomain, E: Exponent, O: MonomialOrder> MultivariatePolynomial<F, E, O> {
    /// Get the content from the coefficients.
    pub fn content(&self) -> F::Element {
        let mut iter = self.coefficients.iter();
        let Some(first) = iter.next() else {
            return self.field.zero();
        };

        let mut c = first.clone();
        for cc in iter {
            if F::one_is_gcd_unit() && self.field.is_one(&c) {
                break;
            }

            c = self.field.gcd(&c, cc);
        }
        c
    }

    /// Divide every coefficient with `other`, which must divide every coefficient.
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
        let c = self.content();
        if self.field.is_one(&c) || F::is_zero(&c) {
            return self;
        }
        self.div_coeff(&c)
    }

    /// Divide by `div` if the division is exact.
    pub fn divides(&self, div: &Self) -> Option<Self> {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return Some(self.clone());
        }

        if self.variables != div.variables {
            let mut a = self.clone();
            let mut b = div.clone();
            a.unify_variables(&mut b);
            return a.divides(&b);
        }

        self.field.try_div(&self.lcoeff(), &div.lcoeff())?;

        if (0..self.nvars()).any(|v| self.degree(v) < div.degree(v)) {
            return None;
        }

        self.heap_division(div, true)
            .map(|(q, _)| q)
    }

    /// Divide by `div`, failing with [DomainError::NotDivisible] if there is a remainder.
    pub fn divide_exact(&self, div: &Self) -> Result<Self, DomainError> {
        self.divides(div).ok_or(DomainError::NotDivisible)
    }

    /// Compute the remainder `self % div`.
    pub fn rem(&self, div: &Self) -> Self {
        self.quot_rem(div).1
    }

    /// Divide two multivariate polynomials and return the quotient and remainder,
    /// such that `self = q * div + r`. A term of the remainder is not divisible by the
    /// leading term of `div`.
    pub fn quot_rem(&self, div: &Self) -> (Self, Self) {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.variables != div.variables {
            let mut a = self.clone();
            let mut b = div.clone();
            a.unify_variables(&mut b);
            return a.quot_rem(&b);
        }

        if self.is_zero() {
            return (self.clone(), self.clone());
        }

        if div.is_one() {
            return (self.clone(), self.zero());
        }

        match self.heap_division(div, false) {
            Some(qr) => qr,
            None => unreachable!("Division without abort always completes"),
        }
    }

    /// Heap division for multivariate polynomials. The quotient and remainder are built
    /// from the leading term down. When `abort_on_remainder` is set, `None` is
    /// returned as soon as a remainder term appears.
    /// Reference: "Sparse polynomial division using a heap" by Monagan, Pearce (2011)
    fn heap_division(&self, div: &Self, abort_on_remainder: bool) -> Option<(Self, Self)> {
        let nvars = self.nvars();
        let nd = div.nterms();
        let lm: SmallVec<[E; INLINED_EXPONENTS]> = div.last_exponents().into();
        let lc = div.lcoeff();

        let mut q = self.zero_with_capacity(self.nterms());
        let mut r = self.zero();

        // the divisor is accessed from its leading term down
        let div_exp = |j: usize| div.exponents(nd - 1 - j);
        let div_coeff = |j: usize| &div.coefficients[nd - 1 - j];

        let mut heap: BinaryHeap<HeapTerm<E, O>> = BinaryHeap::new();
        let mut k = self.nterms();
        let mut m: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); nvars];
        let mut quot_exp: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); nvars];

        loop {
            let take_self = match (k > 0, heap.peek()) {
                (false, None) => break,
                (true, None) => true,
                (false, Some(_)) => false,
                (true, Some(t)) => O::cmp(self.exponents(k - 1), &t.exponents).is_ge(),
            };

            if take_self {
                m.copy_from_slice(self.exponents(k - 1));
            } else if let Some(t) = heap.peek() {
                m.copy_from_slice(&t.exponents);
            }

            let mut coeff = self.field.zero();
            if k > 0 && self.exponents(k - 1) == m.as_slice() {
                coeff = self.coefficients[k - 1].clone();
                k -= 1;
            }

            while heap.peek().map(|t| t.exponents == m).unwrap_or(false) {
                if let Some(t) = heap.pop() {
                    self.field
                        .sub_mul_assign(&mut coeff, &q.coefficients[t.left], div_coeff(t.right));

                    if t.right + 1 < nd {
                        heap.push(HeapTerm::new(q.exponents(t.left), div_exp(t.right + 1), t.left, t.right + 1));
                    }
                }
            }

            if F::is_zero(&coeff) {
                continue;
            }

            let divisible = m.iter().zip(&lm).all(|(a, b)| a >= b);
            let qc = if divisible {
                self.field.try_div(&coeff, &lc)
            } else {
                None
            };

            match qc {
                Some(qc) => {
                    for ((qe, a), b) in quot_exp.iter_mut().zip(&m).zip(&lm) {
                        *qe = *a - *b;
                    }

                    let s = q.nterms();
                    q.coefficients.push(qc);
                    q.exponents.extend_from_slice(&quot_exp);

                    if nd > 1 {
                        heap.push(HeapTerm::new(&quot_exp, div_exp(1), s, 1));
                    }
                }
                None => {
                    if abort_on_remainder {
                        return None;
                    }

                    r.coefficients.push(coeff);
                    r.exponents.extend_from_slice(&m);
                }
            }
        }

        q.reverse();
        r.reverse();
        Some((q, r))
    }
}

impl<F: Field, E: Exponent, O: MonomialOrder> MultivariatePolynomial<F, E, O> {
    /// Make the polynomial monic, i.e., make the leading coefficient `1` by
    /// multiplying all monomials with `1/lcoeff`.
    pub fn make_monic(self) -> Self {
        if self.is_zero() || self.field.is_one(&self.lcoeff()) {
            return self;
        }

        let ci = self.field.inv(&self.lcoeff());
        self.mul_coeff(ci)
    }
}

impl<E: Exponent, O: MonomialOrder> MultivariatePolynomial<IntegerRing, E, O> {
    /// Map the polynomial to a prime field.
    pub fn to_finite_field<UField: FiniteFieldWorkspace>(
        &self,
        field: &FiniteField<UField>,
    ) -> MultivariatePolynomial<FiniteField<UField>, E, O>
    where
        Integer: ToFiniteField<UField>,
        FiniteField<UField>: FiniteFieldCore<UField>,
    {
        self.map_coeff(|c| c.to_finite_field(field), field.clone())
    }

    /// Lift a polynomial over a prime field to the integers, using the symmetric representation.
    pub fn from_finite_field<UField: FiniteFieldWorkspace>(
        poly: &MultivariatePolynomial<FiniteField<UField>, E, O>,
    ) -> Self
    where
        FiniteField<UField>: FiniteFieldCore<UField>,
    {
        poly.map_coeff(|c| poly.field.to_symmetric_integer(c), IntegerRing::new())
    }

    /// Make the leading coefficient positive.
    pub fn normalize_sign(self) -> Self {
        if self.lcoeff().is_negative() {
            -self
        } else {
            self
        }
    }

    /// The sum of the absolute values of the coefficients.
    pub fn one_norm(&self) -> Integer {
        let mut norm = Integer::zero();
        for c in &self.coefficients {
            norm += &c.abs();
        }
        norm
    }
}

/// View object for a term in a multivariate polynomial.
#[derive(Copy, Clone, Debug)]
pub struct MonomialView<'a, F: 'a + Ring, E: 'a + Exponent> {
    pub coefficient: &'a F::Element,
    pub exponents: &'a [E],
}

/// Iterator over terms in a multivariate polynomial.
pub struct MonomialViewIterator<'a, F: Ring, E: Exponent, O: MonomialOrder> {
    poly: &'a MultivariatePolynomial<F, E, O>,
    index: usize,
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> Iterator for MonomialViewIterator<'a, F, E, O> {
    type Item = MonomialView<'a, F, E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.poly.nterms() {
            None
        } else {
            let view = MonomialView {
                coefficient: &self.poly.coefficients[self.index],
                exponents: self.poly.exponents(self.index),
            };
            self.index += 1;
            Some(view)
        }
    }
}

impl<'a, F: Ring, E: Exponent, O: MonomialOrder> IntoIterator for &'a MultivariatePolynomial<F, E, O> {
    type Item = MonomialView<'a, F, E>;
    type IntoIter = MonomialViewIterator<'a, F, E, O>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            poly: self,
            index: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::integer::{Integer, Z};
    use crate::domains::DomainError;
    use crate::parser::parse_polynomial;
    use crate::poly::{GrevLexOrder, Variable};

    use super::MultivariatePolynomial;

    #[test]
    fn arithmetic() {
        let field = Zp::new(17);
        let vars = ["x", "y"];
        let a = parse_polynomial("x^2+2*x*y+3", &field, &vars).unwrap();
        let b = parse_polynomial("x-y", &field, &vars).unwrap();

        let sum = &a + &b;
        sum.check_consistency();
        assert_eq!(sum.to_string(), "x^2+2*x*y+x+16*y+3");

        let prod = &a * &b;
        prod.check_consistency();
        assert_eq!(prod.to_string(), "x^3+x^2*y+15*x*y^2+3*x+14*y");
        assert!((&a - &a).is_zero());
        assert_eq!(b.pow(2).to_string(), "x^2+15*x*y+y^2");
    }

    #[test]
    fn display_over_integers() {
        let vars = ["x", "y"];
        let a = parse_polynomial("-x^2*y+3*x-y-1", &Z, &vars).unwrap();
        assert_eq!(a.to_string(), "-x^2*y+3*x-y-1");
        assert_eq!(a.zero().to_string(), "0");
    }

    #[test]
    fn division() {
        let vars = ["x", "y", "z"];
        let a = parse_polynomial("(x+y*z-2)*(x^2-3*y+z^3)", &Z, &vars).unwrap();
        let b = parse_polynomial("x^2-3*y+z^3", &Z, &vars).unwrap();
        let q = parse_polynomial("x+y*z-2", &Z, &vars).unwrap();

        assert_eq!(a.divides(&b), Some(q.clone()));
        assert_eq!(a.divide_exact(&q), Ok(b.clone()));

        let c = &a + &a.one();
        assert_eq!(c.divide_exact(&b), Err(DomainError::NotDivisible));

        let (quot, rem) = c.quot_rem(&b);
        assert_eq!(&(&quot * &b) + &rem, c);

        // the leading coefficient 2 does not divide 3 over the integers
        let d = parse_polynomial("3*x^2+1", &Z, &vars).unwrap();
        let e = parse_polynomial("2*x", &Z, &vars).unwrap();
        let (quot, rem) = d.quot_rem(&e);
        assert!(quot.is_zero());
        assert_eq!(rem, d);
    }

    #[test]
    fn content_and_monic() {
        let vars = ["x", "y"];
        let a = parse_polynomial("6*x^2*y+4*x-10", &Z, &vars).unwrap();
        assert_eq!(a.content(), Integer::new(2));
        assert_eq!(a.make_primitive().to_string(), "3*x^2*y+2*x-5");

        let field = Zp::new(7);
        let b = parse_polynomial("3*x*y+1", &field, &vars).unwrap();
        assert_eq!(b.make_monic().to_string(), "x*y+5");
    }

    #[test]
    fn leading_term() {
        let vars = ["x", "y"];
        let a = parse_polynomial("x^2*y+3*x-y^3", &Z, &vars).unwrap();
        assert_eq!(a.lcoeff(), Integer::one());
        assert_eq!(a.ldegree(0), 2);
        assert_eq!(a.ldegree(1), 1);
        assert_eq!(a.degree(1), 3);
        assert_eq!(a.zero().ldegree(1), 0);
    }

    #[test]
    fn substitution() {
        let field = Zp::new(101);
        let vars = ["x", "y", "z"];
        let a = parse_polynomial("x^2*y+x*z^2+y*z+1", &field, &vars).unwrap();

        let r = a.replace(1, &field.to_element(2));
        assert_eq!(r.to_string(), "2*x^2+x*z^2+2*z+1");

        let v = a.replace_all(&[field.to_element(1), field.to_element(2), field.to_element(3)]);
        assert_eq!(v, field.to_element(2 + 9 + 6 + 1));

        let u = a.replace_all_except(0, &[(1, field.to_element(2)), (2, field.to_element(3))]);
        assert_eq!(u.to_string(), "2*x^2+9*x+7");
        assert_eq!(a.from_univariate(&u, 0), parse_polynomial("2*x^2+9*x+7", &field, &vars).unwrap());
    }

    #[test]
    fn coefficients_in_variables() {
        let vars = ["x", "y", "z"];
        let a = parse_polynomial("x^2*y+3*x^2*z+y*z+2", &Z, &vars).unwrap();
        let c = a.coefficients_in(&[0]);
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].0.as_slice(), &[0, 0, 0]);
        assert_eq!(c[0].1.to_string(), "y*z+2");
        assert_eq!(c[1].0.as_slice(), &[2, 0, 0]);
        assert_eq!(c[1].1.to_string(), "y+3*z");

        let lc = a.lcoeff_last(1);
        assert_eq!(lc.to_string(), "y+3*z");
    }

    #[test]
    fn rearrange_variables() {
        let vars = ["x", "y", "z"];
        let a = parse_polynomial("x^3*y+y^2*z+5", &Z, &vars).unwrap();
        let b = a.rearrange(&[2, 0, 1], false);
        b.check_consistency();
        assert_eq!(b.variables[0], Variable::from("z"));
        assert_eq!(b.rearrange(&[2, 0, 1], true), a);

        let c = parse_polynomial("x^3+2*x*z", &Z, &vars).unwrap();
        let small = c.rearrange_with_growth(&[Some(0), Some(2)], std::sync::Arc::new(vec!["x".into(), "z".into()]));
        assert_eq!(small.nvars(), 2);
        assert_eq!(small.to_string(), "x^3+2*x*z");
        let back = small.rearrange_with_growth(&[Some(0), None, Some(1)], c.get_vars());
        assert_eq!(back, c);
    }

    #[test]
    fn unify_and_skeleton() {
        let a = parse_polynomial("x+1", &Z, &["x"]).unwrap();
        let b = parse_polynomial("y+2", &Z, &["y"]).unwrap();
        let p = &a * &b;
        assert_eq!(p.nvars(), 2);
        assert_eq!(p.to_string(), "x*y+2*x+y+2");

        let s = p.skeleton();
        assert!(s.same_skeleton(&p));
        assert_eq!(s.to_string(), "x*y+x+y+1");
        assert!(!s.same_skeleton(&a));
    }

    #[test]
    fn grevlex_arithmetic() {
        let vars = ["x", "y"];
        let a: MultivariatePolynomial<_, u16, GrevLexOrder> =
            parse_polynomial("x^2+y^3+x*y", &Z, &vars).unwrap().reorder();
        let b: MultivariatePolynomial<_, u16, GrevLexOrder> =
            parse_polynomial("x-y", &Z, &vars).unwrap().reorder();

        let p = &a * &b;
        p.check_consistency();
        assert_eq!(p.to_string(), "x*y^3-y^4+x^3-x*y^2");
        assert_eq!(p.divides(&b), Some(a));
    }
}
