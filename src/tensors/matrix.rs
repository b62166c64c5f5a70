use std::{
    fmt::Display,
    ops::{Index, IndexMut, Mul},
    slice::Chunks,
};

use crate::domains::{Field, Ring};

/// A matrix with entries that are elements of a ring `F`.
/// A vector can be represented as a matrix with one row or one column.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Matrix<F: Ring> {
    pub(crate) data: Vec<F::Element>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
    pub(crate) field: F,
}

impl<F: Ring> Matrix<F> {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32, field: F) -> Matrix<F> {
        Matrix {
            data: (0..nrows as usize * ncols as usize)
                .map(|_| field.zero())
                .collect(),
            nrows,
            ncols,
            field,
        }
    }

    /// Create a new column vector from a list of scalars.
    pub fn new_vec(data: Vec<F::Element>, field: F) -> Matrix<F> {
        Matrix {
            nrows: data.len() as u32,
            ncols: 1,
            data,
            field,
        }
    }

    /// Convert a linear representation of a matrix to a `Matrix`.
    pub fn from_linear(
        data: Vec<F::Element>,
        nrows: u32,
        ncols: u32,
        field: F,
    ) -> Result<Matrix<F>, MatrixError<F>> {
        if data.len() == (nrows * ncols) as usize {
            Ok(Matrix {
                data,
                nrows,
                ncols,
                field,
            })
        } else {
            Err(MatrixError::ShapeMismatch)
        }
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return the field of the matrix entries.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> Chunks<'_, F::Element> {
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Return true iff every entry in the matrix is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|e| F::is_zero(e))
    }
}

impl<F: Ring> Index<u32> for Matrix<F> {
    type Output = [F::Element];

    /// Get the `i`th row of the matrix.
    fn index(&self, index: u32) -> &Self::Output {
        &self.data[(index * self.ncols) as usize..((index + 1) * self.ncols) as usize]
    }
}

impl<F: Ring> Index<(u32, u32)> for Matrix<F> {
    type Output = F::Element;

    /// Get the `i`th row and `j`th column of the matrix.
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<F: Ring> IndexMut<(u32, u32)> for Matrix<F> {
    fn index_mut(&mut self, index: (u32, u32)) -> &mut Self::Output {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<F: Ring> Display for Matrix<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (ri, r) in self.row_iter().enumerate() {
            if ri > 0 {
                write!(f, ",")?;
            }
            write!(f, "{{")?;
            for (ci, c) in r.iter().enumerate() {
                if ci > 0 {
                    write!(f, ",")?;
                }
                self.field.format(c, f)?;
            }
            write!(f, "}}")?;
        }
        write!(f, "}}")
    }
}

impl<F: Ring> Mul<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix<F>) -> Self::Output {
        if self.ncols != rhs.nrows {
            panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols, self.field.clone());

        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let sum = &mut m[(i, j)];
                for k in 0..self.ncols {
                    self.field.add_mul_assign(sum, &self[(i, k)], &rhs[(k, j)]);
                }
            }
        }

        m
    }
}

/// Errors that can occur when performing matrix operations.
#[derive(Debug)]
pub enum MatrixError<F: Ring> {
    Underdetermined {
        min_rank: u32,
        max_rank: u32,
        row_reduced_matrix: Option<Matrix<F>>,
    },
    Inconsistent,
    ShapeMismatch,
    RightHandSideIsNotVector,
}

impl<F: Ring> std::fmt::Display for MatrixError<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::Underdetermined {
                min_rank,
                max_rank,
                row_reduced_matrix,
            } => {
                write!(
                    f,
                    "The system is underdetermined. The rank of the matrix is between {} and {}",
                    min_rank, max_rank
                )?;
                if let Some(m) = row_reduced_matrix {
                    write!(f, "\nRow reduced matrix:\n{}", m)?;
                }
                Ok(())
            }
            MatrixError::Inconsistent => write!(f, "The system is inconsistent"),
            MatrixError::ShapeMismatch => write!(f, "The shape of the matrix is not compatible"),
            MatrixError::RightHandSideIsNotVector => {
                write!(f, "The right-hand side is not a vector")
            }
        }
    }
}

impl<F: Ring> std::error::Error for MatrixError<F> {}

/// The outcome of solving a linear system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinearSolution<F: Ring> {
    /// The system has the unique solution.
    Consistent(Vec<F::Element>),
    Inconsistent,
    /// The system has more than one solution.
    UnderDetermined,
}

impl<F: Field> Matrix<F> {
    /// Write the matrix in echelon form and return the rank.
    fn gaussian_elimination(&mut self, max_col: u32) -> u32 {
        if self.nrows == 0 {
            return 0;
        }

        let zero = self.field.zero();

        let mut i = 0;
        for j in 0..max_col {
            if F::is_zero(&self[(i, j)]) {
                // select a non-zero pivot
                for k in i + 1..self.nrows {
                    if !F::is_zero(&self[(k, j)]) {
                        for l in j..self.ncols {
                            self.data
                                .swap((self.ncols * i + l) as usize, (self.ncols * k + l) as usize);
                        }
                        break;
                    }
                }
                if F::is_zero(&self[(i, j)]) {
                    continue;
                }
            }
            let x = self[(i, j)].clone();
            let inv_x = self.field.inv(&x);
            for k in i + 1..self.nrows {
                if !F::is_zero(&self[(k, j)]) {
                    let s = self.field.mul(&self[(k, j)], &inv_x);
                    self[(k, j)] = self.field.zero();
                    for l in j + 1..self.ncols {
                        let mut e = std::mem::replace(&mut self[(k, l)], zero.clone());
                        self.field.sub_mul_assign(&mut e, &self[(i, l)], &s);
                        self[(k, l)] = e;
                    }
                }
            }

            i += 1;
            if i >= self.nrows {
                break;
            }
        }

        i
    }

    /// Create a row-reduced matrix from a matrix in echelon form.
    fn back_substitution(&mut self, max_col: u32) {
        let field = self.field.clone();
        for i in (0..self.nrows).rev() {
            if let Some(j) = (0..max_col).find(|&j| !F::is_zero(&self[(i, j)])) {
                if !field.is_one(&self[(i, j)]) {
                    let inv_x = field.inv(&self[(i, j)]);

                    for k in j..self.ncols {
                        field.mul_assign(&mut self[(i, k)], &inv_x);
                    }
                }

                for k in 0..i {
                    if !F::is_zero(&self[(k, j)]) {
                        let scale = std::mem::replace(&mut self[(k, j)], field.zero());
                        for l in j + 1..self.ncols {
                            let mut e = std::mem::replace(&mut self[(k, l)], field.zero());
                            field.sub_mul_assign(&mut e, &self[(i, l)], &scale);
                            self[(k, l)] = e;
                        }
                    }
                }
            }
        }
    }

    /// Solve `A * x = b` for `x`, where `A` is `self`.
    pub fn solve(&self, b: &Matrix<F>) -> Result<Matrix<F>, MatrixError<F>> {
        if self.nrows != b.nrows {
            return Err(MatrixError::ShapeMismatch);
        }
        if b.ncols != 1 {
            return Err(MatrixError::RightHandSideIsNotVector);
        }

        let (neqs, nvars) = (self.nrows, self.ncols);

        // create the augmented matrix
        let mut m = Matrix::new(neqs, nvars + 1, self.field.clone());
        for r in 0..neqs {
            for c in 0..nvars {
                m[(r, c)] = self[(r, c)].clone();
            }
            m[(r, nvars)] = b.data[r as usize].clone();
        }

        let rank = m.gaussian_elimination(nvars);

        for k in rank..neqs {
            if !F::is_zero(&m[(k, nvars)]) {
                return Err(MatrixError::Inconsistent);
            }
        }

        m.back_substitution(nvars);

        if rank < nvars {
            return Err(MatrixError::Underdetermined {
                min_rank: rank,
                max_rank: rank,
                row_reduced_matrix: Some(m),
            });
        }

        let result = Matrix {
            nrows: nvars,
            ncols: 1,
            data: (0..nvars).map(|i| m[(i, nvars)].clone()).collect(),
            field: m.field,
        };

        Ok(result)
    }

    /// Solve `A * x = b` and classify the outcome. Only malformed
    /// shapes are reported as an error.
    pub fn solve_system(&self, b: &[F::Element]) -> Result<LinearSolution<F>, MatrixError<F>> {
        let rhs = Matrix::new_vec(b.to_vec(), self.field.clone());
        match self.solve(&rhs) {
            Ok(x) => Ok(LinearSolution::Consistent(x.data)),
            Err(MatrixError::Inconsistent) => Ok(LinearSolution::Inconsistent),
            Err(MatrixError::Underdetermined { .. }) => Ok(LinearSolution::UnderDetermined),
            Err(e) => Err(e),
        }
    }

    /// Row-reduce the matrix in-place using Gaussian elimination and return the rank.
    pub fn row_reduce(&mut self) -> usize {
        let rank = self.gaussian_elimination(self.ncols) as usize;
        self.back_substitution(self.ncols);
        rank
    }

    /// Get the rank of the matrix.
    pub fn rank(&self) -> usize {
        self.clone().gaussian_elimination(self.ncols) as usize
    }
}

/// Solve the transposed Vandermonde system `sum_j values[j]^i * x_j = rhs[i]`
/// for `i` in `0..n` in `O(n^2)` operations, using the master polynomial
/// `M(z) = prod_j (z - values[j])`.
///
/// A repeated value makes the system singular and yields [LinearSolution::UnderDetermined].
pub fn solve_vandermonde_transposed<F: Field>(
    field: &F,
    values: &[F::Element],
    rhs: &[F::Element],
) -> Result<LinearSolution<F>, MatrixError<F>> {
    if values.len() != rhs.len() {
        return Err(MatrixError::ShapeMismatch);
    }

    let n = values.len();
    if n == 0 {
        return Ok(LinearSolution::Consistent(vec![]));
    }

    // master polynomial, coefficients in ascending degree
    let mut master = vec![field.zero(); n + 1];
    master[0] = field.one();
    for (deg, v) in values.iter().enumerate() {
        for k in (0..=deg + 1).rev() {
            let mut c = if k > 0 {
                master[k - 1].clone()
            } else {
                field.zero()
            };
            field.sub_mul_assign(&mut c, &master[k], v);
            master[k] = c;
        }
    }

    let mut result = Vec::with_capacity(n);
    let mut quotient = vec![field.zero(); n];
    for v in values {
        // synthetic division of the master polynomial by z - v
        quotient[n - 1] = master[n].clone();
        for k in (0..n - 1).rev() {
            let mut c = master[k + 1].clone();
            field.add_mul_assign(&mut c, &quotient[k + 1], v);
            quotient[k] = c;
        }

        let mut num = field.zero();
        let mut den = field.zero();
        for (q, r) in quotient.iter().zip(rhs).rev() {
            field.add_mul_assign(&mut num, q, r);
            field.mul_assign(&mut den, v);
            field.add_assign(&mut den, q);
        }

        match field.try_inv(&den) {
            Some(inv) => result.push(field.mul(&num, &inv)),
            None => return Ok(LinearSolution::UnderDetermined),
        }
    }

    Ok(LinearSolution::Consistent(result))
}

#[cfg(test)]
mod test {
    use crate::domains::{
        finite_field::{FiniteFieldCore, Zp},
        Ring,
    };

    use super::{solve_vandermonde_transposed, LinearSolution, Matrix, MatrixError};

    fn matrix(field: &Zp, data: &[u32], nrows: u32, ncols: u32) -> Matrix<Zp> {
        Matrix::from_linear(
            data.iter().map(|x| field.to_element(*x)).collect(),
            nrows,
            ncols,
            *field,
        )
        .unwrap()
    }

    #[test]
    fn solve() {
        let f = Zp::new(17);
        let a = matrix(&f, &[1, 2, 3, 4, 5, 16, 7, 8, 9], 3, 3);
        let b = matrix(&f, &[1, 2, 3], 3, 1);

        let r = a.solve(&b).unwrap();
        assert_eq!(r, matrix(&f, &[11, 12, 0], 3, 1));
        assert_eq!(&a * &r, b);
    }

    #[test]
    fn row_reduce() {
        let f = Zp::new(17);
        let mut a = matrix(&f, &[1, 2, 3, 4, 5, 6, 7, 8, 9], 3, 3);

        assert_eq!(a.rank(), 2);
        assert_eq!(a.row_reduce(), 2);
        assert_eq!(a, matrix(&f, &[1, 0, 16, 0, 1, 2, 0, 0, 0], 3, 3));
    }

    #[test]
    fn statuses() {
        let f = Zp::new(17);
        let a = matrix(&f, &[1, 2, 3, 4, 5, 6, 7, 8, 9], 3, 3);

        let consistent: Vec<_> = [1, 1, 1].iter().map(|x| f.to_element(*x)).collect();
        assert_eq!(a.solve_system(&consistent).unwrap(), LinearSolution::UnderDetermined);

        let inconsistent: Vec<_> = [1, 0, 0].iter().map(|x| f.to_element(*x)).collect();
        assert_eq!(a.solve_system(&inconsistent).unwrap(), LinearSolution::Inconsistent);

        // more equations than unknowns
        let tall = matrix(&f, &[1, 1, 1, 16, 2, 0], 3, 2);
        let rhs: Vec<_> = [3, 16, 2].iter().map(|x| f.to_element(*x)).collect();
        assert_eq!(
            tall.solve_system(&rhs).unwrap(),
            LinearSolution::Consistent(vec![f.to_element(1), f.to_element(2)])
        );

        let wide = matrix(&f, &[1, 2, 3], 1, 3);
        assert!(matches!(
            wide.solve(&matrix(&f, &[1, 2], 2, 1)),
            Err(MatrixError::ShapeMismatch)
        ));
        assert!(matches!(
            wide.solve(&matrix(&f, &[1], 1, 1)),
            Err(MatrixError::Underdetermined { min_rank: 1, .. })
        ));
    }

    #[test]
    fn vandermonde_agrees_with_gaussian() {
        let f = Zp::new(101);
        let values = [3u32, 7, 11, 50, 99];
        let rhs = [5u32, 0, 17, 42, 100];

        let n = values.len() as u32;
        let mut a = Matrix::new(n, n, f);
        for i in 0..n {
            for (j, v) in values.iter().enumerate() {
                a[(i, j as u32)] = f.pow(&f.to_element(*v), i as u64);
            }
        }

        let rhs_el: Vec<_> = rhs.iter().map(|x| f.to_element(*x)).collect();
        let values_el: Vec<_> = values.iter().map(|x| f.to_element(*x)).collect();

        let gauss = a.solve_system(&rhs_el).unwrap();
        let vandermonde = solve_vandermonde_transposed(&f, &values_el, &rhs_el).unwrap();
        assert!(matches!(gauss, LinearSolution::Consistent(_)));
        assert_eq!(gauss, vandermonde);
    }

    #[test]
    fn vandermonde_repeated_value() {
        let f = Zp::new(17);
        let values: Vec<_> = [2, 5, 2].iter().map(|x| f.to_element(*x)).collect();
        let rhs: Vec<_> = [1, 2, 3].iter().map(|x| f.to_element(*x)).collect();

        assert_eq!(
            solve_vandermonde_transposed(&f, &values, &rhs).unwrap(),
            LinearSolution::UnderDetermined
        );
    }
}
