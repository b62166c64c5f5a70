//! polygcd computes greatest common divisors of multivariate polynomials
//! over prime fields, their extensions and the integers.
//!
//! The gcd engine combines Brown's dense interpolation and Zippel's sparse
//! interpolation with Chinese remaindering over many primes. Every result
//! is validated by exact division before it is returned.
//!
//! For example:
//!
//! ```
//! use polygcd::{domains::finite_field::{FiniteFieldCore, Zp}, parser::parse_polynomial};
//!
//! let field = Zp::new(17);
//! let vars = ["x", "y"];
//! let a = parse_polynomial("(x+y)*(x-2*y+1)", &field, &vars).unwrap();
//! let b = parse_polynomial("(x+y)*(x^2+y+3)", &field, &vars).unwrap();
//!
//! let g = a.gcd(&b).unwrap();
//! assert_eq!(g.to_string(), "x+y");
//! ```
//!
//! The crate also contains a Buchberger Gröbner basis engine in
//! [poly::groebner], which shares the same polynomial representation.

pub mod domains;
pub mod parser;
pub mod poly;
pub mod tensors;
pub mod utils;
