use std::sync::Arc;

use polygcd::{
    domains::{
        finite_field::{FiniteFieldCore, Zp, Z2},
        integer::Z,
        Ring,
    },
    parser::parse_polynomial,
    poly::{
        gcd::{GcdAlgorithm, GcdError, GcdOptions},
        polynomial::MultivariatePolynomial,
        Variable,
    },
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_polynomial(
    field: &Zp,
    vars: &Arc<Vec<Variable>>,
    nterms: usize,
    max_degree: u16,
    rng: &mut StdRng,
) -> MultivariatePolynomial<Zp> {
    let mut p = MultivariatePolynomial::new(field, Some(nterms), vars.clone());
    for _ in 0..nterms {
        let exponents: Vec<u16> = (0..vars.len()).map(|_| rng.random_range(0..=max_degree)).collect();
        let coeff = field.to_element(rng.random_range(1..field.get_prime()));
        let m = p.monomial(coeff, exponents);
        p = p + m;
    }
    p
}

#[test]
fn factors_over_gf67() {
    let field = Zp::new(67);
    let vars = ["a", "b"];
    let factors: Vec<_> = [
        "b^2+b^5+b^7+b^10",
        "33+a",
        "22+a",
        "32+8*a+a^2",
        "32+59*a+a^2",
        "24+5*a+15*a^2+45*a^3+a^4",
        "28+56*a+45*a^2+23*a^3+a^4",
        "19+a^6",
    ]
    .iter()
    .map(|f| parse_polynomial(f, &field, &vars).unwrap())
    .collect();

    let product = factors.iter().fold(factors[0].one(), |acc, f| &acc * f);
    let shift = parse_polynomial("a+b+1", &field, &vars).unwrap();

    for f in &factors {
        let g = product.gcd(&(f * &shift)).unwrap();
        assert_eq!(g, f.clone().make_monic());
    }

    // the gcd of two partial products is their common part
    let left = factors[..5].iter().fold(factors[0].one(), |acc, f| &acc * f);
    let right = factors[3..].iter().fold(factors[0].one(), |acc, f| &acc * f);
    let common = &factors[3] * &factors[4];
    assert_eq!(left.gcd_brown(&right).unwrap(), common);
    assert_eq!(left.gcd_zippel(&right).unwrap(), common);
}

#[test]
fn tiny_field_extension() {
    let field = Zp::new(3);
    let vars = ["x", "y", "z"];
    let g = parse_polynomial("x^2+y*z+1", &field, &vars).unwrap();
    let a = &g * &parse_polynomial("x+y+2*z", &field, &vars).unwrap();
    let b = &g * &parse_polynomial("x*y+z^2+1", &field, &vars).unwrap();

    for algorithm in [GcdAlgorithm::Brown, GcdAlgorithm::Zippel] {
        let options = GcdOptions {
            algorithm,
            ..GcdOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let r = a.gcd_with_options(&b, &options, &mut rng).unwrap();
        assert!(a.divides(&r).is_some());
        assert!(b.divides(&r).is_some());
        assert_eq!(r, g);
    }
}

#[test]
fn binary_field_extension() {
    let vars = ["x", "y"];
    let g = parse_polynomial("x*y+x+1", &Z2, &vars).unwrap();
    let a = &g * &parse_polynomial("x+y", &Z2, &vars).unwrap();
    let b = &g * &parse_polynomial("x*y+1", &Z2, &vars).unwrap();

    assert_eq!(a.gcd_brown(&b).unwrap(), g);
    assert_eq!(a.gcd_zippel(&b).unwrap(), g);
    assert!(a.gcd(&parse_polynomial("x+1", &Z2, &vars).unwrap()).unwrap().is_one());
}

#[test]
fn evaluation_points_run_out() {
    // the leading coefficient in x vanishes at every nonzero y modulo 11
    let field = Zp::new(11);
    let vars = ["x", "y"];
    let g = parse_polynomial("x+y+1", &field, &vars).unwrap();
    let a = &g * &parse_polynomial("(y^10-1)*x+y", &field, &vars).unwrap();
    let b = &g * &parse_polynomial("(y^10-1)*x+y^2+1", &field, &vars).unwrap();

    assert_eq!(a.gcd_brown(&b).unwrap().to_string(), "x+y+1");
    assert_eq!(a.gcd_zippel(&b).unwrap().to_string(), "x+y+1");
}

#[test]
fn brown_and_zippel_agree() {
    let field = Zp::new(1000003);
    let vars = Arc::new(vec![Variable::from("x"), Variable::from("y"), Variable::from("z")]);

    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = random_polynomial(&field, &vars, 4, 3, &mut rng);
        let a = &g * &random_polynomial(&field, &vars, 4, 3, &mut rng);
        let b = &g * &random_polynomial(&field, &vars, 4, 3, &mut rng);

        let brown = a.gcd_brown(&b).unwrap();
        let zippel = a.gcd_zippel(&b).unwrap();
        assert_eq!(brown, zippel);

        assert!(brown.divides(&g).is_some());
        assert!(a.divides(&brown).is_some());
        assert!(b.divides(&brown).is_some());
    }
}

#[test]
fn linzip_matches_monic() {
    let field = Zp::new(1000003);
    let vars = ["x", "y", "z"];
    let g = parse_polynomial("x^2*y*z+x^2*y^2+x*z^3+x*y+z^2+y", &field, &vars).unwrap();
    let a = &g * &parse_polynomial("x^2+y*z+3", &field, &vars).unwrap();
    let b = &g * &parse_polynomial("x*y+x*z+y^2-5", &field, &vars).unwrap();

    let monic = a.gcd(&b).unwrap();
    let options = GcdOptions {
        force_linzip: true,
        ..GcdOptions::default()
    };
    let mut rng = StdRng::seed_from_u64(11);
    let linzip = a.gcd_with_options(&b, &options, &mut rng).unwrap();

    assert_eq!(monic, g);
    assert_eq!(linzip, g);
}

#[test]
fn integer_and_modular_agree() {
    let vars = ["x", "y"];
    let a = parse_polynomial("(x+y+1)*(x-y+3)", &Z, &vars).unwrap();
    let b = parse_polynomial("(x+y+1)*(x*y+2)", &Z, &vars).unwrap();
    let g = a.gcd(&b).unwrap();
    assert_eq!(g.to_string(), "x+y+1");

    let field = Zp::new(1000003);
    let ap = a.to_finite_field(&field);
    let bp = b.to_finite_field(&field);
    assert_eq!(ap.gcd(&bp).unwrap(), g.to_finite_field(&field));
}

#[test]
fn integer_content_and_sign() {
    let vars = ["x", "y"];
    let a = parse_polynomial("-6*(x^2*y-3*y+2)*(x+y)", &Z, &vars).unwrap();
    let b = parse_polynomial("4*(x^2*y-3*y+2)*(x-y^2)", &Z, &vars).unwrap();
    assert_eq!(a.gcd(&b).unwrap().to_string(), "2*x^2*y-6*y+4");
    assert_eq!(a.gcd_brown(&b).unwrap().to_string(), "2*x^2*y-6*y+4");
}

#[test]
fn multiplicativity() {
    let vars = ["x", "y", "z"];
    let a = parse_polynomial("x^3+2*y*z-1", &Z, &vars).unwrap();
    let b = parse_polynomial("x*y^2-z^3+4", &Z, &vars).unwrap();
    let c = parse_polynomial("3*x*y*z+x^2-7*z+2", &Z, &vars).unwrap();

    let g = a.gcd(&b).unwrap();
    assert!(g.is_one());

    let gc = (&a * &c).gcd(&(&b * &c)).unwrap();
    assert_eq!(gc, &g * &c);
}

#[test]
fn idempotence_and_symmetry() {
    let field = Zp::new(101);
    let vars = ["x", "y"];
    let a = parse_polynomial("5*x^3*y+7*x*y^2+3", &field, &vars).unwrap();
    let b = parse_polynomial("(5*x^3*y+7*x*y^2+3)*(x+y)", &field, &vars).unwrap();

    let monic = a.clone().make_monic();
    assert_eq!(a.gcd(&a).unwrap(), monic);
    assert_eq!(a.gcd(&b).unwrap(), monic);
    assert_eq!(b.gcd(&a).unwrap(), monic);
}

#[test]
fn coprime_polynomials() {
    let field = Zp::new(32003);
    let vars = ["x", "y", "z"];
    let a = parse_polynomial("x^2+y^2+z^2-1", &field, &vars).unwrap();
    let b = parse_polynomial("x*y*z-2", &field, &vars).unwrap();
    assert!(a.gcd_brown(&b).unwrap().is_one());
    assert!(a.gcd_zippel(&b).unwrap().is_one());
}

#[test]
fn zero_and_units() {
    let vars = ["x", "y"];
    let a = parse_polynomial("-4*x*y+6*y", &Z, &vars).unwrap();
    let zero = a.zero();
    let seven = a.constant(Z.nth(7.into()));

    assert_eq!(a.gcd(&zero).unwrap().to_string(), "4*x*y-6*y");
    assert!(zero.gcd(&zero).unwrap().is_zero());
    assert!(a.gcd(&seven).unwrap().is_one());
    assert_eq!(a.gcd(&a.constant(Z.nth(6.into()))).unwrap().to_string(), "2");
}

#[test]
fn variables_are_unified() {
    let field = Zp::new(17);
    let a = parse_polynomial("(x+y)*(x+1)", &field, &["x", "y"]).unwrap();
    let b = parse_polynomial("(x+y)*(z+2)", &field, &["z", "x", "y"]).unwrap();
    assert_eq!(a.gcd(&b).unwrap().to_string(), "x+y");
}

#[test]
fn domain_errors() {
    let vars = ["x"];
    let a = parse_polynomial("x+1", &Zp::new(5), &vars).unwrap();
    let b = parse_polynomial("x+1", &Zp::new(7), &vars).unwrap();
    assert_eq!(a.gcd(&b), Err(GcdError::DomainMismatch));
    assert!(!GcdError::DomainMismatch.is_retryable());
    assert!(GcdError::UnluckyEvaluation.is_retryable());
}
