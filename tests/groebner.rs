use polygcd::{
    domains::{
        finite_field::{FiniteFieldCore, Zp},
        Ring,
    },
    parser::parse_polynomial,
    poly::{groebner::GroebnerBasis, polynomial::MultivariatePolynomial, GrevLexOrder, LexOrder},
};

fn cyclic4(field: &Zp) -> Vec<MultivariatePolynomial<Zp, u16>> {
    let vars = ["a", "b", "c", "d"];
    [
        "a*b*c*d-1",
        "a*b*c+a*b*d+a*c*d+b*c*d",
        "a*b+b*c+a*d+c*d",
        "a+b+c+d",
    ]
    .iter()
    .map(|x| parse_polynomial(x, field, &vars).unwrap())
    .collect()
}

#[test]
fn cyclic4_grevlex() {
    let ideal: Vec<_> = cyclic4(&Zp::new(32003))
        .into_iter()
        .map(|p| p.reorder::<GrevLexOrder>())
        .collect();

    let gb = GroebnerBasis::new(&ideal, false);
    assert!(GroebnerBasis::is_groebner_basis(&gb.system));

    for p in &ideal {
        assert!(GroebnerBasis::reduce(p, &gb.system[..]).is_zero());
    }

    assert_eq!(gb.system, GroebnerBasis::simple_buchberger(&ideal).system);
}

#[test]
fn cyclic4_lex() {
    let ideal = cyclic4(&Zp::new(13));

    let gb = GroebnerBasis::<_, _, LexOrder>::new(&ideal, true);
    assert!(GroebnerBasis::is_groebner_basis(&gb.system));
    assert!(gb.system.iter().all(|p| p.lcoeff() == p.field.one()));
    assert_eq!(gb.system, GroebnerBasis::simple_buchberger(&ideal).system);
}

#[test]
fn inconsistent_system() {
    let field = Zp::new(101);
    let vars = ["x", "y"];
    let ideal: Vec<_> = ["x*y-1", "x", "y^2+3"]
        .iter()
        .map(|x| parse_polynomial(x, &field, &vars).unwrap())
        .collect();

    let gb = GroebnerBasis::<_, _, LexOrder>::new(&ideal, false);
    assert_eq!(gb.system.len(), 1);
    assert!(gb.system[0].is_one());
}

#[test]
fn zero_generators_are_ignored() {
    let field = Zp::new(7);
    let vars = ["x", "y"];
    let p = parse_polynomial("x^2-y", &field, &vars).unwrap();
    let ideal = vec![p.zero(), p.clone(), p.zero()];

    let gb = GroebnerBasis::<_, _, LexOrder>::new(&ideal, false);
    assert_eq!(gb.system, vec![p]);
}
