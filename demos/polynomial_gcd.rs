use polygcd::{
    domains::{
        finite_field::{FiniteFieldCore, Zp},
        integer::Z,
    },
    parser::parse_polynomial,
    poly::{groebner::GroebnerBasis, GrevLexOrder},
};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("POLYGCD_LOG"))
        .init();

    let vars = ["x", "y", "z"];

    let a = parse_polynomial("(3*x^2*y-z+5)*(x*y*z+2*y^3-7)", &Z, &vars).unwrap();
    let b = parse_polynomial("(3*x^2*y-z+5)*(x^4-z^2*y+11)", &Z, &vars).unwrap();
    println!("> Polynomial gcd of {} and {} =", a, b);
    println!("\t{}", a.gcd(&b).unwrap());

    let field = Zp::new(1000003);
    let a = parse_polynomial("(x^3*y^2+y*z^4+3)*(x+y+z)^2", &field, &vars).unwrap();
    let b = parse_polynomial("(x^3*y^2+y*z^4+3)*(x*y-z^3)", &field, &vars).unwrap();
    println!("> Polynomial gcd of {} and {} =", a, b);
    println!("\t{}", a.gcd_brown(&b).unwrap());

    let field = Zp::new(13);
    let ideal: Vec<_> = ["x*y*z-1", "x*y+y*z+x*z", "x+y+z"]
        .iter()
        .map(|s| {
            parse_polynomial(s, &field, &vars)
                .unwrap()
                .reorder::<GrevLexOrder>()
        })
        .collect();

    let gb = GroebnerBasis::new(&ideal, true);
    println!("> Groebner basis of cyclic-3:");
    for g in &gb.system {
        println!("\t{}", g);
    }
}
