//! Entry points for comparing lambdas.

use crate::equiv::{EquivConfig, Equivalence};
use crate::error::Result;
use crate::expr::Expr;

/// Compares two lambdas with the default configuration.
///
/// `None` stands for an absent (null) lambda: two absent lambdas are equivalent, an
/// absent and a present one are not.
///
/// # Examples
///
/// ```
/// use lambda_eq::expr::{BinaryOp, Expr};
/// use lambda_eq::param::Parameter;
/// use lambda_eq::types::TypeTag;
///
/// let sum = |a: &str, b: &str| {
///     let a = Parameter::new(a, &TypeTag::int());
///     let b = Parameter::new(b, &TypeTag::int());
///     let body = Expr::binary(BinaryOp::Add, Expr::param(&a), Expr::param(&b));
///     Expr::lambda(vec![a, b], body)
/// };
///
/// let f = sum("first", "second");
/// let g = sum("i", "s");
/// assert!(lambda_eq::equivalent(Some(&f), Some(&g)).unwrap());
/// assert!(!lambda_eq::equivalent(Some(&f), None).unwrap());
/// assert!(lambda_eq::equivalent(None, None).unwrap());
/// ```
pub fn equivalent(x: Option<&Expr>, y: Option<&Expr>) -> Result<bool> {
    Equivalence::default().equivalent(x, y)
}

/// Compares two lambdas with a custom configuration.
pub fn equivalent_with_config(x: Option<&Expr>, y: Option<&Expr>, config: &EquivConfig) -> Result<bool> {
    Equivalence::new(config.clone()).equivalent(x, y)
}

/// Returns a predicate accepting any lambda equivalent to `y`.
///
/// Meant for argument matchers of mocking frameworks and similar higher-order
/// assertions.
///
/// ```
/// use lambda_eq::expr::Expr;
/// use lambda_eq::param::Parameter;
/// use lambda_eq::types::TypeTag;
///
/// let x = Parameter::new("x", &TypeTag::int());
/// let expected = Expr::lambda(vec![x.clone()], Expr::param(&x));
/// let is_identity = lambda_eq::matcher(&expected);
///
/// let y = Parameter::new("y", &TypeTag::int());
/// assert!(is_identity(Some(&Expr::lambda(vec![y.clone()], Expr::param(&y)))).unwrap());
/// assert!(!is_identity(None).unwrap());
/// ```
pub fn matcher(y: &Expr) -> impl Fn(Option<&Expr>) -> Result<bool> + '_ {
    let engine = Equivalence::default();
    move |x| engine.equivalent(x, Some(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::error::Error;
    use crate::param::Parameter;
    use crate::types::TypeTag;

    fn identity(name: &str) -> Expr {
        let p = Parameter::new(name, &TypeTag::int());
        Expr::lambda(vec![p.clone()], Expr::param(&p))
    }

    #[test]
    fn test_null_laws() {
        let f = identity("x");
        assert!(equivalent(None, None).unwrap());
        assert!(!equivalent(Some(&f), None).unwrap());
        assert!(!equivalent(None, Some(&f)).unwrap());
    }

    #[test]
    fn test_reflexive() {
        let f = identity("x");
        assert!(equivalent(Some(&f), Some(&f)).unwrap());
        assert!(equivalent(Some(&f), Some(&f.clone())).unwrap());
    }

    #[test]
    fn test_with_config() {
        let config = EquivConfig {
            fold_constants: false,
            ..EquivConfig::default()
        };
        assert!(equivalent_with_config(Some(&identity("a")), Some(&identity("b")), &config).unwrap());
    }

    #[test]
    fn test_matcher_propagates_errors() {
        let x = Parameter::new("x", &TypeTag::int());
        let expected = Expr::lambda(
            vec![x.clone()],
            Expr::extension("Invoke", vec![Expr::param(&x)], &TypeTag::int()),
        );
        let m = matcher(&expected);
        let y = Parameter::new("y", &TypeTag::int());
        let actual = Expr::lambda(
            vec![y.clone()],
            Expr::extension("Invoke", vec![Expr::param(&y)], &TypeTag::int()),
        );
        assert!(matches!(m(Some(&actual)), Err(Error::UnsupportedNodeKind(_))));
        // Identical instance short-circuits before the unsupported node is reached.
        assert!(m(Some(&expected)).unwrap());
    }
}
