//! Constant folding.
//!
//! [`Expr::try_evaluate`] reduces a subtree to a [`Value`] when it depends on nothing
//! but constants: literals, member reads off constants (captured locals), arrays of
//! constants and conditionals with a constant test. It is a fast path for the
//! equivalence engine, not an interpreter, and it never fails: `None` just means the
//! subtree has to be compared structurally.

use crate::expr::{Expr, ExprKind};
use crate::value::Value;

impl Expr {
    /// Folds this subtree to a value, if it is constant.
    pub fn try_evaluate(&self) -> Option<Value> {
        match self.kind() {
            ExprKind::Constant(value) => Some(value.clone()),
            ExprKind::Member {
                target: Some(target),
                member,
            } => target.try_evaluate()?.read(member),
            ExprKind::NewArray { elements } => elements
                .iter()
                .map(Expr::try_evaluate)
                .collect::<Option<Vec<_>>>()
                .map(Value::array),
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                let test = test.try_evaluate()?;
                if test.as_bool() == Some(true) {
                    if_true.try_evaluate()
                } else {
                    if_false.try_evaluate()
                }
            }
            _ => None,
        }
    }
}

/// Equality of folded values.
///
/// Same instance is equal; ordered collections compare length then elements
/// pairwise with this same rule; anything else falls back to [`Value`]'s `PartialEq`.
pub fn values_equal(x: &Value, y: &Value) -> bool {
    if x.same_instance(y) {
        return true;
    }
    match (x, y) {
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(a, b)| values_equal(a, b))
        }
        _ => x == y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::expr::BinaryOp;
    use crate::param::Parameter;
    use crate::types::{MemberRef, TypeTag};
    use crate::value::Record;

    fn closure(port: i64, secure: bool) -> (Expr, MemberRef, MemberRef) {
        let ty = TypeTag::named("<>c__DisplayClass0_0");
        let port_field = MemberRef::field(&ty, "port", &TypeTag::int());
        let secure_field = MemberRef::field(&ty, "isSecure", &TypeTag::bool());
        let record = Record::new(&ty).with_field("port", port).with_field("isSecure", secure);
        (Expr::constant(Value::record(record), &ty), port_field, secure_field)
    }

    #[test]
    fn test_constant() {
        assert_eq!(Expr::int(3).try_evaluate(), Some(Value::Int(3)));
        assert_eq!(Expr::null(&TypeTag::string()).try_evaluate(), Some(Value::Null));
    }

    #[test]
    fn test_captured_member() {
        let (c, port, _) = closure(443, true);
        let e = Expr::member(c, &port);
        assert_eq!(e.try_evaluate(), Some(Value::Int(443)));
    }

    #[test]
    fn test_member_of_parameter_is_undefined() {
        let uri = TypeTag::named("Uri");
        let u = Parameter::new("u", &uri);
        let host = MemberRef::property(&uri, "Host", &TypeTag::string());
        assert_eq!(Expr::member(Expr::param(&u), &host).try_evaluate(), None);
        assert_eq!(Expr::static_member(&host).try_evaluate(), None);
    }

    #[test]
    fn test_member_of_non_record_is_undefined() {
        let length = MemberRef::property(&TypeTag::string(), "Length", &TypeTag::int());
        assert_eq!(Expr::member(Expr::string("abc"), &length).try_evaluate(), None);
    }

    #[test]
    fn test_new_array() {
        let e = Expr::new_array(&TypeTag::int(), vec![Expr::int(1), Expr::int(2)]);
        assert_eq!(e.try_evaluate(), Some(Value::array([Value::Int(1), Value::Int(2)])));

        let x = Parameter::new("x", &TypeTag::int());
        let e = Expr::new_array(&TypeTag::int(), vec![Expr::int(1), Expr::param(&x)]);
        assert_eq!(e.try_evaluate(), None);
    }

    #[test]
    fn test_conditional_is_lazy() {
        let (c, port, secure) = closure(443, true);
        let x = Parameter::new("x", &TypeTag::int());
        // The untaken branch depends on a parameter and must not be needed.
        let e = Expr::condition(
            Expr::member(c.clone(), &secure),
            Expr::member(c, &port),
            Expr::param(&x),
        );
        assert_eq!(e.try_evaluate(), Some(Value::Int(443)));

        let e = Expr::condition(Expr::boolean(false), Expr::int(1), Expr::param(&x));
        assert_eq!(e.try_evaluate(), None);

        // Non-boolean tests select the false branch.
        let e = Expr::condition(Expr::null(&TypeTag::bool()), Expr::int(1), Expr::int(2));
        assert_eq!(e.try_evaluate(), Some(Value::Int(2)));
    }

    #[test]
    fn test_conditional_with_unknown_test() {
        let x = Parameter::new("x", &TypeTag::bool());
        let e = Expr::condition(Expr::param(&x), Expr::int(1), Expr::int(1));
        assert_eq!(e.try_evaluate(), None);
    }

    #[test]
    fn test_operators_are_not_folded() {
        let e = Expr::binary(BinaryOp::Add, Expr::int(1), Expr::int(2));
        assert_eq!(e.try_evaluate(), None);
    }

    #[test]
    fn test_values_equal() {
        let a = Value::array([Value::Int(1), Value::array([Value::from("x")])]);
        let b = Value::array([Value::Int(1), Value::array([Value::from("x")])]);
        assert!(values_equal(&a, &b));
        assert!(values_equal(&a, &a.clone()));

        let c = Value::array([Value::Int(1), Value::Int(2)]);
        let d = Value::array([Value::Int(2), Value::Int(1)]);
        assert!(!values_equal(&c, &d));
        assert!(!values_equal(&c, &Value::array([Value::Int(1)])));
        assert!(!values_equal(&Value::Int(1), &Value::from("1")));
    }

    #[test]
    fn test_nan_equals_nan() {
        let nan = Expr::constant(f64::NAN, &TypeTag::double());
        let folded = nan.try_evaluate().unwrap();
        assert!(values_equal(&folded, &Value::Float(f64::NAN)));
        assert!(values_equal(
            &Value::array([Value::Float(f64::NAN)]),
            &Value::array([Value::Float(f64::NAN)])
        ));
        assert!(!values_equal(&folded, &Value::Float(0.0)));
        assert!(values_equal(&Value::Float(0.0), &Value::Float(-0.0)));
    }
}
