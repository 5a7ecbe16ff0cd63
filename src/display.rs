//! Textual rendering of expression trees.
//!
//! The output mirrors how the host prints expression trees: fully parenthesized
//! binary operators, `IIF(..)` for conditionals, parameters by name. Besides
//! diagnostics, the rendering of an initializer's first argument is the key that
//! list-initializer matching sorts by, so it must stay deterministic.

use std::fmt::{self, Display, Formatter};

use crate::expr::{BinaryOp, ElementInit, Expr, ExprKind, MemberBinding, New, UnaryOp};

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for New {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "new {}(", self.ctor.declaring())?;
        match &self.members {
            Some(members) => {
                for (i, (member, arg)) in members.iter().zip(&self.args).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", member.name(), arg)?;
                }
            }
            None => write_list(f, &self.args)?,
        }
        write!(f, ")")
    }
}

impl Display for ElementInit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.add_method.name())?;
        write_list(f, &self.args)?;
        write!(f, ")")
    }
}

impl Display for MemberBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MemberBinding::Assignment { member, value } => write!(f, "{} = {}", member.name(), value),
            MemberBinding::Nested { member, bindings } => {
                write!(f, "{} = {{", member.name())?;
                write_list(f, bindings)?;
                write!(f, "}}")
            }
            MemberBinding::List { member, initializers } => {
                write!(f, "{} = {{", member.name())?;
                write_list(f, initializers)?;
                write!(f, "}}")
            }
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Lambda(lambda) => {
                match lambda.parameters.as_slice() {
                    [single] => write!(f, "{}", single)?,
                    params => {
                        write!(f, "(")?;
                        write_list(f, params)?;
                        write!(f, ")")?;
                    }
                }
                write!(f, " => {}", lambda.body)
            }
            ExprKind::Parameter(p) => write!(f, "{}", p),
            ExprKind::Constant(value) => write!(f, "{}", value),
            ExprKind::Member { target, member } => match target {
                Some(target) => write!(f, "{}.{}", target, member.name()),
                None => write!(f, "{}", member),
            },
            ExprKind::Binary { op, left, right, .. } => match op {
                BinaryOp::ArrayIndex => write!(f, "{}[{}]", left, right),
                _ => write!(f, "({} {} {})", left, op.symbol(), right),
            },
            ExprKind::Unary { op, operand, .. } => match op {
                UnaryOp::Negate => write!(f, "-{}", operand),
                UnaryOp::UnaryPlus => write!(f, "+{}", operand),
                UnaryOp::Not => write!(f, "!{}", operand),
                UnaryOp::Convert => write!(f, "Convert({}, {})", operand, self.ty()),
                UnaryOp::TypeAs => write!(f, "({} as {})", operand, self.ty()),
                UnaryOp::Quote => write!(f, "{}", operand),
                UnaryOp::ArrayLength => write!(f, "ArrayLength({})", operand),
            },
            ExprKind::Call { target, method, args } => {
                match target {
                    Some(target) => write!(f, "{}.{}(", target, method.name())?,
                    None => write!(f, "{}.{}(", method.declaring(), method.name())?,
                }
                write_list(f, args)?;
                write!(f, ")")
            }
            ExprKind::New(new) => write!(f, "{}", new),
            ExprKind::MemberInit { new, bindings } => {
                write!(f, "{} {{", new)?;
                write_list(f, bindings)?;
                write!(f, "}}")
            }
            ExprKind::ListInit { new, initializers } => {
                write!(f, "{} {{", new)?;
                write_list(f, initializers)?;
                write!(f, "}}")
            }
            ExprKind::NewArray { elements } => {
                write!(f, "new [] {{")?;
                write_list(f, elements)?;
                write!(f, "}}")
            }
            ExprKind::Conditional { test, if_true, if_false } => {
                write!(f, "IIF({}, {}, {})", test, if_true, if_false)
            }
            ExprKind::Default => write!(f, "default({})", self.ty()),
            ExprKind::Extension { name, operands } => {
                write!(f, "{}(", name)?;
                write_list(f, operands)?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Parameter;
    use crate::types::{CtorRef, MemberRef, MethodRef, TypeTag};

    #[test]
    fn test_lambda_and_operators() {
        let x = Parameter::new("x", &TypeTag::int());
        let f = Expr::lambda(
            vec![x.clone()],
            Expr::binary(BinaryOp::Multiply, Expr::negate(Expr::param(&x)), Expr::int(2)),
        );
        assert_eq!(f.to_string(), "x => (-x * 2)");

        let g = Expr::lambda(vec![], Expr::string("hi"));
        assert_eq!(g.to_string(), "() => \"hi\"");
    }

    #[test]
    fn test_members_and_calls() {
        let uri = TypeTag::named("Uri");
        let u = Parameter::new("u", &uri);
        let host = MemberRef::property(&uri, "Host", &TypeTag::string());
        let to_string = MethodRef::instance(&uri, "ToString", [], &TypeTag::string());
        let is_null_or_empty =
            MethodRef::static_method(&TypeTag::string(), "IsNullOrEmpty", [TypeTag::string()], &TypeTag::bool());

        let e = Expr::call_static(&is_null_or_empty, vec![Expr::member(Expr::param(&u), &host)]);
        assert_eq!(e.to_string(), "String.IsNullOrEmpty(u.Host)");

        let e = Expr::call(Expr::param(&u), &to_string, vec![]);
        assert_eq!(e.to_string(), "u.ToString()");

        let now = MemberRef::property(&TypeTag::named("DateTime"), "UtcNow", &TypeTag::named("DateTime"));
        assert_eq!(Expr::static_member(&now).to_string(), "DateTime.UtcNow");
    }

    #[test]
    fn test_initializers() {
        let list = TypeTag::named("List<Int32>");
        let add = MethodRef::instance(&list, "Add", [TypeTag::int()], &TypeTag::void());
        let ctor = CtorRef::new(&list, []);
        let e = Expr::list_init(
            New::new(&ctor, vec![]),
            vec![
                ElementInit::new(&add, vec![Expr::int(3)]),
                ElementInit::new(&add, vec![Expr::int(7)]),
            ],
        );
        assert_eq!(e.to_string(), "new List<Int32>() {Add(3), Add(7)}");

        let builder = TypeTag::named("UriBuilder");
        let port = MemberRef::property(&builder, "Port", &TypeTag::int());
        let e = Expr::member_init(
            New::new(&CtorRef::new(&builder, []), vec![]),
            vec![MemberBinding::assign(&port, Expr::int(443))],
        );
        assert_eq!(e.to_string(), "new UriBuilder() {Port = 443}");

        let e = Expr::new_array(&TypeTag::int(), vec![Expr::int(1), Expr::int(2)]);
        assert_eq!(e.to_string(), "new [] {1, 2}");
    }

    #[test]
    fn test_anonymous_new() {
        let anon = TypeTag::anonymous("<>f__AnonymousType0");
        let port = MemberRef::property(&anon, "Port", &TypeTag::int());
        let ctor = CtorRef::new(&anon, [TypeTag::int()]);
        let e = Expr::new_anonymous(&ctor, vec![Expr::int(443)], vec![port]);
        assert_eq!(e.to_string(), "new <>f__AnonymousType0(Port = 443)");
    }

    #[test]
    fn test_conditional_default_extension() {
        let e = Expr::condition(Expr::boolean(true), Expr::int(443), Expr::int(80));
        assert_eq!(e.to_string(), "IIF(true, 443, 80)");
        assert_eq!(Expr::default_of(&TypeTag::int()).to_string(), "default(Int32)");
        let e = Expr::extension("Invoke", vec![Expr::int(1)], &TypeTag::int());
        assert_eq!(e.to_string(), "Invoke(1)");
        let e = Expr::convert(Expr::int(1), &TypeTag::object());
        assert_eq!(e.to_string(), "Convert(1, Object)");
    }
}
