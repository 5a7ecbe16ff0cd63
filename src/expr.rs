//! Expression tree model.
//!
//! An [`Expr`] is an immutable node with a static [`TypeTag`] and an [`ExprKind`].
//! Trees are built bottom-up with the constructor functions on [`Expr`], which infer
//! the static type where the host would (member type, method return type, ...).
//!
//! ```
//! use lambda_eq::expr::{BinaryOp, Expr};
//! use lambda_eq::param::Parameter;
//! use lambda_eq::types::TypeTag;
//!
//! // (first, second) => first + second
//! let first = Parameter::new("first", &TypeTag::int());
//! let second = Parameter::new("second", &TypeTag::int());
//! let body = Expr::binary(BinaryOp::Add, Expr::param(&first), Expr::param(&second));
//! let f = Expr::lambda(vec![first, second], body);
//!
//! assert_eq!(f.to_string(), "(first, second) => (first + second)");
//! assert_eq!(f.ty().name(), "Func<Int32, Int32, Int32>");
//! ```

use std::sync::Arc;

use crate::param::Parameter;
use crate::types::{CtorRef, MemberRef, MethodRef, TypeTag};
use crate::value::Value;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    ExclusiveOr,
    AndAlso,
    OrElse,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Coalesce,
    ArrayIndex,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::ExclusiveOr => "^",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::Coalesce => "??",
            BinaryOp::ArrayIndex => "[]",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
        }
    }

    /// Operators whose primitive form yields a boolean.
    pub fn is_predicate(self) -> bool {
        matches!(
            self,
            BinaryOp::AndAlso
                | BinaryOp::OrElse
                | BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOp {
    Negate,
    UnaryPlus,
    Not,
    Convert,
    TypeAs,
    Quote,
    ArrayLength,
}

/// Node-kind tag.
///
/// Two nodes can only be equivalent structurally if their node types are equal; for
/// operators the tag includes the operator itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeType {
    Lambda,
    Parameter,
    Constant,
    MemberAccess,
    Binary(BinaryOp),
    Unary(UnaryOp),
    Call,
    New,
    MemberInit,
    ListInit,
    NewArrayInit,
    Conditional,
    Default,
    Extension,
}

#[derive(Debug, Clone)]
pub struct Lambda {
    pub parameters: Vec<Parameter>,
    pub body: Box<Expr>,
}

impl Lambda {
    /// Position of `param` in this lambda's declaration list.
    pub fn position(&self, param: &Parameter) -> Option<usize> {
        self.parameters.iter().position(|p| p == param)
    }
}

/// Object construction.
///
/// `members` is set for anonymous-type construction, where constructor arguments
/// pair positionally with the members they initialize.
#[derive(Debug, Clone)]
pub struct New {
    pub ctor: CtorRef,
    pub args: Vec<Expr>,
    pub members: Option<Vec<MemberRef>>,
}

impl New {
    pub fn new(ctor: &CtorRef, args: Vec<Expr>) -> Self {
        Self {
            ctor: ctor.clone(),
            args,
            members: None,
        }
    }
}

/// One `Add` call of a collection initializer.
#[derive(Debug, Clone)]
pub struct ElementInit {
    pub add_method: MethodRef,
    pub args: Vec<Expr>,
}

impl ElementInit {
    pub fn new(add_method: &MethodRef, args: Vec<Expr>) -> Self {
        Self {
            add_method: add_method.clone(),
            args,
        }
    }
}

/// One entry of an object initializer.
#[derive(Debug, Clone)]
pub enum MemberBinding {
    /// `Member = value`
    Assignment { member: MemberRef, value: Expr },
    /// `Member = { Inner = value, ... }`
    Nested { member: MemberRef, bindings: Vec<MemberBinding> },
    /// `Member = { a, b, ... }`
    List { member: MemberRef, initializers: Vec<ElementInit> },
}

impl MemberBinding {
    pub fn assign(member: &MemberRef, value: Expr) -> Self {
        MemberBinding::Assignment {
            member: member.clone(),
            value,
        }
    }

    pub fn member(&self) -> &MemberRef {
        match self {
            MemberBinding::Assignment { member, .. }
            | MemberBinding::Nested { member, .. }
            | MemberBinding::List { member, .. } => member,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            MemberBinding::Assignment { .. } => "assignment",
            MemberBinding::Nested { .. } => "member",
            MemberBinding::List { .. } => "list",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Lambda(Lambda),
    Parameter(Parameter),
    Constant(Value),
    Member {
        target: Option<Box<Expr>>,
        member: MemberRef,
    },
    Binary {
        op: BinaryOp,
        method: Option<MethodRef>,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        method: Option<MethodRef>,
        operand: Box<Expr>,
    },
    Call {
        target: Option<Box<Expr>>,
        method: MethodRef,
        args: Vec<Expr>,
    },
    New(New),
    MemberInit {
        new: New,
        bindings: Vec<MemberBinding>,
    },
    ListInit {
        new: New,
        initializers: Vec<ElementInit>,
    },
    NewArray {
        elements: Vec<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },
    Default,
    /// A host construct without a comparison rule.
    Extension {
        name: Arc<str>,
        operands: Vec<Expr>,
    },
}

#[derive(Debug, Clone)]
pub struct Expr {
    ty: TypeTag,
    kind: ExprKind,
}

impl Expr {
    pub fn new(ty: TypeTag, kind: ExprKind) -> Self {
        Self { ty, kind }
    }

    /// Static type.
    pub fn ty(&self) -> &TypeTag {
        &self.ty
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            ExprKind::Lambda(_) => NodeType::Lambda,
            ExprKind::Parameter(_) => NodeType::Parameter,
            ExprKind::Constant(_) => NodeType::Constant,
            ExprKind::Member { .. } => NodeType::MemberAccess,
            ExprKind::Binary { op, .. } => NodeType::Binary(*op),
            ExprKind::Unary { op, .. } => NodeType::Unary(*op),
            ExprKind::Call { .. } => NodeType::Call,
            ExprKind::New(_) => NodeType::New,
            ExprKind::MemberInit { .. } => NodeType::MemberInit,
            ExprKind::ListInit { .. } => NodeType::ListInit,
            ExprKind::NewArray { .. } => NodeType::NewArrayInit,
            ExprKind::Conditional { .. } => NodeType::Conditional,
            ExprKind::Default => NodeType::Default,
            ExprKind::Extension { .. } => NodeType::Extension,
        }
    }

    pub fn as_lambda(&self) -> Option<&Lambda> {
        match &self.kind {
            ExprKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }
}

/// Constructors.
impl Expr {
    /// Lambda whose type is `Func<params.., ret>` (or `Action<params..>` for a `Void` body).
    pub fn lambda(parameters: Vec<Parameter>, body: Expr) -> Self {
        let ret = body.ty.clone();
        Self::lambda_returning(parameters, body, &ret)
    }

    /// Lambda with an explicit declared return type, e.g. `Func<Uri, Object>` for a body
    /// producing an anonymous type.
    pub fn lambda_returning(parameters: Vec<Parameter>, body: Expr, ret: &TypeTag) -> Self {
        let mut names: Vec<&str> = parameters.iter().map(|p| p.ty().name()).collect();
        let ty = if *ret == TypeTag::void() {
            if names.is_empty() {
                TypeTag::named("Action")
            } else {
                TypeTag::named(format!("Action<{}>", names.join(", ")))
            }
        } else {
            names.push(ret.name());
            TypeTag::named(format!("Func<{}>", names.join(", ")))
        };
        Self::new(
            ty,
            ExprKind::Lambda(Lambda {
                parameters,
                body: Box::new(body),
            }),
        )
    }

    pub fn param(param: &Parameter) -> Self {
        Self::new(param.ty().clone(), ExprKind::Parameter(param.clone()))
    }

    pub fn constant(value: impl Into<Value>, ty: &TypeTag) -> Self {
        Self::new(ty.clone(), ExprKind::Constant(value.into()))
    }

    pub fn int(value: i32) -> Self {
        Self::constant(value, &TypeTag::int())
    }

    pub fn string(value: &str) -> Self {
        Self::constant(value, &TypeTag::string())
    }

    pub fn boolean(value: bool) -> Self {
        Self::constant(value, &TypeTag::bool())
    }

    /// Typed `null`.
    pub fn null(ty: &TypeTag) -> Self {
        Self::constant(Value::Null, ty)
    }

    /// `target.member`
    pub fn member(target: Expr, member: &MemberRef) -> Self {
        Self::new(
            member.ty().clone(),
            ExprKind::Member {
                target: Some(Box::new(target)),
                member: member.clone(),
            },
        )
    }

    /// `Type.member`
    pub fn static_member(member: &MemberRef) -> Self {
        Self::new(
            member.ty().clone(),
            ExprKind::Member {
                target: None,
                member: member.clone(),
            },
        )
    }

    /// Primitive operator; predicates yield `Boolean`, everything else the left operand type.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let ty = if op.is_predicate() {
            TypeTag::bool()
        } else {
            left.ty.clone()
        };
        Self::new(
            ty,
            ExprKind::Binary {
                op,
                method: None,
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    /// Operator resolved to a user-defined overload, e.g. `String.Concat` for `+` on strings.
    pub fn binary_with_method(op: BinaryOp, left: Expr, right: Expr, method: &MethodRef) -> Self {
        Self::new(
            method.ret().clone(),
            ExprKind::Binary {
                op,
                method: Some(method.clone()),
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr, ty: &TypeTag) -> Self {
        Self::new(
            ty.clone(),
            ExprKind::Unary {
                op,
                method: None,
                operand: Box::new(operand),
            },
        )
    }

    pub fn negate(operand: Expr) -> Self {
        let ty = operand.ty.clone();
        Self::unary(UnaryOp::Negate, operand, &ty)
    }

    pub fn not(operand: Expr) -> Self {
        let ty = operand.ty.clone();
        Self::unary(UnaryOp::Not, operand, &ty)
    }

    pub fn convert(operand: Expr, ty: &TypeTag) -> Self {
        Self::unary(UnaryOp::Convert, operand, ty)
    }

    /// `target.method(args)`
    pub fn call(target: Expr, method: &MethodRef, args: Vec<Expr>) -> Self {
        Self::new(
            method.ret().clone(),
            ExprKind::Call {
                target: Some(Box::new(target)),
                method: method.clone(),
                args,
            },
        )
    }

    /// `Type.method(args)`
    pub fn call_static(method: &MethodRef, args: Vec<Expr>) -> Self {
        Self::new(
            method.ret().clone(),
            ExprKind::Call {
                target: None,
                method: method.clone(),
                args,
            },
        )
    }

    pub fn new_object(ctor: &CtorRef, args: Vec<Expr>) -> Self {
        Self::new(ctor.declaring().clone(), ExprKind::New(New::new(ctor, args)))
    }

    /// Anonymous-type construction: `new { A = a, B = b }`.
    pub fn new_anonymous(ctor: &CtorRef, args: Vec<Expr>, members: Vec<MemberRef>) -> Self {
        Self::new(
            ctor.declaring().clone(),
            ExprKind::New(New {
                ctor: ctor.clone(),
                args,
                members: Some(members),
            }),
        )
    }

    pub fn member_init(new: New, bindings: Vec<MemberBinding>) -> Self {
        Self::new(new.ctor.declaring().clone(), ExprKind::MemberInit { new, bindings })
    }

    pub fn list_init(new: New, initializers: Vec<ElementInit>) -> Self {
        Self::new(new.ctor.declaring().clone(), ExprKind::ListInit { new, initializers })
    }

    /// `new elem[] { elements.. }`
    pub fn new_array(elem: &TypeTag, elements: Vec<Expr>) -> Self {
        Self::new(TypeTag::array_of(elem), ExprKind::NewArray { elements })
    }

    /// `test ? if_true : if_false`
    pub fn condition(test: Expr, if_true: Expr, if_false: Expr) -> Self {
        Self::new(
            if_true.ty.clone(),
            ExprKind::Conditional {
                test: Box::new(test),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            },
        )
    }

    pub fn default_of(ty: &TypeTag) -> Self {
        Self::new(ty.clone(), ExprKind::Default)
    }

    pub fn extension(name: impl Into<Arc<str>>, operands: Vec<Expr>, ty: &TypeTag) -> Self {
        Self::new(
            ty.clone(),
            ExprKind::Extension {
                name: name.into(),
                operands,
            },
        )
    }
}
