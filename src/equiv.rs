//! Structural equivalence of expression trees.
//!
//! Two trees are equivalent when they would produce the same result for the same
//! inputs, as far as can be decided without evaluating anything that depends on a
//! parameter. The comparison walks both trees in lockstep. At every pair of nodes:
//!
//! 1. The same node instance is trivially equivalent.
//! 2. If both subtrees fold to constants (see [`Expr::try_evaluate`]), the folded
//!    values decide, whatever their shape. A captured local and the literal it holds
//!    are therefore equivalent.
//! 3. Otherwise node types and static types must match, and a per-kind rule compares
//!    the children.
//!
//! Parameters are compared by position (alpha-equivalence): `(a, b) => a` and
//! `(x, y) => x` are equivalent, `(a, b) => a` and `(x, y) => y` are not. Each lambda
//! pair entered pushes a [`Scope`] and becomes the root for its body: a parameter
//! matches iff its position in the innermost left lambda equals the position of the
//! other parameter in the innermost right lambda. Two parameters declared by neither
//! (outer or free parameters) therefore compare equal. With
//! [`EquivConfig::resolve_outer_parameters`] set, resolution continues through the
//! enclosing scopes instead, and free parameters compare by declaration.
//!
//! Argument lists, array elements and parameter lists are order-sensitive. Object
//! initializer bindings and collection initializers are not, see [`crate::matching`].
//!
//! Recursion follows the tree depth on the call stack; extremely deep trees are
//! limited by the thread's stack size.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::eval::values_equal;
use crate::expr::{ElementInit, Expr, ExprKind, Lambda, MemberBinding, New};
use crate::matching::{sorted_assignments, sorted_initializers};
use crate::param::Parameter;

/// Configuration of the equivalence engine.
///
/// # Examples
///
/// ```
/// use lambda_eq::equiv::{EquivConfig, Equivalence};
///
/// let strict = Equivalence::new(EquivConfig {
///     fold_constants: false,
///     ..EquivConfig::default()
/// });
/// assert!(!strict.config().fold_constants);
/// ```
#[derive(Debug, Clone)]
pub struct EquivConfig {
    /// Compare subtrees by their folded values when both sides are constant (default: true)
    pub fold_constants: bool,
    /// Resolve parameters of enclosing lambdas through the scope chain (default: false).
    /// When false, only the innermost lambda pair is consulted and parameters absent
    /// from it on both sides compare equal. When true, `g => xs.Select(d => g)` and
    /// `(g, h) => xs.Select(d => h)` are told apart.
    pub resolve_outer_parameters: bool,
}

impl Default for EquivConfig {
    fn default() -> Self {
        Self {
            fold_constants: true,
            resolve_outer_parameters: false,
        }
    }
}

/// A pair of lambdas entered together, linked to the enclosing pair.
#[derive(Debug, Copy, Clone)]
struct Scope<'a> {
    x: &'a Lambda,
    y: &'a Lambda,
    parent: Option<&'a Scope<'a>>,
}

/// The equivalence engine.
#[derive(Debug, Clone, Default)]
pub struct Equivalence {
    config: EquivConfig,
}

impl Equivalence {
    pub fn new(config: EquivConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EquivConfig {
        &self.config
    }

    /// Decides whether `x` and `y` are equivalent.
    ///
    /// Each root is its own root lambda. Two absent trees are equivalent, an absent
    /// and a present one are not.
    ///
    /// # Errors
    ///
    /// Fails when the trees contain a construct the engine cannot compare; see [`Error`].
    pub fn equivalent(&self, x: Option<&Expr>, y: Option<&Expr>) -> Result<bool> {
        if let (Some(x), Some(y)) = (x, y) {
            debug!("equivalent({}, {})", x, y);
        }
        let result = self.expressions_equal(x, y, None)?;
        debug!("equivalent => {}", result);
        Ok(result)
    }

    fn expressions_equal(&self, x: Option<&Expr>, y: Option<&Expr>, scope: Option<&Scope<'_>>) -> Result<bool> {
        let (x, y) = match (x, y) {
            (Some(x), Some(y)) => (x, y),
            (None, None) => return Ok(true),
            _ => return Ok(false),
        };
        if std::ptr::eq(x, y) {
            return Ok(true);
        }

        trace!("equal({}, {})", x, y);

        if self.config.fold_constants {
            if let Some(vx) = x.try_evaluate() {
                if let Some(vy) = y.try_evaluate() {
                    let eq = values_equal(&vx, &vy);
                    debug!("folded: {} vs {} => {}", vx, vy, eq);
                    return Ok(eq);
                }
            }
        }

        if x.node_type() != y.node_type() || x.ty() != y.ty() {
            if x.ty().is_anonymous() && y.ty().is_anonymous() {
                debug!("anonymous types: {} vs {}", x.ty(), y.ty());
                return Err(Error::AnonymousTypeNotSupported {
                    x: x.ty().to_string(),
                    y: y.ty().to_string(),
                });
            }
            debug!(
                "mismatch: {:?}: {} vs {:?}: {}",
                x.node_type(),
                x.ty(),
                y.node_type(),
                y.ty()
            );
            return Ok(false);
        }

        match (x.kind(), y.kind()) {
            (ExprKind::Lambda(lx), ExprKind::Lambda(ly)) => self.lambdas_equal(lx, ly, scope),
            (ExprKind::Parameter(px), ExprKind::Parameter(py)) => Ok(self.parameters_equal(px, py, scope)),
            // Only reached with folding disabled.
            (ExprKind::Constant(vx), ExprKind::Constant(vy)) => Ok(values_equal(vx, vy)),
            (
                ExprKind::Member {
                    target: tx,
                    member: mx,
                },
                ExprKind::Member {
                    target: ty,
                    member: my,
                },
            ) => Ok(mx == my && self.expressions_equal(tx.as_deref(), ty.as_deref(), scope)?),
            (
                ExprKind::Binary {
                    method: mx,
                    left: lx,
                    right: rx,
                    ..
                },
                ExprKind::Binary {
                    method: my,
                    left: ly,
                    right: ry,
                    ..
                },
            ) => Ok(mx == my && self.nodes_equal(lx, ly, scope)? && self.nodes_equal(rx, ry, scope)?),
            (
                ExprKind::Unary {
                    method: mx,
                    operand: ox,
                    ..
                },
                ExprKind::Unary {
                    method: my,
                    operand: oy,
                    ..
                },
            ) => Ok(mx == my && self.nodes_equal(ox, oy, scope)?),
            (
                ExprKind::Call {
                    target: tx,
                    method: mx,
                    args: ax,
                },
                ExprKind::Call {
                    target: ty,
                    method: my,
                    args: ay,
                },
            ) => Ok(mx == my
                && self.expressions_equal(tx.as_deref(), ty.as_deref(), scope)?
                && self.sequences_equal(ax, ay, scope)?),
            (ExprKind::New(nx), ExprKind::New(ny)) => self.news_equal(nx, ny, scope),
            (
                ExprKind::MemberInit {
                    new: nx,
                    bindings: bx,
                },
                ExprKind::MemberInit {
                    new: ny,
                    bindings: by,
                },
            ) => Ok(self.news_equal(nx, ny, scope)? && self.bindings_equal(bx, by, scope)?),
            (
                ExprKind::ListInit {
                    new: nx,
                    initializers: ix,
                },
                ExprKind::ListInit {
                    new: ny,
                    initializers: iy,
                },
            ) => Ok(self.news_equal(nx, ny, scope)? && self.initializers_equal(ix, iy, scope)?),
            (ExprKind::NewArray { elements: ex }, ExprKind::NewArray { elements: ey }) => {
                self.sequences_equal(ex, ey, scope)
            }
            (
                ExprKind::Conditional {
                    test: tx,
                    if_true: ax,
                    if_false: bx,
                },
                ExprKind::Conditional {
                    test: ty,
                    if_true: ay,
                    if_false: by,
                },
            ) => Ok(self.nodes_equal(tx, ty, scope)?
                && self.nodes_equal(ax, ay, scope)?
                && self.nodes_equal(bx, by, scope)?),
            (ExprKind::Default, ExprKind::Default) => Ok(true),
            (ExprKind::Extension { .. }, _) => {
                debug!("unsupported: {}", x);
                Err(Error::UnsupportedNodeKind(x.to_string()))
            }
            _ => unreachable!("node types {:?} and {:?} match but kinds differ", x.node_type(), y.node_type()),
        }
    }

    fn nodes_equal(&self, x: &Expr, y: &Expr, scope: Option<&Scope<'_>>) -> Result<bool> {
        self.expressions_equal(Some(x), Some(y), scope)
    }

    fn lambdas_equal(&self, lx: &Lambda, ly: &Lambda, scope: Option<&Scope<'_>>) -> Result<bool> {
        if lx.parameters.len() != ly.parameters.len() {
            return Ok(false);
        }
        if lx.parameters.iter().zip(&ly.parameters).any(|(px, py)| px.ty() != py.ty()) {
            return Ok(false);
        }
        debug!("enter scope with {} parameter(s)", lx.parameters.len());
        let inner = Scope {
            x: lx,
            y: ly,
            parent: scope,
        };
        self.nodes_equal(&lx.body, &ly.body, Some(&inner))
    }

    fn parameters_equal(&self, px: &Parameter, py: &Parameter, scope: Option<&Scope<'_>>) -> bool {
        if !self.config.resolve_outer_parameters {
            let ix = scope.and_then(|s| s.x.position(px));
            let iy = scope.and_then(|s| s.y.position(py));
            trace!("param {} @ {:?} vs {} @ {:?}", px, ix, py, iy);
            return ix == iy;
        }
        let mut current = scope;
        while let Some(s) = current {
            let ix = s.x.position(px);
            let iy = s.y.position(py);
            if ix.is_some() || iy.is_some() {
                trace!("param {} @ {:?} vs {} @ {:?}", px, ix, py, iy);
                return ix == iy;
            }
            current = s.parent;
        }
        // Free on both sides.
        px == py
    }

    fn sequences_equal(&self, xs: &[Expr], ys: &[Expr], scope: Option<&Scope<'_>>) -> Result<bool> {
        if xs.len() != ys.len() {
            return Ok(false);
        }
        for (x, y) in xs.iter().zip(ys) {
            if !self.nodes_equal(x, y, scope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn news_equal(&self, nx: &New, ny: &New, scope: Option<&Scope<'_>>) -> Result<bool> {
        let members_equal = match (&nx.members, &ny.members) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        Ok(nx.ctor == ny.ctor && self.sequences_equal(&nx.args, &ny.args, scope)? && members_equal)
    }

    fn bindings_equal(&self, bx: &[MemberBinding], by: &[MemberBinding], scope: Option<&Scope<'_>>) -> Result<bool> {
        if bx.len() != by.len() {
            return Ok(false);
        }
        let sx = sorted_assignments(bx)?;
        let sy = sorted_assignments(by)?;
        for ((mx, vx), (my, vy)) in sx.into_iter().zip(sy) {
            if mx != my || !self.nodes_equal(vx, vy, scope)? {
                debug!("binding mismatch: {} vs {}", mx, my);
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn initializers_equal(&self, ix: &[ElementInit], iy: &[ElementInit], scope: Option<&Scope<'_>>) -> Result<bool> {
        if ix.len() != iy.len() {
            return Ok(false);
        }
        for (a, b) in sorted_initializers(ix).into_iter().zip(sorted_initializers(iy)) {
            if std::ptr::eq(a, b) {
                continue;
            }
            if a.add_method != b.add_method || !self.sequences_equal(&a.args, &b.args, scope)? {
                debug!("initializer mismatch: {} vs {}", a, b);
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::expr::BinaryOp;
    use crate::types::{MethodRef, TypeTag};

    fn add(a: &Parameter, b: &Parameter) -> Expr {
        Expr::binary(BinaryOp::Add, Expr::param(a), Expr::param(b))
    }

    #[test]
    fn test_positional_parameters() {
        let eq = Equivalence::default();
        let (a, b) = (Parameter::new("a", &TypeTag::int()), Parameter::new("b", &TypeTag::int()));
        let (x, y) = (Parameter::new("x", &TypeTag::int()), Parameter::new("y", &TypeTag::int()));

        let f = Expr::lambda(vec![a.clone(), b.clone()], add(&a, &b));
        let g = Expr::lambda(vec![x.clone(), y.clone()], add(&x, &y));
        let h = Expr::lambda(vec![x.clone(), y.clone()], add(&y, &x));

        assert!(eq.equivalent(Some(&f), Some(&g)).unwrap());
        assert!(!eq.equivalent(Some(&f), Some(&h)).unwrap());
    }

    #[test]
    fn test_parameter_types_must_match() {
        let eq = Equivalence::default();
        let a = Parameter::new("a", &TypeTag::int());
        let s = Parameter::new("s", &TypeTag::string());
        let f = Expr::lambda_returning(vec![a], Expr::int(1), &TypeTag::int());
        let g = Expr::lambda_returning(vec![s], Expr::int(1), &TypeTag::int());
        assert!(!eq.equivalent(Some(&f), Some(&g)).unwrap());
    }

    #[test]
    fn test_outer_parameter_in_nested_lambda() {
        let item = TypeTag::named("Item");
        let group = TypeTag::named("IEnumerable<Item>");
        let select = MethodRef::static_method(
            &TypeTag::named("Enumerable"),
            "Select",
            [group.clone(), TypeTag::named("Func<Item, Object>")],
            &TypeTag::named("IEnumerable<Object>"),
        );

        // (a, b) => Select(a, d => <outer>)
        let build = |pick_first: bool| {
            let a = Parameter::new("a", &group);
            let b = Parameter::new("b", &group);
            let d = Parameter::new("d", &item);
            let picked = if pick_first { &a } else { &b };
            let inner = Expr::lambda(vec![d], Expr::convert(Expr::param(picked), &TypeTag::object()));
            let call = Expr::call_static(&select, vec![Expr::param(&a), inner]);
            Expr::lambda(vec![a, b], call)
        };

        // The inner lambda is the root for its body: `a` and `b` are both outside it.
        let eq = Equivalence::default();
        assert!(!eq.config().resolve_outer_parameters);
        assert!(eq.equivalent(Some(&build(true)), Some(&build(true))).unwrap());
        assert!(eq.equivalent(Some(&build(true)), Some(&build(false))).unwrap());

        let chained = Equivalence::new(EquivConfig {
            resolve_outer_parameters: true,
            ..EquivConfig::default()
        });
        assert!(chained.equivalent(Some(&build(true)), Some(&build(true))).unwrap());
        assert!(!chained.equivalent(Some(&build(true)), Some(&build(false))).unwrap());
    }

    #[test]
    fn test_inner_parameter_shadows_outer_position() {
        // x => Select(x, y => y) vs x => Select(x, y => x)
        let item = TypeTag::named("Item");
        let select = MethodRef::static_method(
            &TypeTag::named("Enumerable"),
            "Select",
            [item.clone(), TypeTag::named("Func<Item, Item>")],
            &item,
        );
        let build = |use_inner: bool| {
            let x = Parameter::new("x", &item);
            let y = Parameter::new("y", &item);
            let body = if use_inner { Expr::param(&y) } else { Expr::param(&x) };
            let inner = Expr::lambda(vec![y], body);
            Expr::lambda(vec![x.clone()], Expr::call_static(&select, vec![Expr::param(&x), inner]))
        };
        let eq = Equivalence::default();
        assert!(eq.equivalent(Some(&build(true)), Some(&build(true))).unwrap());
        assert!(!eq.equivalent(Some(&build(true)), Some(&build(false))).unwrap());
    }

    #[test]
    fn test_free_parameters() {
        let p = Parameter::new("p", &TypeTag::int());
        let q = Parameter::new("p", &TypeTag::int());

        // Declared by no lambda on either side.
        let eq = Equivalence::default();
        assert!(eq.equivalent(Some(&Expr::param(&p)), Some(&Expr::param(&p))).unwrap());
        assert!(eq.equivalent(Some(&Expr::param(&p)), Some(&Expr::param(&q))).unwrap());

        let chained = Equivalence::new(EquivConfig {
            resolve_outer_parameters: true,
            ..EquivConfig::default()
        });
        assert!(chained.equivalent(Some(&Expr::param(&p)), Some(&Expr::param(&p))).unwrap());
        assert!(!chained.equivalent(Some(&Expr::param(&p)), Some(&Expr::param(&q))).unwrap());
    }

    #[test]
    fn test_constant_folding_can_be_disabled() {
        let closure = TypeTag::named("Closure");
        let field = crate::types::MemberRef::field(&closure, "limit", &TypeTag::int());
        let record = crate::value::Record::new(&closure).with_field("limit", 25);
        let captured = Expr::member(Expr::constant(crate::value::Value::record(record), &closure), &field);
        let literal = Expr::int(25);

        assert!(Equivalence::default().equivalent(Some(&captured), Some(&literal)).unwrap());

        let structural = Equivalence::new(EquivConfig {
            fold_constants: false,
            ..EquivConfig::default()
        });
        assert!(!structural.equivalent(Some(&captured), Some(&literal)).unwrap());
        assert!(structural.equivalent(Some(&literal), Some(&Expr::int(25))).unwrap());
    }
}
