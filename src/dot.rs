//! Expression tree to DOT (Graphviz) conversion.
//!
//! Rendering both sides of a failed equivalence check side by side is usually the
//! fastest way to see where two trees diverge.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - **Lambda nodes** are rendered as rectangles labelled with their parameters
//! - **Leaf nodes** (parameters, constants, defaults, static members) are rendered as ellipses
//! - **Inner nodes** are rendered as boxes labelled with their node type; field reads
//!   (typically captured locals) are marked `(field)`
//! - **Edges** point from parent to child and are labelled with the child's role
//!   (`body`, `left`, `arg0`, `Port`, ...)
//!
//! # Examples
//!
//! ```
//! use lambda_eq::expr::{BinaryOp, Expr};
//! use lambda_eq::param::Parameter;
//! use lambda_eq::types::TypeTag;
//!
//! let x = Parameter::new("x", &TypeTag::int());
//! let f = Expr::lambda(vec![x.clone()], Expr::binary(BinaryOp::Add, Expr::param(&x), Expr::int(1)));
//!
//! let dot = f.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::fmt::{self, Write as _};

use crate::expr::{Expr, ExprKind, MemberBinding, New};
use crate::types::MemberKind;

/// Configuration options for DOT output generation.
///
/// # Examples
///
/// ```
/// use lambda_eq::dot::DotConfig;
/// use lambda_eq::expr::Expr;
///
/// let config = DotConfig {
///     show_types: true,
///     ..DotConfig::default()
/// };
/// let dot = Expr::int(3).to_dot_with_config(&config).unwrap();
/// assert!(dot.contains("Int32"));
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for inner nodes (default: "box")
    pub node_shape: &'static str,
    /// Shape for leaf nodes (default: "ellipse")
    pub leaf_shape: &'static str,
    /// Shape for lambda nodes (default: "rect")
    pub lambda_shape: &'static str,
    /// Style for parent-to-child edges (default: "solid")
    pub edge_style: &'static str,
    /// Whether to append the static type to every label (default: false)
    pub show_types: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "box",
            leaf_shape: "ellipse",
            lambda_shape: "rect",
            edge_style: "solid",
            show_types: false,
        }
    }
}

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

struct DotWriter<'c> {
    out: String,
    next_id: usize,
    config: &'c DotConfig,
}

impl DotWriter<'_> {
    fn node(&mut self, label: &str, shape: &str) -> Result<usize, fmt::Error> {
        let id = self.next_id;
        self.next_id += 1;
        writeln!(self.out, "n{} [shape={}, label=\"{}\"];", id, shape, escape(label))?;
        Ok(id)
    }

    fn edge(&mut self, from: usize, to: usize, role: &str) -> fmt::Result {
        writeln!(
            self.out,
            "n{} -> n{} [label=\"{}\", style={}];",
            from,
            to,
            escape(role),
            self.config.edge_style
        )
    }

    fn child(&mut self, parent: usize, role: &str, expr: &Expr) -> fmt::Result {
        let id = self.expr(expr)?;
        self.edge(parent, id, role)
    }

    fn children(&mut self, parent: usize, prefix: &str, exprs: &[Expr]) -> fmt::Result {
        for (i, e) in exprs.iter().enumerate() {
            self.child(parent, &format!("{}{}", prefix, i), e)?;
        }
        Ok(())
    }

    fn new_args(&mut self, parent: usize, new: &New) -> fmt::Result {
        match &new.members {
            Some(members) => {
                for (member, arg) in members.iter().zip(&new.args) {
                    self.child(parent, member.name(), arg)?;
                }
                Ok(())
            }
            None => self.children(parent, "arg", &new.args),
        }
    }

    fn label(&self, expr: &Expr, text: String) -> String {
        if self.config.show_types {
            format!("{}\n: {}", text, expr.ty())
        } else {
            text
        }
    }

    /// Renders `expr` and its subtree, returning the id of its node.
    fn expr(&mut self, expr: &Expr) -> Result<usize, fmt::Error> {
        let leaf = self.config.leaf_shape;
        let inner = self.config.node_shape;
        match expr.kind() {
            ExprKind::Lambda(lambda) => {
                let params: Vec<&str> = lambda.parameters.iter().map(|p| p.name()).collect();
                let label = self.label(expr, format!("Lambda({})", params.join(", ")));
                let id = self.node(&label, self.config.lambda_shape)?;
                self.child(id, "body", &lambda.body)?;
                Ok(id)
            }
            ExprKind::Parameter(_)
            | ExprKind::Constant(_)
            | ExprKind::Default
            | ExprKind::Member { target: None, .. } => {
                let label = self.label(expr, expr.to_string());
                self.node(&label, leaf)
            }
            ExprKind::Member {
                target: Some(target),
                member,
            } => {
                let text = match member.kind() {
                    MemberKind::Field => format!(".{} (field)", member.name()),
                    MemberKind::Property => format!(".{}", member.name()),
                };
                let label = self.label(expr, text);
                let id = self.node(&label, inner)?;
                self.child(id, "target", target)?;
                Ok(id)
            }
            ExprKind::Binary { op, left, right, .. } => {
                let label = self.label(expr, op.symbol().to_string());
                let id = self.node(&label, inner)?;
                self.child(id, "left", left)?;
                self.child(id, "right", right)?;
                Ok(id)
            }
            ExprKind::Unary { op, operand, .. } => {
                let label = self.label(expr, format!("{:?}", op));
                let id = self.node(&label, inner)?;
                self.child(id, "operand", operand)?;
                Ok(id)
            }
            ExprKind::Call { target, method, args } => {
                let label = self.label(expr, format!("{}()", method.name()));
                let id = self.node(&label, inner)?;
                if let Some(target) = target {
                    self.child(id, "target", target)?;
                }
                self.children(id, "arg", args)?;
                Ok(id)
            }
            ExprKind::New(new) => {
                let label = self.label(expr, format!("new {}", new.ctor.declaring()));
                let id = self.node(&label, inner)?;
                self.new_args(id, new)?;
                Ok(id)
            }
            ExprKind::MemberInit { new, bindings } => {
                let label = self.label(expr, format!("new {} {{..}}", new.ctor.declaring()));
                let id = self.node(&label, inner)?;
                self.new_args(id, new)?;
                for binding in bindings {
                    match binding {
                        MemberBinding::Assignment { member, value } => self.child(id, member.name(), value)?,
                        other => {
                            let b = self.node(&other.to_string(), leaf)?;
                            self.edge(id, b, other.member().name())?;
                        }
                    }
                }
                Ok(id)
            }
            ExprKind::ListInit { new, initializers } => {
                let label = self.label(expr, format!("new {} {{..}}", new.ctor.declaring()));
                let id = self.node(&label, inner)?;
                self.new_args(id, new)?;
                for (i, init) in initializers.iter().enumerate() {
                    let add = self.node(&format!("{}()", init.add_method.name()), inner)?;
                    self.edge(id, add, &format!("init{}", i))?;
                    self.children(add, "arg", &init.args)?;
                }
                Ok(id)
            }
            ExprKind::NewArray { elements } => {
                let label = self.label(expr, "new []".to_string());
                let id = self.node(&label, inner)?;
                self.children(id, "elem", elements)?;
                Ok(id)
            }
            ExprKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                let label = self.label(expr, "IIF".to_string());
                let id = self.node(&label, inner)?;
                self.child(id, "test", test)?;
                self.child(id, "then", if_true)?;
                self.child(id, "else", if_false)?;
                Ok(id)
            }
            ExprKind::Extension { name, operands } => {
                let label = self.label(expr, name.to_string());
                let id = self.node(&label, inner)?;
                self.children(id, "operand", operands)?;
                Ok(id)
            }
        }
    }
}

impl Expr {
    /// Converts the tree rooted at this node to DOT (Graphviz) format.
    ///
    /// Node ids are assigned in pre-order (`n0` is the root), so the output of
    /// structurally identical trees is identical up to parameter names and constants.
    pub fn to_dot(&self) -> Result<String, fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the tree to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, fmt::Error> {
        let mut writer = DotWriter {
            out: String::new(),
            next_id: 0,
            config,
        };
        writeln!(writer.out, "digraph {{")?;
        writeln!(writer.out, "node [shape={}];", config.node_shape)?;
        writer.expr(self)?;
        writeln!(writer.out, "}}")?;
        Ok(writer.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{BinaryOp, ElementInit};
    use crate::param::Parameter;
    use crate::types::{CtorRef, MemberRef, MethodRef, TypeTag};

    /// Basic test: verify DOT output is generated without errors
    #[test]
    fn test_to_dot_basic() {
        let x = Parameter::new("x", &TypeTag::int());
        let f = Expr::lambda(
            vec![x.clone()],
            Expr::binary(BinaryOp::Add, Expr::param(&x), Expr::int(1)),
        );
        let dot = f.to_dot().unwrap();

        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("n0 [shape=rect, label=\"Lambda(x)\"];"));
        assert!(dot.contains("n0 -> n1 [label=\"body\", style=solid];"));
        assert!(dot.contains("n1 -> n2 [label=\"left\", style=solid];"));
        assert!(dot.contains("n1 -> n3 [label=\"right\", style=solid];"));
    }

    #[test]
    fn test_to_dot_escapes_strings() {
        let dot = Expr::string("say \"hi\"").to_dot().unwrap();
        assert!(dot.contains(r#"label="\"say \\\"hi\\\"\"""#));
    }

    #[test]
    fn test_to_dot_initializers() {
        let dict = TypeTag::named("Dictionary<Int32, Int32>");
        let add = MethodRef::instance(&dict, "Add", [TypeTag::int(), TypeTag::int()], &TypeTag::void());
        let e = Expr::list_init(
            New::new(&CtorRef::new(&dict, []), vec![]),
            vec![ElementInit::new(&add, vec![Expr::int(3), Expr::int(33)])],
        );
        let dot = e.to_dot().unwrap();
        assert!(dot.contains("[label=\"init0\""));
        assert!(dot.contains("[label=\"arg1\""));

        let builder = TypeTag::named("UriBuilder");
        let port = MemberRef::property(&builder, "Port", &TypeTag::int());
        let e = Expr::member_init(
            New::new(&CtorRef::new(&builder, []), vec![]),
            vec![MemberBinding::assign(&port, Expr::int(443))],
        );
        assert!(e.to_dot().unwrap().contains("[label=\"Port\""));
    }

    #[test]
    fn test_to_dot_marks_field_reads() {
        let closure = TypeTag::named("Closure");
        let uri = TypeTag::named("Uri");
        let port = MemberRef::field(&closure, "port", &TypeTag::int());
        let host = MemberRef::property(&uri, "Host", &TypeTag::string());
        let x = Parameter::new("x", &uri);

        let dot = Expr::member(Expr::null(&closure), &port).to_dot().unwrap();
        assert!(dot.contains("label=\".port (field)\""));
        let dot = Expr::member(Expr::param(&x), &host).to_dot().unwrap();
        assert!(dot.contains("label=\".Host\""));
    }

    #[test]
    fn test_to_dot_show_types() {
        let config = DotConfig {
            show_types: true,
            ..DotConfig::default()
        };
        let dot = Expr::boolean(true).to_dot_with_config(&config).unwrap();
        assert!(dot.contains("label=\"true\\n: Boolean\""));
    }
}
