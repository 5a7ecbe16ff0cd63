//! # lambda-eq: semantic equivalence of lambda expression trees
//!
//! **`lambda-eq`** decides whether two expression trees of anonymous functions would
//! always produce the same result for the same inputs, even when they were built
//! independently: with different parameter names, with a captured local where the
//! other side has a literal, or with object and collection initializers written in a
//! different order.
//!
//! The typical consumer is a test assertion or a mock-argument matcher that wants to
//! compare two lambdas for "same logic" rather than reference identity.
//!
//! ## What is compared
//!
//! - **Alpha-equivalence**: parameters are compared by their position in the declaring
//!   lambda, never by name, so `(first, second) => first + second` equals
//!   `(i, s) => i + s`.
//! - **Constant folding**: subtrees that reduce to a value without touching a
//!   parameter (literals, captured locals, arrays of constants, conditionals on a
//!   constant test) are compared by value.
//! - **Unordered initializers**: `new T { A = a, B = b }` equals `new T { B = b, A = a }`,
//!   and `new List<int> { 3, 7 }` equals `new List<int> { 7, 3 }`. Arguments and array
//!   elements stay order-sensitive.
//!
//! It is not a theorem prover: `x + 1` and `1 + x` are different trees.
//!
//! A comparison that hits a construct it cannot decide (an unknown node kind, a
//! nested initializer binding, two different anonymous types) returns an
//! [`Error`][crate::error::Error] instead of `false`: `Ok(false)` always means
//! "proven different".
//!
//! ## Basic Usage
//!
//! ```rust
//! use lambda_eq::expr::{BinaryOp, Expr};
//! use lambda_eq::param::Parameter;
//! use lambda_eq::types::TypeTag;
//!
//! // 1. Build two lambdas, as a front end would: x => x * 2 and y => y * 2
//! let x = Parameter::new("x", &TypeTag::int());
//! let f = Expr::lambda(vec![x.clone()], Expr::binary(BinaryOp::Multiply, Expr::param(&x), Expr::int(2)));
//! let y = Parameter::new("y", &TypeTag::int());
//! let g = Expr::lambda(vec![y.clone()], Expr::binary(BinaryOp::Multiply, Expr::param(&y), Expr::int(2)));
//!
//! // 2. Compare
//! assert!(lambda_eq::equivalent(Some(&f), Some(&g)).unwrap());
//!
//! // 3. Or build a reusable matcher
//! let doubles = lambda_eq::matcher(&f);
//! assert!(doubles(Some(&g)).unwrap());
//! ```
//!
//! ## Core Components
//!
//! - **[`expr`]**: the node model and its constructors.
//! - **[`eval`]**: constant folding.
//! - **[`equiv`]**: the equivalence engine and its [`EquivConfig`][crate::equiv::EquivConfig].
//! - **[`dot`]**: Graphviz rendering, handy when an assertion fails.
//!
//! Comparisons are read-only and keep all state on the stack, so trees can be shared
//! and compared from several threads at once.

mod display;
pub mod dot;
pub mod equiv;
pub mod error;
pub mod eval;
pub mod expr;
pub mod lambda;
pub mod matching;
pub mod param;
pub mod types;
pub mod value;

pub use crate::error::{Error, Result};
pub use crate::lambda::{equivalent, equivalent_with_config, matcher};
