use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::types::TypeTag;

static NEXT_PARAM_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identity of a declared parameter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ParamId(u32);

impl ParamId {
    fn fresh() -> Self {
        Self(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for ParamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A lambda parameter declaration.
///
/// Every call to [`Parameter::new`] declares a new parameter, even with a name that is
/// already in use. Clones refer to the same declaration. Equality is by declaration,
/// the name is for display only.
#[derive(Debug, Clone)]
pub struct Parameter {
    id: ParamId,
    name: Arc<str>,
    ty: TypeTag,
}

impl Parameter {
    pub fn new(name: impl Into<Arc<str>>, ty: &TypeTag) -> Self {
        Self {
            id: ParamId::fresh(),
            name: name.into(),
            ty: ty.clone(),
        }
    }

    pub fn id(&self) -> ParamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeTag {
        &self.ty
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_identity() {
        let a = Parameter::new("x", &TypeTag::int());
        let b = Parameter::new("x", &TypeTag::int());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_name_is_display_only() {
        let a = Parameter::new("first", &TypeTag::int());
        assert_eq!(a.to_string(), "first");
        assert_eq!(a.name(), "first");
        assert_eq!(a.ty(), &TypeTag::int());
    }
}
