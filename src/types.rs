//! Opaque host tokens: static types, members, methods and constructors.
//!
//! The comparison engine never inspects these beyond equality. A front end creates
//! them once per host symbol and clones them into every node that refers to the
//! symbol; clones are cheap (`Arc<str>` inside) and can be shared across threads.
use std::fmt;
use std::sync::Arc;

/// A static type tag.
///
/// Two tags are equal iff they name the same host type.
///
/// # Invariants
///
/// - A structurally-anonymous record type is always created with [`TypeTag::anonymous`],
///   so [`is_anonymous`][TypeTag::is_anonymous] is a property of the type, not of the use site.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TypeTag {
    name: Arc<str>,
    anonymous: bool,
}

impl TypeTag {
    /// Creates a tag for a named (declared) type.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        TypeTag {
            name: name.into(),
            anonymous: false,
        }
    }

    /// Creates a tag for a structurally-anonymous record type.
    pub fn anonymous(name: impl Into<Arc<str>>) -> Self {
        TypeTag {
            name: name.into(),
            anonymous: true,
        }
    }

    /// Creates the tag of a single-dimension array of `elem`.
    pub fn array_of(elem: &TypeTag) -> Self {
        TypeTag::named(format!("{}[]", elem.name))
    }

    pub fn int() -> Self {
        TypeTag::named("Int32")
    }

    pub fn double() -> Self {
        TypeTag::named("Double")
    }

    pub fn bool() -> Self {
        TypeTag::named("Boolean")
    }

    pub fn string() -> Self {
        TypeTag::named("String")
    }

    pub fn object() -> Self {
        TypeTag::named("Object")
    }

    pub fn void() -> Self {
        TypeTag::named("Void")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Whether a member is read as a field or through a property getter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

/// A reference to a field or property of a host type.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MemberRef {
    declaring: TypeTag,
    name: Arc<str>,
    kind: MemberKind,
    ty: TypeTag,
}

impl MemberRef {
    pub fn new(declaring: &TypeTag, name: impl Into<Arc<str>>, kind: MemberKind, ty: &TypeTag) -> Self {
        MemberRef {
            declaring: declaring.clone(),
            name: name.into(),
            kind,
            ty: ty.clone(),
        }
    }

    pub fn field(declaring: &TypeTag, name: impl Into<Arc<str>>, ty: &TypeTag) -> Self {
        Self::new(declaring, name, MemberKind::Field, ty)
    }

    pub fn property(declaring: &TypeTag, name: impl Into<Arc<str>>, ty: &TypeTag) -> Self {
        Self::new(declaring, name, MemberKind::Property, ty)
    }

    /// Type that declares the member.
    pub fn declaring(&self) -> &TypeTag {
        &self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Type of the value the member holds.
    pub fn ty(&self) -> &TypeTag {
        &self.ty
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring, self.name)
    }
}

/// A reference to a method, including operator overloads and collection `Add` methods.
///
/// Overloads are told apart by their parameter types.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MethodRef {
    declaring: TypeTag,
    name: Arc<str>,
    params: Arc<[TypeTag]>,
    ret: TypeTag,
    is_static: bool,
}

impl MethodRef {
    pub fn instance(
        declaring: &TypeTag,
        name: impl Into<Arc<str>>,
        params: impl IntoIterator<Item = TypeTag>,
        ret: &TypeTag,
    ) -> Self {
        MethodRef {
            declaring: declaring.clone(),
            name: name.into(),
            params: params.into_iter().collect(),
            ret: ret.clone(),
            is_static: false,
        }
    }

    pub fn static_method(
        declaring: &TypeTag,
        name: impl Into<Arc<str>>,
        params: impl IntoIterator<Item = TypeTag>,
        ret: &TypeTag,
    ) -> Self {
        MethodRef {
            is_static: true,
            ..Self::instance(declaring, name, params, ret)
        }
    }

    pub fn declaring(&self) -> &TypeTag {
        &self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeTag] {
        &self.params
    }

    /// Return type.
    pub fn ret(&self) -> &TypeTag {
        &self.ret
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.ret, self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

/// A reference to a constructor of a host type.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct CtorRef {
    declaring: TypeTag,
    params: Arc<[TypeTag]>,
}

impl CtorRef {
    pub fn new(declaring: &TypeTag, params: impl IntoIterator<Item = TypeTag>) -> Self {
        CtorRef {
            declaring: declaring.clone(),
            params: params.into_iter().collect(),
        }
    }

    /// Type that the constructor instantiates.
    pub fn declaring(&self) -> &TypeTag {
        &self.declaring
    }

    pub fn params(&self) -> &[TypeTag] {
        &self.params
    }
}

impl fmt::Display for CtorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.declaring)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}
