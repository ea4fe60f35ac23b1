// Borrowed runtime values and emptiness

use crate::{FieldKind, ScalarKind};

/// A plain field value, borrowed from the record being verified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Str(&'a str),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl Scalar<'_> {
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Str(_) => ScalarKind::Str,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Uint(_) => ScalarKind::Uint,
            Scalar::Float(_) => ScalarKind::Float,
        }
    }

    /// Whether the value equals its kind's zero value.
    ///
    /// Floats use exact comparison, so `-0.0` is empty and `NaN` is not.
    pub fn is_empty(&self) -> bool {
        match *self {
            Scalar::Str(s) => s.is_empty(),
            Scalar::Bool(b) => !b,
            Scalar::Int(v) => v == 0,
            Scalar::Uint(v) => v == 0,
            Scalar::Float(v) => v == 0.0,
        }
    }
}

/// The current value of a field as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Scalar(Scalar<'a>),
    /// An optional wrapper: `None` means the value was never supplied.
    Optional(Option<Scalar<'a>>),
}

impl<'a> FieldValue<'a> {
    /// Whether the field counts as "not supplied".
    ///
    /// An optional is empty only when absent; a present optional is never
    /// empty, even if it wraps `false` or `0`.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(scalar) => scalar.is_empty(),
            FieldValue::Optional(inner) => inner.is_none(),
        }
    }

    /// Whether the value has the shape `kind` declares.
    ///
    /// An absent optional conforms to any optional kind.
    pub fn conforms_to(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (FieldValue::Scalar(scalar), FieldKind::Scalar(expected)) => scalar.kind() == expected,
            (FieldValue::Optional(Some(scalar)), FieldKind::Optional(expected)) => {
                scalar.kind() == expected
            }
            (FieldValue::Optional(None), FieldKind::Optional(_)) => true,
            _ => false,
        }
    }

    /// The underlying value, if one is present.
    pub fn present(&self) -> Option<Scalar<'a>> {
        match *self {
            FieldValue::Scalar(scalar) => Some(scalar),
            FieldValue::Optional(inner) => inner,
        }
    }
}

impl<'a> From<Scalar<'a>> for FieldValue<'a> {
    fn from(scalar: Scalar<'a>) -> Self {
        FieldValue::Scalar(scalar)
    }
}

impl<'a> From<Option<Scalar<'a>>> for FieldValue<'a> {
    fn from(inner: Option<Scalar<'a>>) -> Self {
        FieldValue::Optional(inner)
    }
}

/// Types that can be read as a field value.
///
/// Implemented for strings, `bool`, every integer width, `f32`, `f64`, and
/// `Option` of each of these.
pub trait IntoFieldValue {
    /// Declared kind of fields of this type.
    const KIND: FieldKind;

    /// Borrow the current value.
    fn field_value(&self) -> FieldValue<'_>;
}

macro_rules! impl_into_field_value {
    ($($ty:ty => $kind:ident, |$v:ident| $scalar:expr;)*) => {
        $(
            impl IntoFieldValue for $ty {
                const KIND: FieldKind = FieldKind::Scalar(ScalarKind::$kind);

                fn field_value(&self) -> FieldValue<'_> {
                    let $v = self;
                    FieldValue::Scalar($scalar)
                }
            }

            impl IntoFieldValue for Option<$ty> {
                const KIND: FieldKind = FieldKind::Optional(ScalarKind::$kind);

                fn field_value(&self) -> FieldValue<'_> {
                    FieldValue::Optional(self.as_ref().map(|$v| $scalar))
                }
            }
        )*
    };
}

impl_into_field_value! {
    String => Str, |v| Scalar::Str(v.as_str());
    bool => Bool, |v| Scalar::Bool(*v);
    i8 => Int, |v| Scalar::Int(i64::from(*v));
    i16 => Int, |v| Scalar::Int(i64::from(*v));
    i32 => Int, |v| Scalar::Int(i64::from(*v));
    i64 => Int, |v| Scalar::Int(*v);
    isize => Int, |v| Scalar::Int(*v as i64);
    u8 => Uint, |v| Scalar::Uint(u64::from(*v));
    u16 => Uint, |v| Scalar::Uint(u64::from(*v));
    u32 => Uint, |v| Scalar::Uint(u64::from(*v));
    u64 => Uint, |v| Scalar::Uint(*v);
    usize => Uint, |v| Scalar::Uint(*v as u64);
    f32 => Float, |v| Scalar::Float(f64::from(*v));
    f64 => Float, |v| Scalar::Float(*v);
}

impl IntoFieldValue for &str {
    const KIND: FieldKind = FieldKind::Scalar(ScalarKind::Str);

    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Scalar(Scalar::Str(*self))
    }
}

impl IntoFieldValue for Option<&str> {
    const KIND: FieldKind = FieldKind::Optional(ScalarKind::Str);

    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Optional(self.map(Scalar::Str))
    }
}
