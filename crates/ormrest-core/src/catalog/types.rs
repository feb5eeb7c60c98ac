//! Column storage types.
//!
//! A [`SqlType`] is a value describing how a column is stored. Its [`TypeTag`]
//! places it in a fixed type hierarchy (generic types plus PostgreSQL, MySQL and
//! MSSQL dialect types), which is what the converter walks when resolving a
//! descriptor kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type classes, generic and dialect-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Integer,
    SmallInteger,
    BigInteger,
    Numeric,
    Float,
    Double,
    String,
    Text,
    Unicode,
    UnicodeText,
    Enum,
    Boolean,
    DateTime,
    Date,
    Time,
    /// Stored through a wrapped `DateTime`.
    Interval,
    LargeBinary,
    Json,
    Array,
    Uuid,
    /// Type of untyped expressions.
    Null,
    /// A custom type delegating storage to a wrapped type.
    TypeDecorator,
    /// A custom type with no storage delegate.
    UserDefined,

    PgBit,
    PgUuid,
    PgMacAddr,
    PgInet,
    PgJson,
    PgJsonb,
    PgHstore,
    PgArray,
    PgMoney,
    PgEnum,
    PgBytea,

    MySqlBit,
    MySqlYear,
    MySqlSet,
    MySqlEnum,
    MySqlTinyInt,
    MySqlLongText,
    MySqlJson,

    MsSqlBit,
    MsSqlUniqueIdentifier,
}

/// Host-language value types a storage type maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    Str,
    Bytes,
    Int,
    Float,
    Decimal,
    Bool,
    DateTime,
    Date,
    Time,
    TimeDelta,
    Uuid,
    List,
    Tuple,
    Set,
    Dict,
}

impl TypeTag {
    /// The direct supertype, if any.
    pub fn parent(self) -> Option<TypeTag> {
        use TypeTag::*;
        match self {
            SmallInteger | BigInteger => Some(Integer),
            Float => Some(Numeric),
            Double => Some(Float),
            Text | Unicode | Enum => Some(String),
            UnicodeText => Some(Text),
            Interval => Some(TypeDecorator),

            PgJson => Some(Json),
            PgJsonb => Some(PgJson),
            PgArray => Some(Array),
            PgEnum => Some(Enum),
            PgBytea => Some(LargeBinary),

            MySqlSet => Some(String),
            MySqlEnum => Some(Enum),
            MySqlTinyInt => Some(Integer),
            MySqlLongText => Some(Text),
            MySqlJson => Some(Json),

            _ => None,
        }
    }

    /// The inheritance chain, most specific first.
    pub fn chain(self) -> impl Iterator<Item = TypeTag> {
        std::iter::successors(Some(self), |tag| tag.parent())
    }

    /// Number of inheritance steps from `self` up to `ancestor`.
    ///
    /// Returns `None` when `self` is not a subtype of `ancestor`.
    pub fn distance_to(self, ancestor: TypeTag) -> Option<usize> {
        self.chain().position(|tag| tag == ancestor)
    }

    /// Whether `self` is `ancestor` or inherits from it.
    pub fn is_subtype_of(self, ancestor: TypeTag) -> bool {
        self.distance_to(ancestor).is_some()
    }

    /// Native value type this storage type maps onto, if it declares one.
    pub fn native_type(self) -> Option<NativeType> {
        use TypeTag::*;
        match self {
            Integer | SmallInteger | BigInteger | MySqlYear | MySqlTinyInt => {
                Some(NativeType::Int)
            }
            Numeric => Some(NativeType::Decimal),
            Float | Double => Some(NativeType::Float),
            String | Text | Unicode | UnicodeText | Enum | PgEnum | MySqlEnum
            | MySqlLongText | PgMacAddr | PgInet => Some(NativeType::Str),
            MySqlSet => Some(NativeType::Set),
            Boolean => Some(NativeType::Bool),
            DateTime => Some(NativeType::DateTime),
            Date => Some(NativeType::Date),
            Time => Some(NativeType::Time),
            Interval => Some(NativeType::TimeDelta),
            LargeBinary | PgBytea => Some(NativeType::Bytes),
            Json | PgJson | PgJsonb | MySqlJson | PgHstore => Some(NativeType::Dict),
            Array | PgArray => Some(NativeType::List),
            Uuid | PgUuid | MsSqlUniqueIdentifier => Some(NativeType::Uuid),
            Null | TypeDecorator | UserDefined | PgBit | PgMoney | MySqlBit | MsSqlBit => None,
        }
    }

    /// Display name, qualified with the dialect for dialect types.
    pub fn name(self) -> &'static str {
        use TypeTag::*;
        match self {
            Integer => "Integer",
            SmallInteger => "SmallInteger",
            BigInteger => "BigInteger",
            Numeric => "Numeric",
            Float => "Float",
            Double => "Double",
            String => "String",
            Text => "Text",
            Unicode => "Unicode",
            UnicodeText => "UnicodeText",
            Enum => "Enum",
            Boolean => "Boolean",
            DateTime => "DateTime",
            Date => "Date",
            Time => "Time",
            Interval => "Interval",
            LargeBinary => "LargeBinary",
            Json => "JSON",
            Array => "ARRAY",
            Uuid => "Uuid",
            Null => "NullType",
            TypeDecorator => "TypeDecorator",
            UserDefined => "UserDefinedType",
            PgBit => "postgresql.BIT",
            PgUuid => "postgresql.UUID",
            PgMacAddr => "postgresql.MACADDR",
            PgInet => "postgresql.INET",
            PgJson => "postgresql.JSON",
            PgJsonb => "postgresql.JSONB",
            PgHstore => "postgresql.HSTORE",
            PgArray => "postgresql.ARRAY",
            PgMoney => "postgresql.MONEY",
            PgEnum => "postgresql.ENUM",
            PgBytea => "postgresql.BYTEA",
            MySqlBit => "mysql.BIT",
            MySqlYear => "mysql.YEAR",
            MySqlSet => "mysql.SET",
            MySqlEnum => "mysql.ENUM",
            MySqlTinyInt => "mysql.TINYINT",
            MySqlLongText => "mysql.LONGTEXT",
            MySqlJson => "mysql.JSON",
            MsSqlBit => "mssql.BIT",
            MsSqlUniqueIdentifier => "mssql.UNIQUEIDENTIFIER",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column storage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlType {
    /// Type class.
    pub tag: TypeTag,
    /// Name of a custom type; defaults to the tag name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared length (characters for strings, items for arrays).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Total digits for numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Digits after the decimal point for numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Allowed values of an enumerated type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<String>,
    /// Item type of a collection type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Box<SqlType>>,
    /// Overrides the tag's native type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<NativeType>,
    /// Wrapped storage type of a decorator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<Box<SqlType>>,
}

impl SqlType {
    /// Create a plain type of the given class.
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            name: None,
            length: None,
            precision: None,
            scale: None,
            enums: Vec::new(),
            item_type: None,
            native: None,
            wrapped: None,
        }
    }

    pub fn integer() -> Self {
        Self::new(TypeTag::Integer)
    }

    pub fn big_integer() -> Self {
        Self::new(TypeTag::BigInteger)
    }

    pub fn float() -> Self {
        Self::new(TypeTag::Float)
    }

    pub fn boolean() -> Self {
        Self::new(TypeTag::Boolean)
    }

    pub fn datetime() -> Self {
        Self::new(TypeTag::DateTime)
    }

    pub fn date() -> Self {
        Self::new(TypeTag::Date)
    }

    pub fn text() -> Self {
        Self::new(TypeTag::Text)
    }

    pub fn json() -> Self {
        Self::new(TypeTag::Json)
    }

    pub fn uuid() -> Self {
        Self::new(TypeTag::Uuid)
    }

    /// A bounded string.
    pub fn string(length: u32) -> Self {
        Self::new(TypeTag::String).with_length(length)
    }

    /// A fixed-precision number.
    pub fn numeric(precision: u32, scale: u32) -> Self {
        let mut ty = Self::new(TypeTag::Numeric);
        ty.precision = Some(precision);
        ty.scale = Some(scale);
        ty
    }

    /// An enumerated string type.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ty = Self::new(TypeTag::Enum);
        ty.enums = values.into_iter().map(Into::into).collect();
        ty
    }

    /// An array of `item`.
    pub fn array(item: SqlType) -> Self {
        Self::new(TypeTag::Array).with_item_type(item)
    }

    /// A custom type storing its values through `inner`.
    pub fn decorated(name: impl Into<String>, inner: SqlType) -> Self {
        let mut ty = Self::new(TypeTag::TypeDecorator);
        ty.name = Some(name.into());
        ty.wrapped = Some(Box::new(inner));
        ty
    }

    /// A custom type with no storage delegate.
    pub fn user_defined(name: impl Into<String>, native: Option<NativeType>) -> Self {
        let mut ty = Self::new(TypeTag::UserDefined);
        ty.name = Some(name.into());
        ty.native = native;
        ty
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_item_type(mut self, item: SqlType) -> Self {
        self.item_type = Some(Box::new(item));
        self
    }

    pub fn with_native(mut self, native: NativeType) -> Self {
        self.native = Some(native);
        self
    }

    /// Name used in error messages.
    pub fn type_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.tag.name())
    }

    /// Declared length; enumerated types without one use their longest value.
    pub fn effective_length(&self) -> Option<u32> {
        self.length.or_else(|| {
            if !self.tag.is_subtype_of(TypeTag::Enum) {
                return None;
            }
            self.enums
                .iter()
                .map(|v| v.chars().count())
                .max()
                .and_then(|n| u32::try_from(n).ok())
        })
    }

    /// Native value type, honouring an explicit override.
    pub fn native_type(&self) -> Option<NativeType> {
        self.native.or_else(|| self.tag.native_type())
    }

    /// Wrapped storage type of a decorator.
    pub fn wrapped(&self) -> Option<&SqlType> {
        match (&self.wrapped, self.tag) {
            (Some(inner), _) => Some(inner),
            (None, TypeTag::Interval) => Some(&INTERVAL_STORAGE),
            (None, _) => None,
        }
    }
}

/// Storage used by intervals that do not name their own.
static INTERVAL_STORAGE: SqlType = SqlType {
    tag: TypeTag::DateTime,
    name: None,
    length: None,
    precision: None,
    scale: None,
    enums: Vec::new(),
    item_type: None,
    native: None,
    wrapped: None,
};

impl From<TypeTag> for SqlType {
    fn from(tag: TypeTag) -> Self {
        SqlType::new(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_is_most_specific_first() {
        let chain: Vec<_> = TypeTag::PgJsonb.chain().collect();
        assert_eq!(chain, vec![TypeTag::PgJsonb, TypeTag::PgJson, TypeTag::Json]);
    }

    #[test]
    fn test_subtype_predicate() {
        assert!(TypeTag::UnicodeText.is_subtype_of(TypeTag::String));
        assert!(TypeTag::MySqlEnum.is_subtype_of(TypeTag::Enum));
        assert!(TypeTag::Integer.is_subtype_of(TypeTag::Integer));
        assert!(!TypeTag::String.is_subtype_of(TypeTag::Text));
        assert_eq!(TypeTag::UnicodeText.distance_to(TypeTag::String), Some(2));
        assert_eq!(TypeTag::Boolean.distance_to(TypeTag::Integer), None);
    }

    #[test]
    fn test_enum_length_from_longest_value() {
        assert_eq!(SqlType::enumeration(["on", "off"]).effective_length(), Some(3));
        assert_eq!(
            SqlType::enumeration(["on", "off"]).with_length(8).effective_length(),
            Some(8)
        );
        assert_eq!(SqlType::enumeration(Vec::<String>::new()).effective_length(), None);
        assert_eq!(SqlType::text().effective_length(), None);
    }

    #[test]
    fn test_native_override() {
        let ty = SqlType::user_defined("Point", Some(NativeType::Tuple));
        assert_eq!(ty.native_type(), Some(NativeType::Tuple));
        assert_eq!(ty.type_name(), "Point");

        assert_eq!(SqlType::string(10).native_type(), Some(NativeType::Str));
        assert_eq!(SqlType::new(TypeTag::PgMoney).native_type(), None);
    }

    #[test]
    fn test_decorated_wraps_inner() {
        let ty = SqlType::decorated("EncryptedString", SqlType::string(255));
        assert_eq!(ty.tag, TypeTag::TypeDecorator);
        assert_eq!(ty.wrapped().map(|t| t.tag), Some(TypeTag::String));
        assert_eq!(ty.native_type(), None);
    }

    #[test]
    fn test_interval_stores_as_datetime() {
        let ty = SqlType::new(TypeTag::Interval);
        assert_eq!(ty.wrapped().map(|t| t.tag), Some(TypeTag::DateTime));
        assert_eq!(ty.native_type(), Some(NativeType::TimeDelta));
    }

    #[test]
    fn test_deserialize_from_json() {
        let ty: SqlType = serde_json::from_str(
            r#"{"tag": "array", "item_type": {"tag": "integer"}, "length": 4}"#,
        )
        .unwrap();
        assert_eq!(ty.tag, TypeTag::Array);
        assert_eq!(ty.length, Some(4));
        assert_eq!(ty.item_type.map(|t| t.tag), Some(TypeTag::Integer));
    }
}
