use std::fmt;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::{Deserialize, Serialize};

/// Field kind as reported by the model layer (e.g. `CharField`).
///
/// Unknown names are kept as [`FieldType::Custom`] so user-defined field
/// subclasses survive a round trip through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    AutoField,
    BigAutoField,
    SmallAutoField,
    BooleanField,
    CharField,
    CommaSeparatedIntegerField,
    DateField,
    DateTimeField,
    DecimalField,
    DurationField,
    EmailField,
    FileField,
    FilePathField,
    FloatField,
    ImageField,
    IntegerField,
    BigIntegerField,
    IPAddressField,
    GenericIPAddressField,
    JSONField,
    NullBooleanField,
    PositiveIntegerField,
    PositiveBigIntegerField,
    PositiveSmallIntegerField,
    SlugField,
    SmallIntegerField,
    TextField,
    TimeField,
    URLField,
    UUIDField,
    XMLField,
    BinaryField,
    ForeignKey,
    OneToOneField,
    ManyToManyField,
    Custom(String),
}

impl FieldType {
    /// Canonical type name.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::AutoField => "AutoField",
            FieldType::BigAutoField => "BigAutoField",
            FieldType::SmallAutoField => "SmallAutoField",
            FieldType::BooleanField => "BooleanField",
            FieldType::CharField => "CharField",
            FieldType::CommaSeparatedIntegerField => "CommaSeparatedIntegerField",
            FieldType::DateField => "DateField",
            FieldType::DateTimeField => "DateTimeField",
            FieldType::DecimalField => "DecimalField",
            FieldType::DurationField => "DurationField",
            FieldType::EmailField => "EmailField",
            FieldType::FileField => "FileField",
            FieldType::FilePathField => "FilePathField",
            FieldType::FloatField => "FloatField",
            FieldType::ImageField => "ImageField",
            FieldType::IntegerField => "IntegerField",
            FieldType::BigIntegerField => "BigIntegerField",
            FieldType::IPAddressField => "IPAddressField",
            FieldType::GenericIPAddressField => "GenericIPAddressField",
            FieldType::JSONField => "JSONField",
            FieldType::NullBooleanField => "NullBooleanField",
            FieldType::PositiveIntegerField => "PositiveIntegerField",
            FieldType::PositiveBigIntegerField => "PositiveBigIntegerField",
            FieldType::PositiveSmallIntegerField => "PositiveSmallIntegerField",
            FieldType::SlugField => "SlugField",
            FieldType::SmallIntegerField => "SmallIntegerField",
            FieldType::TextField => "TextField",
            FieldType::TimeField => "TimeField",
            FieldType::URLField => "URLField",
            FieldType::UUIDField => "UUIDField",
            FieldType::XMLField => "XMLField",
            FieldType::BinaryField => "BinaryField",
            FieldType::ForeignKey => "ForeignKey",
            FieldType::OneToOneField => "OneToOneField",
            FieldType::ManyToManyField => "ManyToManyField",
            FieldType::Custom(name) => name.as_str(),
        }
    }

    /// Relation kind carried by this field type, if any.
    pub fn relation_kind(&self) -> Option<RelationKind> {
        match self {
            FieldType::ForeignKey => Some(RelationKind::ManyToOne),
            FieldType::OneToOneField => Some(RelationKind::OneToOne),
            FieldType::ManyToManyField => Some(RelationKind::ManyToMany),
            _ => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, FieldType::Custom(_))
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "AutoField" => FieldType::AutoField,
            "BigAutoField" => FieldType::BigAutoField,
            "SmallAutoField" => FieldType::SmallAutoField,
            "BooleanField" => FieldType::BooleanField,
            "CharField" => FieldType::CharField,
            "CommaSeparatedIntegerField" => FieldType::CommaSeparatedIntegerField,
            "DateField" => FieldType::DateField,
            "DateTimeField" => FieldType::DateTimeField,
            "DecimalField" => FieldType::DecimalField,
            "DurationField" => FieldType::DurationField,
            "EmailField" => FieldType::EmailField,
            "FileField" => FieldType::FileField,
            "FilePathField" => FieldType::FilePathField,
            "FloatField" => FieldType::FloatField,
            "ImageField" => FieldType::ImageField,
            "IntegerField" => FieldType::IntegerField,
            "BigIntegerField" => FieldType::BigIntegerField,
            "IPAddressField" => FieldType::IPAddressField,
            "GenericIPAddressField" => FieldType::GenericIPAddressField,
            "JSONField" => FieldType::JSONField,
            "NullBooleanField" => FieldType::NullBooleanField,
            "PositiveIntegerField" => FieldType::PositiveIntegerField,
            "PositiveBigIntegerField" => FieldType::PositiveBigIntegerField,
            "PositiveSmallIntegerField" => FieldType::PositiveSmallIntegerField,
            "SlugField" => FieldType::SlugField,
            "SmallIntegerField" => FieldType::SmallIntegerField,
            "TextField" => FieldType::TextField,
            "TimeField" => FieldType::TimeField,
            "URLField" => FieldType::URLField,
            "UUIDField" => FieldType::UUIDField,
            "XMLField" => FieldType::XMLField,
            "BinaryField" => FieldType::BinaryField,
            "ForeignKey" => FieldType::ForeignKey,
            "OneToOneField" => FieldType::OneToOneField,
            "ManyToManyField" => FieldType::ManyToManyField,
            _ => FieldType::Custom(value),
        }
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        FieldType::from(value.to_string())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

// Catalog documents carry the bare type name.
impl JsonSchema for FieldType {
    fn schema_name() -> String {
        "FieldType".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cardinality of a relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    ManyToOne,
    OneToOne,
    ManyToMany,
}

/// Relation declared by a field, with the unresolved target reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,
    /// `app_label.Model`, a bare `Model` in the same app, or `self`.
    pub to: String,
}

/// Named default factories evaluated when a fixture is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DefaultCallable {
    /// Current timestamp.
    Now,
    /// Current date.
    Today,
    /// Random UUID (v4).
    Uuid4,
    EmptyList,
    EmptyDict,
}

/// Default declared on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DefaultValue {
    Callable { callable: DefaultCallable },
    Literal(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_names_become_custom() {
        assert_eq!(FieldType::from("CharField"), FieldType::CharField);
        assert_eq!(
            FieldType::from("ColorField"),
            FieldType::Custom("ColorField".to_string())
        );
        assert_eq!(String::from(FieldType::from("ColorField")), "ColorField");
    }

    #[test]
    fn default_value_prefers_callable_shape() {
        let callable: DefaultValue =
            serde_json::from_str(r#"{"callable": "today"}"#).expect("parse callable");
        assert_eq!(
            callable,
            DefaultValue::Callable {
                callable: DefaultCallable::Today
            }
        );

        let literal: DefaultValue = serde_json::from_str(r#""draft""#).expect("parse literal");
        assert_eq!(literal, DefaultValue::Literal(serde_json::json!("draft")));
    }
}
