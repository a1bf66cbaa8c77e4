//! Default values per field type.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde_json::{Map, Value, json};

use fixturemaker_core::{DefaultCallable, DefaultValue, FieldDef};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lookup table from field type name to a plausible placeholder value.
///
/// Date and time entries are rendered from a reference timestamp captured
/// when the table is built.
#[derive(Debug, Clone)]
pub struct FieldDefaults {
    table: BTreeMap<String, Value>,
    reference: NaiveDateTime,
}

impl FieldDefaults {
    pub fn new(reference: NaiveDateTime) -> Self {
        let table = [
            ("AutoField", json!(1)),
            ("BigAutoField", json!(1)),
            ("SmallAutoField", json!(1)),
            ("BooleanField", json!(true)),
            ("CharField", json!("Default CharField")),
            ("CommaSeparatedIntegerField", json!("1,2,3,4,5")),
            ("DateField", json!(reference.format(DATE_FORMAT).to_string())),
            (
                "DateTimeField",
                json!(reference.format(DATETIME_FORMAT).to_string()),
            ),
            // Decimals are serialized as strings to keep their precision.
            ("DecimalField", json!("1.0")),
            ("DurationField", json!("00:00:00")),
            ("EmailField", json!("person@example.com")),
            ("FileField", Value::Null),
            ("FilePathField", json!("/path/to/file")),
            ("FloatField", json!(1.0)),
            ("ImageField", Value::Null),
            ("IntegerField", json!(1)),
            ("BigIntegerField", json!(1)),
            ("IPAddressField", json!("127.0.0.1")),
            ("GenericIPAddressField", json!("127.0.0.1")),
            ("JSONField", json!({})),
            ("NullBooleanField", Value::Null),
            ("PositiveIntegerField", json!(1)),
            ("PositiveBigIntegerField", json!(1)),
            ("PositiveSmallIntegerField", json!(1)),
            ("SlugField", json!("test-slug")),
            ("SmallIntegerField", json!(1)),
            ("TextField", json!("lorem ipsum")),
            ("TimeField", json!("00:00:00")),
            ("URLField", json!("http://www.example.com")),
            ("UUIDField", json!("12345678-1234-5678-1234-567812345678")),
            ("XMLField", json!("<xml><head></head><body></body></xml>")),
            ("BinaryField", Value::Null),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        Self { table, reference }
    }

    /// Table built against the local clock.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Replace or add entries by type name.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.table.extend(overrides);
        self
    }

    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    pub fn lookup(&self, type_name: &str) -> Option<&Value> {
        self.table.get(type_name)
    }

    /// Resolve the placeholder for a field.
    ///
    /// A declared default wins. Otherwise the table entry for the field's
    /// internal type is used, with strings cut to `max_length`. Types with no
    /// entry fall back to null for nullable fields and "" for the rest.
    pub fn get_default_value(&self, field: &FieldDef) -> Value {
        if let Some(default) = &field.default {
            return self.evaluate(default);
        }

        match self.lookup(field.internal_type().as_str()) {
            Some(Value::String(text)) => match field.max_length {
                Some(max_length) => Value::String(text.chars().take(max_length).collect()),
                None => Value::String(text.clone()),
            },
            Some(value) => value.clone(),
            None if field.null => Value::Null,
            None => Value::String(String::new()),
        }
    }

    fn evaluate(&self, default: &DefaultValue) -> Value {
        match default {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Callable { callable } => match callable {
                DefaultCallable::Now => {
                    Value::String(self.reference.format(DATETIME_FORMAT).to_string())
                }
                DefaultCallable::Today => {
                    Value::String(self.reference.format(DATE_FORMAT).to_string())
                }
                DefaultCallable::Uuid4 => Value::String(uuid::Uuid::new_v4().to_string()),
                DefaultCallable::EmptyList => Value::Array(Vec::new()),
                DefaultCallable::EmptyDict => Value::Object(Map::new()),
            },
        }
    }
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fixturemaker_core::FieldType;

    fn defaults() -> FieldDefaults {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(14, 5, 30))
            .expect("valid timestamp");
        FieldDefaults::new(reference)
    }

    #[test]
    fn declared_default_wins_over_table() {
        let mut field = FieldDef::new("status", FieldType::CharField);
        field.max_length = Some(3);
        field.default = Some(DefaultValue::Literal(json!("published")));

        assert_eq!(defaults().get_default_value(&field), json!("published"));
    }

    #[test]
    fn strings_are_truncated_to_max_length() {
        let mut field = FieldDef::new("name", FieldType::CharField);
        field.max_length = Some(10);
        assert_eq!(defaults().get_default_value(&field), json!("Default Ch"));

        let mut count = FieldDef::new("count", FieldType::IntegerField);
        count.max_length = Some(0);
        assert_eq!(defaults().get_default_value(&count), json!(1));
    }

    #[test]
    fn dates_follow_reference_timestamp() {
        let table = defaults();
        assert_eq!(
            table.get_default_value(&FieldDef::new("day", FieldType::DateField)),
            json!("2024-03-09")
        );
        assert_eq!(
            table.get_default_value(&FieldDef::new("at", FieldType::DateTimeField)),
            json!("2024-03-09 14:05:30")
        );
        assert_eq!(
            table.get_default_value(&FieldDef::new("at", FieldType::TimeField)),
            json!("00:00:00")
        );

        let mut created = FieldDef::new("created", FieldType::DateField);
        created.default = Some(DefaultValue::Callable {
            callable: DefaultCallable::Today,
        });
        assert_eq!(table.get_default_value(&created), json!("2024-03-09"));
    }

    #[test]
    fn custom_types_resolve_through_internal_type() {
        let mut color = FieldDef::new("color", FieldType::from("ColorField"));
        color.internal_type = Some(FieldType::CharField);
        color.max_length = Some(7);
        assert_eq!(defaults().get_default_value(&color), json!("Default"));
    }

    #[test]
    fn unknown_types_fall_back_on_nullability() {
        let mut field = FieldDef::new("shape", FieldType::from("PolygonField"));
        assert_eq!(defaults().get_default_value(&field), json!(""));

        field.null = true;
        assert_eq!(defaults().get_default_value(&field), Value::Null);
    }

    #[test]
    fn overrides_replace_and_extend_table() {
        let table = defaults().with_overrides([
            ("CharField".to_string(), json!("placeholder")),
            ("PolygonField".to_string(), json!("POLYGON EMPTY")),
        ]);

        assert_eq!(
            table.get_default_value(&FieldDef::new("title", FieldType::CharField)),
            json!("placeholder")
        );
        assert_eq!(
            table.get_default_value(&FieldDef::new("area", FieldType::from("PolygonField"))),
            json!("POLYGON EMPTY")
        );
    }
}
