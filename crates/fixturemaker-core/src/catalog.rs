use std::collections::BTreeSet;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{DefaultValue, FieldType, Relation, RelationKind};

/// Declarative snapshot of the installed apps and their models.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelCatalog {
    /// Contract version for this catalog format.
    pub catalog_version: String,
    /// Apps in lookup order.
    pub installed_apps: Vec<AppConfig>,
}

/// An installed app and the models it declares.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// Dotted app path (e.g. `django.contrib.auth`).
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelDef>,
}

impl AppConfig {
    /// Short app label: the last segment of the dotted name.
    pub fn label(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Whether `name` is this app's short label or its full dotted path.
    pub fn is_named(&self, name: &str) -> bool {
        name == self.label() || name == self.name
    }
}

/// A model and its fields in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl ModelDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn primary_key(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.primary_key)
    }
}

/// Field metadata as exposed by the model layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Built-in type a custom field stores as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<FieldType>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub null: bool,
    #[serde(default)]
    pub blank: bool,
    /// Whether the field is written to fixtures at all.
    #[serde(default = "default_serialize")]
    pub serialize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Relation target for relation fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

fn default_serialize() -> bool {
    true
}

impl FieldDef {
    /// Create a plain field with framework defaults for every flag.
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            internal_type: None,
            primary_key: false,
            null: false,
            blank: false,
            serialize: true,
            max_length: None,
            default: None,
            to: None,
        }
    }

    /// Type used for default-value lookup; custom fields resolve to the
    /// built-in type they declare.
    pub fn internal_type(&self) -> &FieldType {
        self.internal_type.as_ref().unwrap_or(&self.field_type)
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn relation_kind(&self) -> Option<RelationKind> {
        self.field_type
            .relation_kind()
            .or_else(|| self.internal_type().relation_kind())
    }

    pub fn relation(&self) -> Option<Relation> {
        let kind = self.relation_kind()?;
        let to = self.to.clone()?;
        Some(Relation { kind, to })
    }

    /// A field must be present in a minimal fixture when it cannot be left
    /// empty and the model offers no default for it.
    pub fn is_required(&self) -> bool {
        // `null` has no effect on many-to-many fields.
        let nullable = self.null && self.relation_kind() != Some(RelationKind::ManyToMany);
        !nullable && !self.blank && !self.has_default()
    }
}

/// Resolved handle to a model inside a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelRef {
    pub app: usize,
    pub model: usize,
}

/// Outcome of resolving requested model names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelLookup {
    pub models: Vec<ModelRef>,
    /// Requested names that matched no installed model.
    pub unknown: Vec<String>,
}

impl ModelCatalog {
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a catalog document, choosing the format by file extension.
    ///
    /// The raw document is checked against the catalog JSON Schema before it
    /// is deserialized, and the result is checked with [`crate::validate_catalog`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: serde_json::Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(Error::Unsupported(format!(
                    "catalog format '{}' ({})",
                    other.unwrap_or(""),
                    path.display()
                )));
            }
        };

        let issues = crate::validate_catalog_json(&document)?;
        if let Some(issue) = issues.first() {
            return Err(Error::InvalidCatalog(format!(
                "{} at {} ({} issue(s))",
                issue.message,
                issue.path,
                issues.len()
            )));
        }

        let catalog: ModelCatalog = serde_json::from_value(document)?;
        crate::validate_catalog(&catalog)?;
        Ok(catalog)
    }

    pub fn app(&self, model: ModelRef) -> &AppConfig {
        &self.installed_apps[model.app]
    }

    pub fn model(&self, model: ModelRef) -> &ModelDef {
        &self.installed_apps[model.app].models[model.model]
    }

    /// `app_label.ModelName` identifier used in fixture records.
    pub fn qualified_name(&self, model: ModelRef) -> String {
        format!("{}.{}", self.app(model).label(), self.model(model).name)
    }

    pub fn model_refs(&self) -> impl Iterator<Item = ModelRef> + '_ {
        self.installed_apps
            .iter()
            .enumerate()
            .flat_map(|(app, config)| {
                (0..config.models.len()).map(move |model| ModelRef { app, model })
            })
    }

    /// Look up a model by app label and case-insensitive model name.
    pub fn get_model(&self, app_label: &str, model_name: &str) -> Option<ModelRef> {
        let app = self
            .installed_apps
            .iter()
            .position(|app| app.label() == app_label)?;
        let model = self.installed_apps[app]
            .models
            .iter()
            .position(|model| model.name.eq_ignore_ascii_case(model_name))?;
        Some(ModelRef { app, model })
    }

    /// Resolve model names against every installed app, in app order.
    ///
    /// Bare names match in any app; `app_label.Model` (or the full dotted app
    /// path, `django.contrib.auth.User`) matches only that app.
    pub fn get_models<S: AsRef<str>>(&self, names: &[S]) -> ModelLookup {
        let mut lookup = ModelLookup::default();
        let mut matched = BTreeSet::new();

        for app in &self.installed_apps {
            for name in names {
                let name = name.as_ref();
                let (app_label, model_name) = match name.rsplit_once('.') {
                    Some((app_label, model_name)) => (Some(app_label), model_name),
                    None => (None, name),
                };
                if app_label.is_some_and(|label| !app.is_named(label)) {
                    continue;
                }
                if let Some(model) = self.get_model(app.label(), model_name) {
                    matched.insert(name.to_string());
                    if !lookup.models.contains(&model) {
                        lookup.models.push(model);
                    }
                }
            }
        }

        lookup.unknown = names
            .iter()
            .map(|name| name.as_ref().to_string())
            .filter(|name| !matched.contains(name))
            .collect();
        lookup
    }

    /// Resolve the target model of a relation field declared on `from`.
    pub fn resolve_relation(&self, from: ModelRef, field: &FieldDef) -> Result<ModelRef> {
        let relation = field.relation().ok_or_else(|| {
            Error::InvalidCatalog(format!(
                "field {}.{} is not a relation",
                self.qualified_name(from),
                field.name
            ))
        })?;

        if relation.to == "self" {
            return Ok(from);
        }

        let (app_label, model_name) = match relation.to.rsplit_once('.') {
            Some((app_label, model_name)) => (app_label, model_name),
            None => (self.app(from).label(), relation.to.as_str()),
        };

        self.get_model(app_label, model_name).ok_or_else(|| {
            Error::UnknownModel(format!(
                "{} (referenced by {}.{})",
                relation.to,
                self.qualified_name(from),
                field.name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModelCatalog {
        let mut author_fk = FieldDef::new("author", FieldType::ForeignKey);
        author_fk.to = Some("auth.User".to_string());
        let mut parent = FieldDef::new("parent", FieldType::ForeignKey);
        parent.to = Some("self".to_string());
        parent.null = true;

        ModelCatalog {
            catalog_version: crate::CATALOG_VERSION.to_string(),
            installed_apps: vec![
                AppConfig {
                    name: "django.contrib.auth".to_string(),
                    models: vec![ModelDef {
                        name: "User".to_string(),
                        fields: vec![FieldDef::new("username", FieldType::CharField)],
                    }],
                },
                AppConfig {
                    name: "blog".to_string(),
                    models: vec![
                        ModelDef {
                            name: "Post".to_string(),
                            fields: vec![author_fk, parent],
                        },
                        ModelDef {
                            name: "User".to_string(),
                            fields: Vec::new(),
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn get_models_walks_apps_in_installed_order() {
        let catalog = catalog();
        let lookup = catalog.get_models(&["post", "User", "Missing"]);

        let names: Vec<String> = lookup
            .models
            .iter()
            .map(|model| catalog.qualified_name(*model))
            .collect();
        assert_eq!(names, vec!["auth.User", "blog.Post", "blog.User"]);
        assert_eq!(lookup.unknown, vec!["Missing".to_string()]);
    }

    #[test]
    fn qualified_names_restrict_lookup_to_one_app() {
        let catalog = catalog();
        let lookup = catalog.get_models(&["blog.User"]);
        assert_eq!(lookup.models, vec![ModelRef { app: 1, model: 1 }]);
        assert!(lookup.unknown.is_empty());
    }

    #[test]
    fn full_app_path_selects_the_app() {
        let catalog = catalog();
        let lookup = catalog.get_models(&["django.contrib.auth.User", "contrib.auth.User"]);
        assert_eq!(lookup.models, vec![ModelRef { app: 0, model: 0 }]);
        assert_eq!(lookup.unknown, vec!["contrib.auth.User".to_string()]);
    }

    #[test]
    fn resolves_explicit_and_self_relations() {
        let catalog = catalog();
        let post = ModelRef { app: 1, model: 0 };
        let model = catalog.model(post).clone();

        let author = catalog
            .resolve_relation(post, model.field("author").unwrap())
            .expect("resolve author");
        assert_eq!(catalog.qualified_name(author), "auth.User");

        let parent = catalog
            .resolve_relation(post, model.field("parent").unwrap())
            .expect("resolve parent");
        assert_eq!(parent, post);
    }

    #[test]
    fn required_ignores_null_on_many_to_many() {
        let mut tags = FieldDef::new("tags", FieldType::ManyToManyField);
        tags.null = true;
        assert!(tags.is_required());

        tags.blank = true;
        assert!(!tags.is_required());

        let mut title = FieldDef::new("title", FieldType::CharField);
        title.default = Some(DefaultValue::Literal(serde_json::json!("untitled")));
        assert!(!title.is_required());
    }
}
