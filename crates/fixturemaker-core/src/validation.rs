use std::collections::BTreeSet;

use crate::catalog::{ModelCatalog, ModelRef};
use crate::error::{Error, Result};

/// Validate internal consistency of a model catalog.
///
/// This checks:
/// - the catalog contract version
/// - duplicate app labels, model names and field names
/// - at most one primary key per model
/// - relation fields name a target and the target is installed
/// - non-relation fields do not name a target
pub fn validate_catalog(catalog: &ModelCatalog) -> Result<()> {
    if catalog.catalog_version != crate::CATALOG_VERSION {
        return Err(Error::Unsupported(format!(
            "catalog version {} (expected {})",
            catalog.catalog_version,
            crate::CATALOG_VERSION
        )));
    }

    let mut labels = BTreeSet::new();

    for (app_idx, app) in catalog.installed_apps.iter().enumerate() {
        if !labels.insert(app.label().to_string()) {
            return Err(Error::InvalidCatalog(format!(
                "duplicate app label: {}",
                app.label()
            )));
        }

        let mut models = BTreeSet::new();
        for (model_idx, model) in app.models.iter().enumerate() {
            if !models.insert(model.name.to_lowercase()) {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate model name: {}.{}",
                    app.label(),
                    model.name
                )));
            }

            let mut fields = BTreeSet::new();
            let mut primary_keys = 0;
            for field in &model.fields {
                if !fields.insert(field.name.as_str()) {
                    return Err(Error::InvalidCatalog(format!(
                        "duplicate field name: {}.{}.{}",
                        app.label(),
                        model.name,
                        field.name
                    )));
                }

                if field.primary_key {
                    primary_keys += 1;
                }

                match (field.relation_kind(), field.to.as_ref()) {
                    (Some(_), None) => {
                        return Err(Error::InvalidCatalog(format!(
                            "relation field without target: {}.{}.{}",
                            app.label(),
                            model.name,
                            field.name
                        )));
                    }
                    (None, Some(to)) => {
                        return Err(Error::InvalidCatalog(format!(
                            "non-relation field {}.{}.{} ({}) declares target '{}'",
                            app.label(),
                            model.name,
                            field.name,
                            field.field_type,
                            to
                        )));
                    }
                    _ => {}
                }
            }

            if primary_keys > 1 {
                return Err(Error::InvalidCatalog(format!(
                    "multiple primary keys: {}.{}",
                    app.label(),
                    model.name
                )));
            }

            let from = ModelRef {
                app: app_idx,
                model: model_idx,
            };
            for field in model.fields.iter().filter(|field| field.to.is_some()) {
                catalog.resolve_relation(from, field)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AppConfig, FieldDef, ModelDef};
    use crate::types::FieldType;

    fn app(name: &str, models: Vec<ModelDef>) -> AppConfig {
        AppConfig {
            name: name.to_string(),
            models,
        }
    }

    fn model(name: &str, fields: Vec<FieldDef>) -> ModelDef {
        ModelDef {
            name: name.to_string(),
            fields,
        }
    }

    fn catalog(apps: Vec<AppConfig>) -> ModelCatalog {
        ModelCatalog {
            catalog_version: crate::CATALOG_VERSION.to_string(),
            installed_apps: apps,
        }
    }

    #[test]
    fn rejects_dangling_relation() {
        let mut owner = FieldDef::new("owner", FieldType::ForeignKey);
        owner.to = Some("auth.User".to_string());
        let catalog = catalog(vec![app("shop", vec![model("Order", vec![owner])])]);

        let err = validate_catalog(&catalog).expect_err("dangling relation");
        assert!(matches!(err, Error::UnknownModel(_)));
    }

    #[test]
    fn rejects_duplicate_app_labels() {
        let catalog = catalog(vec![
            app("django.contrib.auth", Vec::new()),
            app("legacy.auth", Vec::new()),
        ]);

        let err = validate_catalog(&catalog).expect_err("duplicate label");
        assert!(err.to_string().contains("duplicate app label: auth"));
    }

    #[test]
    fn rejects_unknown_catalog_version() {
        let mut catalog = catalog(Vec::new());
        catalog.catalog_version = "9.9".to_string();

        assert!(matches!(
            validate_catalog(&catalog),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn rejects_relation_without_target() {
        let tags = FieldDef::new("tags", FieldType::ManyToManyField);
        let catalog = catalog(vec![app("blog", vec![model("Post", vec![tags])])]);

        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn accepts_custom_relation_subclass() {
        let mut owner = FieldDef::new("owner", FieldType::from("TreeForeignKey"));
        owner.internal_type = Some(FieldType::ForeignKey);
        owner.to = Some("self".to_string());
        let catalog = catalog(vec![app("tree", vec![model("Node", vec![owner])])]);

        validate_catalog(&catalog).expect("valid catalog");
    }
}
