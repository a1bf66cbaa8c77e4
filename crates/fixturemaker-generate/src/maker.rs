use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use fixturemaker_core::{FieldDef, ModelCatalog, ModelRef, RelationKind};

use crate::defaults::FieldDefaults;
use crate::errors::GenerationError;
use crate::model::{FixtureRecord, GenerationIssue, GenerationReport, MakerOptions, ModelReport};
use crate::output::{DEFAULT_INDENT, to_json_string};

/// Builds fixture records for requested models and the models they relate
/// to.
///
/// Models are visited breadth-first in the order they are discovered; each
/// visited model yields exactly one record.
#[derive(Debug)]
pub struct FixtureMaker<'a> {
    catalog: &'a ModelCatalog,
    defaults: FieldDefaults,
    options: MakerOptions,
    queue: Vec<(ModelRef, usize)>,
    visited: HashSet<ModelRef>,
    built: usize,
    fixtures: Vec<FixtureRecord>,
    report: GenerationReport,
}

impl<'a> FixtureMaker<'a> {
    pub fn new(catalog: &'a ModelCatalog, options: MakerOptions) -> Self {
        Self {
            catalog,
            defaults: FieldDefaults::now(),
            options,
            queue: Vec::new(),
            visited: HashSet::new(),
            built: 0,
            fixtures: Vec::new(),
            report: GenerationReport::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: FieldDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn options(&self) -> &MakerOptions {
        &self.options
    }

    /// Records built so far, in visit order.
    pub fn records(&self) -> &[FixtureRecord] {
        &self.fixtures
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn into_parts(self) -> (Vec<FixtureRecord>, GenerationReport) {
        (self.fixtures, self.report)
    }

    /// Records rendered as a pretty-printed JSON array.
    pub fn fixtures(&self) -> Result<String, GenerationError> {
        to_json_string(&self.fixtures, DEFAULT_INDENT)
    }

    /// Default value of the model's primary key, or null when it has none.
    pub fn get_default_pk(&self, model: ModelRef) -> Value {
        self.catalog
            .model(model)
            .primary_key()
            .map(|field| self.get_default_value(field))
            .unwrap_or(Value::Null)
    }

    pub fn get_default_value(&self, field: &FieldDef) -> Value {
        self.defaults.get_default_value(field)
    }

    /// Resolve requested names to installed models.
    ///
    /// Unknown names are reported and skipped, or rejected in strict mode.
    pub fn get_models<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<Vec<ModelRef>, GenerationError> {
        let lookup = self.catalog.get_models(names);

        for name in &lookup.unknown {
            warn!(event = "unknown_model", model = %name);
            self.report.record_warning(GenerationIssue {
                code: "unknown_model".to_string(),
                message: format!("no installed model named '{name}'"),
                model: Some(name.clone()),
                field: None,
            });
        }
        self.report.unknown_models.extend(lookup.unknown.iter().cloned());

        if self.options.strict && !lookup.unknown.is_empty() {
            return Err(GenerationError::UnknownModels(lookup.unknown));
        }
        if lookup.models.is_empty() {
            return Err(GenerationError::NoModels);
        }

        Ok(lookup.models)
    }

    /// Build records for the named models and every model reachable through
    /// their emitted relations.
    pub fn build_fixtures<S: AsRef<str>>(
        &mut self,
        model_names: &[S],
    ) -> Result<&[FixtureRecord], GenerationError> {
        let roots = self.get_models(model_names)?;

        info!(
            event = "generation_started",
            models = roots.len(),
            use_all_fields = self.options.use_all_fields,
            max_depth = ?self.options.max_depth
        );

        for root in roots {
            if self.visited.insert(root) {
                self.queue.push((root, 0));
            }
        }

        while self.built < self.queue.len() {
            let (model, depth) = self.queue[self.built];
            self.built += 1;
            let record = self.build_fixture(model, depth)?;
            self.fixtures.push(record);
        }

        info!(
            event = "generation_finished",
            records = self.fixtures.len(),
            depth_limited = self.report.depth_limited.len()
        );

        Ok(&self.fixtures)
    }

    /// Build the record for one model, queueing related models that have not
    /// been visited yet.
    ///
    /// The model is marked visited, so a relation back to it is not queued.
    pub fn build_fixture(
        &mut self,
        model: ModelRef,
        depth: usize,
    ) -> Result<FixtureRecord, GenerationError> {
        self.visited.insert(model);
        let catalog = self.catalog;
        let model_def = catalog.model(model);
        let qualified = catalog.qualified_name(model);
        let mut fields = Map::new();
        let mut skipped = 0;

        for field in &model_def.fields {
            if field.primary_key || !field.serialize {
                continue;
            }

            if let Some(kind) = field.relation_kind() {
                if !self.options.use_all_fields && !field.is_required() {
                    skipped += 1;
                    continue;
                }

                let target = catalog.resolve_relation(model, field)?;
                let value = if field.has_default() {
                    self.get_default_value(field)
                } else {
                    let pk = self.get_default_pk(target);
                    if pk.is_null() {
                        self.record_null_reference(&qualified, field, target);
                    }
                    match kind {
                        RelationKind::ManyToMany => Value::Array(vec![pk]),
                        RelationKind::ManyToOne | RelationKind::OneToOne => pk,
                    }
                };
                fields.insert(field.name.clone(), value);
                self.enqueue(target, depth + 1, &qualified, field);
                continue;
            }

            if !self.options.use_all_fields && !field.is_required() {
                skipped += 1;
                continue;
            }

            let value = self.get_default_value(field);
            if value.is_null() {
                skipped += 1;
                continue;
            }
            fields.insert(field.name.clone(), value);
        }

        debug!(
            event = "record_built",
            model = %qualified,
            depth,
            fields = fields.len(),
            skipped
        );

        self.report.models.push(ModelReport {
            model: qualified.clone(),
            depth,
            fields_emitted: fields.len(),
            fields_skipped: skipped,
        });

        Ok(FixtureRecord {
            pk: self.get_default_pk(model),
            model: qualified,
            fields,
        })
    }

    fn record_null_reference(&mut self, from: &str, field: &FieldDef, target: ModelRef) {
        let target_name = self.catalog.qualified_name(target);
        warn!(
            event = "null_reference",
            model = %from,
            field = %field.name,
            target = %target_name
        );
        self.report.record_warning(GenerationIssue {
            code: "null_reference".to_string(),
            message: format!("{target_name} has no primary key to reference"),
            model: Some(from.to_string()),
            field: Some(field.name.clone()),
        });
    }

    fn enqueue(&mut self, target: ModelRef, depth: usize, from: &str, field: &FieldDef) {
        if self.visited.contains(&target) {
            return;
        }

        let target_name = self.catalog.qualified_name(target);
        if self.options.max_depth.is_some_and(|max_depth| depth > max_depth) {
            if !self.report.depth_limited.contains(&target_name) {
                warn!(event = "depth_limited", model = %target_name, referenced_by = %from);
                self.report.record_warning(GenerationIssue {
                    code: "depth_limited".to_string(),
                    message: format!("{target_name} is referenced but beyond max_depth"),
                    model: Some(from.to_string()),
                    field: Some(field.name.clone()),
                });
                self.report.depth_limited.push(target_name);
            }
            return;
        }

        debug!(event = "related_model_queued", model = %target_name, depth);
        self.visited.insert(target);
        self.queue.push((target, depth));
    }
}
