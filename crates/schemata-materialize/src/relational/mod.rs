//! Relational backend: PostgreSQL DDL.
//!
//! - Models become tables; a polymorphic hierarchy shares its base's table
//!   (single-table inheritance) with a discriminator `CHECK`.
//! - Enums become lookup tables `(id, key, value)`; enum fields reference
//!   them through `<field>_id`.
//! - Relations become key columns, junction tables, or polymorphic
//!   `(<iface>_type, <iface>_id)` pairs.
//! - Entities become views joined along their pre-walked paths.
//!
//! Foreign keys are emitted after every table exists.

pub mod ddl;
pub mod namer;

use std::collections::HashSet;

use schemata_core::graph::field::{Field, FieldType, Identifier, IndirectionPath, PathStep};
use schemata_core::graph::node::{EnumDef, Entity, Hierarchy, Model};
use schemata_core::graph::relation::Relation;
use schemata_core::naming;
use schemata_core::types::{AtomicType, EnumRepr, RelationKind};
use schemata_core::ModelGraph;
use schemata_targets::{TargetKind, TargetProfile};
use tracing::debug;

use self::ddl::{
    ident, literal, Column, ForeignKey, Index, LookupRows, Schema, Table, UniqueConstraint, View,
};
use self::namer::{ConstraintKind, ConstraintNamer};
use crate::backend::{Artifact, Backend};
use crate::error::UnsupportedConstruct;
use crate::keys;

/// Column type of lookup-table ids and the columns referencing them.
const LOOKUP_KEY_TYPE: &str = "INTEGER";

#[derive(Debug, Clone)]
pub struct RelationalBackend {
    profile: TargetProfile,
}

impl RelationalBackend {
    pub fn new(profile: TargetProfile) -> Self {
        Self { profile }
    }

    /// Plan the schema of `graph` without rendering it.
    pub fn plan(&self, graph: &ModelGraph) -> (Schema, Vec<UnsupportedConstruct>) {
        let mut planner = Planner {
            graph,
            profile: &self.profile,
            namer: ConstraintNamer::new(self.profile.identifier_limit),
            schema: Schema::default(),
            junctions: HashSet::new(),
            unsupported: Vec::new(),
        };
        planner.run();
        (planner.schema, planner.unsupported)
    }
}

impl Backend for RelationalBackend {
    fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    fn generate(&self, graph: &ModelGraph) -> Artifact {
        let (schema, unsupported) = self.plan(graph);
        let mut content =
            String::from("-- Generated by schemata. Do not edit.\n-- Target: relational (PostgreSQL)\n\n");
        content.push_str(&schema.render());
        Artifact {
            target: TargetKind::Relational,
            file_name: format!("schema.{}", TargetKind::Relational.extension()),
            content,
            declarations: graph.enums().len() + graph.models().len() + schema.views.len(),
            unsupported,
        }
    }
}

/// One column of a reference: `column` on the referencing table holds
/// `ref_column` of the referenced table.
struct KeyRef {
    column: String,
    sql_type: String,
    ref_column: String,
}

/// A view join, keyed by the relation names leading to it.
struct Join {
    key: Vec<String>,
    alias: String,
    sql: String,
}

struct Planner<'a> {
    graph: &'a ModelGraph,
    profile: &'a TargetProfile,
    namer: ConstraintNamer,
    schema: Schema,
    junctions: HashSet<String>,
    unsupported: Vec<UnsupportedConstruct>,
}

fn target_of(rel: &Relation) -> Result<&str, String> {
    rel.target_name()
        .ok_or_else(|| format!("relation '{}' has no single target", rel.name))
}

impl<'a> Planner<'a> {
    fn run(&mut self) {
        let graph = self.graph;
        for def in graph.enums() {
            self.lookup_table(def);
        }
        for model in graph.models() {
            if graph.storage_model(&model.name) == model.name {
                self.model_table(model);
            }
        }
        for model in graph.models() {
            for rel in model.own_relations() {
                if let Err(detail) = self.relation(model, rel) {
                    self.unsupported(&model.name, Some(&rel.name), detail);
                }
            }
        }
        for entity in graph.entities() {
            self.view(entity);
        }
    }

    fn unsupported(&mut self, declaration: &str, member: Option<&str>, detail: impl Into<String>) {
        let mut u = UnsupportedConstruct::new(TargetKind::Relational, declaration, detail);
        u.member = member.map(str::to_string);
        self.unsupported.push(u);
    }

    fn member(&self, name: &str) -> String {
        self.profile.naming.member_name(name)
    }

    fn table_of(&self, model: &str) -> String {
        self.profile
            .naming
            .type_name(self.graph.storage_model(model))
    }

    fn column_of(&self, field: &Field) -> String {
        match field.ty {
            FieldType::Atomic(_) => self.member(&field.name),
            FieldType::Enum(_) => format!("{}_id", self.member(&field.name)),
        }
    }

    fn reference_type(&self, field: &Field) -> Result<String, String> {
        match &field.ty {
            FieldType::Atomic(a) => self
                .profile
                .type_map
                .reference_for(*a)
                .map(str::to_string)
                .map_err(|e| e.to_string()),
            FieldType::Enum(_) => Ok(LOOKUP_KEY_TYPE.to_string()),
        }
    }

    /// Columns referencing the primary key of `target`: `<prefix>_id` for a
    /// single key, `<prefix>_<key column>` per field of a composite key.
    fn key_refs(&self, prefix: &str, target: &str) -> Result<Vec<KeyRef>, String> {
        let key = keys::primary_key(self.graph, target);
        if key.is_empty() {
            return Err(format!("'{target}' has no primary identifier"));
        }
        let composite = key.len() > 1;
        key.into_iter()
            .map(|field| {
                let ref_column = self.column_of(field);
                let column = if composite {
                    format!("{prefix}_{ref_column}")
                } else {
                    format!("{prefix}_id")
                };
                Ok(KeyRef {
                    column,
                    sql_type: self.reference_type(field)?,
                    ref_column,
                })
            })
            .collect()
    }

    fn index(&mut self, table: &str, columns: Vec<String>) {
        let name = self.namer.name(ConstraintKind::Index, table, &columns);
        self.schema.indexes.push(Index {
            name,
            table: table.to_string(),
            columns,
        });
    }

    fn foreign_key(&mut self, table: &str, columns: Vec<String>, ref_table: String, ref_columns: Vec<String>) {
        let name = self.namer.name(ConstraintKind::ForeignKey, table, &columns);
        self.schema.foreign_keys.push(ForeignKey {
            name,
            table: table.to_string(),
            columns,
            ref_table,
            ref_columns,
        });
    }

    fn unique(&mut self, table: &mut Table, columns: Vec<String>) {
        let name = self.namer.name(ConstraintKind::Unique, &table.name, &columns);
        table.uniques.push(UniqueConstraint { name, columns });
    }

    fn lookup_table(&mut self, def: &EnumDef) {
        let map = &self.profile.type_map;
        let (key_type, value_type) = match (
            map.type_for(AtomicType::String),
            map.type_for(def.repr.atomic()),
        ) {
            (Ok(k), Ok(v)) => (k.to_string(), v.to_string()),
            (Err(e), _) | (_, Err(e)) => {
                self.unsupported(&def.name, None, e.to_string());
                return;
            }
        };
        let name = self.profile.naming.type_name(&def.name);
        let mut table = Table::new(&name, &def.name);
        table.columns = vec![
            Column::new("id", LOOKUP_KEY_TYPE, false),
            Column::new("key", key_type, false),
            Column::new("value", value_type, false),
        ];
        table.primary_key = vec!["id".to_string()];
        self.unique(&mut table, vec!["key".to_string()]);

        let rows = def
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let value = match def.repr {
                    EnumRepr::String => literal(&entry.value),
                    EnumRepr::Integer | EnumRepr::Float => entry.value.trim().to_string(),
                };
                (i + 1, literal(&entry.symbol), value)
            })
            .collect();
        debug!(table = %name, entries = def.entries.len(), "planned lookup table");
        self.schema.tables.push(table);
        self.schema.lookups.push(LookupRows { table: name, rows });
    }

    /// Add the column of `field` to `table`. Enum fields also get a foreign
    /// key to their lookup table.
    fn field_column(&mut self, table: &mut Table, declaration: &str, field: &Field, nullable: bool) {
        let column = self.column_of(field);
        let sql_type = match &field.ty {
            FieldType::Atomic(a) => match self.profile.type_map.type_for(*a) {
                Ok(t) => t.to_string(),
                Err(e) => {
                    self.unsupported(declaration, Some(&field.name), e.to_string());
                    return;
                }
            },
            FieldType::Enum(_) => LOOKUP_KEY_TYPE.to_string(),
        };
        if let Some(existing) = table.column(&column) {
            if existing.sql_type != sql_type {
                let detail = format!(
                    "column '{column}' already exists on '{}' with type {}",
                    table.name, existing.sql_type
                );
                self.unsupported(declaration, Some(&field.name), detail);
            }
            return;
        }
        table.columns.push(Column::new(&column, sql_type, nullable));
        if let FieldType::Enum(enum_name) = &field.ty {
            let ref_table = self.profile.naming.type_name(enum_name);
            self.foreign_key(&table.name, vec![column], ref_table, vec!["id".to_string()]);
        }
    }

    fn identifier_unique(&mut self, table: &mut Table, model: &Model, id: &Identifier) {
        let columns: Vec<String> = id
            .fields
            .iter()
            .filter_map(|f| model.field(f))
            .map(|f| self.column_of(f))
            .collect();
        if !columns.is_empty() {
            self.unique(table, columns);
        }
    }

    fn model_table(&mut self, model: &'a Model) {
        let graph = self.graph;
        let name = self.table_of(&model.name);
        let mut table = Table::new(&name, &model.name);
        for field in &model.fields {
            self.field_column(&mut table, &model.name, field, field.optional);
        }
        table.primary_key = model
            .primary_fields()
            .into_iter()
            .map(|f| self.column_of(f))
            .collect();
        for id in model.identifiers.iter().filter(|i| !i.is_primary()) {
            self.identifier_unique(&mut table, model, id);
        }
        if let Some(hierarchy) = graph.hierarchy(&model.name).filter(|_| model.is_base()) {
            self.single_table(&mut table, model, hierarchy);
        }
        debug!(table = %name, model = %model.name, columns = table.columns.len(), "planned table");
        self.schema.tables.push(table);
    }

    /// Fold every subclass into the base table: subclass columns are
    /// nullable, with one presence check per required subclass field.
    fn single_table(&mut self, table: &mut Table, base: &Model, hierarchy: &'a Hierarchy) {
        let graph = self.graph;
        let Some(discriminator) = base.discriminator() else {
            return;
        };
        let disc = match base.field(discriminator) {
            Some(f) => self.column_of(f),
            None => self.member(discriminator),
        };
        let identities = hierarchy.identities();
        if !identities.is_empty() {
            let values: Vec<String> = identities.iter().map(|i| literal(i)).collect();
            table
                .checks
                .push(format!("{} IN ({})", ident(&disc), values.join(", ")));
        }

        for variant in &hierarchy.variants {
            let Some(sub) = graph.model(&variant.model) else {
                continue;
            };
            for field in sub.own_fields() {
                self.field_column(table, &sub.name, field, true);
                if let (false, Some(identity)) = (field.optional, &variant.identity) {
                    table.checks.push(format!(
                        "{} <> {} OR {} IS NOT NULL",
                        ident(&disc),
                        literal(identity),
                        ident(&self.column_of(field))
                    ));
                }
            }
            for id in sub
                .identifiers
                .iter()
                .filter(|i| !i.is_primary() && base.identifier(&i.name).is_none())
            {
                self.identifier_unique(table, sub, id);
            }
        }
    }

    fn relation(&mut self, owner: &'a Model, rel: &'a Relation) -> Result<(), String> {
        let graph = self.graph;
        let owner_table = self.table_of(&owner.name);
        match rel.kind {
            RelationKind::HasOne | RelationKind::ForOne => {
                let target = target_of(rel)?;
                let keys = self.key_refs(&self.member(&rel.name), target)?;
                let target_table = self.table_of(target);
                self.reference(&owner_table, &keys, target_table)
            }
            RelationKind::HasMany => {
                let target = target_of(rel)?;
                match graph.back_references(target, &owner.name).len() {
                    0 => {
                        let prefix = self.has_many_prefix(owner, rel);
                        let keys = self.key_refs(&prefix, &owner.name)?;
                        let target_table = self.table_of(target);
                        self.reference(&target_table, &keys, owner_table)
                    }
                    1 => Ok(()),
                    n => Err(format!(
                        "'{target}' declares {n} ForOne relations back to '{}'; the inverse is ambiguous",
                        owner.name
                    )),
                }
            }
            RelationKind::ForMany => self.junction(owner, rel),
            RelationKind::ForOnePoly | RelationKind::ForManyPoly => {
                self.polymorphic_pair(&owner_table, rel)
            }
            RelationKind::HasOnePoly | RelationKind::HasManyPoly => Ok(()),
        }
    }

    /// Column prefix of the key a `HasMany` places on its target:
    /// `<owner>`, or `<owner>_<relation>` when the owner has several
    /// `HasMany` relations to that target.
    fn has_many_prefix(&self, owner: &Model, rel: &Relation) -> String {
        let siblings = owner
            .relations
            .iter()
            .filter(|r| r.kind == RelationKind::HasMany && r.target_name() == rel.target_name())
            .count();
        if siblings > 1 {
            format!("{}_{}", self.member(&owner.name), self.member(&rel.name))
        } else {
            self.member(&owner.name)
        }
    }

    /// Add nullable key columns to `table`, index them, and reference
    /// `ref_table`.
    fn reference(&mut self, table: &str, keys: &[KeyRef], ref_table: String) -> Result<(), String> {
        let t = self
            .schema
            .table_mut(table)
            .ok_or_else(|| format!("table '{table}' was not planned"))?;
        if let Some(k) = keys.iter().find(|k| t.has_column(&k.column)) {
            return Err(format!("column '{}' already exists on '{table}'", k.column));
        }
        for k in keys {
            t.columns.push(Column::new(&k.column, &k.sql_type, true));
        }
        let columns: Vec<String> = keys.iter().map(|k| k.column.clone()).collect();
        let ref_columns: Vec<String> = keys.iter().map(|k| k.ref_column.clone()).collect();
        self.index(table, columns.clone());
        self.foreign_key(table, columns, ref_table, ref_columns);
        Ok(())
    }

    /// `ForMany` junction table. Reciprocal `ForMany` pairs share one table
    /// named after the sorted pair of relation names.
    fn junction(&mut self, owner: &'a Model, rel: &'a Relation) -> Result<(), String> {
        let graph = self.graph;
        let target = target_of(rel)?;
        let reciprocal = graph.model(target).and_then(|t| {
            t.relations.iter().find(|r| {
                r.kind == RelationKind::ForMany
                    && r.target_name() == Some(owner.name.as_str())
                    && !(t.name == owner.name && r.name == rel.name)
            })
        });
        let name = match reciprocal {
            Some(other) => {
                let mut pair = [self.member(&rel.name), self.member(&other.name)];
                pair.sort();
                pair.join("_")
            }
            None => format!("{}_{}", self.member(&owner.name), self.member(&rel.name)),
        };
        if self.junctions.contains(&name) {
            return Ok(());
        }
        if self.schema.table(&name).is_some() {
            return Err(format!("junction table '{name}' collides with an existing table"));
        }

        let owner_prefix = self.member(&owner.name);
        let mut target_prefix = self.member(&naming::singular_pascal(&rel.name));
        if target_prefix == owner_prefix {
            target_prefix = format!("related_{target_prefix}");
        }
        let owner_keys = self.key_refs(&owner_prefix, &owner.name)?;
        let target_keys = self.key_refs(&target_prefix, target)?;

        let mut table = Table::new(&name, format!("{}.{}", owner.name, rel.name));
        for k in owner_keys.iter().chain(&target_keys) {
            table.columns.push(Column::new(&k.column, &k.sql_type, false));
        }
        table.primary_key = table.columns.iter().map(|c| c.name.clone()).collect();

        let owner_cols: Vec<String> = owner_keys.iter().map(|k| k.column.clone()).collect();
        let target_cols: Vec<String> = target_keys.iter().map(|k| k.column.clone()).collect();
        if rel.unique {
            self.unique(&mut table, target_cols.clone());
        } else {
            self.index(&name, target_cols.clone());
        }
        if reciprocal.is_some_and(|r| r.unique) {
            self.unique(&mut table, owner_cols.clone());
        }
        debug!(table = %name, relation = %rel.name, "planned junction table");
        self.schema.tables.push(table);
        self.junctions.insert(name.clone());

        let owner_table = self.table_of(&owner.name);
        let target_table = self.table_of(target);
        self.foreign_key(
            &name,
            owner_cols,
            owner_table,
            owner_keys.into_iter().map(|k| k.ref_column).collect(),
        );
        self.foreign_key(
            &name,
            target_cols,
            target_table,
            target_keys.into_iter().map(|k| k.ref_column).collect(),
        );
        Ok(())
    }

    /// `For*Poly`: a type tag plus a key shared by every candidate.
    fn polymorphic_pair(&mut self, owner_table: &str, rel: &Relation) -> Result<(), String> {
        let iface = self.member(&rel.name);
        let key_type = keys::shared_key_type(self.graph, &rel.targets())?;
        let id_type = match key_type {
            FieldType::Atomic(a) => self
                .profile
                .type_map
                .reference_for(a)
                .map_err(|e| e.to_string())?
                .to_string(),
            FieldType::Enum(_) => LOOKUP_KEY_TYPE.to_string(),
        };
        let tag_type = self
            .profile
            .type_map
            .type_for(AtomicType::String)
            .map_err(|e| e.to_string())?
            .to_string();
        let columns = vec![format!("{iface}_type"), format!("{iface}_id")];

        let t = self
            .schema
            .table_mut(owner_table)
            .ok_or_else(|| format!("table '{owner_table}' was not planned"))?;
        if let Some(c) = columns.iter().find(|c| t.has_column(c)) {
            return Err(format!("column '{c}' already exists on '{owner_table}'"));
        }
        t.columns.push(Column::new(&columns[0], tag_type, true));
        t.columns.push(Column::new(&columns[1], id_type, true));
        self.index(owner_table, columns);
        Ok(())
    }

    fn view(&mut self, entity: &'a Entity) {
        let graph = self.graph;
        let roots = entity.roots();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => {
                self.unsupported(&entity.name, None, "no field is sourced from a Model path");
                return;
            }
            _ => {
                let detail = format!("fields are rooted at several Models ({})", roots.join(", "));
                self.unsupported(&entity.name, None, detail);
                return;
            }
        };

        let mut joins: Vec<Join> = Vec::new();
        let mut columns = Vec::new();
        for field in &entity.fields {
            let Some(path) = &field.source else {
                self.unsupported(&entity.name, Some(&field.name), "field has no indirection path");
                continue;
            };
            let column = self.join_path(path, &mut joins).and_then(|alias| {
                let terminal = graph
                    .model(path.terminal_model())
                    .and_then(|m| m.field(&path.terminal))
                    .ok_or_else(|| format!("terminal of '{}' not found", path.dotted()))?;
                Ok(format!(
                    "{alias}.{} AS {}",
                    ident(&self.column_of(terminal)),
                    ident(&self.member(&field.name))
                ))
            });
            match column {
                Ok(c) => columns.push(c),
                Err(detail) => self.unsupported(&entity.name, Some(&field.name), detail),
            }
        }
        if columns.is_empty() {
            return;
        }

        let name = self.profile.naming.type_name(&entity.name);
        debug!(view = %name, joins = joins.len(), "planned view");
        self.schema.views.push(View {
            name,
            source: entity.name.clone(),
            columns,
            from: format!("{} t0", ident(&self.table_of(root))),
            joins: joins.into_iter().map(|j| j.sql).collect(),
        });
    }

    /// Join along `path`, reusing joins already made for a shared prefix.
    /// Returns the alias of the terminal table. Nothing is added to `joins`
    /// unless every step can be joined.
    fn join_path(&self, path: &IndirectionPath, joins: &mut Vec<Join>) -> Result<String, String> {
        let mut alias = "t0".to_string();
        let mut key: Vec<String> = Vec::new();
        let mut pending: Vec<Join> = Vec::new();
        for step in &path.steps {
            key.push(step.relation.clone());
            if let Some(existing) = joins.iter().chain(&pending).find(|j| j.key == key) {
                alias = existing.alias.clone();
                continue;
            }
            let next = format!("t{}", joins.len() + pending.len() + 1);
            let on = self.join_condition(step, &alias, &next)?;
            pending.push(Join {
                key: key.clone(),
                alias: next.clone(),
                sql: format!("LEFT JOIN {} {next} ON {on}", ident(&self.table_of(&step.to))),
            });
            alias = next;
        }
        joins.append(&mut pending);
        Ok(alias)
    }

    fn join_condition(&self, step: &PathStep, from: &str, to: &str) -> Result<String, String> {
        let conditions: Vec<String> = match step.kind {
            RelationKind::HasOne | RelationKind::ForOne => self
                .key_refs(&self.member(&step.relation), &step.to)?
                .iter()
                .map(|k| format!("{to}.{} = {from}.{}", ident(&k.ref_column), ident(&k.column)))
                .collect(),
            RelationKind::HasMany => {
                let graph = self.graph;
                let owner = graph
                    .model(&step.from)
                    .ok_or_else(|| format!("'{}' not found", step.from))?;
                let rel = owner
                    .relation(&step.relation)
                    .ok_or_else(|| format!("'{}.{}' not found", step.from, step.relation))?;
                let prefix = match graph.back_references(&step.to, &step.from).as_slice() {
                    [] => self.has_many_prefix(owner, rel),
                    [inverse] => self.member(&inverse.name),
                    _ => {
                        return Err(format!(
                            "the inverse of '{}.{}' is ambiguous",
                            step.from, step.relation
                        ))
                    }
                };
                self.key_refs(&prefix, &step.from)?
                    .iter()
                    .map(|k| format!("{to}.{} = {from}.{}", ident(&k.column), ident(&k.ref_column)))
                    .collect()
            }
            other => return Err(format!("a {other} step cannot be joined in a view")),
        };
        Ok(conditions.join(" AND "))
    }
}
