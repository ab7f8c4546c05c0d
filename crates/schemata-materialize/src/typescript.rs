//! TypeScript backend: interfaces, enums, and discriminated unions in one
//! module.

use schemata_core::graph::field::{Field, FieldType};
use schemata_core::graph::node::{EnumDef, Model};
use schemata_core::graph::relation::Relation;
use schemata_core::naming;
use schemata_core::types::{AtomicType, EnumRepr, RelationKind};
use schemata_core::ModelGraph;
use schemata_targets::{TargetKind, TargetProfile};
use tracing::debug;

use crate::backend::{Artifact, Backend};
use crate::error::UnsupportedConstruct;
use crate::keys;

#[derive(Debug, Clone)]
pub struct TypeScriptBackend {
    profile: TargetProfile,
}

impl TypeScriptBackend {
    pub fn new(profile: TargetProfile) -> Self {
        Self { profile }
    }
}

impl Backend for TypeScriptBackend {
    fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    fn generate(&self, graph: &ModelGraph) -> Artifact {
        let mut generator = Generator {
            graph,
            profile: &self.profile,
            out: String::from("// Generated by schemata. Do not edit.\n\n"),
            declarations: 0,
            unsupported: Vec::new(),
        };
        generator.run();
        let mut content = generator.out.trim_end().to_string();
        content.push('\n');
        Artifact {
            target: TargetKind::Typescript,
            file_name: format!("models.{}", TargetKind::Typescript.extension()),
            content,
            declarations: generator.declarations,
            unsupported: generator.unsupported,
        }
    }
}

struct Member {
    name: String,
    optional: bool,
    ty: String,
}

impl Member {
    fn optional(name: String, ty: String) -> Self {
        Self {
            name,
            optional: true,
            ty,
        }
    }
}

fn ts_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

fn target_of(rel: &Relation) -> Result<&str, String> {
    rel.target_name()
        .ok_or_else(|| format!("relation '{}' has no single target", rel.name))
}

struct Generator<'a> {
    graph: &'a ModelGraph,
    profile: &'a TargetProfile,
    out: String,
    declarations: usize,
    unsupported: Vec<UnsupportedConstruct>,
}

impl<'a> Generator<'a> {
    fn run(&mut self) {
        let graph = self.graph;
        for def in graph.enums() {
            self.enum_def(def);
        }
        for structure in graph.structures() {
            let mut members = Vec::new();
            self.fields_into(&mut members, &structure.name, structure.fields.iter());
            self.write_interface(&self.type_name(&structure.name), None, &members);
            self.declarations += 1;
        }
        for model in graph.models() {
            if keys::is_union(graph, &model.name) {
                self.union_base(model);
            } else {
                self.model(model);
            }
            self.declarations += 1;
        }
        for entity in graph.entities() {
            let mut members = Vec::new();
            self.fields_into(&mut members, &entity.name, entity.fields.iter());
            self.relations_into(&mut members, &entity.name, entity.relations.iter());
            self.write_interface(&self.type_name(&entity.name), None, &members);
            self.declarations += 1;
        }
    }

    fn unsupported(&mut self, declaration: &str, member: Option<&str>, detail: impl Into<String>) {
        let mut u = UnsupportedConstruct::new(TargetKind::Typescript, declaration, detail);
        u.member = member.map(str::to_string);
        self.unsupported.push(u);
    }

    fn type_name(&self, name: &str) -> String {
        self.profile.naming.type_name(name)
    }

    fn member(&self, name: &str) -> String {
        self.profile.naming.member_name(name)
    }

    fn value_type(&self, ty: &FieldType, reference: bool) -> Result<String, String> {
        let map = &self.profile.type_map;
        let mapped = match ty {
            FieldType::Atomic(a) if reference => map.reference_for(*a),
            FieldType::Atomic(a) => map.type_for(*a),
            FieldType::Enum(name) => return Ok(self.type_name(name)),
        };
        mapped.map(str::to_string).map_err(|e| e.to_string())
    }

    fn push_member(&mut self, members: &mut Vec<Member>, declaration: &str, source: &str, member: Member) {
        if members.iter().any(|m| m.name == member.name) {
            let detail = format!("member '{}' is already defined", member.name);
            self.unsupported(declaration, Some(source), detail);
        } else {
            members.push(member);
        }
    }

    fn fields_into<'f>(
        &mut self,
        members: &mut Vec<Member>,
        declaration: &str,
        fields: impl Iterator<Item = &'f Field>,
    ) {
        for field in fields {
            match self.value_type(&field.ty, false) {
                Ok(ty) => {
                    let ty = if field.collection { format!("{ty}[]") } else { ty };
                    let member = Member {
                        name: self.member(&field.name),
                        optional: field.optional,
                        ty,
                    };
                    self.push_member(members, declaration, &field.name, member);
                }
                Err(detail) => self.unsupported(declaration, Some(&field.name), detail),
            }
        }
    }

    fn relations_into<'r>(
        &mut self,
        members: &mut Vec<Member>,
        owner: &str,
        relations: impl Iterator<Item = &'r Relation>,
    ) {
        for rel in relations {
            match self.relation_members(rel) {
                Ok(new) => {
                    for member in new {
                        self.push_member(members, owner, &rel.name, member);
                    }
                }
                Err(detail) => self.unsupported(owner, Some(&rel.name), detail),
            }
        }
    }

    /// The key type of `target`. Composite keys have no member form here.
    fn key_type(&self, target: &str) -> Result<String, String> {
        let key = keys::single_key(self.graph, target)
            .map_err(|detail| format!("foreign key to {target}: {detail}"))?;
        self.value_type(&key.ty, true)
    }

    fn relation_members(&self, rel: &Relation) -> Result<Vec<Member>, String> {
        let name = self.member(&rel.name);
        let singular = naming::camel(&naming::singular_pascal(&rel.name));
        match rel.kind {
            RelationKind::HasOne | RelationKind::ForOne => {
                let target = target_of(rel)?;
                Ok(vec![
                    Member::optional(format!("{name}Id"), self.key_type(target)?),
                    Member::optional(name, self.type_name(target)),
                ])
            }
            RelationKind::HasMany | RelationKind::ForMany => {
                let target = target_of(rel)?;
                Ok(vec![
                    Member::optional(format!("{singular}Ids"), format!("{}[]", self.key_type(target)?)),
                    Member::optional(name, format!("{}[]", self.type_name(target))),
                ])
            }
            RelationKind::HasOnePoly => {
                let target = target_of(rel)?;
                Ok(vec![Member::optional(name, self.type_name(target))])
            }
            RelationKind::HasManyPoly => {
                let target = target_of(rel)?;
                Ok(vec![Member::optional(name, format!("{}[]", self.type_name(target)))])
            }
            RelationKind::ForOnePoly => {
                let candidates = rel.targets();
                let key = keys::shared_key_type(self.graph, &candidates)?;
                let tags: Vec<String> = candidates.iter().map(|c| ts_string(c)).collect();
                let types: Vec<String> = candidates.iter().map(|c| self.type_name(c)).collect();
                Ok(vec![
                    Member::optional(format!("{name}Type"), tags.join(" | ")),
                    Member::optional(format!("{name}Id"), self.value_type(&key, true)?),
                    Member::optional(name, types.join(" | ")),
                ])
            }
            RelationKind::ForManyPoly => {
                let types: Vec<String> = rel.targets().iter().map(|c| self.type_name(c)).collect();
                Ok(vec![Member::optional(name, format!("({})[]", types.join(" | ")))])
            }
        }
    }

    fn write_interface(&mut self, name: &str, extends: Option<&str>, members: &[Member]) {
        match extends {
            Some(base) => self
                .out
                .push_str(&format!("export interface {name} extends {base} {{\n")),
            None => self.out.push_str(&format!("export interface {name} {{\n")),
        }
        for m in members {
            let optional = if m.optional { "?" } else { "" };
            self.out
                .push_str(&format!("  {}{optional}: {};\n", m.name, m.ty));
        }
        self.out.push_str("}\n\n");
    }

    fn enum_def(&mut self, def: &EnumDef) {
        let name = self.type_name(&def.name);
        self.out.push_str(&format!("export enum {name} {{\n"));
        for entry in &def.entries {
            let value = match def.repr {
                EnumRepr::String => ts_string(&entry.value),
                EnumRepr::Integer | EnumRepr::Float => entry.value.trim().to_string(),
            };
            self.out
                .push_str(&format!("  {} = {value},\n", self.type_name(&entry.symbol)));
        }
        self.out.push_str("}\n\n");
        self.declarations += 1;
    }

    fn model(&mut self, model: &'a Model) {
        let graph = self.graph;
        let name = self.type_name(&model.name);
        let mut members = Vec::new();
        let union_base = model.base().filter(|b| keys::is_union(graph, b));
        match union_base {
            Some(base) => {
                if let Some(disc) = graph.model(base).and_then(Model::discriminator) {
                    let ty = match model.identity() {
                        Some(identity) => ts_string(identity),
                        None => self.value_type(&FieldType::Atomic(AtomicType::String), false)
                            .unwrap_or_else(|_| "string".to_string()),
                    };
                    members.push(Member {
                        name: self.member(disc),
                        optional: false,
                        ty,
                    });
                }
                self.fields_into(&mut members, &model.name, model.own_fields());
                self.relations_into(&mut members, &model.name, model.own_relations());
                let base_name = format!("{}Base", self.type_name(base));
                self.write_interface(&name, Some(&base_name), &members);
            }
            None => {
                self.fields_into(&mut members, &model.name, model.fields.iter());
                self.relations_into(&mut members, &model.name, model.relations.iter());
                self.write_interface(&name, None, &members);
            }
        }
        debug!(model = %model.name, members = members.len(), "rendered TypeScript interface");
    }

    /// `<Base>Base`, the union alias, type guards, and a factory.
    fn union_base(&mut self, model: &'a Model) {
        let graph = self.graph;
        let name = self.type_name(&model.name);
        let base_name = format!("{name}Base");
        let discriminator = model.discriminator();

        let mut members = Vec::new();
        let fields = model
            .fields
            .iter()
            .filter(|f| Some(f.name.as_str()) != discriminator);
        self.fields_into(&mut members, &model.name, fields);
        self.relations_into(&mut members, &model.name, model.relations.iter());
        self.write_interface(&base_name, None, &members);

        let Some(hierarchy) = graph.hierarchy(&model.name) else {
            return;
        };
        let variants: Vec<String> = hierarchy
            .variants
            .iter()
            .map(|v| self.type_name(&v.model))
            .collect();
        self.out
            .push_str(&format!("export type {name} = {};\n\n", variants.join(" | ")));

        let Some(disc) = discriminator.map(|d| self.member(d)) else {
            return;
        };
        for variant in &hierarchy.variants {
            let Some(identity) = &variant.identity else {
                continue;
            };
            let variant_name = self.type_name(&variant.model);
            self.out.push_str(&format!(
                "export function is{variant_name}(value: {name}): value is {variant_name} {{\n  return value.{disc} === {};\n}}\n\n",
                ts_string(identity)
            ));
        }
        self.out.push_str(&format!(
            "export function create{name}<K extends {name}[\"{disc}\"]>(\n  {disc}: K,\n  init: Omit<Extract<{name}, {{ {disc}: K }}>, \"{disc}\">,\n): {name} {{\n  return {{ ...init, {disc} }} as {name};\n}}\n\n"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_core::decl::{EnumDecl, FieldDecl, ModelDecl, RelationDecl, StructureDecl};
    use schemata_core::DeclarationSet;
    use schemata_resolve::resolve_set;

    fn generate(set: DeclarationSet) -> Artifact {
        let resolution = resolve_set(&set);
        assert!(resolution.is_clean(), "{:?}", resolution.errors);
        TypeScriptBackend::new(TargetProfile::builtin(TargetKind::Typescript)).generate(&resolution.graph)
    }

    fn keyed(name: &str) -> ModelDecl {
        ModelDecl::new(name)
            .field(FieldDecl::new("ID", "AutoIncrement"))
            .primary(&["ID"])
    }

    #[test]
    fn interface_members() {
        let artifact = generate(
            DeclarationSet::new()
                .with(
                    keyed("Person")
                        .field(FieldDecl::new("Name", "String"))
                        .field(FieldDecl::new("Birthday", "Date").optional())
                        .relation(RelationDecl::new("ContactInfo", "HasOne")),
                )
                .with(keyed("ContactInfo")),
        );
        assert_eq!(artifact.file_name, "models.ts");
        let c = &artifact.content;
        assert!(c.starts_with("// Generated by schemata. Do not edit.\n"));
        assert!(c.contains(
            "export interface Person {\n  id: number;\n  name: string;\n  birthday?: Date;\n  contactInfoId?: number;\n  contactInfo?: ContactInfo;\n}"
        ));
    }

    #[test]
    fn many_relations_are_arrays() {
        let artifact = generate(
            DeclarationSet::new()
                .with(keyed("Person").relation(RelationDecl::new("Addresses", "HasMany").aliased("Address")))
                .with(keyed("Address")),
        );
        let c = &artifact.content;
        assert!(c.contains("  addressIds?: number[];\n"));
        assert!(c.contains("  addresses?: Address[];\n"));
    }

    #[test]
    fn enums_and_structures() {
        let artifact = generate(
            DeclarationSet::new()
                .with(EnumDecl::new("Nationality", EnumRepr::String).entry("American", "US"))
                .with(EnumDecl::new("Priority", EnumRepr::Integer).entry("Low", "1"))
                .with(StructureDecl::new("Point").field(FieldDecl::new("X", "Float"))),
        );
        let c = &artifact.content;
        assert!(c.contains("export enum Nationality {\n  American = \"US\",\n}"));
        assert!(c.contains("export enum Priority {\n  Low = 1,\n}"));
        assert!(c.contains("export interface Point {\n  x: number;\n}"));
        assert_eq!(artifact.declarations, 3);
    }

    #[test]
    fn discriminated_union() {
        let artifact = generate(
            DeclarationSet::new()
                .with(keyed("Animal").field(FieldDecl::new("Name", "String")).discriminator("Kind"))
                .with(
                    ModelDecl::new("Dog")
                        .extends("Animal", "dog")
                        .field(FieldDecl::new("BarkVolume", "Integer")),
                )
                .with(ModelDecl::new("Cat").extends("Animal", "cat")),
        );
        let c = &artifact.content;
        assert!(c.contains("export interface AnimalBase {\n  id: number;\n  name: string;\n}"));
        assert!(c.contains(
            "export interface Dog extends AnimalBase {\n  kind: \"dog\";\n  barkVolume: number;\n}"
        ));
        assert!(c.contains("export type Animal = Dog | Cat;"));
        assert!(c.contains(
            "export function isCat(value: Animal): value is Cat {\n  return value.kind === \"cat\";\n}"
        ));
        assert!(c.contains("export function createAnimal<K extends Animal[\"kind\"]>("));
        assert!(c.contains("  return { ...init, kind } as Animal;"));
    }

    #[test]
    fn polymorphic_for_one() {
        let artifact = generate(
            DeclarationSet::new()
                .with(keyed("Person"))
                .with(keyed("Company"))
                .with(
                    keyed("Vehicle").relation(
                        RelationDecl::new("Owner", "ForOnePoly").for_candidates(&["Person", "Company"]),
                    ),
                ),
        );
        let c = &artifact.content;
        assert!(c.contains("  ownerType?: \"Person\" | \"Company\";\n"));
        assert!(c.contains("  ownerId?: number;\n"));
        assert!(c.contains("  owner?: Person | Company;\n"));
    }

    #[test]
    fn composite_foreign_key_is_unsupported() {
        let artifact = generate(
            DeclarationSet::new()
                .with(
                    ModelDecl::new("Membership")
                        .field(FieldDecl::new("PersonID", "Integer"))
                        .field(FieldDecl::new("ClubID", "Integer"))
                        .primary(&["PersonID", "ClubID"]),
                )
                .with(keyed("Badge").relation(RelationDecl::new("Membership", "ForOne"))),
        );
        assert_eq!(artifact.unsupported.len(), 1);
        let u = &artifact.unsupported[0];
        assert_eq!(u.declaration, "Badge");
        assert_eq!(u.member.as_deref(), Some("Membership"));
        assert!(u.detail.contains("composite"));
        assert!(artifact.content.contains("export interface Badge {\n  id: number;\n}"));
    }
}
