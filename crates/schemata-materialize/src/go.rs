//! Go backend: one source file of structs, typed enums, and hierarchy
//! interfaces.
//!
//! Relations render as a key member (`ContactInfoID *uint`) next to the
//! navigable member (`ContactInfo *ContactInfo`). A polymorphic hierarchy
//! renders as an interface, a `<Base>Base` struct embedded by every
//! variant, and a `New<Base>` constructor switching on the identity.

use std::collections::BTreeSet;

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

const UUID_IMPORT: &str = "github.com/google/uuid";

#[derive(Debug, Clone)]
pub struct GoBackend {
    profile: TargetProfile,
}

impl GoBackend {
    pub fn new(profile: TargetProfile) -> Self {
        Self { profile }
    }
}

impl Backend for GoBackend {
    fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    fn generate(&self, graph: &ModelGraph) -> Artifact {
        let mut generator = Generator {
            graph,
            profile: &self.profile,
            imports: BTreeSet::new(),
            body: String::new(),
            interfaces: Vec::new(),
            declarations: 0,
            unsupported: Vec::new(),
        };
        generator.run();
        let content = generator.render_file();
        Artifact {
            target: TargetKind::Go,
            file_name: format!("{}.{}", self.profile.package, TargetKind::Go.extension()),
            content,
            declarations: generator.declarations,
            unsupported: generator.unsupported,
        }
    }
}

struct Member {
    name: String,
    ty: String,
    tag: String,
}

struct StructDef {
    name: String,
    embeds: Vec<String>,
    members: Vec<Member>,
}

impl StructDef {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            embeds: Vec::new(),
            members: Vec::new(),
        }
    }

    fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }
}

/// A marker interface for a `For*Poly` relation and the types implementing
/// it.
struct PolyInterface {
    name: String,
    owner: String,
    implementors: Vec<String>,
}

fn go_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    format!("\"{escaped}\"")
}

fn tag(name: &str, omitempty: bool) -> String {
    if omitempty {
        format!("{name},omitempty")
    } else {
        name.to_string()
    }
}

fn target_of(rel: &Relation) -> Result<&str, String> {
    rel.target_name()
        .ok_or_else(|| format!("relation '{}' has no single target", rel.name))
}

struct Generator<'a> {
    graph: &'a ModelGraph,
    profile: &'a TargetProfile,
    imports: BTreeSet<&'static str>,
    body: String,
    interfaces: Vec<PolyInterface>,
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
            let mut def = StructDef::new(self.type_name(&structure.name));
            self.fields_into(&mut def, &structure.name, structure.fields.iter());
            self.write_struct(&def);
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
        self.poly_interfaces();
        for entity in graph.entities() {
            let mut def = StructDef::new(self.type_name(&entity.name));
            self.fields_into(&mut def, &entity.name, entity.fields.iter());
            self.relations_into(&mut def, &entity.name, entity.relations.iter());
            self.write_struct(&def);
            self.declarations += 1;
        }
    }

    fn render_file(&self) -> String {
        let mut out = String::from("// Code generated by schemata. DO NOT EDIT.\n\n");
        out.push_str(&format!("package {}\n\n", self.profile.package));
        if !self.imports.is_empty() {
            let (std, third): (Vec<&str>, Vec<&str>) =
                self.imports.iter().copied().partition(|path| !path.contains('.'));
            out.push_str("import (\n");
            for path in &std {
                out.push_str(&format!("\t\"{path}\"\n"));
            }
            if !std.is_empty() && !third.is_empty() {
                out.push('\n');
            }
            for path in &third {
                out.push_str(&format!("\t\"{path}\"\n"));
            }
            out.push_str(")\n\n");
        }
        out.push_str(&self.body);
        let mut content = out.trim_end().to_string();
        content.push('\n');
        content
    }

    fn unsupported(&mut self, declaration: &str, member: Option<&str>, detail: impl Into<String>) {
        let mut u = UnsupportedConstruct::new(TargetKind::Go, declaration, detail);
        u.member = member.map(str::to_string);
        self.unsupported.push(u);
    }

    fn type_name(&self, name: &str) -> String {
        self.profile.naming.type_name(name)
    }

    fn member(&self, name: &str) -> String {
        self.profile.naming.member_name(name)
    }

    /// Record the import a qualified type such as `time.Time` needs.
    fn note_imports(&mut self, ty: &str) {
        let bare = ty.trim_start_matches(|c: char| matches!(c, '[' | ']' | '*'));
        match bare.split_once('.').map(|(pkg, _)| pkg) {
            Some("time") => {
                self.imports.insert("time");
            }
            Some("uuid") => {
                self.imports.insert(UUID_IMPORT);
            }
            _ => {}
        }
    }

    fn atomic_type(&mut self, atomic: AtomicType) -> Result<String, String> {
        let ty = self
            .profile
            .type_map
            .type_for(atomic)
            .map_err(|e| e.to_string())?
            .to_string();
        self.note_imports(&ty);
        Ok(ty)
    }

    fn key_type(&mut self, ty: &FieldType) -> Result<String, String> {
        match ty {
            FieldType::Atomic(a) => {
                let ty = self
                    .profile
                    .type_map
                    .reference_for(*a)
                    .map_err(|e| e.to_string())?
                    .to_string();
                self.note_imports(&ty);
                Ok(ty)
            }
            FieldType::Enum(name) => Ok(self.type_name(name)),
        }
    }

    fn field_type(&mut self, field: &Field) -> Result<String, String> {
        let base = match &field.ty {
            FieldType::Atomic(a) => self.atomic_type(*a)?,
            FieldType::Enum(name) => self.type_name(name),
        };
        Ok(if field.collection {
            format!("[]{base}")
        } else if field.optional && !base.starts_with("[]") {
            format!("*{base}")
        } else {
            base
        })
    }

    fn push_member(&mut self, def: &mut StructDef, declaration: &str, source: &str, member: Member) {
        if def.has_member(&member.name) {
            let detail = format!("member '{}' is already defined on {}", member.name, def.name);
            self.unsupported(declaration, Some(source), detail);
        } else {
            def.members.push(member);
        }
    }

    fn fields_into<'f>(
        &mut self,
        def: &mut StructDef,
        declaration: &str,
        fields: impl Iterator<Item = &'f Field>,
    ) {
        for field in fields {
            match self.field_type(field) {
                Ok(ty) => {
                    let member = Member {
                        name: self.member(&field.name),
                        ty,
                        tag: tag(&naming::camel(&field.name), field.optional || field.collection),
                    };
                    self.push_member(def, declaration, &field.name, member);
                }
                Err(detail) => self.unsupported(declaration, Some(&field.name), detail),
            }
        }
    }

    fn relations_into<'r>(
        &mut self,
        def: &mut StructDef,
        owner: &str,
        relations: impl Iterator<Item = &'r Relation>,
    ) {
        for rel in relations {
            match self.relation_members(owner, rel) {
                Ok(members) => {
                    for member in members {
                        self.push_member(def, owner, &rel.name, member);
                    }
                }
                Err(detail) => self.unsupported(owner, Some(&rel.name), detail),
            }
        }
    }

    /// Type of a navigable member pointing at `target`: the interface for a
    /// hierarchy base, a pointer otherwise.
    fn target_ref(&self, target: &str) -> String {
        if keys::is_union(self.graph, target) {
            self.type_name(target)
        } else {
            format!("*{}", self.type_name(target))
        }
    }

    /// The key member of a relation: `<Rel>ID` for one, `<Singular>IDs` for
    /// many. Composite keys use the target's key struct.
    fn key_member(&mut self, rel: &str, target: &str, many: bool) -> Result<Member, String> {
        let graph = self.graph;
        let key = keys::primary_key(graph, target);
        let singular = naming::singular_pascal(rel);
        match key.as_slice() {
            [] => Err(format!("'{target}' has no primary identifier")),
            [field] => {
                let ty = self.key_type(&field.ty)?;
                Ok(if many {
                    Member {
                        name: format!("{}IDs", self.member(&singular)),
                        ty: format!("[]{ty}"),
                        tag: tag(&format!("{}Ids", naming::camel(&singular)), true),
                    }
                } else {
                    Member {
                        name: format!("{}ID", self.member(rel)),
                        ty: format!("*{ty}"),
                        tag: tag(&format!("{}Id", naming::camel(rel)), true),
                    }
                })
            }
            _ => {
                let key_struct = format!("{}Key", self.type_name(target));
                Ok(if many {
                    Member {
                        name: format!("{}Keys", self.member(&singular)),
                        ty: format!("[]{key_struct}"),
                        tag: tag(&format!("{}Keys", naming::camel(&singular)), true),
                    }
                } else {
                    Member {
                        name: format!("{}Key", self.member(rel)),
                        ty: format!("*{key_struct}"),
                        tag: tag(&format!("{}Key", naming::camel(rel)), true),
                    }
                })
            }
        }
    }

    fn relation_members(&mut self, owner: &str, rel: &Relation) -> Result<Vec<Member>, String> {
        let navigable = |name: String, ty: String| Member {
            tag: tag(&naming::camel(&name), true),
            name,
            ty,
        };
        match rel.kind {
            RelationKind::HasOne | RelationKind::ForOne => {
                let target = target_of(rel)?;
                let key = self.key_member(&rel.name, target, false)?;
                Ok(vec![key, navigable(self.member(&rel.name), self.target_ref(target))])
            }
            RelationKind::HasMany | RelationKind::ForMany => {
                let target = target_of(rel)?;
                let key = self.key_member(&rel.name, target, true)?;
                let ty = format!("[]{}", self.target_ref(target));
                Ok(vec![key, navigable(self.member(&rel.name), ty)])
            }
            RelationKind::HasOnePoly => {
                let target = target_of(rel)?;
                Ok(vec![navigable(self.member(&rel.name), self.target_ref(target))])
            }
            RelationKind::HasManyPoly => {
                let target = target_of(rel)?;
                let ty = format!("[]{}", self.target_ref(target));
                Ok(vec![navigable(self.member(&rel.name), ty)])
            }
            RelationKind::ForOnePoly | RelationKind::ForManyPoly => {
                let graph = self.graph;
                let candidates = rel.targets();
                let iface = format!("{}{}", self.type_name(owner), self.member(&rel.name));
                let implementors = candidates
                    .iter()
                    .map(|c| {
                        if keys::is_union(graph, c) {
                            format!("{}Base", self.type_name(c))
                        } else {
                            self.type_name(c)
                        }
                    })
                    .collect();
                let mut members = Vec::new();
                if rel.kind == RelationKind::ForOnePoly {
                    let key = keys::shared_key_type(graph, &candidates)?;
                    let key = self.key_type(&key)?;
                    let name = self.member(&rel.name);
                    members.push(Member {
                        name: format!("{name}Type"),
                        ty: "*string".to_string(),
                        tag: tag(&format!("{}Type", naming::camel(&rel.name)), true),
                    });
                    members.push(Member {
                        name: format!("{name}ID"),
                        ty: format!("*{key}"),
                        tag: tag(&format!("{}Id", naming::camel(&rel.name)), true),
                    });
                    members.push(navigable(name, iface.clone()));
                } else {
                    members.push(navigable(self.member(&rel.name), format!("[]{iface}")));
                }
                self.interfaces.push(PolyInterface {
                    name: iface,
                    owner: owner.to_string(),
                    implementors,
                });
                Ok(members)
            }
        }
    }

    fn write_struct(&mut self, def: &StructDef) {
        let out = &mut self.body;
        out.push_str(&format!("type {} struct {{\n", def.name));
        for embed in &def.embeds {
            out.push_str(&format!("\t{embed}\n"));
        }
        let name_width = def.members.iter().map(|m| m.name.len()).max().unwrap_or(0);
        let type_width = def.members.iter().map(|m| m.ty.len()).max().unwrap_or(0);
        for m in &def.members {
            out.push_str(&format!(
                "\t{:name_width$} {:type_width$} `json:\"{}\"`\n",
                m.name, m.ty, m.tag
            ));
        }
        out.push_str("}\n\n");
    }

    fn enum_def(&mut self, def: &EnumDef) {
        let repr = match self.atomic_type(def.repr.atomic()) {
            Ok(ty) => ty,
            Err(detail) => {
                self.unsupported(&def.name, None, detail);
                return;
            }
        };
        let name = self.type_name(&def.name);
        self.body.push_str(&format!("type {name} {repr}\n\n"));
        if !def.entries.is_empty() {
            let consts: Vec<(String, String)> = def
                .entries
                .iter()
                .map(|e| {
                    let value = match def.repr {
                        EnumRepr::String => go_string(&e.value),
                        EnumRepr::Integer | EnumRepr::Float => e.value.trim().to_string(),
                    };
                    (format!("{name}{}", self.member(&e.symbol)), value)
                })
                .collect();
            let width = consts.iter().map(|(c, _)| c.len()).max().unwrap_or(0);
            self.body.push_str("const (\n");
            for (constant, value) in &consts {
                self.body
                    .push_str(&format!("\t{constant:width$} {name} = {value}\n"));
            }
            self.body.push_str(")\n\n");
        }
        self.declarations += 1;
    }

    fn model(&mut self, model: &'a Model) {
        let graph = self.graph;
        let name = self.type_name(&model.name);
        let mut def = StructDef::new(&name);
        let union_base = model.base().filter(|b| keys::is_union(graph, b));
        if let Some(base) = union_base {
            def.embeds.push(format!("{}Base", self.type_name(base)));
            self.fields_into(&mut def, &model.name, model.own_fields());
            self.relations_into(&mut def, &model.name, model.own_relations());
        } else {
            self.fields_into(&mut def, &model.name, model.fields.iter());
            self.relations_into(&mut def, &model.name, model.relations.iter());
        }
        self.write_struct(&def);

        if union_base.is_some() {
            let identity = model.identity().unwrap_or_default();
            self.body.push_str(&format!(
                "func (*{name}) Identity() string {{\n\treturn {}\n}}\n\n",
                go_string(identity)
            ));
        } else {
            self.key_struct(model, &name);
        }
        debug!(model = %model.name, members = def.members.len(), "rendered Go struct");
    }

    /// `<Model>Key` and its `Key()` accessor, for composite primary keys.
    fn key_struct(&mut self, model: &Model, receiver: &str) {
        let key = model.primary_fields();
        if key.len() < 2 {
            return;
        }
        let key_name = format!("{}Key", self.type_name(&model.name));
        let mut def = StructDef::new(&key_name);
        for field in &key {
            match self.key_type(&field.ty) {
                Ok(ty) => def.members.push(Member {
                    name: self.member(&field.name),
                    ty,
                    tag: tag(&naming::camel(&field.name), false),
                }),
                Err(detail) => {
                    self.unsupported(&model.name, Some(&field.name), detail);
                    return;
                }
            }
        }
        self.write_struct(&def);
        let recv = receiver
            .chars()
            .next()
            .map(|c| c.to_ascii_lowercase())
            .unwrap_or('m');
        let assignments: Vec<String> = def
            .members
            .iter()
            .map(|m| format!("{0}: {recv}.{0}", m.name))
            .collect();
        self.body.push_str(&format!(
            "func ({recv} *{receiver}) Key() {key_name} {{\n\treturn {key_name}{{{}}}\n}}\n\n",
            assignments.join(", ")
        ));
    }

    /// The interface, shared base struct, and constructor of a hierarchy.
    fn union_base(&mut self, model: &'a Model) {
        let graph = self.graph;
        let name = self.type_name(&model.name);
        let base_name = format!("{name}Base");

        self.body.push_str(&format!(
            "// {name} is implemented by every variant of {name}.\ntype {name} interface {{\n\tBase() *{base_name}\n\tIdentity() string\n}}\n\n"
        ));

        let mut def = StructDef::new(&base_name);
        self.fields_into(&mut def, &model.name, model.fields.iter());
        self.relations_into(&mut def, &model.name, model.relations.iter());
        self.write_struct(&def);
        self.body.push_str(&format!(
            "func (b *{base_name}) Base() *{base_name} {{\n\treturn b\n}}\n\n"
        ));
        self.key_struct(model, &base_name);

        let Some(hierarchy) = graph.hierarchy(&model.name) else {
            return;
        };
        let discriminator = model
            .discriminator()
            .and_then(|d| model.field(d))
            .filter(|f| f.ty == FieldType::Atomic(AtomicType::String) && !f.optional)
            .map(|f| self.member(&f.name));

        self.imports.insert("fmt");
        let mut ctor = format!(
            "// New{name} returns an empty {name} variant for an identity.\nfunc New{name}(identity string) ({name}, error) {{\n\tswitch identity {{\n"
        );
        for variant in &hierarchy.variants {
            let Some(identity) = &variant.identity else {
                continue;
            };
            let literal = go_string(identity);
            let init = match &discriminator {
                Some(field) => format!("{base_name}: {base_name}{{{field}: {literal}}}"),
                None => String::new(),
            };
            ctor.push_str(&format!(
                "\tcase {literal}:\n\t\treturn &{}{{{init}}}, nil\n",
                self.type_name(&variant.model)
            ));
        }
        ctor.push_str(&format!(
            "\tdefault:\n\t\treturn nil, fmt.Errorf(\"unknown {name} identity %q\", identity)\n\t}}\n}}\n\n"
        ));
        self.body.push_str(&ctor);
    }

    fn poly_interfaces(&mut self) {
        let interfaces = std::mem::take(&mut self.interfaces);
        for iface in &interfaces {
            self.body.push_str(&format!(
                "// {} is the {} side of a polymorphic relation, implemented by {}.\ntype {} interface {{\n\tis{}()\n}}\n\n",
                iface.name,
                iface.owner,
                iface.implementors.join(", "),
                iface.name,
                iface.name
            ));
            for implementor in &iface.implementors {
                self.body
                    .push_str(&format!("func (*{implementor}) is{}() {{}}\n", iface.name));
            }
            self.body.push('\n');
        }
    }
}
