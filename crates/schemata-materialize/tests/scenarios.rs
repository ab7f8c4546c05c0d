//! End-to-end scenarios: declarations in, artifacts out.

use schemata_core::decl::{EntityDecl, EnumDecl, FieldDecl, ModelDecl, RelationDecl};
use schemata_core::types::EnumRepr;
use schemata_core::DeclarationSet;
use schemata_materialize::{
    materialize_set, Artifact, MaterializationError, PipelineConfig, RelationalBackend,
};
use schemata_resolve::resolve_set;
use schemata_targets::{TargetConfig, TargetKind, TargetProfile, TargetsConfig};

fn keyed(name: &str) -> ModelDecl {
    ModelDecl::new(name)
        .field(FieldDecl::new("ID", "AutoIncrement"))
        .primary(&["ID"])
}

fn generate(set: &DeclarationSet) -> Vec<Artifact> {
    materialize_set(set, &PipelineConfig::standard())
        .expect("declarations should pass the gate")
        .artifacts
}

fn artifact(artifacts: &[Artifact], target: TargetKind) -> &Artifact {
    artifacts
        .iter()
        .find(|a| a.target == target)
        .expect("artifact for target")
}

#[test]
fn person_has_one_contact_info() {
    let set = DeclarationSet::new()
        .with(
            keyed("Person")
                .field(FieldDecl::new("Name", "String"))
                .relation(RelationDecl::new("ContactInfo", "HasOne")),
        )
        .with(keyed("ContactInfo").field(FieldDecl::new("Email", "String")));
    let artifacts = generate(&set);

    let sql = &artifact(&artifacts, TargetKind::Relational).content;
    assert!(sql.contains("CREATE TABLE people (\n"));
    assert!(sql.contains("    contact_info_id INTEGER,\n"));
    assert!(sql.contains("CREATE INDEX idx_people_contact_info_id ON people (contact_info_id);"));
    assert!(sql.contains(
        "ALTER TABLE people ADD CONSTRAINT fk_people_contact_info_id FOREIGN KEY (contact_info_id) REFERENCES contact_info (id);"
    ));

    let go = &artifact(&artifacts, TargetKind::Go).content;
    assert!(go.contains("ContactInfoID *uint"));
    assert!(go.contains("ContactInfo   *ContactInfo"));

    let ts = &artifact(&artifacts, TargetKind::Typescript).content;
    assert!(ts.contains("  contactInfoId?: number;\n"));
    assert!(ts.contains("  contactInfo?: ContactInfo;\n"));

    assert!(artifacts.iter().all(Artifact::is_complete));
}

#[test]
fn aliased_relations_keep_declared_names() {
    let set = DeclarationSet::new()
        .with(
            keyed("Company")
                .relation(RelationDecl::new("WorkContact", "ForOne").aliased("Contact"))
                .relation(RelationDecl::new("PersonalContact", "ForOne").aliased("Contact")),
        )
        .with(keyed("Contact").field(FieldDecl::new("Phone", "String")));
    let resolution = resolve_set(&set);
    let (schema, unsupported) =
        RelationalBackend::new(TargetProfile::builtin(TargetKind::Relational)).plan(&resolution.graph);
    assert!(unsupported.is_empty());

    let companies = schema.table("companies").expect("companies table");
    for column in ["work_contact_id", "personal_contact_id"] {
        assert!(companies.column(column).expect(column).nullable);
    }
    let fks: Vec<_> = schema.foreign_keys_of("companies").collect();
    assert_eq!(fks.len(), 2);
    assert!(fks.iter().all(|fk| fk.ref_table == "contacts"));
    assert!(!companies.has_column("contact_id"));

    let artifacts = generate(&set);
    let go = &artifact(&artifacts, TargetKind::Go).content;
    assert!(go.contains("WorkContact       *Contact"));
    assert!(go.contains("PersonalContact   *Contact"));
}

#[test]
fn enum_field_uses_lookup_table() {
    let set = DeclarationSet::new()
        .with(
            EnumDecl::new("Nationality", EnumRepr::String)
                .entry("US", "American")
                .entry("DE", "German"),
        )
        .with(keyed("Person").field(FieldDecl::new("Nationality", "Nationality")));
    let artifacts = generate(&set);
    let sql = &artifact(&artifacts, TargetKind::Relational).content;

    assert!(sql.contains("CREATE TABLE nationalities (\n"));
    assert!(sql.contains(
        "INSERT INTO nationalities (id, key, value) VALUES\n    (1, 'US', 'American'),\n    (2, 'DE', 'German');"
    ));
    assert!(sql.contains("    nationality_id INTEGER NOT NULL,\n"));
    assert!(sql.contains("REFERENCES nationalities (id);"));
    assert!(!sql.contains("CREATE TYPE"));
}

#[test]
fn self_referential_unique_for_many() {
    let set = DeclarationSet::new().with(
        keyed("Person").relation(
            RelationDecl::new("Mentors", "ForMany")
                .aliased("Person")
                .unique(),
        ),
    );
    let resolution = resolve_set(&set);
    let (schema, _) =
        RelationalBackend::new(TargetProfile::builtin(TargetKind::Relational)).plan(&resolution.graph);

    let junction = schema.table("person_mentors").expect("junction table");
    let columns: Vec<_> = junction.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["person_id", "mentor_id"]);
    assert_eq!(junction.uniques.len(), 1);
    assert_eq!(junction.uniques[0].columns, vec!["mentor_id"]);
}

#[test]
fn duplicate_identity_blocks_generation() {
    let set = DeclarationSet::new()
        .with(keyed("Animal").discriminator("Kind"))
        .with(ModelDecl::new("Dog").extends("Animal", "dog"))
        .with(ModelDecl::new("Wolf").extends("Animal", "dog"));
    let err = materialize_set(&set, &PipelineConfig::standard()).unwrap_err();
    assert!(matches!(err, MaterializationError::ValidationFailed { .. }));
}

#[test]
fn hierarchy_single_table_and_unions() {
    let set = DeclarationSet::new()
        .with(keyed("Animal").field(FieldDecl::new("Name", "String")).discriminator("Kind"))
        .with(
            ModelDecl::new("Dog")
                .extends("Animal", "dog")
                .field(FieldDecl::new("Breed", "String")),
        )
        .with(ModelDecl::new("Cat").extends("Animal", "cat"));
    let artifacts = generate(&set);

    let sql = &artifact(&artifacts, TargetKind::Relational).content;
    assert!(sql.contains("CHECK (kind IN ('dog', 'cat'))"));
    assert!(sql.contains("CHECK (kind <> 'dog' OR breed IS NOT NULL)"));
    assert!(!sql.contains("CREATE TABLE dogs"));

    let go = &artifact(&artifacts, TargetKind::Go).content;
    assert!(go.contains("func NewAnimal(identity string) (Animal, error) {"));

    let ts = &artifact(&artifacts, TargetKind::Typescript).content;
    assert!(ts.contains("export type Animal = Dog | Cat;"));
    assert!(ts.contains("export function isDog(value: Animal): value is Dog {"));
}

#[test]
fn entity_paths_resolve_identically_twice() {
    let set = DeclarationSet::new()
        .with(
            keyed("Person")
                .field(FieldDecl::new("Name", "String"))
                .relation(RelationDecl::new("ContactInfo", "HasOne")),
        )
        .with(keyed("ContactInfo").field(FieldDecl::new("Email", "String")))
        .with(
            EntityDecl::new("Card")
                .field(FieldDecl::new("ID", "Person.ID"))
                .field(FieldDecl::new("Email", "Person.ContactInfo.Email"))
                .primary(&["ID"]),
        );
    let first = resolve_set(&set);
    let second = resolve_set(&set);
    assert_eq!(first.graph.entity("Card"), second.graph.entity("Card"));

    let artifacts = generate(&set);
    let sql = &artifact(&artifacts, TargetKind::Relational).content;
    assert!(sql.contains("CREATE VIEW cards AS\nSELECT\n    t0.id AS id,\n    t1.email AS email\nFROM people t0\nLEFT JOIN contact_info t1 ON t1.id = t0.contact_info_id;"));
}

#[test]
fn unsupported_construct_spares_sibling_backends() {
    let set = DeclarationSet::new()
        .with(
            ModelDecl::new("Membership")
                .field(FieldDecl::new("PersonID", "Integer"))
                .field(FieldDecl::new("ClubID", "Integer"))
                .primary(&["PersonID", "ClubID"]),
        )
        .with(keyed("Badge").relation(RelationDecl::new("Membership", "ForOne")));
    let output = materialize_set(&set, &PipelineConfig::standard()).expect("gate passes");

    assert_eq!(output.artifacts.len(), 3);
    assert!(artifact(&output.artifacts, TargetKind::Relational).is_complete());
    assert!(artifact(&output.artifacts, TargetKind::Go).is_complete());
    let ts = artifact(&output.artifacts, TargetKind::Typescript);
    assert_eq!(ts.unsupported.len(), 1);
    assert!(ts.content.contains("export interface Membership {"));
    assert!(!output.report.is_complete());
    assert_eq!(output.report.unsupported.len(), 1);
}

#[test]
fn key_type_override_reaches_foreign_keys() {
    let set = DeclarationSet::new()
        .with(keyed("Person").relation(RelationDecl::new("ContactInfo", "HasOne")))
        .with(keyed("ContactInfo").field(FieldDecl::new("Email", "String")));
    let targets = TargetsConfig {
        relational: TargetConfig {
            types: [("AutoIncrement".to_string(), "BIGSERIAL".to_string())]
                .into_iter()
                .collect(),
            ..TargetConfig::default()
        },
        ..TargetsConfig::default()
    };

    let profile = TargetProfile::configured(TargetKind::Relational, &targets.relational)
        .expect("valid override");
    let resolution = resolve_set(&set);
    let (schema, unsupported) = RelationalBackend::new(profile).plan(&resolution.graph);
    assert!(unsupported.is_empty());
    let people = schema.table("people").expect("people table");
    assert_eq!(people.column("id").expect("id").sql_type, "BIGSERIAL");
    assert_eq!(people.column("contact_info_id").expect("fk").sql_type, "BIGINT");
    let contact_info = schema.table("contact_info").expect("contact_info table");
    assert_eq!(contact_info.column("id").expect("id").sql_type, "BIGSERIAL");

    let config = PipelineConfig::from_targets(&targets).expect("valid targets");
    let output = materialize_set(&set, &config).expect("gate passes");
    let sql = &artifact(&output.artifacts, TargetKind::Relational).content;
    assert!(sql.contains("    id BIGSERIAL NOT NULL,\n"));
    assert!(sql.contains("    contact_info_id BIGINT,\n"));
    assert!(!sql.contains(" INTEGER"));

    let go = &artifact(&output.artifacts, TargetKind::Go).content;
    assert!(go.contains("ContactInfoID *uint"));
}
