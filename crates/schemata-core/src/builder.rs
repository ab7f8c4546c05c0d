//! Construction API for the Intermediate Model Graph.
//!
//! The resolver assembles a [`ModelGraph`] through `GraphBuilder`; tests use
//! the chained form to set up fixtures directly.
//!
//! ```rust
//! use schemata_core::builder::GraphBuilder;
//! use schemata_core::graph::field::Field;
//! use schemata_core::graph::node::Model;
//! use schemata_core::types::AtomicType;
//!
//! let mut person = Model::new("Person");
//! person.fields.push(Field::atomic("ID", AtomicType::AutoIncrement));
//!
//! let graph = GraphBuilder::new().model(person).build();
//! assert_eq!(graph.models().len(), 1);
//! ```

use crate::graph::node::{EnumDef, Entity, Hierarchy, Model, Structure};
use crate::graph::ModelGraph;

/// Accumulates resolved declarations and freezes them into a graph.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ModelGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: Model) {
        self.graph.models.push(model);
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.graph.entities.push(entity);
    }

    pub fn add_enum(&mut self, enum_def: EnumDef) {
        self.graph.enums.push(enum_def);
    }

    pub fn add_structure(&mut self, structure: Structure) {
        self.graph.structures.push(structure);
    }

    pub fn add_hierarchy(&mut self, hierarchy: Hierarchy) {
        self.graph.hierarchies.push(hierarchy);
    }

    /// Mutable access to a Model added earlier.
    pub fn model_mut(&mut self, name: &str) -> Option<&mut Model> {
        self.graph.models.iter_mut().find(|m| m.name == name)
    }

    pub fn model(mut self, model: Model) -> Self {
        self.add_model(model);
        self
    }

    pub fn entity(mut self, entity: Entity) -> Self {
        self.add_entity(entity);
        self
    }

    pub fn enum_def(mut self, enum_def: EnumDef) -> Self {
        self.add_enum(enum_def);
        self
    }

    pub fn structure(mut self, structure: Structure) -> Self {
        self.add_structure(structure);
        self
    }

    pub fn hierarchy(mut self, hierarchy: Hierarchy) -> Self {
        self.add_hierarchy(hierarchy);
        self
    }

    /// Freeze the graph.
    pub fn build(self) -> ModelGraph {
        self.graph
    }
}
