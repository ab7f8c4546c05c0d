//! Rules, violations, and the check contract.

use std::fmt;

use schemata_core::ModelGraph;
use serde::Serialize;

/// Every structural rule the validator enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rule {
    MissingPrimaryIdentifier,
    UnknownIdentifierField,
    DuplicateIdentifier,
    DuplicateMember,
    DanglingRelationTarget,
    DanglingInterface,
    AmbiguousAliasTarget,
    DanglingPolymorphicBase,
    DuplicateIdentity,
    MissingIdentity,
    NestedHierarchy,
    UnknownEnumReference,
    EmptyEnum,
    DuplicateEnumValue,
    EnumReprMismatch,
    BrokenIndirectionPath,
    /// A reference error carried over from resolution.
    UnresolvedReference,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One rule failure, located by declaration and member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub declaration: String,
    pub rule: Rule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub message: String,
}

impl Violation {
    pub fn new(declaration: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            rule,
            context: None,
            message: message.into(),
        }
    }

    /// Locate the violation on a field, relation, or entry.
    pub fn at(mut self, member: impl Into<String>) -> Self {
        self.context = Some(member.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{}.{}: [{}] {}", self.declaration, ctx, self.rule, self.message),
            None => write!(f, "{}: [{}] {}", self.declaration, self.rule, self.message),
        }
    }
}

/// A structural check over the graph.
///
/// Object-safe so checks can be stored in `Box<dyn Check>`.
pub trait Check: fmt::Debug + Send + Sync {
    /// Human-readable name of this check.
    fn name(&self) -> &str;

    /// Append every violation found in `graph` to `out`.
    fn run(&self, graph: &ModelGraph, out: &mut Vec<Violation>);
}
