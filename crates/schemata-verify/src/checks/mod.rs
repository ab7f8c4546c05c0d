//! The standard checks.

pub mod entities;
pub mod enums;
pub mod identifiers;
pub mod members;
pub mod polymorphism;
pub mod relations;

pub use entities::EntityPathCheck;
pub use enums::EnumCheck;
pub use identifiers::IdentifierCheck;
pub use members::MemberCheck;
pub use polymorphism::PolymorphismCheck;
pub use relations::RelationCheck;
