//! Ability definitions and registry: the seam to card content.

mod definition;
mod registry;

pub use definition::{
    AbilityDefinition, AbilityKind, ChoosingPlayer, ControllerFilter, CostDirective, TargetCount,
    TargetResolver,
};
pub use registry::AbilityRegistry;
