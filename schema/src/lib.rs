// Guardian Battle Schema - shared plain-data definitions
// Elements, skill-effect descriptors and roster rows used by the engine
// crate and by whatever layer feeds it combatants.

pub use elements::*;
pub use roster::*;
pub use skill_types::*;

pub mod elements;
pub mod roster;
pub mod skill_types;
