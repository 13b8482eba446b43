/*!
Collision root module.

Implements the collision-aware movement resolver shared by every agent, using
parry3d (through rapier3d) for shape casts against immutable arena walls. The
code is split for clarity:

- types:        shared data types (CapsuleSpec, ProbeHit, BodyState, math aliases)
- settings:     resolver constants and tunables
- narrow_phase: thin wrappers over parry3d shape casts
- walls:        wall definitions, the built `WallSet`, and the `CollisionProbe` seam
- resolver:     probe-and-slide step resolution
*/

pub mod narrow_phase;
pub mod resolver;
pub mod settings;
pub mod types;
pub mod walls;

// Re-export commonly used types and functions.
pub use resolver::{StepResolution, resolve_step};
pub use settings::ResolverSettings;
pub use types::{BodyState, CapsuleSpec, Iso, ProbeHit, Quat, Vec2, Vec3};
pub use walls::{CollisionProbe, WallDef, WallSet, WallShapeDef, vertical_plane_wall};
