/// Time between COM target scans, in seconds.
///
/// Selection is O(targets) per scan rather than per physics step, and reusing the last
/// choice between scans keeps near-tied candidates from flickering.
pub const SCAN_INTERVAL_SECS: f32 = 0.1;

/// Arrival buffer (meters). Inside it a COM stops pushing toward its goal, and a scan
/// switches from the interception point to the target itself.
pub const ARRIVAL_BUFFER: f32 = 2.0;

/// Candidates further than this above or below the agent are airborne or falling and are
/// not chased (meters).
pub const VERTICAL_BUFFER: f32 = 2.0;

/// Distance past the target, along the zone→target line, where the interception segment
/// starts (meters). Keeps the aim point outside the target's own collider.
pub const INTERCEPT_OFFSET: f32 = 2.0;

/// Length of the interception segment (meters).
pub const INTERCEPT_LENGTH: f32 = 2.0;

/// Sideways distance of a deflection point from the target (meters).
pub const DEFLECT_DISTANCE: f32 = 2.0;

/// Collision radius assumed for target objects when probing for a wrong-side bump (meters).
pub const TARGET_RADIUS: f32 = 0.5;

/// Default arena center. Agents face it on spawn.
pub const ARENA_CENTER: [f32; 3] = [0.0, 1.0, 0.0];

/// Default play radius of the circular arena (meters).
pub const ARENA_RADIUS: f32 = 21.0;

/// Maximum number of player zones in an arena.
pub const MAX_ZONES: usize = 4;

/// Minimum planar motion required to update yaw.
pub const YAW_EPS: f32 = 1.0e-6;
