/// Output canvas assembly and tile orientation
pub mod compositor;
/// Rebuild engine driving every comparison variant
pub mod executor;
/// Active/frozen region tagging for the detail gate
pub mod mask;
/// Source partitioning and nearest-key block matching
pub mod matcher;
/// Three-stage variance-gated refinement
pub mod refiner;
