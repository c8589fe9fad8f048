/// Height constraint encoding over planar graph vertices
pub mod constraints;
/// Tile and vertex merging into a planar adjacency graph
pub mod deduplication;
/// Bitset-backed integer domains for constraint solving
pub mod domain;
/// Staged pipeline driver and run configuration
pub mod executor;
/// Extrusion of labeled tiles into 3D slabs
pub mod extrusion;
/// Application and verification of solved heights
pub mod labeling;
/// Solver interface and the bundled propagation solver
pub mod solver;
/// Substitution grammar for thick and thin rhombi
pub mod subdivision;
