#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod arrangement;
mod assembly;
mod batch;
mod catalog;
mod config;
mod connection;
mod errors;
pub mod fastener;
mod geometry;
mod interactions;
mod layout;
mod loading;
pub mod mesh;
mod naming;

pub use arrangement::{ArrangementGrammar, ArrangementPattern, LayoutRule, PatternFamily, RowCounts};
pub use assembly::{
    build_assembly, screw_instance_name, Assembly, InstancePlacement, PartKind, ReferencePoint,
    Rotation, StackGeometry, BOUNDARY_TOLERANCE, FIXED_POINT_SET, LOAD_POINT_SET,
};
pub use batch::{
    generate_batch, parametric_sweep, shear_test_requests, BatchFailure, BatchReport,
    ShearTestCase, SHEAR_TESTS, SHEAR_TEST_GROUPS,
};
pub use catalog::{Catalog, ScrewSpec, SheetSpec};
pub use config::{AmplitudeKind, ExplicitPrecision, GeneratorConfig, JobSettings};
pub use connection::{generate_connection_layout, ConnectionModel, ConnectionRequest};
pub use errors::{CatalogIndexError, ConfigError, ConnectionError, LayoutError, NamingCollisionError};
pub use fastener::FastenerProfile;
pub use geometry::{point, Axis, Plane, Point, Rectangle, SketchPoint};
pub use interactions::{ContactProperty, InstanceNode, Interaction, InteractionGraph};
pub use layout::{
    check_columns, column_offset, longitudinal_planes, place_screws, resolve_layout,
    sheet_outline, staggered_offset, transversal_planes, LayoutParameters, PartitionPlan,
    ResolvedLayout, ScrewInstance,
};
pub use loading::{
    Amplitude, BoundaryCondition, Coupling, DofValues, LoadingPlan, OutputKind, OutputRequest,
    StepDefinition, INITIAL_STEP, LOAD_STEP,
};
pub use mesh::{ElementCode, HoleSeedRegion, MeshTechnique, ScrewSeedPlan, SheetSeedPlan, ELEMENT_CODES};
pub use naming::{tenths, ConnectionName, NameRegistry, NamingKey};
