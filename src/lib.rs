pub mod error;
pub mod graph;
pub mod layout;
pub mod persistence;
pub mod task;
pub(crate) mod task_validation;

pub use error::{Diagnostic, NetworkError, NetworkResult};
pub use graph::builder::{BuiltNetwork, NetworkBuilder, build_network};
pub use graph::{
    Activity, ActivityArc, ActivityNetwork, BuildConfig, DummyActivity, DummyKind, Event,
    NameIndex, NetworkGraph, RealActivity,
};
pub use layout::{LayeredLayout, Layout, LayoutConfig, NodePosition, layout_network};
pub use persistence::{LoadError, load_tasks_from_csv, load_tasks_from_json};
pub use task::{Task, pert_duration};
