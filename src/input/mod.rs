//! Base resource input and flattening
pub mod flatten;
pub mod resource;

pub use flatten::{
    FlatMap,
    MAX_ARRAY_INDEX,
    RESERVED_PATH_CHARS,
    flatten,
    leaf_count,
    unflatten,
};
pub use resource::{
    ResourceError,
    load_resource_file,
};
