pub mod indexmap;
pub mod path_ext;
pub mod request;
pub mod xxhash;
