pub mod bundle_output;

use std::sync::Arc;

use subpack_common::NormalizedPackOptions;

pub type SharedOptions = Arc<NormalizedPackOptions>;
