//! Library half of the `quill` binary: the inspect transforms, shared with
//! the integration tests.

pub mod transforms;
