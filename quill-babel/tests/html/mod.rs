//! HTML rendering tests

mod render;
