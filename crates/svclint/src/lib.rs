pub mod closure;
pub mod diagnostics;
pub mod lint;
pub mod model;
pub mod validate;
