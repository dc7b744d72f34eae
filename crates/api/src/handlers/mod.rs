#![forbid(unsafe_code)]

mod admin_ops;
mod stats;
mod submit;
mod surveys;
