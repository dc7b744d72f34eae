#![forbid(unsafe_code)]

mod responses;
mod time;

pub(crate) use responses::*;
pub(crate) use time::*;
