#![forbid(unsafe_code)]

mod store;

pub use store::{
    CategoryCount, SqliteStore, StoreError, StoreStats, SubmitSurveyRequest, SurveyRecord,
};
