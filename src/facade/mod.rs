mod store;

pub use store::{QueryParams, Store};
