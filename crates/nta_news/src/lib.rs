pub mod newsdata;

pub use newsdata::NewsDataClient;

pub mod prelude {
    pub use super::newsdata::NewsDataClient;
    pub use nta_core::{Article, NewsQuery, NewsSource, Result, Error};
}
