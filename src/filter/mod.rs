pub mod coerce;
pub mod company;
pub mod error;
pub mod job;
pub mod types;

pub use coerce::coerce_query_params;
pub use company::company_filter;
pub use error::FilterError;
pub use job::job_filter;
pub use types::{FilterParams, WhereClause};
