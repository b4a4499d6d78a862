//! API endpoint implementations.

mod metadata;
mod records;

pub use metadata::MetadataApi;
pub use records::{
    ComplexSearch, DEFAULT_LIMIT, KNOWN_FILTER_OPERATORS, ListQuery, OrderDirection, RecordsApi,
    SearchFilter,
};
