mod sanitized_title;
mod search_query;

pub use sanitized_title::SanitizedTitle;
pub use search_query::SearchQuery;
