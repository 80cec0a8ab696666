mod apollo;
mod audit;
mod http;

pub use apollo::ApolloSource;
pub use audit::{analyze_html, audit_website, normalize_url};
pub use http::{create_client, HttpPolicy};
