//! Integration tests: full pool → combinations → history pipeline against
//! an in-memory draw source and temporary directories.

mod mock_fetcher;
mod pipeline;
