// Handlers module
// Invocation handlers for the function runtime

pub mod posts;

pub use posts::BlogPostsHandler;
