// Models module

pub mod event;
pub mod post;
pub mod response;
pub mod search;

// Re-export commonly used types
pub use event::GatewayEvent;
pub use post::BlogPost;
pub use response::{ApiResponse, ResponseBody};
pub use search::{SearchRequest, SortOrder};
