pub mod files;
pub mod health;
pub mod metrics;
pub mod posts;
pub mod users;

pub use files::upload_file;
pub use health::health_check;
pub use metrics::metrics_endpoint;
pub use posts::{create_posts, get_post, list_posts};
pub use users::{get_user_posts, list_users};
