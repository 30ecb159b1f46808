pub mod metrics;
pub mod posts_store;
pub mod storage;
pub mod uploads;
pub mod upstream;

pub use metrics::{get_metrics, init_metrics};
pub use posts_store::PostsStore;
pub use storage::{LocalStorage, Storage};
pub use upstream::UpstreamClient;
