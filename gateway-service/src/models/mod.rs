pub mod post;

pub use post::{find_post, parse_post_id, take_first, user_id_matches, PAGE_SIZE};
