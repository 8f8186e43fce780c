pub mod store;

#[cfg(test)]
pub mod testing;

pub use store::{PgTopicStore, TopicStore, build_topic_store};
