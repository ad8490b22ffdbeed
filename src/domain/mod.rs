//! Domain logic - pure versioning rules independent of any repository host

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::{detect_change_type, is_breaking_change};
pub use tag::{get_tag_name, TagNamer, DEFAULT_TAG_PREFIX};
pub use version::{increase_version, ChangeClass, Version};
