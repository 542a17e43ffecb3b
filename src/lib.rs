pub mod config;
pub mod logger;
pub mod content;
pub mod checks;
pub mod collection;
pub mod post_list;
pub mod scaffold;
pub mod text_utils;
pub mod view;
mod test_data;
