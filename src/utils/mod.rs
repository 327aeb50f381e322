pub mod paths;
pub mod text;

pub use paths::decode_project_name;
pub use text::truncate_with_ellipsis;
