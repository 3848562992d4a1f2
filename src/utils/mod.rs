pub mod cache;
pub mod graph;
pub mod init_layout;
pub mod path;
