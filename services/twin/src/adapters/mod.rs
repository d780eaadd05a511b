pub mod db;
pub mod file;

pub use db::SqliteStorage;
pub use file::JsonFileStorage;
