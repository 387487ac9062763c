pub mod env_file;
pub mod memory;

pub use env_file::EnvFileStore;
pub use memory::MemoryConfigStore;
