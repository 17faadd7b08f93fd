//! Template archive adapters.

mod memory;
mod tar_gz;

pub use memory::MemoryArchive;
pub use tar_gz::TarGzArchive;
