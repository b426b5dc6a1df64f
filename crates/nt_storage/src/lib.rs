pub mod backends;
pub mod dataset;

pub use backends::*;
pub use dataset::Dataset;

pub mod prelude {
    pub use super::backends::*;
    pub use super::Dataset;
    pub use nt_core::{ArticleStore, UserSignalStore};
}
