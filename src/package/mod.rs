pub mod location;
pub mod version;

pub use location::PackageLocation;
pub use version::{UpdateClassification, VersionComparator};
