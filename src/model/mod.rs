pub mod error;
pub mod lengths;
pub mod profile;
pub mod quality;

pub use error::{error_base, error_seq};
pub use lengths::LengthDistribution;
pub use profile::DistributionProfile;
pub use quality::{QualityModel, QUALITY_SYMBOLS};
