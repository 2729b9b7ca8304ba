//! Statistics over the normalized series: descriptive values, the linear
//! trend and the Mann–Kendall significance test.

pub mod descriptive;
pub mod mann_kendall;
pub mod regression;
pub mod summary;

pub use descriptive::Descriptive;
pub use mann_kendall::{MannKendall, Trend};
pub use regression::LinearFit;
pub use summary::Summary;
