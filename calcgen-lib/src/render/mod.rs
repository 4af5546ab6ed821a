//! Generation of the calculator script
//!
//! The artifact is a single self-contained JavaScript file made of two parts:
//!
//! - **Data**: `siteData`, `metricsData`, `benchmarks` and `cardMarkup` constants, each
//!   produced by serializing the model to JSON. JSON is valid JavaScript, so strings with
//!   any mix of quotes embed correctly and values keep their types.
//! - **Logic**: fixed code that inserts the card markup into the page, keeps each slider
//!   in sync with its number input, runs the calculator registered for each card id,
//!   formats the results and looks up their benchmark tier.
//!
//! Card markup is rendered here rather than in the browser, with every interpolated value
//! HTML-escaped.

mod card_markup;
mod script;

pub use script::generate;
