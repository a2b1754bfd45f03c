pub mod draft;
pub mod handlers;
pub mod model;
pub mod template;
pub mod totals;
pub mod validation;

pub use draft::{apply_update, apply_updates, DraftError, FieldUpdate};
pub use model::*;
pub use totals::{compute_totals, Totals};
pub use validation::Validator;
