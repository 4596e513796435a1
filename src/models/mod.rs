//! Data-access models.

mod entrepreneurs;

pub use entrepreneurs::{Entrepreneur, EntrepreneurFilter, EntrepreneurUpdate, EntrepreneursModel};
