mod health;
mod presets;
mod query;
mod router;
mod templates;
mod validate;

pub use router::{router, AppState};
