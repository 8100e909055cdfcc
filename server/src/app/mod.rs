mod startup;
mod state;

pub(crate) use startup::start;
pub(crate) use state::AppState;
