//! Event dispatch: keydown/keyup handling and held-key timing

mod handler;

pub(crate) use handler::{Dispatcher, HeldState};
