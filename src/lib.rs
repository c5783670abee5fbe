pub mod api;
pub mod contracts;
pub mod counter;
pub mod guard;
pub mod naming;
pub mod upstream;
