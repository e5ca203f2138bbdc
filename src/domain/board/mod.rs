//! Job board view state

mod job_board;

pub use job_board::{JobBoard, RequestTicket};
