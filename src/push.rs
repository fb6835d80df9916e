pub mod channel;
pub mod ticket;

pub use channel::{CloseSource, PushChannel};
pub use ticket::TicketService;
