pub mod event;
pub mod review;
pub mod showtime;
pub mod user;
pub mod venue;

pub use event::Event;
pub use review::Review;
pub use showtime::{ScheduleSlot, TicketSubtotal};
pub use user::{NewUser, User};
pub use venue::Venue;
