pub mod calendar;
pub mod rent;
pub mod rent_buffer;
