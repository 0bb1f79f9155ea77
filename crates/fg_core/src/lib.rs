pub mod button;
pub mod character;
pub mod input;
pub mod layout;
pub mod time;
