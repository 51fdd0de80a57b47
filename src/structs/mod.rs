pub mod cup;
pub mod cup_icon;
pub mod profile;
pub mod theme;
