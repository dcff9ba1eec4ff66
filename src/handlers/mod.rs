pub mod admin;
pub mod friends;
pub mod info;
pub mod login;
pub mod params;
pub mod pets;
pub mod quotes;
