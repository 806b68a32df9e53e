pub mod profile;
pub mod skill;
pub mod user;
pub mod vacancy;
