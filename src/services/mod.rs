pub mod action;
pub mod auth_service;
pub mod profile_skill_service;
pub mod vacancy_service;
pub mod vacancy_skill_service;
