pub mod insights;
pub mod phone;
pub mod reply;
pub mod template;
