//! Domain models shared between the marketplace client and backend mocks

pub mod course;
pub mod custom_page;
pub mod permission;
pub mod role;

pub use course::{Course, CourseCreate, CourseUpdate};
pub use custom_page::CustomPage;
pub use permission::Permission;
pub use role::Role;
