pub use super::categories::Entity as Categories;
pub use super::questions::Entity as Questions;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
