pub use super::ipos::Entity as Ipos;
