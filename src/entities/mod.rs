pub mod wish;

pub use wish::Entity as WishEntity;
pub use wish::Model as Wish;
