pub mod accounts;

pub use accounts::Entity as Accounts;
