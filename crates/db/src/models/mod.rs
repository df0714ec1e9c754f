pub mod account;

pub use account::{Account, AccountChanges, AccountView, ListOrder, NewAccount};
