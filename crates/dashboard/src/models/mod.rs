//! Domain types for the dashboard.
//!
//! These types represent validated domain objects separate from database row
//! types; repositories map rows into them and surface bad stored data as
//! `RepositoryError::DataCorruption`.

pub mod brand;
pub mod category;
pub mod menu_item;
pub mod order;
pub mod payment;
pub mod session;
pub mod user;

pub use brand::Brand;
pub use category::Category;
pub use menu_item::{MenuItem, SubItem};
pub use order::{CustomerContact, Order, OrderLine};
pub use payment::PaymentRecord;
pub use session::{CurrentUser, session_keys};
pub use user::User;
