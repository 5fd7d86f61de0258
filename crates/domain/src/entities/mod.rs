//! Domain entities

mod blog_post;
mod place;
mod route;
mod session;

pub use blog_post::BlogPost;
pub use place::Place;
pub use route::{RouteStats, RouteSummary};
pub use session::{AuthSession, PersistedSession, UserIdentity};
