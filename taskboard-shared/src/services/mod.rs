/// Business logic
///
/// Services own the validation rules and orchestrate repositories, the
/// cache and the auth primitives. They know nothing about HTTP; the API
/// crate maps their [`ServiceError`](crate::error::ServiceError)s to
/// responses.
///
/// - [`auth`]: signup, signin, token verification, refresh and profile
/// - [`tasks`]: task CRUD with the cached task list
/// - [`photos`]: profile photo uploads

pub mod auth;
pub mod photos;
pub mod tasks;

pub use auth::AuthService;
pub use photos::PhotoService;
pub use tasks::TaskService;
