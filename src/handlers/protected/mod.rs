// Protected handlers. Every route here sits behind `require_user`, so
// handlers receive the resolved caller as `Extension<CurrentUser>` and pass
// it to the services explicitly.

pub mod notes;
pub mod subjects;
pub mod users;
