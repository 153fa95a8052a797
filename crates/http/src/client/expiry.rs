//! Session-expiry notification
//!
//! When a session cannot be recovered the client clears stored credentials
//! and then hands control to the host through [`SessionExpiryHandler`]. A web
//! shell navigates to the login route, a terminal shell prints a prompt, and
//! tests record the call.

/// Host hook invoked once a session has been torn down
pub trait SessionExpiryHandler: Send + Sync {
    /// Called after stored credentials are cleared; `login_route` is where
    /// the host should send the user next.
    fn session_expired(&self, login_route: &str);
}

/// Default handler: records the expiry and leaves navigation to the caller
#[derive(Debug, Default, Clone, Copy)]
pub struct LogExpiryHandler;

impl SessionExpiryHandler for LogExpiryHandler {
    fn session_expired(&self, login_route: &str) {
        info!(login_route, "Session expired, sign-in required");
    }
}

/// Adapter for closures
pub struct FnExpiryHandler<F>(pub F);

impl<F> SessionExpiryHandler for FnExpiryHandler<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn session_expired(&self, login_route: &str) {
        (self.0)(login_route);
    }
}
