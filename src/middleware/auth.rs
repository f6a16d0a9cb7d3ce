//! Authentication middleware
//!
//! Role gate for bot pages. Every [`Route`] carries the roles allowed to
//! open it; [`guard`] decides whether a chat's session may proceed.

use std::fmt;
use tracing::{debug, warn};
use crate::models::Role;
use crate::state::Session;
use crate::utils::errors::{Event360Error, Result};

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
    Denied { role: Role, required: Vec<Role> },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Decide access for a session. An empty `required_roles` admits any
/// authenticated user.
pub fn guard(session: Option<&Session>, required_roles: &[Role]) -> Access {
    let session = match session {
        Some(session) => session,
        None => return Access::RedirectToLogin,
    };

    if required_roles.is_empty() || session.has_any_role(required_roles) {
        Access::Granted
    } else {
        Access::Denied {
            role: session.role(),
            required: required_roles.to_vec(),
        }
    }
}

const ORGANIZERS: &[Role] = &[Role::Organizer, Role::Admin];
const ADMINS: &[Role] = &[Role::Admin];

/// Pages reachable from the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Events,
    EventDetails,
    Login,
    Register,
    Help,
    Dashboard,
    Profile,
    Tickets,
    Orders,
    Wishlist,
    Notifications,
    Buy,
    RegisterForEvent,
    Review,
    CreateEvent,
    MyEvents,
    CheckIn,
    AdminPanel,
    Users,
    Approvals,
    Statistics,
    OrdersOverview,
    Tools,
}

impl Route {
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Home | Route::Events | Route::EventDetails | Route::Login | Route::Register | Route::Help
        )
    }

    /// Roles allowed on this route; empty for any signed-in user
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Route::CreateEvent | Route::MyEvents | Route::CheckIn => ORGANIZERS,
            Route::AdminPanel
            | Route::Users
            | Route::Approvals
            | Route::Statistics
            | Route::OrdersOverview
            | Route::Tools => ADMINS,
            _ => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Events => "events",
            Route::EventDetails => "event_details",
            Route::Login => "login",
            Route::Register => "register",
            Route::Help => "help",
            Route::Dashboard => "dashboard",
            Route::Profile => "profile",
            Route::Tickets => "tickets",
            Route::Orders => "orders",
            Route::Wishlist => "wishlist",
            Route::Notifications => "notifications",
            Route::Buy => "buy",
            Route::RegisterForEvent => "register_for_event",
            Route::Review => "review",
            Route::CreateEvent => "create_event",
            Route::MyEvents => "my_events",
            Route::CheckIn => "check_in",
            Route::AdminPanel => "admin",
            Route::Users => "users",
            Route::Approvals => "approvals",
            Route::Statistics => "statistics",
            Route::OrdersOverview => "orders_overview",
            Route::Tools => "tools",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guard a route; public routes always pass
pub fn check(session: Option<&Session>, route: Route) -> Access {
    if route.is_public() {
        return Access::Granted;
    }
    guard(session, route.required_roles())
}

/// Session required by a protected route, or the error to show instead
pub fn authorize(session: Option<Session>, route: Route) -> Result<Session> {
    match check(session.as_ref(), route) {
        Access::Granted => session.ok_or(Event360Error::NotAuthenticated),
        Access::RedirectToLogin => {
            debug!(route = %route, "Unauthenticated access, redirecting to login");
            Err(Event360Error::NotAuthenticated)
        }
        Access::Denied { role, required } => {
            warn!(route = %route, role = %role, required = ?required, "Access denied");
            Err(Event360Error::PermissionDenied(format!("{} requires one of {:?}", route, required)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn session(role: Role) -> Session {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1, "username": "u", "email": "u@example.com", "role": role.as_str()
        }))
        .unwrap();
        Session::new(1, "token", user)
    }

    #[test]
    fn test_unauthenticated_redirects() {
        assert_eq!(guard(None, &[]), Access::RedirectToLogin);
        assert_eq!(guard(None, ADMINS), Access::RedirectToLogin);
        assert_eq!(check(None, Route::Dashboard), Access::RedirectToLogin);
    }

    #[test]
    fn test_empty_set_admits_any_role() {
        for role in Role::ALL {
            assert!(guard(Some(&session(role)), &[]).is_granted());
        }
    }

    #[test]
    fn test_role_sets() {
        let attendee = session(Role::Attendee);
        let organizer = session(Role::Organizer);
        let admin = session(Role::Admin);

        assert_eq!(
            check(Some(&attendee), Route::CreateEvent),
            Access::Denied { role: Role::Attendee, required: vec![Role::Organizer, Role::Admin] }
        );
        assert!(check(Some(&organizer), Route::CreateEvent).is_granted());
        assert!(check(Some(&admin), Route::CheckIn).is_granted());
        assert!(!check(Some(&organizer), Route::Approvals).is_granted());
        assert!(check(Some(&admin), Route::Statistics).is_granted());
    }

    #[test]
    fn test_public_routes_need_no_session() {
        for route in [Route::Home, Route::Events, Route::EventDetails, Route::Login, Route::Register, Route::Help] {
            assert!(check(None, route).is_granted());
        }
    }

    #[test]
    fn test_authorize_errors() {
        assert!(matches!(authorize(None, Route::Tickets), Err(Event360Error::NotAuthenticated)));
        assert!(matches!(
            authorize(Some(session(Role::Attendee)), Route::AdminPanel),
            Err(Event360Error::PermissionDenied(_))
        ));
        assert_eq!(authorize(Some(session(Role::Admin)), Route::Users).unwrap().user.id, 1);
    }
}
