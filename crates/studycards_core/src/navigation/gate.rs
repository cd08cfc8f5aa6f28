//! Navigation graph selection and the session gate state machine.

use crate::model::session::Session;
use crate::navigation::screen::{Screen, ANONYMOUS_SCREENS, AUTHENTICATED_SCREENS};
use crate::service::auth_service::AuthProvider;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Navigation graph the host should mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationGraph {
    /// Auth state unresolved; render nothing.
    Blank,
    Authenticated { entry: Screen },
    Anonymous { entry: Screen },
}

impl NavigationGraph {
    /// Screens reachable inside this graph.
    pub fn screens(self) -> &'static [Screen] {
        match self {
            Self::Blank => &[],
            Self::Authenticated { .. } => AUTHENTICATED_SCREENS,
            Self::Anonymous { .. } => ANONYMOUS_SCREENS,
        }
    }

    pub fn entry(self) -> Option<Screen> {
        match self {
            Self::Blank => None,
            Self::Authenticated { entry } | Self::Anonymous { entry } => Some(entry),
        }
    }

    pub fn contains(self, screen: Screen) -> bool {
        self.screens().contains(&screen)
    }

    /// Short label used in logs and FFI envelopes.
    pub fn label(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Authenticated { .. } => "authenticated",
            Self::Anonymous { .. } => "anonymous",
        }
    }
}

/// Selects the navigation graph for `session`.
pub fn select_navigation_graph(session: &Session) -> NavigationGraph {
    if session.loading {
        return NavigationGraph::Blank;
    }
    match session.user {
        Some(_) => NavigationGraph::Authenticated {
            entry: Screen::CardList,
        },
        None => NavigationGraph::Anonymous {
            entry: Screen::Login,
        },
    }
}

/// Graph change reported by `SessionGate::observe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTransition {
    pub from: NavigationGraph,
    pub to: NavigationGraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Sign-out was invoked outside the authenticated graph.
    SignOutUnavailable { current: NavigationGraph },
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignOutUnavailable { current } => write!(
                f,
                "sign-out is only available from the authenticated graph (current: {})",
                current.label()
            ),
        }
    }
}

impl Error for NavigationError {}

/// Reactive holder of the active navigation graph.
///
/// Starts `Blank`; every change comes from `observe`.
#[derive(Debug)]
pub struct SessionGate {
    current: NavigationGraph,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            current: NavigationGraph::Blank,
        }
    }

    pub fn current(&self) -> NavigationGraph {
        self.current
    }

    /// Re-evaluates the graph for `session`.
    ///
    /// Returns the transition when the graph changed, `None` otherwise.
    pub fn observe(&mut self, session: &Session) -> Option<GateTransition> {
        let next = select_navigation_graph(session);
        if next == self.current {
            return None;
        }
        let transition = GateTransition {
            from: self.current,
            to: next,
        };
        self.current = next;
        info!(
            "event=nav_transition module=navigation status=ok from={} to={}",
            transition.from.label(),
            transition.to.label()
        );
        Some(transition)
    }

    /// Runs the card list header sign-out action.
    ///
    /// Asks `auth` to log out, then re-reads its session.
    ///
    /// # Errors
    /// - `SignOutUnavailable` when the gate is not in the authenticated graph;
    ///   the provider is left untouched.
    pub fn sign_out<A: AuthProvider + ?Sized>(
        &mut self,
        auth: &mut A,
    ) -> Result<Option<GateTransition>, NavigationError> {
        if !matches!(self.current, NavigationGraph::Authenticated { .. }) {
            return Err(NavigationError::SignOutUnavailable {
                current: self.current,
            });
        }
        auth.logout();
        Ok(self.observe(&auth.session()))
    }
}

#[cfg(test)]
mod tests {
    use super::{select_navigation_graph, NavigationError, NavigationGraph, SessionGate};
    use crate::model::session::{Identity, Session};
    use crate::navigation::screen::Screen;
    use crate::service::auth_service::AuthProvider;
    use uuid::Uuid;

    struct FakeAuth {
        session: Session,
        logout_calls: usize,
    }

    impl AuthProvider for FakeAuth {
        fn session(&self) -> Session {
            self.session.clone()
        }

        fn logout(&mut self) {
            self.logout_calls += 1;
            self.session.user = None;
        }
    }

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn loading_is_blank_regardless_of_user() {
        let mut session = Session::loading();
        assert_eq!(select_navigation_graph(&session), NavigationGraph::Blank);
        session.user = Some(identity());
        assert_eq!(select_navigation_graph(&session), NavigationGraph::Blank);
        assert!(NavigationGraph::Blank.screens().is_empty());
    }

    #[test]
    fn anonymous_session_enters_login() {
        let graph = select_navigation_graph(&Session::anonymous());
        assert_eq!(
            graph,
            NavigationGraph::Anonymous {
                entry: Screen::Login
            }
        );
        assert!(graph.contains(Screen::Register));
        assert!(!graph.contains(Screen::CardList));
    }

    #[test]
    fn authenticated_session_enters_card_list() {
        let graph = select_navigation_graph(&Session::authenticated(identity()));
        assert_eq!(graph.entry(), Some(Screen::CardList));
        assert_eq!(
            graph.screens(),
            &[Screen::CardList, Screen::CardEdit, Screen::UpcomingDue]
        );
        assert!(!graph.contains(Screen::Login));
    }

    #[test]
    fn gate_reports_only_real_changes() {
        let mut gate = SessionGate::new();
        assert_eq!(gate.current(), NavigationGraph::Blank);
        assert!(gate.observe(&Session::loading()).is_none());

        let transition = gate
            .observe(&Session::anonymous())
            .expect("loading -> anonymous should transition");
        assert_eq!(transition.from, NavigationGraph::Blank);
        assert!(gate.observe(&Session::anonymous()).is_none());
    }

    #[test]
    fn sign_out_moves_to_anonymous() {
        let mut auth = FakeAuth {
            session: Session::authenticated(identity()),
            logout_calls: 0,
        };
        let mut gate = SessionGate::new();
        gate.observe(&auth.session());

        let transition = gate
            .sign_out(&mut auth)
            .expect("sign-out from card list should succeed")
            .expect("graph should change");
        assert_eq!(
            transition.to,
            NavigationGraph::Anonymous {
                entry: Screen::Login
            }
        );
        assert_eq!(auth.logout_calls, 1);
    }

    #[test]
    fn sign_out_outside_authenticated_graph_is_rejected() {
        let mut auth = FakeAuth {
            session: Session::anonymous(),
            logout_calls: 0,
        };
        let mut gate = SessionGate::new();
        gate.observe(&auth.session());

        let err = gate.sign_out(&mut auth).unwrap_err();
        assert!(matches!(err, NavigationError::SignOutUnavailable { .. }));
        assert_eq!(auth.logout_calls, 0);
    }
}
