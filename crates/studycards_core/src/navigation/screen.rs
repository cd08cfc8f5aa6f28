//! Screen identifiers and header metadata for the navigation host.

/// Every screen the host can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    CardList,
    CardEdit,
    UpcomingDue,
    Login,
    Register,
}

/// Action button rendered in a screen header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    SignOut,
}

pub const AUTHENTICATED_SCREENS: &[Screen] =
    &[Screen::CardList, Screen::CardEdit, Screen::UpcomingDue];
pub const ANONYMOUS_SCREENS: &[Screen] = &[Screen::Login, Screen::Register];

impl Screen {
    /// Stable route name registered with the host navigator.
    pub fn route_name(self) -> &'static str {
        match self {
            Self::CardList => "ListaCartao",
            Self::CardEdit => "EdicaoCartao",
            Self::UpcomingDue => "TarefasVencimentoProximo",
            Self::Login => "Login",
            Self::Register => "Registro",
        }
    }

    /// Header title.
    pub fn title(self) -> &'static str {
        match self {
            Self::CardList => "Cartões de Estudo",
            Self::CardEdit => "Editar Cartão",
            Self::UpcomingDue => "Tarefas a Vencer",
            Self::Login => "Login",
            Self::Register => "Criar Conta",
        }
    }

    /// Header action, if the screen has one. Only the card list offers sign-out.
    pub fn header_action(self) -> Option<HeaderAction> {
        match self {
            Self::CardList => Some(HeaderAction::SignOut),
            _ => None,
        }
    }

    pub fn from_route_name(value: &str) -> Option<Self> {
        [
            Self::CardList,
            Self::CardEdit,
            Self::UpcomingDue,
            Self::Login,
            Self::Register,
        ]
        .into_iter()
        .find(|screen| screen.route_name() == value)
    }
}
