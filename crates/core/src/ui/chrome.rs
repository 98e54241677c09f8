//! Static page chrome: app header, landing copy and the prompts page header

pub const APP_NAME: &str = "Prompt Manager";

/// A navigation entry in the app header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href:  &'static str,
}

pub const NAV_LINKS: [NavLink; 2] = [
    NavLink {
        label: "Home",
        href:  "/",
    },
    NavLink {
        label: "Prompts",
        href:  "/prompts",
    },
];

pub struct Landing;

impl Landing {
    pub const TITLE: &'static str = APP_NAME;
    pub const TAGLINE: &'static str = "Store and manage all your favorite prompts for easy usage. \
                                       Organize, search, and access your prompts whenever you \
                                       need them.";
    pub const CALL_TO_ACTION: NavLink = NavLink {
        label: "Get Started",
        href:  "/prompts",
    };
}

pub struct PageHeader;

impl PageHeader {
    pub const TITLE: &'static str = "Prompts";
    pub const SUBTITLE: &'static str = "Browse and manage all your favorite prompts";
}
