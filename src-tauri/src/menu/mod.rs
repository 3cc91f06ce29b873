//! Native application menu.
//!
//! The menu is a static table: `MENU` lists the submenus and their entries,
//! `build` turns it into a Tauri menu and `handlers` maps clicked ids back
//! to their `MenuAction`. Nothing here touches the backend lifecycle except
//! the Exit item, which sends a quit command.
//!
//! # Module Structure
//!
//! - `build` - Menu construction from the table
//! - `handlers` - Menu event handling

mod build;
pub mod handlers;

pub use build::build_app_menu;

/// What a menu item does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Point the main window at a path of the hosted UI.
    Navigate(&'static str),
    Reload,
    ForceReload,
    ToggleDevTools,
    ResetZoom,
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
    /// Leave the application through the regular shutdown.
    Quit,
    /// Open a URL in the system browser.
    OpenExternal(&'static str),
    About,
}

#[derive(Debug, Clone, Copy)]
pub enum MenuEntry {
    Item {
        id: &'static str,
        label: &'static str,
        accelerator: Option<&'static str>,
        action: MenuAction,
    },
    Separator,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuSection {
    pub label: &'static str,
    pub entries: &'static [MenuEntry],
}

const fn item(
    id: &'static str,
    label: &'static str,
    accelerator: Option<&'static str>,
    action: MenuAction,
) -> MenuEntry {
    MenuEntry::Item {
        id,
        label,
        accelerator,
        action,
    }
}

pub const MENU: &[MenuSection] = &[
    MenuSection {
        label: "File",
        entries: &[
            item(
                "new_tournament",
                "New Tournament",
                Some("CmdOrCtrl+N"),
                MenuAction::Navigate("/tournaments/new"),
            ),
            MenuEntry::Separator,
            item("refresh", "Refresh", Some("F5"), MenuAction::Reload),
            MenuEntry::Separator,
            item("exit", "Exit", Some("CmdOrCtrl+Q"), MenuAction::Quit),
        ],
    },
    MenuSection {
        label: "View",
        entries: &[
            item("reload", "Reload", Some("CmdOrCtrl+R"), MenuAction::Reload),
            item(
                "force_reload",
                "Force Reload",
                Some("CmdOrCtrl+Shift+R"),
                MenuAction::ForceReload,
            ),
            item(
                "toggle_devtools",
                "Toggle Developer Tools",
                Some("CmdOrCtrl+Alt+I"),
                MenuAction::ToggleDevTools,
            ),
            MenuEntry::Separator,
            item("reset_zoom", "Actual Size", Some("CmdOrCtrl+0"), MenuAction::ResetZoom),
            item("zoom_in", "Zoom In", Some("CmdOrCtrl+Plus"), MenuAction::ZoomIn),
            item("zoom_out", "Zoom Out", Some("CmdOrCtrl+-"), MenuAction::ZoomOut),
            MenuEntry::Separator,
            item(
                "toggle_fullscreen",
                "Toggle Full Screen",
                Some("F11"),
                MenuAction::ToggleFullscreen,
            ),
        ],
    },
    MenuSection {
        label: "Tournament",
        entries: &[
            item("dashboard", "Dashboard", None, MenuAction::Navigate("/dashboard")),
            item(
                "manage_tournaments",
                "Manage Tournaments",
                None,
                MenuAction::Navigate("/tournaments"),
            ),
        ],
    },
    MenuSection {
        label: "Help",
        entries: &[
            item(
                "documentation",
                "Documentation",
                None,
                MenuAction::OpenExternal("https://docs.bracketapp.nl"),
            ),
            item(
                "report_issue",
                "Report Issue",
                None,
                MenuAction::OpenExternal("https://github.com/evroon/bracket/issues"),
            ),
            MenuEntry::Separator,
            item("about", "About", None, MenuAction::About),
        ],
    },
];

/// Look up the action of a clicked menu id.
pub fn action_for(id: &str) -> Option<MenuAction> {
    MENU.iter()
        .flat_map(|section| section.entries)
        .find_map(|entry| match entry {
            MenuEntry::Item {
                id: item_id,
                action,
                ..
            } if *item_id == id => Some(*action),
            _ => None,
        })
}
