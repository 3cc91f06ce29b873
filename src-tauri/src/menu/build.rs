//! Menu construction.

use tauri::menu::{Menu, MenuItem, PredefinedMenuItem, Submenu};
use tauri::{AppHandle, Wry};

use super::{MENU, MenuEntry};

/// Build the application menu from the static table.
pub fn build_app_menu(app: &AppHandle) -> Result<Menu<Wry>, tauri::Error> {
    let menu = Menu::new(app)?;

    for section in MENU {
        let submenu = Submenu::new(app, section.label, true)?;
        for entry in section.entries {
            match entry {
                MenuEntry::Item {
                    id,
                    label,
                    accelerator,
                    ..
                } => {
                    let item = MenuItem::with_id(app, *id, *label, true, *accelerator)?;
                    submenu.append(&item)?;
                }
                MenuEntry::Separator => {
                    submenu.append(&PredefinedMenuItem::separator(app)?)?;
                }
            }
        }
        menu.append(&submenu)?;
    }

    Ok(menu)
}
